//! The three numbered menus: cluster, task, container.
//!
//! Each picker renders its menu through a [`Prompt`], reads one line and
//! returns the chosen value. Invalid selections come back as
//! [`PickError`] values; deciding to exit is left to the caller.

use std::io::{BufRead, Write};

use crate::app::{Cluster, Container, Task};
use crate::aws::EcsApi;
use crate::console::Prompt;
use crate::error::{ApiStage, PickError};

/// Lists and describes every cluster, then asks the operator to pick one.
pub async fn select_cluster<A, R, W>(
    api: &A,
    prompt: &mut Prompt<R, W>,
) -> Result<Cluster, PickError>
where
    A: EcsApi + ?Sized,
    R: BufRead,
    W: Write,
{
    let arns = api
        .list_clusters()
        .await
        .map_err(PickError::api(ApiStage::ListClusters))?;
    if arns.is_empty() {
        return Err(PickError::Empty("clusters"));
    }

    let mut clusters = api
        .describe_clusters(&arns)
        .await
        .map_err(PickError::api(ApiStage::DescribeClusters))?;
    if clusters.is_empty() {
        return Err(PickError::Empty("clusters"));
    }

    for (i, cluster) in clusters.iter().enumerate() {
        prompt.line(&format!("{i} | {}", cluster.name))?;
    }

    let selection = prompt.select("Select an ECS Cluster", clusters.len())?;
    Ok(clusters.swap_remove(selection))
}

/// Lists and describes the tasks in `cluster`, then asks the operator to pick
/// one. Container names are shown under each task but are not selectable here.
pub async fn select_task<A, R, W>(
    api: &A,
    prompt: &mut Prompt<R, W>,
    cluster: &Cluster,
) -> Result<Task, PickError>
where
    A: EcsApi + ?Sized,
    R: BufRead,
    W: Write,
{
    let arns = api
        .list_tasks(&cluster.arn)
        .await
        .map_err(PickError::api(ApiStage::ListTasks))?;
    if arns.is_empty() {
        return Err(PickError::Empty("tasks"));
    }

    let mut tasks = api
        .describe_tasks(&cluster.arn, &arns)
        .await
        .map_err(PickError::api(ApiStage::DescribeTasks))?;
    if tasks.is_empty() {
        return Err(PickError::Empty("tasks"));
    }

    for (i, task) in tasks.iter().enumerate() {
        prompt.line(&format!("{i} | {}", task.arn))?;
        for container in &task.containers {
            prompt.line(&format!("  * {}", container.name))?;
        }
    }

    let selection = prompt.select("Select an ECS Task", tasks.len())?;
    let task = tasks.swap_remove(selection);

    if !task.exec_enabled {
        tracing::warn!(
            task = %task.arn,
            status = %task.last_status,
            "execute command is not enabled on this task; the session will likely be refused"
        );
    }
    Ok(task)
}

/// Picks a container from `task`. A single container is returned without
/// prompting.
pub fn select_container<R, W>(
    prompt: &mut Prompt<R, W>,
    task: &Task,
) -> Result<Container, PickError>
where
    R: BufRead,
    W: Write,
{
    match task.containers.as_slice() {
        [] => return Err(PickError::Empty("containers")),
        [only] => {
            tracing::debug!(container = %only.name, "single container, skipping menu");
            return Ok(only.clone());
        }
        _ => {}
    }

    for (i, container) in task.containers.iter().enumerate() {
        prompt.line(&format!("{i} | {}", container.name))?;
    }

    let selection = prompt.select("Select a Container", task.containers.len())?;
    Ok(task.containers[selection].clone())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use aws_sdk_ecs::types::error::ServerException;
    use std::io::Cursor;
    use std::sync::Mutex;

    /// In-memory stand-in for the ECS API.
    #[derive(Default)]
    pub(crate) struct FakeEcs {
        pub clusters: Vec<Cluster>,
        pub tasks: Vec<Task>,
        pub fail: Option<ApiStage>,
        pub task_requests: Mutex<Vec<String>>,
    }

    impl FakeEcs {
        pub fn with_clusters(names: &[&str]) -> Self {
            Self {
                clusters: names.iter().map(|n| cluster(n)).collect(),
                ..Self::default()
            }
        }

        fn check(&self, stage: ApiStage) -> Result<(), aws_sdk_ecs::Error> {
            if self.fail == Some(stage) {
                return Err(aws_sdk_ecs::Error::ServerException(
                    ServerException::builder().message("boom").build(),
                ));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl EcsApi for FakeEcs {
        async fn list_clusters(&self) -> Result<Vec<String>, aws_sdk_ecs::Error> {
            self.check(ApiStage::ListClusters)?;
            Ok(self.clusters.iter().map(|c| c.arn.clone()).collect())
        }

        async fn describe_clusters(
            &self,
            cluster_arns: &[String],
        ) -> Result<Vec<Cluster>, aws_sdk_ecs::Error> {
            self.check(ApiStage::DescribeClusters)?;
            Ok(self
                .clusters
                .iter()
                .filter(|c| cluster_arns.contains(&c.arn))
                .cloned()
                .collect())
        }

        async fn list_tasks(&self, cluster_arn: &str) -> Result<Vec<String>, aws_sdk_ecs::Error> {
            self.check(ApiStage::ListTasks)?;
            self.task_requests
                .lock()
                .unwrap()
                .push(cluster_arn.to_string());
            Ok(self.tasks.iter().map(|t| t.arn.clone()).collect())
        }

        async fn describe_tasks(
            &self,
            _cluster_arn: &str,
            task_arns: &[String],
        ) -> Result<Vec<Task>, aws_sdk_ecs::Error> {
            self.check(ApiStage::DescribeTasks)?;
            Ok(self
                .tasks
                .iter()
                .filter(|t| task_arns.contains(&t.arn))
                .cloned()
                .collect())
        }
    }

    pub(crate) fn cluster(name: &str) -> Cluster {
        Cluster {
            name: name.to_string(),
            arn: format!("arn:aws:ecs:ap-southeast-2:123456789012:cluster/{name}"),
        }
    }

    pub(crate) fn task(arn: &str, containers: &[&str]) -> Task {
        Task {
            arn: arn.to_string(),
            last_status: "RUNNING".to_string(),
            exec_enabled: true,
            containers: containers
                .iter()
                .map(|name| Container {
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    pub(crate) fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(prompt: Prompt<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        let (_, out) = prompt.into_parts();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_select_cluster_by_index() {
        let api = FakeEcs::with_clusters(&["dev", "prod"]);
        let mut p = prompt("1\n");

        let selected = select_cluster(&api, &mut p).await.unwrap();
        assert_eq!(selected.name, "prod");
        assert_eq!(
            output(p),
            "0 | dev\n1 | prod\n\nSelect an ECS Cluster: "
        );
    }

    #[tokio::test]
    async fn test_select_cluster_every_index() {
        let names = ["a", "b", "c", "d"];
        for (i, name) in names.iter().enumerate() {
            let api = FakeEcs::with_clusters(&names);
            let mut p = prompt(&format!("{i}\n"));
            assert_eq!(select_cluster(&api, &mut p).await.unwrap().name, *name);
        }
    }

    #[tokio::test]
    async fn test_select_cluster_out_of_range() {
        let api = FakeEcs::with_clusters(&["dev"]);
        let mut p = prompt("5\n");

        let err = select_cluster(&api, &mut p).await.unwrap_err();
        assert!(matches!(
            err,
            PickError::OutOfRange { selection: 5, len: 1 }
        ));
    }

    #[tokio::test]
    async fn test_select_cluster_index_equal_to_len() {
        let api = FakeEcs::with_clusters(&["dev", "prod"]);
        let mut p = prompt("2\n");

        let err = select_cluster(&api, &mut p).await.unwrap_err();
        assert!(matches!(err, PickError::OutOfRange { .. }));
    }

    #[tokio::test]
    async fn test_select_cluster_negative_and_non_numeric() {
        let api = FakeEcs::with_clusters(&["dev", "prod"]);

        let err = select_cluster(&api, &mut prompt("-1\n")).await.unwrap_err();
        assert!(matches!(err, PickError::OutOfRange { selection: -1, .. }));

        let err = select_cluster(&api, &mut prompt("prod\n")).await.unwrap_err();
        assert!(matches!(err, PickError::NotANumber { .. }));
    }

    #[tokio::test]
    async fn test_select_cluster_no_input() {
        let api = FakeEcs::with_clusters(&["dev"]);
        let err = select_cluster(&api, &mut prompt("")).await.unwrap_err();
        assert!(matches!(err, PickError::Input(_)));
    }

    #[tokio::test]
    async fn test_select_cluster_empty() {
        let api = FakeEcs::default();
        let mut p = prompt("0\n");

        let err = select_cluster(&api, &mut p).await.unwrap_err();
        assert!(matches!(err, PickError::Empty("clusters")));
        assert_eq!(output(p), "");
    }

    #[tokio::test]
    async fn test_select_cluster_api_failures_name_the_stage() {
        for stage in [ApiStage::ListClusters, ApiStage::DescribeClusters] {
            let api = FakeEcs {
                fail: Some(stage),
                ..FakeEcs::with_clusters(&["dev"])
            };
            let err = select_cluster(&api, &mut prompt("0\n")).await.unwrap_err();
            match err {
                PickError::Api { stage: failed, .. } => assert_eq!(failed, stage),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_select_task_renders_containers() {
        let api = FakeEcs {
            tasks: vec![
                task("arn:task/1", &["web", "sidecar"]),
                task("arn:task/2", &["worker"]),
            ],
            ..FakeEcs::default()
        };
        let prod = cluster("prod");
        let mut p = prompt("1\n");

        let selected = select_task(&api, &mut p, &prod).await.unwrap();
        assert_eq!(selected.arn, "arn:task/2");
        assert_eq!(*api.task_requests.lock().unwrap(), [prod.arn.clone()]);
        assert_eq!(
            output(p),
            "0 | arn:task/1\n  * web\n  * sidecar\n1 | arn:task/2\n  * worker\n\nSelect an ECS Task: "
        );
    }

    #[tokio::test]
    async fn test_select_task_out_of_range() {
        let api = FakeEcs {
            tasks: vec![task("arn:task/1", &["web"])],
            ..FakeEcs::default()
        };
        let err = select_task(&api, &mut prompt("1\n"), &cluster("prod"))
            .await
            .unwrap_err();
        assert!(matches!(err, PickError::OutOfRange { selection: 1, len: 1 }));
    }

    #[tokio::test]
    async fn test_select_task_empty_cluster() {
        let api = FakeEcs::default();
        let err = select_task(&api, &mut prompt("0\n"), &cluster("prod"))
            .await
            .unwrap_err();
        assert!(matches!(err, PickError::Empty("tasks")));
    }

    #[tokio::test]
    async fn test_select_task_describe_failure() {
        let api = FakeEcs {
            tasks: vec![task("arn:task/1", &["web"])],
            fail: Some(ApiStage::DescribeTasks),
            ..FakeEcs::default()
        };
        let err = select_task(&api, &mut prompt("0\n"), &cluster("prod"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to describe tasks");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_select_task_without_exec_still_selects() {
        let mut no_exec = task("arn:task/1", &["web"]);
        no_exec.exec_enabled = false;
        let api = FakeEcs {
            tasks: vec![no_exec],
            ..FakeEcs::default()
        };
        let selected = select_task(&api, &mut prompt("0\n"), &cluster("prod"))
            .await
            .unwrap();
        assert!(!selected.exec_enabled);
    }

    #[test]
    fn test_select_container_two_containers() {
        let t = task("arn:task/1", &["web", "sidecar"]);
        let mut p = prompt("0\n");

        let selected = select_container(&mut p, &t).unwrap();
        assert_eq!(selected.name, "web");
        assert_eq!(output(p), "0 | web\n1 | sidecar\n\nSelect a Container: ");
    }

    #[test]
    fn test_select_container_consumes_exactly_one_line() {
        let t = task("arn:task/1", &["web", "sidecar"]);
        let mut p = prompt("1\nleftover\n");

        assert_eq!(select_container(&mut p, &t).unwrap().name, "sidecar");
        let (mut input, _) = p.into_parts();
        let mut rest = String::new();
        std::io::Read::read_to_string(&mut input, &mut rest).unwrap();
        assert_eq!(rest, "leftover\n");
    }

    #[test]
    fn test_select_container_single_skips_prompt() {
        let t = task("arn:task/1", &["only"]);
        let mut p = prompt("");

        assert_eq!(select_container(&mut p, &t).unwrap().name, "only");
        assert_eq!(output(p), "");
    }

    #[test]
    fn test_select_container_out_of_range() {
        let t = task("arn:task/1", &["web", "sidecar"]);
        let err = select_container(&mut prompt("2\n"), &t).unwrap_err();
        assert!(matches!(err, PickError::OutOfRange { selection: 2, len: 2 }));
    }

    #[test]
    fn test_select_container_none() {
        let t = task("arn:task/1", &[]);
        let err = select_container(&mut prompt("0\n"), &t).unwrap_err();
        assert!(matches!(err, PickError::Empty("containers")));
    }
}
