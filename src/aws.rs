//! AWS ECS integration module.
//!
//! [`EcsApi`] is the seam the pickers talk to; [`EcsClient`] implements it on
//! top of the AWS SDK and converts SDK shapes into the crate's own
//! [`Cluster`] and [`Task`] values.

use async_trait::async_trait;
use aws_sdk_ecs::types::{Cluster as SdkCluster, Failure, Task as SdkTask};
use aws_sdk_ecs::{Client, Error};

use crate::app::{Cluster, Container, Task};

/// DescribeClusters and DescribeTasks accept at most 100 ARNs per call.
const DESCRIBE_BATCH: usize = 100;

/// The subset of the ECS control-plane API used to build the menus.
#[async_trait]
pub trait EcsApi: Send + Sync {
    /// Returns the ARNs of every cluster in the region.
    async fn list_clusters(&self) -> Result<Vec<String>, Error>;

    /// Describes the given clusters, preserving request order.
    async fn describe_clusters(&self, cluster_arns: &[String]) -> Result<Vec<Cluster>, Error>;

    /// Returns the ARNs of the tasks in a cluster.
    async fn list_tasks(&self, cluster_arn: &str) -> Result<Vec<String>, Error>;

    /// Describes the given tasks of a cluster.
    async fn describe_tasks(
        &self,
        cluster_arn: &str,
        task_arns: &[String],
    ) -> Result<Vec<Task>, Error>;
}

/// Client for the AWS ECS API.
pub struct EcsClient {
    /// AWS ECS SDK client
    client: Client,
}

impl EcsClient {
    /// Creates a new ECS client, optionally pinned to a region.
    ///
    /// Credentials and everything else come from the SDK's default
    /// resolution chain (env vars, shared config, instance metadata).
    pub async fn new(region: Option<String>) -> Self {
        let mut config_loader = aws_config::from_env();

        if let Some(region_str) = region {
            config_loader = config_loader.region(aws_config::Region::new(region_str));
        }

        let config = config_loader.load().await;
        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl EcsApi for EcsClient {
    async fn list_clusters(&self) -> Result<Vec<String>, Error> {
        let mut pages = self.client.list_clusters().into_paginator().send();

        let mut arns = Vec::new();
        while let Some(page) = pages.next().await {
            arns.extend(page?.cluster_arns().iter().cloned());
        }
        tracing::debug!(count = arns.len(), "listed clusters");
        Ok(arns)
    }

    async fn describe_clusters(&self, cluster_arns: &[String]) -> Result<Vec<Cluster>, Error> {
        let mut clusters = Vec::with_capacity(cluster_arns.len());

        for batch in cluster_arns.chunks(DESCRIBE_BATCH) {
            let resp = self
                .client
                .describe_clusters()
                .set_clusters(Some(batch.to_vec()))
                .send()
                .await?;

            log_failures("cluster", resp.failures());
            clusters.extend(resp.clusters().iter().map(cluster_from_sdk));
        }

        Ok(clusters)
    }

    async fn list_tasks(&self, cluster_arn: &str) -> Result<Vec<String>, Error> {
        let mut pages = self
            .client
            .list_tasks()
            .cluster(cluster_arn)
            .into_paginator()
            .send();

        let mut arns = Vec::new();
        while let Some(page) = pages.next().await {
            arns.extend(page?.task_arns().iter().cloned());
        }
        tracing::debug!(cluster = cluster_arn, count = arns.len(), "listed tasks");
        Ok(arns)
    }

    async fn describe_tasks(
        &self,
        cluster_arn: &str,
        task_arns: &[String],
    ) -> Result<Vec<Task>, Error> {
        let mut tasks = Vec::with_capacity(task_arns.len());

        for batch in task_arns.chunks(DESCRIBE_BATCH) {
            let resp = self
                .client
                .describe_tasks()
                .cluster(cluster_arn)
                .set_tasks(Some(batch.to_vec()))
                .send()
                .await?;

            log_failures("task", resp.failures());
            tasks.extend(resp.tasks().iter().map(task_from_sdk));
        }

        Ok(tasks)
    }
}

fn log_failures(kind: &str, failures: &[Failure]) {
    for failure in failures {
        tracing::warn!(
            kind,
            arn = failure.arn().unwrap_or("unknown"),
            reason = failure.reason().unwrap_or("unknown"),
            detail = failure.detail().unwrap_or(""),
            "describe reported a failure"
        );
    }
}

/// Falls back to the last ARN segment when the SDK omits the cluster name.
pub(crate) fn cluster_from_sdk(cluster: &SdkCluster) -> Cluster {
    let arn = cluster.cluster_arn().unwrap_or_default().to_string();
    let name = match cluster.cluster_name() {
        Some(name) => name.to_string(),
        None => arn.split('/').next_back().unwrap_or(&arn).to_string(),
    };
    Cluster { name, arn }
}

pub(crate) fn task_from_sdk(task: &SdkTask) -> Task {
    Task {
        arn: task.task_arn().unwrap_or("unknown").to_string(),
        last_status: task.last_status().unwrap_or("unknown").to_string(),
        exec_enabled: task.enable_execute_command(),
        containers: task
            .containers()
            .iter()
            .map(|c| Container {
                name: c.name().unwrap_or("unknown").to_string(),
            })
            .collect(),
    }
}
