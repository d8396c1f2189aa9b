//! Aged EKS cluster listing

use crate::aged::types::{age_in_days, AgedResource, ResourceKind};
use crate::error::{Result, TagctlError};
use crate::retry::RetryPolicy;
use aws_sdk_eks::Client as EksClient;
use chrono::{DateTime, Utc};

pub async fn list_clusters(
    config: &aws_config::SdkConfig,
    now: DateTime<Utc>,
) -> Result<Vec<AgedResource>> {
    let client = EksClient::new(config);

    let response = RetryPolicy::for_read()
        .run("list-clusters", || async {
            client
                .list_clusters()
                .send()
                .await
                .map_err(|e| TagctlError::Aws(format!("Failed to list EKS clusters: {}", e)))
        })
        .await?;

    let mut resources = Vec::new();
    for cluster_name in response.clusters() {
        // One describe per cluster; list_clusters only returns names
        let detail = RetryPolicy::for_read()
            .run("describe-cluster", || async {
                client
                    .describe_cluster()
                    .name(cluster_name.as_str())
                    .send()
                    .await
                    .map_err(|e| {
                        TagctlError::Aws(format!(
                            "Failed to describe EKS cluster {}: {}",
                            cluster_name, e
                        ))
                    })
            })
            .await?;

        let Some(cluster) = detail.cluster() else {
            continue;
        };
        let Some(created_at) = cluster
            .created_at()
            .and_then(|t| DateTime::from_timestamp(t.secs(), 0))
        else {
            continue;
        };

        resources.push(AgedResource {
            kind: ResourceKind::EksCluster,
            id: cluster_name.to_string(),
            name: Some(cluster_name.to_string()),
            state: cluster
                .status()
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            created_at,
            age_days: age_in_days(created_at, now),
        });
    }
    Ok(resources)
}
