//! Aged EC2 instance listing

use crate::aged::types::{age_in_days, AgedResource, ResourceKind};
use crate::error::{Result, TagctlError};
use crate::retry::RetryPolicy;
use aws_sdk_ec2::Client as Ec2Client;
use chrono::{DateTime, Utc};

pub async fn list_instances(
    config: &aws_config::SdkConfig,
    now: DateTime<Utc>,
) -> Result<Vec<AgedResource>> {
    let client = Ec2Client::new(config);

    let response = RetryPolicy::for_read()
        .run("describe-instances", || async {
            client
                .describe_instances()
                .send()
                .await
                .map_err(|e| TagctlError::Aws(format!("Failed to list EC2 instances: {}", e)))
        })
        .await?;

    let mut resources = Vec::new();
    for reservation in response.reservations() {
        for instance in reservation.instances() {
            let Some(instance_id) = instance.instance_id() else {
                continue;
            };
            // Instances with no launch time cannot be age-classified
            let Some(created_at) = instance
                .launch_time()
                .and_then(|t| DateTime::from_timestamp(t.secs(), 0))
            else {
                continue;
            };

            let state = instance
                .state()
                .and_then(|s| s.name())
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            let name = instance
                .tags()
                .iter()
                .find(|t| t.key() == Some("Name"))
                .and_then(|t| t.value())
                .map(|v| v.to_string());

            resources.push(AgedResource {
                kind: ResourceKind::Ec2Instance,
                id: instance_id.to_string(),
                name,
                state,
                created_at,
                age_days: age_in_days(created_at, now),
            });
        }
    }
    Ok(resources)
}
