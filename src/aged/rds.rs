//! Aged RDS instance listing

use crate::aged::types::{age_in_days, AgedResource, ResourceKind};
use crate::error::{Result, TagctlError};
use crate::retry::RetryPolicy;
use aws_sdk_rds::Client as RdsClient;
use chrono::{DateTime, Utc};

pub async fn list_db_instances(
    config: &aws_config::SdkConfig,
    now: DateTime<Utc>,
) -> Result<Vec<AgedResource>> {
    let client = RdsClient::new(config);

    let response = RetryPolicy::for_read()
        .run("describe-db-instances", || async {
            client
                .describe_db_instances()
                .send()
                .await
                .map_err(|e| TagctlError::Aws(format!("Failed to list RDS instances: {}", e)))
        })
        .await?;

    let mut resources = Vec::new();
    for db in response.db_instances() {
        let Some(id) = db.db_instance_identifier() else {
            continue;
        };
        let Some(created_at) = db
            .instance_create_time()
            .and_then(|t| DateTime::from_timestamp(t.secs(), 0))
        else {
            continue;
        };

        resources.push(AgedResource {
            kind: ResourceKind::RdsInstance,
            id: id.to_string(),
            name: db.engine().map(|e| e.to_string()),
            state: db
                .db_instance_status()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            created_at,
            age_days: age_in_days(created_at, now),
        });
    }
    Ok(resources)
}
