//! Provider abstraction for subnet tag operations
//!
//! The tag engine only talks to this trait, so the matching and deletion
//! logic is testable against an in-memory provider. The EC2 implementation
//! wraps the AWS SDK calls in the crate's retry policy.

use crate::error::{Result, TagctlError};
use crate::retry::RetryPolicy;
use crate::tags::types::Tag;
use async_trait::async_trait;
use aws_sdk_ec2::types::Filter;
use aws_sdk_ec2::Client as Ec2Client;

/// Resource identifier (subnet ID, instance ID, etc.)
pub type ResourceId = String;

/// Subnet attributes shown by `tagctl tags list`
#[derive(Debug, Clone)]
pub struct SubnetDetails {
    pub subnet_id: ResourceId,
    pub vpc_id: Option<String>,
    pub availability_zone: Option<String>,
    pub cidr_block: Option<String>,
    pub tags: Vec<Tag>,
}

/// Trait for the subnet tag operations the engine consumes
#[async_trait]
pub trait TagProvider: Send + Sync {
    /// List all subnet IDs in the target region
    async fn list_subnets(&self) -> Result<Vec<ResourceId>>;

    /// Describe a single subnet, including its tags
    async fn describe_subnet(&self, subnet_id: &str) -> Result<SubnetDetails>;

    /// Fetch the current tag set for a resource
    ///
    /// A resource with no tags yields an empty vec, not an error.
    async fn fetch_tags(&self, resource_id: &str) -> Result<Vec<Tag>>;

    /// Delete the given tag keys from a resource in a single batch call
    async fn delete_tags(&self, resource_id: &str, keys: &[String]) -> Result<()>;
}

/// EC2-backed provider
pub struct Ec2SubnetProvider {
    client: Ec2Client,
}

impl Ec2SubnetProvider {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Ec2Client::new(config),
        }
    }
}

#[async_trait]
impl TagProvider for Ec2SubnetProvider {
    async fn list_subnets(&self) -> Result<Vec<ResourceId>> {
        let response = RetryPolicy::for_read()
            .run("describe-subnets", || async {
                self.client
                    .describe_subnets()
                    .send()
                    .await
                    .map_err(|e| TagctlError::Aws(format!("Failed to list subnets: {}", e)))
            })
            .await?;

        let ids = response
            .subnets()
            .iter()
            .filter_map(|s| s.subnet_id().map(|id| id.to_string()))
            .collect();
        Ok(ids)
    }

    async fn describe_subnet(&self, subnet_id: &str) -> Result<SubnetDetails> {
        let response = RetryPolicy::for_read()
            .run("describe-subnet", || async {
                self.client
                    .describe_subnets()
                    .subnet_ids(subnet_id)
                    .send()
                    .await
                    .map_err(|e| TagctlError::Fetch {
                        resource_id: subnet_id.to_string(),
                        message: e.to_string(),
                    })
            })
            .await?;

        let subnet = response
            .subnets()
            .first()
            .ok_or_else(|| TagctlError::Fetch {
                resource_id: subnet_id.to_string(),
                message: "Subnet not found".to_string(),
            })?;

        Ok(SubnetDetails {
            subnet_id: subnet_id.to_string(),
            vpc_id: subnet.vpc_id().map(|s| s.to_string()),
            availability_zone: subnet.availability_zone().map(|s| s.to_string()),
            cidr_block: subnet.cidr_block().map(|s| s.to_string()),
            tags: subnet
                .tags()
                .iter()
                .map(|t| Tag {
                    key: t.key().unwrap_or_default().to_string(),
                    value: t.value().unwrap_or_default().to_string(),
                })
                .collect(),
        })
    }

    async fn fetch_tags(&self, resource_id: &str) -> Result<Vec<Tag>> {
        let response = RetryPolicy::for_read()
            .run("describe-tags", || async {
                self.client
                    .describe_tags()
                    .filters(
                        Filter::builder()
                            .name("resource-id")
                            .values(resource_id)
                            .build(),
                    )
                    .send()
                    .await
                    .map_err(|e| TagctlError::Fetch {
                        resource_id: resource_id.to_string(),
                        message: e.to_string(),
                    })
            })
            .await?;

        let tags = response
            .tags()
            .iter()
            .map(|t| Tag {
                key: t.key().unwrap_or_default().to_string(),
                value: t.value().unwrap_or_default().to_string(),
            })
            .collect();
        Ok(tags)
    }

    async fn delete_tags(&self, resource_id: &str, keys: &[String]) -> Result<()> {
        // Key-only deletion: the match step already decided which tags go,
        // so the batch call removes the key regardless of current value.
        let tag_specs: Vec<aws_sdk_ec2::types::Tag> = keys
            .iter()
            .map(|k| aws_sdk_ec2::types::Tag::builder().key(k).build())
            .collect();

        RetryPolicy::for_mutation()
            .run("delete-tags", || {
                let tag_specs = tag_specs.clone();
                async move {
                    self.client
                        .delete_tags()
                        .resources(resource_id)
                        .set_tags(Some(tag_specs))
                        .send()
                        .await
                        .map_err(|e| TagctlError::Delete {
                            resource_id: resource_id.to_string(),
                            message: e.to_string(),
                        })?;
                    Ok(())
                }
            })
            .await
    }
}
