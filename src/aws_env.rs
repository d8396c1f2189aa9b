//! AWS environment resolution
//!
//! Resolves the target region (flag, config file, then the SDK's default
//! provider chain) and verifies credentials before any mutating command runs.
//! Both checks are fatal: there is no point enumerating resources a caller
//! cannot see or touch.

use crate::error::{Result, TagctlError};
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::debug;

/// Load SDK config with an explicit region override
///
/// Fails with an environment error when no region is resolvable from the
/// override, the shared config files, or the instance metadata chain.
pub async fn load_sdk_config(region: Option<String>) -> Result<SdkConfig> {
    let region_provider =
        RegionProviderChain::first_try(region.map(Region::new)).or_default_provider();

    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await;

    match config.region() {
        Some(r) => {
            debug!("Resolved region: {}", r);
            Ok(config)
        }
        None => Err(TagctlError::Environment(
            "No AWS region resolvable; pass --region or configure a default".to_string(),
        )),
    }
}

/// Region name from a resolved SDK config
pub fn region_name(config: &SdkConfig) -> String {
    config
        .region()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Verify that credentials are usable by calling STS GetCallerIdentity
///
/// Returns the account ID on success.
pub async fn verify_credentials(config: &SdkConfig) -> Result<String> {
    let sts = aws_sdk_sts::Client::new(config);
    let identity = sts.get_caller_identity().send().await.map_err(|e| {
        TagctlError::Environment(format!("AWS credentials check failed: {}", e))
    })?;

    let account = identity.account().unwrap_or("unknown").to_string();
    debug!("Authenticated as account {}", account);
    Ok(account)
}
