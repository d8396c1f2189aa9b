//! Input validation utilities
//!
//! Validates user inputs before any provider call is made, so configuration
//! mistakes fail fast with exit code 1 and zero AWS traffic.

use crate::error::{Result, TagctlError};

/// Validate EC2 subnet ID format
///
/// Subnet IDs must start with "subnet-" followed by hexadecimal characters.
pub fn validate_subnet_id(subnet_id: &str) -> Result<()> {
    if !subnet_id.starts_with("subnet-") {
        return Err(TagctlError::Validation {
            field: "subnet_id".to_string(),
            reason: format!("Subnet ID must start with 'subnet-', got: {}", subnet_id),
        });
    }

    let id_part = &subnet_id["subnet-".len()..];
    if id_part.is_empty() || id_part.len() > 17 {
        return Err(TagctlError::Validation {
            field: "subnet_id".to_string(),
            reason: format!(
                "Subnet ID must have 1-17 characters after 'subnet-', got: {}",
                subnet_id
            ),
        });
    }

    if !id_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TagctlError::Validation {
            field: "subnet_id".to_string(),
            reason: format!(
                "Subnet ID must contain only hex characters after 'subnet-', got: {}",
                subnet_id
            ),
        });
    }

    Ok(())
}

/// Split a comma-separated subnet ID list and validate each entry
pub fn parse_subnet_ids(raw: &str) -> Result<Vec<String>> {
    let ids: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if ids.is_empty() {
        return Err(TagctlError::Validation {
            field: "subnet_ids".to_string(),
            reason: "No subnet IDs supplied".to_string(),
        });
    }

    for id in &ids {
        validate_subnet_id(id)?;
    }
    Ok(ids)
}

/// Validate tag key format
///
/// AWS tag keys are 1-128 characters and may not use the reserved "aws:" prefix
/// for user-initiated deletion.
pub fn validate_tag_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(TagctlError::Validation {
            field: "tag_key".to_string(),
            reason: "Tag key cannot be empty".to_string(),
        });
    }

    if key.len() > 128 {
        return Err(TagctlError::Validation {
            field: "tag_key".to_string(),
            reason: format!("Tag key must be <= 128 characters, got len {}", key.len()),
        });
    }

    if key.starts_with("aws:") {
        return Err(TagctlError::Validation {
            field: "tag_key".to_string(),
            reason: format!("Tag keys with the 'aws:' prefix are reserved: {}", key),
        });
    }

    Ok(())
}

/// Validate age cutoff in days
pub fn validate_days(days: i64) -> Result<()> {
    if days < 0 {
        return Err(TagctlError::Validation {
            field: "days".to_string(),
            reason: format!("Days must be non-negative, got: {}", days),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_subnet_id() {
        assert!(validate_subnet_id("subnet-0123456789abcdef0").is_ok());
        assert!(validate_subnet_id("subnet-abc123").is_ok()); // short legacy form
        assert!(validate_subnet_id("subnet-").is_err()); // no suffix
        assert!(validate_subnet_id("sub-123").is_err()); // wrong prefix
        assert!(validate_subnet_id("subnet-xyz!").is_err()); // non-hex
        assert!(validate_subnet_id("i-0123456789abcdef0").is_err()); // instance id
    }

    #[test]
    fn test_parse_subnet_ids() {
        let ids = parse_subnet_ids("subnet-aa1, subnet-bb2,subnet-cc3").unwrap();
        assert_eq!(ids, vec!["subnet-aa1", "subnet-bb2", "subnet-cc3"]);

        assert!(parse_subnet_ids("").is_err());
        assert!(parse_subnet_ids(" , ,").is_err());
        assert!(parse_subnet_ids("subnet-aa1,bogus").is_err());
    }

    #[test]
    fn test_validate_tag_key() {
        assert!(validate_tag_key("Environment").is_ok());
        assert!(validate_tag_key("kubernetes.io/cluster/foo").is_ok());
        assert!(validate_tag_key("").is_err());
        assert!(validate_tag_key(&"k".repeat(129)).is_err());
        assert!(validate_tag_key("aws:cloudformation:stack-name").is_err());
    }

    #[test]
    fn test_validate_days() {
        assert!(validate_days(0).is_ok());
        assert!(validate_days(2).is_ok());
        assert!(validate_days(-1).is_err());
    }
}
