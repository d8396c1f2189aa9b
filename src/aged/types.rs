//! Types and date filtering for aged-resource listing

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Ec2Instance,
    EksCluster,
    RdsInstance,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Ec2Instance => write!(f, "ec2"),
            ResourceKind::EksCluster => write!(f, "eks"),
            ResourceKind::RdsInstance => write!(f, "rds"),
        }
    }
}

/// A resource with a known creation time, as shown by `tagctl aged`
#[derive(Debug, Clone, Serialize)]
pub struct AgedResource {
    pub kind: ResourceKind,
    pub id: String,
    pub name: Option<String>,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub age_days: i64,
}

/// Whole-day age, truncating (epoch-seconds difference over 86400)
pub fn age_in_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at).num_seconds() / 86_400
}

/// True when the resource is at least `cutoff_days` old
pub fn is_older_than(created_at: DateTime<Utc>, now: DateTime<Utc>, cutoff_days: i64) -> bool {
    age_in_days(created_at, now) >= cutoff_days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_age_in_days_truncates() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(age_in_days(created, now), 4);

        // 3 days and 23 hours truncates to 3
        let now = Utc.with_ymd_and_hms(2024, 1, 4, 23, 0, 0).unwrap();
        assert_eq!(age_in_days(created, now), 3);
    }

    #[test]
    fn test_is_older_than_cutoff() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        assert!(is_older_than(created, now, 2));
        assert!(is_older_than(created, now, 4));
        assert!(!is_older_than(created, now, 5));
    }

    #[test]
    fn test_future_creation_not_older() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let created = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        assert!(!is_older_than(created, now, 1));
    }
}
