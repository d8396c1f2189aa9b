//! Output rendering for aged-resource listings

use crate::aged::types::AgedResource;
use crate::error::{Result, TagctlError};
use comfy_table::Table;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(TagctlError::Validation {
                field: "output".to_string(),
                reason: format!("Unsupported format: {}. Use table, json or csv", other),
            }),
        }
    }
}

/// Render the listing in the requested format
pub fn render(resources: &[AgedResource], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(resources)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(resources)?),
        OutputFormat::Csv => Ok(render_csv(resources)),
    }
}

fn render_table(resources: &[AgedResource]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Kind", "ID", "Name", "State", "Created", "Age (days)"]);
    for r in resources {
        table.add_row(vec![
            r.kind.to_string(),
            r.id.clone(),
            r.name.clone().unwrap_or_else(|| "-".to_string()),
            r.state.clone(),
            r.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            r.age_days.to_string(),
        ]);
    }
    table.to_string()
}

fn render_csv(resources: &[AgedResource]) -> String {
    let mut csv = String::from("kind,id,name,state,created_at,age_days\n");
    for r in resources {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            r.kind,
            r.id,
            r.name.as_deref().unwrap_or(""),
            r.state,
            r.created_at.to_rfc3339(),
            r.age_days
        ));
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aged::types::ResourceKind;
    use chrono::TimeZone;
    use chrono::Utc;

    fn sample() -> Vec<AgedResource> {
        vec![AgedResource {
            kind: ResourceKind::Ec2Instance,
            id: "i-0abc".to_string(),
            name: Some("web".to_string()),
            state: "running".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            age_days: 4,
        }]
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::parse("table").unwrap(), OutputFormat::Table);
        assert_eq!(OutputFormat::parse("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("csv").unwrap(), OutputFormat::Csv);
        assert!(OutputFormat::parse("yaml").is_err());
    }

    #[test]
    fn test_render_csv() {
        let csv = render(&sample(), OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "kind,id,name,state,created_at,age_days");
        let row = lines.next().unwrap();
        assert!(row.starts_with("ec2,i-0abc,web,running,"));
        assert!(row.ends_with(",4"));
    }

    #[test]
    fn test_render_json_is_valid() {
        let json = render(&sample(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["id"], "i-0abc");
        assert_eq!(parsed[0]["age_days"], 4);
    }

    #[test]
    fn test_render_table_contains_fields() {
        let table = render(&sample(), OutputFormat::Table).unwrap();
        assert!(table.contains("i-0abc"));
        assert!(table.contains("running"));
    }
}
