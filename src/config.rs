use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub aws: AwsConfig,
    pub tags: TagsConfig,
    pub aged: AgedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Default region; overridden by --region, falls back to the SDK chain
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsConfig {
    /// Worker bound for --parallel
    pub parallel_workers: usize,
    /// Skip the interactive confirmation prompt
    pub no_confirm: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgedConfig {
    /// Default age cutoff in days for `tagctl aged`
    pub default_days: i64,
    /// Default output format (table, json, csv)
    pub output: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aws: AwsConfig { region: None },
            tags: TagsConfig {
                parallel_workers: 10,
                no_confirm: false,
            },
            aged: AgedConfig {
                default_days: 2,
                output: "table".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .tagctl.toml in current dir, then ~/.config/tagctl/config.toml
            let local = PathBuf::from(".tagctl.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("tagctl").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".tagctl.toml"))
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content).with_context(|| {
                format!(
                    "Failed to parse config: {}\n  Tip: Run 'tagctl init' to create a new config file",
                    config_path.display()
                )
            })?;
            Ok(config)
        } else {
            if path.is_some() {
                eprintln!("WARNING: Config file not found: {}", config_path.display());
                eprintln!("   Using default configuration. Run 'tagctl init' to create one.");
            }
            Ok(Config::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.tags.parallel_workers, 10);
        assert_eq!(config.aged.default_days, 2);
        assert_eq!(config.aged.output, "table");
        assert!(config.aws.region.is_none());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let mut config = Config::default();
        config.aws.region = Some("eu-west-1".to_string());
        assert!(config.save(&config_path).is_ok());
        assert!(config_path.exists());

        let loaded = Config::load(Some(config_path.as_path())).unwrap();
        assert_eq!(loaded.aws.region.as_deref(), Some("eu-west-1"));
        assert_eq!(loaded.tags.parallel_workers, 10);
    }

    #[test]
    fn test_config_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let fake_path = temp_dir.path().join("nonexistent.toml");

        // Should return default config
        let config = Config::load(Some(fake_path.as_path())).unwrap();
        assert_eq!(config.aged.default_days, 2);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");
        std::fs::write(&config_path, "invalid toml content {").unwrap();

        let result = Config::load(Some(config_path.as_path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_init_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("init_test.toml");

        assert!(init_config(&config_path).is_ok());
        assert!(config_path.exists());

        let config = Config::load(Some(config_path.as_path())).unwrap();
        assert_eq!(config.tags.parallel_workers, 10);
    }
}
