//! Planner configuration loaded from TOML.
//!
//! Resolution order for the file: `PROJECT_PLANNER_CONFIG`, then
//! `Planner.toml` in the working directory if present, else defaults.
//! `PROJECT_PLANNER_HTTP_ADDR` overrides `[http].addr`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::chart::ChartOptions;

pub const CONFIG_ENV: &str = "PROJECT_PLANNER_CONFIG";
pub const HTTP_ADDR_ENV: &str = "PROJECT_PLANNER_HTTP_ADDR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Default log level when neither the caller nor `PROJECT_PLANNER_LOG` sets one.
    pub log_level: Option<String>,
    pub chart: ChartOptions,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
        }
    }
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<PlannerConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;
    parse(&contents).with_context(|| format!("parsing TOML config from {:?}", path))
}

pub fn parse(contents: &str) -> Result<PlannerConfig> {
    Ok(toml::from_str(contents)?)
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("Planner.toml")
}

/// Loads the configuration the binaries run with, applying environment overrides.
pub fn load() -> Result<PlannerConfig> {
    let mut config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => load_from_path(PathBuf::from(path))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                load_from_path(path)?
            } else {
                PlannerConfig::default()
            }
        }
    };

    if let Ok(addr) = std::env::var(HTTP_ADDR_ENV) {
        config.http.addr = addr;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.chart.width, 1000.0);
        assert_eq!(config.http.addr, "127.0.0.1:3000");
    }

    #[test]
    fn partial_chart_section_keeps_other_defaults() {
        let config = parse(
            r#"
            log_level = "debug"

            [chart]
            dark_mode = true
            width = 1200.0
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.chart.dark_mode);
        assert_eq!(config.chart.width, 1200.0);
        assert_eq!(config.chart.title_width, 250.0);
        assert_eq!(config.chart.days_per_week, 5);
    }

    #[test]
    fn rejects_unparseable_toml() {
        assert!(parse("[chart\nwidth = ").is_err());
    }

    #[test]
    fn load_from_path_reads_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "[http]\naddr = \"0.0.0.0:8080\"\n").unwrap();
        let config = load_from_path(file.path()).unwrap();
        assert_eq!(config.http.addr, "0.0.0.0:8080");
    }
}
