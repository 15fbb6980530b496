//! Configuration for estimation and sequencing.
//!
//! Load order: `.lo/config.toml` → environment variables → defaults.

use crate::id::MODULE_DELIMITER;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Top-level planner configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub sequencing: SequencingConfig,
    pub estimation: EstimationConfig,
}

/// How a selection is turned into a study sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStrategy {
    /// Partition by module, order modules by first authored member,
    /// unknown LOs trail the known members of their module.
    #[default]
    Grouped,
    /// Known LOs in authored order, then every unknown LO ordered by the
    /// last authored position of its module.
    Global,
}

impl FromStr for SequenceStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grouped" => Ok(Self::Grouped),
            "global" => Ok(Self::Global),
            other => Err(format!("unknown sequence strategy: {other}")),
        }
    }
}

/// Sequencer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencingConfig {
    /// Character separating an LO's module prefix from the rest of its id.
    pub module_delimiter: char,
    pub strategy: SequenceStrategy,
}

/// Estimation display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationConfig {
    /// Label printed after estimated times.
    pub time_unit: String,
}

impl Default for SequencingConfig {
    fn default() -> Self {
        Self {
            module_delimiter: MODULE_DELIMITER,
            strategy: SequenceStrategy::default(),
        }
    }
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            time_unit: "min".to_string(),
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl PlannerConfig {
    /// Load config from `.lo/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".lo").join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("invalid planner config in {}", config_path.display()))?
        } else {
            Self::default()
        };

        env_override(
            "LO_MODULE_DELIMITER",
            &mut config.sequencing.module_delimiter,
        );
        env_override("LO_SEQUENCE_STRATEGY", &mut config.sequencing.strategy);
        env_override("LO_TIME_UNIT", &mut config.estimation.time_unit);

        if config.sequencing.module_delimiter.is_whitespace() {
            anyhow::bail!("module_delimiter must not be whitespace");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.sequencing.module_delimiter, '-');
        assert_eq!(config.sequencing.strategy, SequenceStrategy::Grouped);
        assert_eq!(config.estimation.time_unit, "min");
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[sequencing]
module_delimiter = "."
strategy = "global"
"#;
        let config: PlannerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sequencing.module_delimiter, '.');
        assert_eq!(config.sequencing.strategy, SequenceStrategy::Global);
        // Defaults for unspecified sections
        assert_eq!(config.estimation.time_unit, "min");
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "Global".parse::<SequenceStrategy>(),
            Ok(SequenceStrategy::Global)
        );
        assert!("random".parse::<SequenceStrategy>().is_err());
    }

    #[test]
    fn test_config_load_nonexistent() {
        let config = PlannerConfig::load(Path::new("/nonexistent/path")).unwrap();
        assert_eq!(config.estimation.time_unit, "min");
    }

    #[test]
    fn test_load_reads_session_config() {
        let tmp = tempfile::tempdir().unwrap();
        let lo_dir = tmp.path().join(".lo");
        std::fs::create_dir_all(&lo_dir).unwrap();
        std::fs::write(
            lo_dir.join("config.toml"),
            r#"
[estimation]
time_unit = "minutes"
"#,
        )
        .unwrap();

        let config = PlannerConfig::load(tmp.path()).unwrap();
        assert_eq!(config.estimation.time_unit, "minutes");
        assert_eq!(config.sequencing.strategy, SequenceStrategy::Grouped);
    }

    #[test]
    fn test_load_rejects_whitespace_delimiter() {
        let tmp = tempfile::tempdir().unwrap();
        let lo_dir = tmp.path().join(".lo");
        std::fs::create_dir_all(&lo_dir).unwrap();
        std::fs::write(
            lo_dir.join("config.toml"),
            "[sequencing]\nmodule_delimiter = \" \"\n",
        )
        .unwrap();

        let err = PlannerConfig::load(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }
}
