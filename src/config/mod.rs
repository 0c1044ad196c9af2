pub mod directory;
pub mod lexicon;
pub mod tuning;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
pub use directory::{AntennaRules, BranchRule, ExactName, IdentityConfig, OperatorEntry};
pub use lexicon::Lexicon;
pub use tuning::{SeverityCutoffs, SpeakerMarkers, Thresholds, Weights};

/// Everything the risk engine reads: markers, phrase lists, thresholds.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub markers: SpeakerMarkers,
    pub thresholds: Thresholds,
    pub weights: Weights,
    pub severity: SeverityCutoffs,
    pub lexicon: Lexicon,
}

impl EngineConfig {
    /// Reject settings that would make scores meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let user = self.markers.user.trim();
        let operator = self.markers.operator.trim();
        if user.is_empty() {
            return Err(ConfigError::EmptyMarker("user"));
        }
        if operator.is_empty() {
            return Err(ConfigError::EmptyMarker("operator"));
        }
        if user == operator {
            return Err(ConfigError::IdenticalMarkers(user.to_string()));
        }

        let t = &self.thresholds;
        check_range("thresholds.drift_similarity", t.drift_similarity, -1.0, 1.0)?;
        check_range("thresholds.drift_max_df", t.drift_max_df, 0.0, 1.0)?;

        let w = &self.weights;
        check_range("weights.trauma_discount", w.trauma_discount, 0.0, 1.0)?;
        check_range(
            "weights.mental_health_discount",
            w.mental_health_discount,
            0.0,
            1.0,
        )?;
        for (name, value) in [
            ("weights.self_harm", w.self_harm),
            ("weights.harassment", w.harassment),
            ("weights.manipulation_per_pattern", w.manipulation_per_pattern),
            ("weights.drift_per_point", w.drift_per_point),
            ("weights.drift_cap", w.drift_cap),
        ] {
            check_range(name, value, 0.0, 100.0)?;
        }

        let cutoffs = self.severity.as_array();
        if cutoffs.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err(ConfigError::UnorderedSeverity(cutoffs));
        }
        Ok(())
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Top-level chatrisk config file structure.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatRiskConfig {
    pub engine: EngineConfig,
    pub identity: IdentityConfig,
}

impl ChatRiskConfig {
    /// Load config from `path`, or from ~/.chatrisk/config.toml when no path
    /// is given. A missing default file yields the built-in tables; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (config_path()?, false),
        };
        if !explicit && !path.exists() {
            return Ok(ChatRiskConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ChatRiskConfig = toml::from_str(content)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Effective configuration rendered back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render config as TOML")
    }
}

/// Path to the config file: ~/.chatrisk/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".chatrisk").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.chatrisk/config.toml
# Every key is optional; anything left out keeps its built-in value.
# Run `chatrisk config show` to see the full effective configuration.

[engine.markers]
# user = "User:"
# operator = "Operator:"

[engine.thresholds]
# min_user_turns_for_drift = 5
# drift_similarity = 0.2
# insistence_min_occurrences = 3

[engine.weights]
# self_harm = 40.0
# harassment = 50.0
# manipulation_per_pattern = 10.0
# trauma_discount = 0.7
# mental_health_discount = 0.8

[engine.severity]
# very_high = 80
# high = 60
# moderate = 40
# low = 20

[engine.lexicon]
# self_harm = ["suicide", "me tuer", "en finir"]

[identity.antenna]
# national_departments = ["Appels en attente (national)", "English calls (national)"]

# [[identity.operators]]
# id = 94
# name = "NightlineLille5"
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config() -> Result<bool> {
    let path = config_path()?;
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, default_config_template())?;
    Ok(true)
}
