//! Simulation configuration: flat `key=value` files and TOML.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, ConfigResult};

/// Keys accepted by the flat `key=value` format.
const KNOWN_KEYS: &[&str] = &[
    "initialServers",
    "maxServers",
    "simulationLength",
    "seed",
    "requestDelayMin",
    "requestDelayMax",
    "requestProcessingMin",
    "requestProcessingMax",
    "queueLowThreshold",
    "queueHighThreshold",
    "serverAdjustmentDelay",
    "blockedIPs",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Workers in the pool when the clock starts.
    pub initial_servers: u32,
    /// Upper bound on the pool size.
    pub max_servers: u32,
    /// Number of cycles the driver runs.
    pub simulation_length: u64,
    pub seed: u64,
    /// Cycles between generated arrivals, inclusive bounds.
    pub request_delay_min: u32,
    pub request_delay_max: u32,
    /// Service time of generated requests, inclusive bounds.
    pub request_processing_min: u32,
    pub request_processing_max: u32,
    /// Scale down when `queue < low * workers`.
    pub queue_low_threshold: u32,
    /// Scale up when `queue > high * workers`.
    pub queue_high_threshold: u32,
    /// Minimum cycles between two pool adjustments.
    pub server_adjustment_delay: u64,
    /// Comma-separated exact addresses and CIDR ranges.
    #[serde(rename = "blockedIPs", default)]
    pub blocked_ips: String,
}

impl SimulationConfig {
    /// Load a config file. `.toml` files go through serde, anything else
    /// is read as flat `key=value` lines.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_key_values(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the flat format: one `key=value` per line, `#` comments.
    pub fn from_key_values(content: &str) -> ConfigResult<Self> {
        let mut values: HashMap<&str, &str> = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if !KNOWN_KEYS.contains(&key) {
                warn!(key, "ignoring unknown config key");
                continue;
            }
            values.insert(key, value.trim());
        }

        let config = Self {
            initial_servers: required(&values, "initialServers")?,
            max_servers: required(&values, "maxServers")?,
            simulation_length: required(&values, "simulationLength")?,
            seed: required(&values, "seed")?,
            request_delay_min: required(&values, "requestDelayMin")?,
            request_delay_max: required(&values, "requestDelayMax")?,
            request_processing_min: required(&values, "requestProcessingMin")?,
            request_processing_max: required(&values, "requestProcessingMax")?,
            queue_low_threshold: required(&values, "queueLowThreshold")?,
            queue_high_threshold: required(&values, "queueHighThreshold")?,
            server_adjustment_delay: required(&values, "serverAdjustmentDelay")?,
            blocked_ips: values
                .get("blockedIPs")
                .map(|v| v.to_string())
                .unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.initial_servers == 0 {
            return Err(ConfigError::Invalid(
                "initialServers must be at least 1".to_string(),
            ));
        }
        if self.max_servers < self.initial_servers {
            return Err(ConfigError::Invalid(format!(
                "maxServers ({}) is below initialServers ({})",
                self.max_servers, self.initial_servers
            )));
        }
        if self.request_delay_min > self.request_delay_max {
            return Err(ConfigError::Invalid(format!(
                "requestDelayMin ({}) exceeds requestDelayMax ({})",
                self.request_delay_min, self.request_delay_max
            )));
        }
        if self.request_processing_min > self.request_processing_max {
            return Err(ConfigError::Invalid(format!(
                "requestProcessingMin ({}) exceeds requestProcessingMax ({})",
                self.request_processing_min, self.request_processing_max
            )));
        }
        if self.queue_low_threshold > self.queue_high_threshold {
            return Err(ConfigError::Invalid(format!(
                "queueLowThreshold ({}) exceeds queueHighThreshold ({})",
                self.queue_low_threshold, self.queue_high_threshold
            )));
        }
        Ok(())
    }

    /// Individual blocking rules from `blockedIPs`, trimmed, empties dropped.
    pub fn blocked_rules(&self) -> Vec<&str> {
        self.blocked_ips
            .split(',')
            .map(str::trim)
            .filter(|rule| !rule.is_empty())
            .collect()
    }

    pub fn delay_range(&self) -> RangeInclusive<u32> {
        self.request_delay_min..=self.request_delay_max
    }

    pub fn processing_range(&self) -> RangeInclusive<u32> {
        self.request_processing_min..=self.request_processing_max
    }

    /// A reasonable starting config.
    pub fn scaffold() -> Self {
        Self {
            initial_servers: 10,
            max_servers: 30,
            simulation_length: 10_000,
            seed: 42,
            request_delay_min: 1,
            request_delay_max: 10,
            request_processing_min: 10,
            request_processing_max: 100,
            queue_low_threshold: 50,
            queue_high_threshold: 80,
            server_adjustment_delay: 20,
            blocked_ips: String::new(),
        }
    }
}

fn required<T: FromStr>(values: &HashMap<&str, &str>, key: &'static str) -> ConfigResult<T> {
    let raw = values.get(key).ok_or(ConfigError::MissingKey(key))?;
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
# farm sizing
initialServers = 10
maxServers=30
simulationLength = 10000

seed = 7
requestDelayMin = 1
requestDelayMax = 10
requestProcessingMin = 10
requestProcessingMax = 100
queueLowThreshold = 50
queueHighThreshold = 80
serverAdjustmentDelay = 20
blockedIPs = 10.0.0.0/8 , 192.168.1.5,
";

    #[test]
    fn test_parse_key_values() {
        let config = SimulationConfig::from_key_values(SAMPLE).unwrap();
        assert_eq!(config.initial_servers, 10);
        assert_eq!(config.max_servers, 30);
        assert_eq!(config.seed, 7);
        assert_eq!(config.server_adjustment_delay, 20);
        assert_eq!(config.blocked_rules(), vec!["10.0.0.0/8", "192.168.1.5"]);
    }

    #[test]
    fn test_blocked_ips_optional() {
        let without: String = SAMPLE
            .lines()
            .filter(|l| !l.starts_with("blockedIPs"))
            .map(|l| format!("{l}\n"))
            .collect();
        let config = SimulationConfig::from_key_values(&without).unwrap();
        assert!(config.blocked_ips.is_empty());
        assert!(config.blocked_rules().is_empty());
    }

    #[test]
    fn test_unknown_keys_and_garbage_lines_ignored() {
        let content = format!("{SAMPLE}colour = blue\nthis line has no separator\n");
        assert!(SimulationConfig::from_key_values(&content).is_ok());
    }

    #[test]
    fn test_missing_key() {
        let content = SAMPLE.replace("seed = 7\n", "");
        let err = SimulationConfig::from_key_values(&content).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey("seed")));
    }

    #[test]
    fn test_non_numeric_value() {
        let content = SAMPLE.replace("maxServers=30", "maxServers=lots");
        let err = SimulationConfig::from_key_values(&content).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "maxServers"));
    }

    #[test]
    fn test_validate_rejects_inverted_ranges() {
        let mut config = SimulationConfig::scaffold();
        config.request_processing_min = 200;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::scaffold();
        config.max_servers = 5;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::scaffold();
        config.initial_servers = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::scaffold();
        config.queue_low_threshold = 90;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip_uses_camel_case() {
        let mut config = SimulationConfig::scaffold();
        config.blocked_ips = "1.2.3.4".to_string();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("initialServers = 10"));
        assert!(toml_str.contains("blockedIPs = \"1.2.3.4\""));
        assert_eq!(SimulationConfig::from_toml_str(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_from_file_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let flat = dir.path().join("sim.cfg");
        std::fs::File::create(&flat)
            .unwrap()
            .write_all(SAMPLE.as_bytes())
            .unwrap();
        assert_eq!(SimulationConfig::from_file(&flat).unwrap().seed, 7);

        let toml_path = dir.path().join("sim.toml");
        let scaffold = SimulationConfig::scaffold();
        std::fs::write(&toml_path, scaffold.to_toml_string().unwrap()).unwrap();
        assert_eq!(SimulationConfig::from_file(&toml_path).unwrap(), scaffold);
    }

    #[test]
    fn test_missing_file() {
        let err = SimulationConfig::from_file(Path::new("/nonexistent/sim.cfg")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
