// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Swarm Configuration Types
//
// Defines the configuration schema for a SwarmHive coordinator, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Registered worker pools and their consensus weights
// - Default topology / consensus / queen selection and swarm timeout
// - Consensus tuning (PBFT fault tolerance, Honeybee exploration rate and seed)
// - Hive-mind memory settings
// - Observability settings

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::error::ConfigurationError;
use crate::domain::objective::PoolId;
use crate::domain::queen::{QueenKind, DEFAULT_MEMORY_CAPACITY};
use crate::domain::swarm::{ConsensusKind, TopologyKind};

pub const API_VERSION: &str = "100monkeys.ai/v1";
pub const MANIFEST_KIND: &str = "SwarmConfig";
pub const CONFIG_PATH_ENV: &str = "SWARMHIVE_CONFIG_PATH";

/// Top-level Kubernetes-style swarm configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmConfigManifest {
    /// API version (must be "100monkeys.ai/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "SwarmConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: SwarmConfigSpec,
}

/// Manifest metadata (Kubernetes-style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable coordinator name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

/// Swarm configuration specification (content under spec:)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwarmConfigSpec {
    /// Worker pools available to the coordinator, in participant order
    #[serde(default)]
    pub pools: Vec<PoolConfig>,

    #[serde(default)]
    pub defaults: SwarmDefaults,

    #[serde(default)]
    pub consensus: ConsensusSettings,

    #[serde(default)]
    pub hivemind: HiveMindSettings,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observability: Option<ObservabilityConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Unique pool identifier
    pub id: String,

    /// Weight used by the weighted consensus protocol (defaults to outcome quality)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmDefaults {
    #[serde(default = "default_topology")]
    pub topology: TopologyKind,

    #[serde(default = "default_consensus")]
    pub consensus: ConsensusKind,

    #[serde(default = "default_queen")]
    pub queen: QueenKind,

    /// Swarm-level wall-clock bound (e.g. "30s", "2m")
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusSettings {
    /// PBFT fault tolerance `f`; inferred as `floor((n-1)/3)` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault_tolerance: Option<usize>,

    /// Honeybee exploration rate ε
    #[serde(default = "default_exploration_rate")]
    pub exploration_rate: f64,

    /// Honeybee random seed; unseeded runs draw from the OS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl ConsensusSettings {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(0.0..=1.0).contains(&self.exploration_rate) {
            return Err(ConfigurationError::InvalidSetting(format!(
                "exploration_rate must be within [0, 1], got {}",
                self.exploration_rate
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiveMindSettings {
    /// Records retained per queen kind
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,

    /// History window read by the adaptive queen
    #[serde(default = "default_adaptive_window")]
    pub adaptive_window: usize,

    /// Mean quality below which the adaptive queen switches to recovery
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f64,
}

impl HiveMindSettings {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.memory_capacity == 0 {
            return Err(ConfigurationError::InvalidSetting(
                "memory_capacity must be greater than zero".to_string(),
            ));
        }
        if self.adaptive_window == 0 || self.adaptive_window > self.memory_capacity {
            return Err(ConfigurationError::InvalidSetting(format!(
                "adaptive_window must be within 1..={}, got {}",
                self.memory_capacity, self.adaptive_window
            )));
        }
        if !(0.0..=1.0).contains(&self.quality_threshold) {
            return Err(ConfigurationError::InvalidSetting(format!(
                "quality_threshold must be within [0, 1], got {}",
                self.quality_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_topology() -> TopologyKind {
    TopologyKind::Mesh
}

fn default_consensus() -> ConsensusKind {
    ConsensusKind::Majority
}

fn default_queen() -> QueenKind {
    QueenKind::Strategic
}

fn default_exploration_rate() -> f64 {
    0.1
}

fn default_memory_capacity() -> usize {
    DEFAULT_MEMORY_CAPACITY
}

fn default_adaptive_window() -> usize {
    20
}

fn default_quality_threshold() -> f64 {
    0.6
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for SwarmDefaults {
    fn default() -> Self {
        Self {
            topology: default_topology(),
            consensus: default_consensus(),
            queen: default_queen(),
            timeout: None,
        }
    }
}

impl Default for ConsensusSettings {
    fn default() -> Self {
        Self {
            fault_tolerance: None,
            exploration_rate: default_exploration_rate(),
            seed: None,
        }
    }
}

impl Default for HiveMindSettings {
    fn default() -> Self {
        Self {
            memory_capacity: default_memory_capacity(),
            adaptive_window: default_adaptive_window(),
            quality_threshold: default_quality_threshold(),
        }
    }
}

impl Default for SwarmConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: MANIFEST_KIND.to_string(),
            metadata: ManifestMetadata {
                name: "swarmhive".to_string(),
                version: Some("1.0.0".to_string()),
                labels: None,
            },
            spec: SwarmConfigSpec::default(),
        }
    }
}

impl SwarmConfigManifest {
    /// Sample manifest written by `swarmhive config generate`
    pub fn sample() -> Self {
        let mut manifest = Self::default();
        manifest.spec.pools = ["pool-alpha", "pool-beta", "pool-gamma", "pool-delta"]
            .into_iter()
            .map(|id| PoolConfig {
                id: id.to_string(),
                weight: None,
            })
            .collect();
        manifest.spec.defaults.timeout = Some(Duration::from_secs(30));
        manifest.spec.observability = Some(ObservabilityConfig {
            logging: Some(LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            }),
        });
        manifest
    }

    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. SWARMHIVE_CONFIG_PATH environment variable
    /// 2. ./swarmhive-config.yaml (working directory)
    /// 3. ~/.swarmhive/config.yaml (user home)
    /// 4. /etc/swarmhive/config.yaml (system, Unix) or C:\ProgramData\SwarmHive\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./swarmhive-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".swarmhive").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        let system_config = PathBuf::from("/etc/swarmhive/config.yaml");
        #[cfg(windows)]
        let system_config = PathBuf::from("C:\\ProgramData\\SwarmHive\\config.yaml");

        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path (fail if missing/invalid)
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using empty defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SWARMHIVE_CONSENSUS_SEED") {
            match val.trim().parse::<u64>() {
                Ok(seed) => {
                    tracing::info!("Environment override: SWARMHIVE_CONSENSUS_SEED={}", seed);
                    self.spec.consensus.seed = Some(seed);
                }
                Err(_) => tracing::warn!(
                    "Invalid value for SWARMHIVE_CONSENSUS_SEED: '{}'. Expected an unsigned integer. Ignoring.",
                    val
                ),
            }
        }

        if let Ok(val) = std::env::var("SWARMHIVE_EXPLORATION_RATE") {
            match val.trim().parse::<f64>() {
                Ok(rate) => {
                    tracing::info!("Environment override: SWARMHIVE_EXPLORATION_RATE={}", rate);
                    self.spec.consensus.exploration_rate = rate;
                }
                Err(_) => tracing::warn!(
                    "Invalid value for SWARMHIVE_EXPLORATION_RATE: '{}'. Expected a number. Ignoring.",
                    val
                ),
            }
        }
    }

    /// Pool identifiers in declaration order
    pub fn pool_ids(&self) -> Vec<PoolId> {
        self.spec.pools.iter().map(|p| PoolId::new(p.id.clone())).collect()
    }

    /// Explicit consensus weights keyed by pool
    pub fn pool_weights(&self) -> BTreeMap<PoolId, f64> {
        self.spec
            .pools
            .iter()
            .filter_map(|p| p.weight.map(|w| (PoolId::new(p.id.clone()), w)))
            .collect()
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!("Invalid apiVersion: '{}'. Must be '{}'", self.api_version, API_VERSION);
        }

        if self.kind != MANIFEST_KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, MANIFEST_KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        let mut seen = HashSet::new();
        for pool in &self.spec.pools {
            if pool.id.trim().is_empty() {
                anyhow::bail!("Pool id cannot be empty");
            }
            if !seen.insert(pool.id.as_str()) {
                return Err(ConfigurationError::DuplicatePool(pool.id.clone()).into());
            }
            if let Some(weight) = pool.weight {
                if !weight.is_finite() || weight < 0.0 {
                    anyhow::bail!("Pool '{}' has invalid weight {}", pool.id, weight);
                }
            }
        }

        if self.spec.defaults.timeout == Some(Duration::ZERO) {
            anyhow::bail!("defaults.timeout must be greater than zero");
        }

        self.spec.consensus.validate()?;
        self.spec.hivemind.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let manifest = SwarmConfigManifest::default();
        assert_eq!(manifest.api_version, API_VERSION);
        assert_eq!(manifest.kind, MANIFEST_KIND);
        assert!(manifest.spec.pools.is_empty());
        assert_eq!(manifest.spec.defaults.topology, TopologyKind::Mesh);
        assert_eq!(manifest.spec.consensus.exploration_rate, 0.1);
        assert_eq!(manifest.spec.hivemind.adaptive_window, 20);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_yaml_parsing_with_defaults() {
        let yaml = r#"
apiVersion: 100monkeys.ai/v1
kind: SwarmConfig
metadata:
  name: review-swarm
spec:
  pools:
    - id: pool-a
      weight: 2.0
    - id: pool-b
  defaults:
    topology: ring
    consensus: pbft
    queen: adaptive
    timeout: 45s
  consensus:
    fault_tolerance: 1
    seed: 7
"#;
        let manifest = SwarmConfigManifest::from_yaml_str(yaml).unwrap();
        assert_eq!(manifest.metadata.name, "review-swarm");
        assert_eq!(manifest.pool_ids(), vec![PoolId::new("pool-a"), PoolId::new("pool-b")]);
        assert_eq!(manifest.pool_weights().get(&PoolId::new("pool-a")), Some(&2.0));
        assert_eq!(manifest.spec.defaults.topology, TopologyKind::Ring);
        assert_eq!(manifest.spec.defaults.consensus, ConsensusKind::Pbft);
        assert_eq!(manifest.spec.defaults.queen, QueenKind::Adaptive);
        assert_eq!(manifest.spec.defaults.timeout, Some(Duration::from_secs(45)));
        assert_eq!(manifest.spec.consensus.fault_tolerance, Some(1));
        assert_eq!(manifest.spec.consensus.exploration_rate, 0.1);
        assert_eq!(manifest.spec.hivemind.quality_threshold, 0.6);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_unknown_topology_fails_to_parse() {
        let yaml = r#"
apiVersion: 100monkeys.ai/v1
kind: SwarmConfig
metadata:
  name: broken
spec:
  defaults:
    topology: torus
"#;
        assert!(SwarmConfigManifest::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swarmhive-config.yaml");

        let manifest = SwarmConfigManifest::sample();
        manifest.to_yaml_file(&path).unwrap();

        let loaded = SwarmConfigManifest::load_or_default(Some(path)).unwrap();
        assert_eq!(loaded.spec.pools.len(), 4);
        assert_eq!(loaded.spec.defaults.timeout, Some(Duration::from_secs(30)));
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let result = SwarmConfigManifest::load_or_default(Some(PathBuf::from("/nonexistent/swarm.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        let mut manifest = SwarmConfigManifest::sample();
        assert!(manifest.validate().is_ok());

        manifest.api_version = "wrong/v1".to_string();
        assert!(manifest.validate().is_err());
        manifest.api_version = API_VERSION.to_string();

        manifest.spec.pools.push(PoolConfig {
            id: "pool-alpha".to_string(),
            weight: None,
        });
        assert!(manifest.validate().is_err());
        manifest.spec.pools.pop();

        manifest.spec.consensus.exploration_rate = 1.5;
        assert!(manifest.validate().is_err());
        manifest.spec.consensus.exploration_rate = 0.1;

        manifest.spec.hivemind.adaptive_window = 0;
        assert!(manifest.validate().is_err());
        manifest.spec.hivemind.adaptive_window = 20;

        manifest.spec.pools[0].weight = Some(-1.0);
        assert!(manifest.validate().is_err());
    }
}
