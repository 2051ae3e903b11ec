//! Facies Configuration - all analysis parameters as operator-tunable TOML values
//!
//! Each struct implements `Default` so that an empty or missing config file
//! reproduces the engine's stock behaviour.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

use super::defaults;
use crate::error::FaciesError;

// ============================================================================
// Config Provenance
// ============================================================================

/// Tracks which configuration keys were explicitly present in the user's TOML file.
#[derive(Debug, Clone, Default)]
pub struct ConfigProvenance {
    /// Dotted key paths explicitly present in the user's TOML file
    pub explicit_keys: HashSet<String>,
}

impl ConfigProvenance {
    /// Check whether a dotted key path was explicitly set by the user.
    ///
    /// Example: `provenance.is_user_set("analysis.k")`
    pub fn is_user_set(&self, dotted_key: &str) -> bool {
        self.explicit_keys.contains(dotted_key)
    }
}

// ============================================================================
// Enumerated options
// ============================================================================

/// Unsupervised clustering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[serde(alias = "k-means")]
    Kmeans,
    Hierarchical,
    Som,
}

impl Algorithm {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kmeans => "kmeans",
            Self::Hierarchical => "hierarchical",
            Self::Som => "som",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = FaciesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kmeans" | "k-means" => Ok(Self::Kmeans),
            "hierarchical" => Ok(Self::Hierarchical),
            "som" => Ok(Self::Som),
            other => Err(FaciesError::InvalidParameter(format!(
                "unsupported algorithm '{other}' (expected kmeans, hierarchical or som)"
            ))),
        }
    }
}

/// Feature rescaling applied before distance computations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizationMode {
    #[default]
    MinMax,
    ZScore,
    None,
}

impl NormalizationMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MinMax => "min-max",
            Self::ZScore => "z-score",
            Self::None => "none",
        }
    }
}

impl fmt::Display for NormalizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalizationMode {
    type Err = FaciesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "min-max" | "minmax" => Ok(Self::MinMax),
            "z-score" | "zscore" => Ok(Self::ZScore),
            "none" => Ok(Self::None),
            other => Err(FaciesError::InvalidParameter(format!(
                "unsupported normalization '{other}' (expected min-max, z-score or none)"
            ))),
        }
    }
}

/// How trained SOM grid nodes are folded onto facies ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SomMapping {
    /// `bmu_index % k`. Can merge unrelated grid regions when side² > k.
    #[default]
    Modulo,
    /// Cluster the trained node weights with k-means and use the node's cluster.
    NodeKmeans,
}

/// Which batch statistics normalise the prediction set in supervised mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalerFit {
    /// Training and prediction sets are each scaled by their own statistics.
    #[default]
    PerBatch,
    /// The scaler fitted on the training set is applied to the prediction set.
    Shared,
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a facies analysis run.
///
/// Load with `FaciesConfig::load()` which searches:
/// 1. `$FACIES_CONFIG` env var
/// 2. `./facies_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaciesConfig {
    /// Core algorithm selection
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Elbow-curve sweep bounds
    #[serde(default)]
    pub optimal_k: OptimalKConfig,

    /// Self-organizing map tuning
    #[serde(default)]
    pub som: SomConfig,

    /// Nearest-neighbour classifier options
    #[serde(default)]
    pub supervised: SupervisedConfig,

    /// Input size guards
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl FaciesConfig {
    /// Load configuration using the standard search order:
    /// 1. `$FACIES_CONFIG` environment variable
    /// 2. `./facies_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        Self::load_with_provenance().0
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let (config, _provenance) = Self::load_from_file_with_provenance(path)?;
        Ok(config)
    }

    /// Load from a specific TOML file path, also returning provenance
    /// so callers can distinguish user-set values from defaults.
    pub fn load_from_file_with_provenance(
        path: &Path,
    ) -> Result<(Self, ConfigProvenance), ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let (config, provenance) = Self::from_toml_str(&contents)
            .map_err(|e| match e {
                ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
                other => other,
            })?;
        Ok((config, provenance))
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are logged as warnings; they never fail the parse.
    pub fn from_toml_str(contents: &str) -> Result<(Self, ConfigProvenance), ConfigError> {
        for w in &super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let provenance = ConfigProvenance {
            explicit_keys: super::validation::walk_toml_keys(
                &contents
                    .parse::<toml::Value>()
                    .unwrap_or(toml::Value::Table(toml::map::Map::new())),
                "",
            )
            .into_iter()
            .collect(),
        };

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok((config, provenance))
    }

    /// Load configuration using standard search order, returning provenance.
    pub fn load_with_provenance() -> (Self, ConfigProvenance) {
        // 1. Check env var
        if let Ok(path) = std::env::var("FACIES_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file_with_provenance(&p) {
                    Ok((config, provenance)) => {
                        info!(path = %p.display(), algorithm = %config.analysis.algorithm, "Loaded facies config from FACIES_CONFIG");
                        return (config, provenance);
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from FACIES_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "FACIES_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./facies_config.toml
        let local = PathBuf::from("facies_config.toml");
        if local.exists() {
            match Self::load_from_file_with_provenance(&local) {
                Ok((config, provenance)) => {
                    info!(algorithm = %config.analysis.algorithm, "Loaded facies config from ./facies_config.toml");
                    return (config, provenance);
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./facies_config.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No facies_config.toml found, using built-in defaults");
        (Self::default(), ConfigProvenance::default())
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Facies config saved");
        Ok(())
    }

    /// Validate all parameters for internal consistency.
    ///
    /// Rules:
    /// - k, iteration budgets and row limits must be > 0
    /// - optimal-k bounds must satisfy 1 <= min_k <= max_k
    /// - SOM learning rate in (0, 1], radius (if set) finite and > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let a = &self.analysis;
        if a.k == 0 {
            errors.push("analysis.k must be > 0".to_string());
        }
        if a.k > defaults::MAX_K {
            errors.push(format!("analysis.k = {} must be <= {}", a.k, defaults::MAX_K));
        }
        if a.max_iterations == 0 {
            errors.push("analysis.max_iterations must be > 0".to_string());
        }

        let ok = &self.optimal_k;
        if ok.min_k == 0 {
            errors.push("optimal_k.min_k must be > 0".to_string());
        }
        if ok.max_k < ok.min_k {
            errors.push(format!(
                "optimal_k.max_k ({}) must be >= min_k ({})",
                ok.max_k, ok.min_k
            ));
        }
        if ok.max_k > defaults::MAX_K {
            errors.push(format!(
                "optimal_k.max_k = {} must be <= {}",
                ok.max_k,
                defaults::MAX_K
            ));
        }

        let s = &self.som;
        if s.iterations == 0 {
            errors.push("som.iterations must be > 0".to_string());
        }
        if !s.initial_learning_rate.is_finite()
            || s.initial_learning_rate <= 0.0
            || s.initial_learning_rate > 1.0
        {
            errors.push(format!(
                "som.initial_learning_rate = {} must be in (0, 1]",
                s.initial_learning_rate
            ));
        }
        if let Some(r) = s.initial_radius {
            if !r.is_finite() || r <= 0.0 {
                errors.push(format!("som.initial_radius = {r} must be a finite value > 0"));
            }
        }

        let l = &self.limits;
        if l.max_rows == 0 {
            errors.push("limits.max_rows must be > 0".to_string());
        }
        if l.max_hierarchical_rows == 0 {
            errors.push("limits.max_hierarchical_rows must be > 0".to_string());
        }

        let (range_errors, range_warnings) = super::validation::validate_parameter_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            Self::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            Self::Serialize(e) => write!(f, "Config serialization error: {e}"),
            Self::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Analysis
// ============================================================================

/// Algorithm choice shared by all entry points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Feature rescaling before clustering
    #[serde(default)]
    pub normalization: NormalizationMode,

    /// Unsupervised backend
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,

    /// Number of facies
    #[serde(default = "default_k")]
    pub k: usize,

    /// K-means iteration budget
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Seed for k-means empty-cluster reseeding and SOM training
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_algorithm() -> Algorithm {
    Algorithm::Kmeans
}
fn default_k() -> usize {
    defaults::DEFAULT_K
}
fn default_max_iterations() -> usize {
    defaults::DEFAULT_MAX_ITERATIONS
}
fn default_seed() -> u64 {
    defaults::DEFAULT_SEED
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            normalization: NormalizationMode::default(),
            algorithm: default_algorithm(),
            k: default_k(),
            max_iterations: default_max_iterations(),
            seed: default_seed(),
        }
    }
}

// ============================================================================
// Optimal K
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimalKConfig {
    #[serde(default = "default_min_k")]
    pub min_k: usize,

    #[serde(default = "default_max_k")]
    pub max_k: usize,
}

fn default_min_k() -> usize {
    defaults::OPTIMAL_K_MIN
}
fn default_max_k() -> usize {
    defaults::OPTIMAL_K_MAX
}

impl Default for OptimalKConfig {
    fn default() -> Self {
        Self {
            min_k: default_min_k(),
            max_k: default_max_k(),
        }
    }
}

// ============================================================================
// SOM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SomConfig {
    /// Training iterations, one random sample each
    #[serde(default = "default_som_iterations")]
    pub iterations: usize,

    /// Learning rate at iteration 0
    #[serde(default = "default_som_learning_rate")]
    pub initial_learning_rate: f64,

    /// Neighbourhood radius at iteration 0 (grid units). Defaults to half the grid side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_radius: Option<f64>,

    /// Grid node to facies folding strategy
    #[serde(default)]
    pub mapping: SomMapping,
}

fn default_som_iterations() -> usize {
    defaults::SOM_ITERATIONS
}
fn default_som_learning_rate() -> f64 {
    defaults::SOM_INITIAL_LEARNING_RATE
}

impl Default for SomConfig {
    fn default() -> Self {
        Self {
            iterations: default_som_iterations(),
            initial_learning_rate: default_som_learning_rate(),
            initial_radius: None,
            mapping: SomMapping::default(),
        }
    }
}

// ============================================================================
// Supervised
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisedConfig {
    #[serde(default)]
    pub scaler_fit: ScalerFit,
}

// ============================================================================
// Limits
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Cap on selected rows for any run
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    /// Cap on selected rows for average-linkage clustering
    #[serde(default = "default_max_hierarchical_rows")]
    pub max_hierarchical_rows: usize,
}

fn default_max_rows() -> usize {
    defaults::MAX_ROWS
}
fn default_max_hierarchical_rows() -> usize {
    defaults::MAX_HIERARCHICAL_ROWS
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            max_hierarchical_rows: default_max_hierarchical_rows(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = FaciesConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_empty_toml_produces_defaults() {
        let config: FaciesConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config, FaciesConfig::default());
        assert_eq!(config.analysis.algorithm, Algorithm::Kmeans);
        assert_eq!(config.analysis.normalization, NormalizationMode::MinMax);
        assert_eq!(config.analysis.max_iterations, 100);
        assert_eq!(config.optimal_k.min_k, 2);
        assert_eq!(config.optimal_k.max_k, 10);
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
[analysis]
algorithm = "som"
normalization = "z-score"
k = 6

[som]
mapping = "node-kmeans"
"#;
        let (config, provenance) =
            FaciesConfig::from_toml_str(toml_str).expect("partial TOML should parse");
        assert_eq!(config.analysis.algorithm, Algorithm::Som);
        assert_eq!(config.analysis.normalization, NormalizationMode::ZScore);
        assert_eq!(config.analysis.k, 6);
        assert_eq!(config.som.mapping, SomMapping::NodeKmeans);
        // Untouched values keep defaults
        assert_eq!(config.analysis.seed, defaults::DEFAULT_SEED);
        assert_eq!(config.supervised.scaler_fit, ScalerFit::PerBatch);

        assert!(provenance.is_user_set("analysis.k"));
        assert!(!provenance.is_user_set("analysis.seed"));
    }

    #[test]
    fn test_unknown_algorithm_fails_parse() {
        let result = FaciesConfig::from_toml_str("[analysis]\nalgorithm = \"dbscan\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_, _))));
    }

    #[test]
    fn test_validation_catches_zero_k() {
        let mut config = FaciesConfig::default();
        config.analysis.k = 0;
        let result = config.validate();
        assert!(result.is_err(), "k = 0 should fail validation");
        if let Err(ConfigError::Validation(errors)) = result {
            assert!(errors.iter().any(|e| e.contains("analysis.k")));
        }
    }

    #[test]
    fn test_validation_catches_inverted_k_bounds() {
        let mut config = FaciesConfig::default();
        config.optimal_k.min_k = 8;
        config.optimal_k.max_k = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_catches_bad_learning_rate() {
        let mut config = FaciesConfig::default();
        config.som.initial_learning_rate = 1.5;
        assert!(config.validate().is_err());
        config.som.initial_learning_rate = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("kmeans".parse::<Algorithm>(), Ok(Algorithm::Kmeans));
        assert_eq!("K-Means".parse::<Algorithm>(), Ok(Algorithm::Kmeans));
        assert_eq!("som".parse::<Algorithm>(), Ok(Algorithm::Som));
        assert!(matches!(
            "random-forest".parse::<Algorithm>(),
            Err(FaciesError::InvalidParameter(_))
        ));
        assert_eq!(
            "z-score".parse::<NormalizationMode>(),
            Ok(NormalizationMode::ZScore)
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = FaciesConfig::default();
        config.analysis.algorithm = Algorithm::Hierarchical;
        config.som.initial_radius = Some(2.0);
        let text = config.to_toml().expect("config should serialize");
        let (back, _) = FaciesConfig::from_toml_str(&text).expect("serialized config should parse");
        assert_eq!(back, config);
    }
}
