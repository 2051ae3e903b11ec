//! Config validation: unknown-key detection with Levenshtein suggestions
//! and parameter range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for FaciesConfig.
///
/// Maintained by hand to match the struct hierarchy in facies_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [analysis]
        "analysis",
        "analysis.normalization",
        "analysis.algorithm",
        "analysis.k",
        "analysis.max_iterations",
        "analysis.seed",
        // [optimal_k]
        "optimal_k",
        "optimal_k.min_k",
        "optimal_k.max_k",
        // [som]
        "som",
        "som.iterations",
        "som.initial_learning_rate",
        "som.initial_radius",
        "som.mapping",
        // [supervised]
        "supervised",
        "supervised.scaler_fit",
        // [limits]
        "limits",
        "limits.max_rows",
        "limits.max_hierarchical_rows",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Equal distances resolve to the alphabetically first key.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut candidates: Vec<&str> = known.iter().copied().collect();
    candidates.sort_unstable();

    let mut best: Option<(&str, usize)> = None;
    for k in candidates {
        let dist = levenshtein(unknown, k);
        if dist <= 3 && best.map_or(true, |(_, best_dist)| dist < best_dist) {
            best = Some((k, dist));
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    let found = walk_toml_keys(&value, "");
    let mut warnings = Vec::new();

    for key in &found {
        if !known.contains(key.as_str()) {
            let suggestion = suggest_correction(key, &known);
            let message = format!("Unknown config key '{key}'");
            warnings.push(ValidationWarning {
                field: key.clone(),
                message,
                suggestion,
            });
        }
    }

    warnings
}

// ============================================================================
// Parameter Range Validation
// ============================================================================

/// Validate parameter ranges on a parsed FaciesConfig.
///
/// Returns (errors, warnings): errors are values that can never produce a
/// meaningful run; warnings are legal but unusual for well-log facies work.
pub fn validate_parameter_ranges(
    config: &super::FaciesConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let a = &config.analysis;

    // More facies than the hierarchical cap can never be satisfied by merging
    if a.k > config.limits.max_hierarchical_rows {
        errors.push(format!(
            "analysis.k = {} exceeds limits.max_hierarchical_rows = {}",
            a.k, config.limits.max_hierarchical_rows
        ));
    }

    // Facies schemes beyond ~30 classes are rarely interpretable
    if a.k > 30 {
        warnings.push(ValidationWarning {
            field: "analysis.k".to_string(),
            message: format!("analysis.k = {} is outside typical range (1-30 facies)", a.k),
            suggestion: None,
        });
    }

    if a.max_iterations > 10_000 {
        warnings.push(ValidationWarning {
            field: "analysis.max_iterations".to_string(),
            message: format!(
                "analysis.max_iterations = {} is unusually large; k-means normally converges in < 100 passes",
                a.max_iterations
            ),
            suggestion: None,
        });
    }

    // A SOM that sees fewer samples than it has nodes leaves nodes untrained
    let side = (a.k as f64).sqrt().ceil() as usize;
    let nodes = side.saturating_mul(side);
    if config.som.iterations < nodes {
        warnings.push(ValidationWarning {
            field: "som.iterations".to_string(),
            message: format!(
                "som.iterations = {} is fewer than the {} grid nodes for k = {}",
                config.som.iterations,
                nodes,
                a.k
            ),
            suggestion: None,
        });
    }

    if config.limits.max_hierarchical_rows > 20_000 {
        warnings.push(ValidationWarning {
            field: "limits.max_hierarchical_rows".to_string(),
            message: format!(
                "limits.max_hierarchical_rows = {} allows a distance matrix of {} cells",
                config.limits.max_hierarchical_rows,
                config.limits.max_hierarchical_rows.saturating_mul(config.limits.max_hierarchical_rows)
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
