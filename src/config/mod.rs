//! Facies Configuration Module
//!
//! Provides analysis parameters loaded from TOML files.
//!
//! ## Loading Order
//!
//! 1. `FACIES_CONFIG` environment variable (path to TOML file)
//! 2. `facies_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Entry points take a `&FaciesConfig` directly. Front-ends that want a
//! process-wide config can call `config::init()` once and `config::get()`
//! anywhere:
//!
//! ```ignore
//! config::init(FaciesConfig::load());
//! let k = config::get().analysis.k;
//! ```

mod facies_config;
pub mod defaults;
pub mod validation;

pub use facies_config::*;

use std::sync::OnceLock;

/// Global facies configuration, initialized once at startup.
static FACIES_CONFIG: OnceLock<FaciesConfig> = OnceLock::new();

/// Initialize the global facies configuration.
///
/// Later calls are ignored with a warning.
pub fn init(config: FaciesConfig) {
    if FACIES_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get a reference to the global facies configuration.
///
/// Falls back to built-in defaults if `init()` was never called.
pub fn get() -> &'static FaciesConfig {
    FACIES_CONFIG.get_or_init(FaciesConfig::default)
}
