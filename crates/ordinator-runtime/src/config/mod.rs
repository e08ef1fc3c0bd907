//! Ordinator configuration
//!
//! Provides compile-time defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Environment variables (runtime)
//! 2. User's ord_config.rs (compile-time, via `ORD_CONFIG_RS`)
//! 3. Library defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use ordinator_runtime::config::OrdinatorConfig;
//!
//! // Use defaults with env overrides
//! let config = OrdinatorConfig::from_env();
//!
//! // Or customize programmatically
//! let config = OrdinatorConfig::from_env().stack_size(256 * 1024);
//! ```

pub mod defaults;

use ordinator_core::constants::{MAX_STACK_SIZE, MIN_STACK_SIZE};
use ordinator_core::env::{env_get, env_get_bool};
use ordinator_core::error::SchedError;

/// Scheduler configuration with builder pattern.
///
/// The stack size is fixed once an `Ordinator` is built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdinatorConfig {
    /// Stack bytes reserved per routine (rounded up to whole pages)
    pub stack_size: usize,
    /// Log routine lifecycle events at debug level
    pub debug_logging: bool,
    /// Host-context spins per poll in `await_blocking` before yielding the OS thread
    pub await_spins: u32,
}

impl Default for OrdinatorConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl OrdinatorConfig {
    /// Create config from compile-time defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `ORD_STACK_SIZE` - Stack size per routine in bytes
    /// - `ORD_DEBUG` - Enable debug logging (0/1)
    /// - `ORD_AWAIT_SPINS` - Spins per poll when awaiting from the host
    pub fn from_env() -> Self {
        Self {
            stack_size: env_get("ORD_STACK_SIZE", defaults::STACK_SIZE),
            debug_logging: env_get_bool("ORD_DEBUG", defaults::DEBUG_LOGGING),
            await_spins: env_get("ORD_AWAIT_SPINS", defaults::AWAIT_SPINS),
        }
    }

    /// Create config with compile-time defaults only (no env override).
    /// Useful for testing or when you want full control.
    pub fn new() -> Self {
        Self {
            stack_size: defaults::STACK_SIZE,
            debug_logging: defaults::DEBUG_LOGGING,
            await_spins: defaults::AWAIT_SPINS,
        }
    }

    // Builder methods

    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = size;
        self
    }

    pub fn debug_logging(mut self, enable: bool) -> Self {
        self.debug_logging = enable;
        self
    }

    pub fn await_spins(mut self, spins: u32) -> Self {
        self.await_spins = spins;
        self
    }

    /// Validate configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack_size < MIN_STACK_SIZE {
            return Err(ConfigError::InvalidValue("stack_size must be >= 16KB"));
        }
        if self.stack_size > MAX_STACK_SIZE {
            return Err(ConfigError::InvalidValue("stack_size must be <= 1GB"));
        }
        Ok(())
    }

    /// Print configuration (for debugging)
    pub fn print(&self) {
        eprintln!("Ordinator Configuration:");
        eprintln!("  stack_size:     {}", self.stack_size);
        eprintln!("  debug_logging:  {}", self.debug_logging);
        eprintln!("  await_spins:    {}", self.await_spins);
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for SchedError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::InvalidValue(msg) => SchedError::InvalidConfig(msg),
        }
    }
}
