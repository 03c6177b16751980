//! Configuration for surface pools.
//!
//! Defaults suit a compositor-driven frame loop: enough cached surfaces for
//! triple buffering across a handful of layers, and eviction of anything that
//! sat idle for a few frames.

use crate::error::{Result, SurfacePoolError};
use crate::logging::LogLevel;

/// Default cap on cached (available) surfaces.
pub const DEFAULT_MAX_SURFACES: usize = 12;

/// Default number of maintenance ticks a surface may sit idle.
pub const DEFAULT_MAX_SURFACE_AGE: u32 = 3;

/// Upper bound accepted for `max_surfaces`.
pub const MAX_SURFACES_LIMIT: usize = 256;

/// Configuration for a [`SurfacePool`](crate::SurfacePool).
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    /// Maximum number of idle surfaces kept for reuse
    pub max_surfaces: usize,
    /// Idle age (in maintenance ticks) at which a surface is evicted
    pub max_surface_age: u32,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Enable logging through [`logging::init`](crate::logging::init)
    pub enabled: bool,
    /// Minimum log level for pool targets
    pub level: LogLevel,
    /// Use ANSI colors in formatted output
    pub ansi: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_surfaces: DEFAULT_MAX_SURFACES,
            max_surface_age: DEFAULT_MAX_SURFACE_AGE,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: LogLevel::Info,
            ansi: false,
        }
    }
}

impl PoolConfig {
    /// Configuration for memory-constrained devices.
    ///
    /// Keeps few surfaces and evicts them after a single idle tick.
    pub fn low_memory() -> Self {
        Self {
            max_surfaces: 4,
            max_surface_age: 1,
            logging: LoggingConfig {
                enabled: true,
                level: LogLevel::Warn,
                ansi: false,
            },
        }
    }

    /// Configuration for many layers of rapidly changing content.
    pub fn high_throughput() -> Self {
        Self {
            max_surfaces: 32,
            max_surface_age: 8,
            logging: LoggingConfig {
                enabled: false,
                level: LogLevel::Error,
                ansi: false,
            },
        }
    }

    /// Configuration for development and debugging.
    pub fn development() -> Self {
        Self {
            logging: LoggingConfig {
                enabled: true,
                level: LogLevel::Debug,
                ansi: true,
            },
            ..Self::default()
        }
    }

    /// Validate the configuration for consistency.
    pub fn validate(&self) -> Result<()> {
        if self.max_surfaces == 0 {
            return Err(SurfacePoolError::InvalidConfig(
                "max_surfaces must be greater than 0".into(),
            ));
        }

        if self.max_surfaces > MAX_SURFACES_LIMIT {
            return Err(SurfacePoolError::InvalidConfig(format!(
                "max_surfaces should not exceed {MAX_SURFACES_LIMIT}"
            )));
        }

        if self.max_surface_age == 0 {
            return Err(SurfacePoolError::InvalidConfig(
                "max_surface_age must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`PoolConfig`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: PoolConfig,
}

impl ConfigBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cap on cached surfaces.
    pub fn max_surfaces(mut self, max_surfaces: usize) -> Self {
        self.config.max_surfaces = max_surfaces;
        self
    }

    /// Set the idle age at which surfaces are evicted.
    pub fn max_surface_age(mut self, max_surface_age: u32) -> Self {
        self.config.max_surface_age = max_surface_age;
        self
    }

    /// Set logging configuration.
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<PoolConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
