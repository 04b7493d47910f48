//! # Configuration Module
//!
//! Sizing parameters for a [`BlockPool`](crate::core::buffer_pool::BlockPool).
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Default | Env var | Description |
//! |-----------|------|---------|---------|-------------|
//! | `block_capacity` | `usize` | 64 MiB | `PIXEL_POOL_BLOCK_CAPACITY` | Requests above this bypass the pool |
//! | `max_idle` | `usize` | 4 | `PIXEL_POOL_MAX_IDLE` | Idle blocks kept for reuse |
//!
//! ## Examples
//!
//! ```rust
//! use pixel_pool::config::PoolConfig;
//!
//! let config = PoolConfig::default();
//! assert!(config.validate().is_ok());
//!
//! let small = PoolConfig::new(1 << 20, 2);
//! assert_eq!(small.block_capacity, 1 << 20);
//! ```

use std::env;

use crate::error::{PixelBufferError, PixelResult};

/// Canonical block capacity: a 2048x2048 RGBA working set, four times over.
pub const DEFAULT_BLOCK_CAPACITY: usize = 4 * 2048 * 2048 * 4;

/// Idle blocks retained by default.
pub const DEFAULT_MAX_IDLE: usize = 4;

/// Environment variable overriding `block_capacity`.
pub const BLOCK_CAPACITY_ENV: &str = "PIXEL_POOL_BLOCK_CAPACITY";

/// Environment variable overriding `max_idle`.
pub const MAX_IDLE_ENV: &str = "PIXEL_POOL_MAX_IDLE";

/// Configuration for a block pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Capacity of every pooled block in bytes.
    ///
    /// Requests larger than this are served by a dedicated allocation that is
    /// freed on release instead of being pooled.
    pub block_capacity: usize,

    /// Maximum number of idle blocks kept for reuse.
    ///
    /// Blocks released while the idle set is full are freed. Worst-case
    /// retained memory is `block_capacity * max_idle`.
    pub max_idle: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            block_capacity: DEFAULT_BLOCK_CAPACITY,
            max_idle: DEFAULT_MAX_IDLE,
        }
    }
}

impl PoolConfig {
    pub fn new(block_capacity: usize, max_idle: usize) -> Self {
        Self {
            block_capacity,
            max_idle,
        }
    }

    /// Builds a configuration from the environment.
    ///
    /// Unset variables keep their defaults. Set but unparsable values are
    /// reported as `Config` errors rather than silently ignored.
    pub fn from_env() -> PixelResult<Self> {
        let mut config = Self::default();
        if let Some(value) = read_env(BLOCK_CAPACITY_ENV)? {
            config.block_capacity = value;
        }
        if let Some(value) = read_env(MAX_IDLE_ENV)? {
            config.max_idle = value;
        }
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration parameters.
    ///
    /// # Validation Rules
    ///
    /// - `block_capacity` must be greater than 0
    /// - `block_capacity` must not exceed `isize::MAX`
    /// - `max_idle` must be greater than 0
    pub fn validate(&self) -> PixelResult<()> {
        if self.block_capacity == 0 {
            return Err(PixelBufferError::config(
                "block_capacity",
                "0",
                "must be greater than 0",
            ));
        }
        if self.block_capacity > isize::MAX as usize {
            return Err(PixelBufferError::config(
                "block_capacity",
                self.block_capacity.to_string(),
                "must not exceed isize::MAX",
            ));
        }
        if self.max_idle == 0 {
            return Err(PixelBufferError::config(
                "max_idle",
                "0",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

fn read_env(key: &str) -> PixelResult<Option<usize>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| PixelBufferError::config(key, raw.clone(), e.to_string())),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.block_capacity, 64 * 1024 * 1024);
        assert_eq!(config.max_idle, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = PoolConfig::default();

        config.block_capacity = 0;
        assert!(config.validate().is_err());
        config.block_capacity = isize::MAX as usize + 1;
        assert!(config.validate().is_err());
        config.block_capacity = 4096;

        config.max_idle = 0;
        let err = config.validate().expect_err("zero max_idle");
        assert!(err.to_string().contains("max_idle"));
        config.max_idle = 1;

        assert!(config.validate().is_ok());
    }
}
