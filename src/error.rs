//! # Error Handling
//!
//! Error types for pixel buffer sizing, pool configuration and interop views.
//!
//! ## Error Classification
//!
//! - `InvalidDimensions`: a rectangle whose buffer length is negative or cannot be
//!   represented. This is fatal: the fail-fast constructors panic with its message.
//! - `Config`: a [`PoolConfig`](crate::config::PoolConfig) value outside its valid range.
//! - `Interop`: a conversion to or from an external image type failed.
//!
//! ## Usage
//!
//! ```rust
//! use pixel_pool::error::{ErrorSeverity, HasSeverity, PixelBufferError};
//! use pixel_pool::PixelFormat;
//!
//! let error = PixelBufferError::invalid_dimensions(PixelFormat::Rgba, -1, 10);
//!
//! assert_eq!(error.severity(), ErrorSeverity::Fatal);
//! assert!(error.to_string().contains("huge or negative dimensions"));
//! ```

use std::{error::Error as StdError, fmt};

use crate::format::PixelFormat;

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Errors that affect operation but can be recovered from
    Error,
    /// Fatal errors that cannot be recovered from
    Fatal,
}

/// Base error type for pixel buffer allocation
#[derive(Debug)]
pub enum PixelBufferError {
    /// The rectangle's buffer length is negative or overflows the native integer range.
    ///
    /// Extents are exact, so they are carried as `i128` even when they do not fit in `isize`.
    InvalidDimensions {
        format: PixelFormat,
        dx: i128,
        dy: i128,
    },
    /// Pool configuration errors
    Config {
        field: String,
        value: String,
        reason: String,
    },
    /// A conversion to or from an external library's image type failed
    Interop { target: String, reason: String },
}

impl PixelBufferError {
    /// Create an invalid dimensions error
    pub fn invalid_dimensions(format: PixelFormat, dx: i128, dy: i128) -> Self {
        Self::InvalidDimensions { format, dx, dy }
    }

    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an interop error
    pub fn interop(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Interop {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidDimensions { .. } => "invalid_dimensions",
            Self::Config { .. } => "config",
            Self::Interop { .. } => "interop",
        }
    }

    /// The pixel format named by an `InvalidDimensions` error
    pub fn format(&self) -> Option<PixelFormat> {
        match self {
            Self::InvalidDimensions { format, .. } => Some(*format),
            _ => None,
        }
    }
}

impl fmt::Display for PixelBufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelBufferError::InvalidDimensions { format, dx, dy, .. } => {
                write!(
                    f,
                    "image: New{} Rectangle has huge or negative dimensions (dx={}, dy={})",
                    format.name(),
                    dx,
                    dy
                )
            }
            PixelBufferError::Config {
                field,
                value,
                reason,
                ..
            } => {
                write!(
                    f,
                    "Configuration error in '{}': {} (value: {})",
                    field, reason, value
                )
            }
            PixelBufferError::Interop { target, reason, .. } => {
                write!(f, "Cannot convert to {}: {}", target, reason)
            }
        }
    }
}

impl StdError for PixelBufferError {}

/// Result type alias using our custom error type
pub type PixelResult<T> = Result<T, PixelBufferError>;

/// Trait for errors with severity levels
pub trait HasSeverity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for PixelBufferError {
    /// Sizing failures are fatal: the fail-fast constructors panic on them.
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidDimensions { .. } => ErrorSeverity::Fatal,
            Self::Config { .. } | Self::Interop { .. } => ErrorSeverity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions_message() {
        let error = PixelBufferError::invalid_dimensions(PixelFormat::Nrgba64, -3, 7);
        assert_eq!(error.category(), "invalid_dimensions");
        assert_eq!(error.format(), Some(PixelFormat::Nrgba64));
        assert_eq!(
            error.to_string(),
            "image: NewNRGBA64 Rectangle has huge or negative dimensions (dx=-3, dy=7)"
        );
    }

    #[test]
    fn test_config_error_message() {
        let error = PixelBufferError::config("max_idle", "0", "must be greater than 0");
        assert_eq!(error.category(), "config");
        assert_eq!(error.format(), None);
        assert_eq!(
            error.to_string(),
            "Configuration error in 'max_idle': must be greater than 0 (value: 0)"
        );
    }

    #[test]
    fn test_error_severity() {
        let dims = PixelBufferError::invalid_dimensions(PixelFormat::Gray, 1, -1);
        assert_eq!(dims.severity(), ErrorSeverity::Fatal);

        let interop = PixelBufferError::interop("fast_image_resize", "width exceeds u32");
        assert_eq!(interop.severity(), ErrorSeverity::Error);
        assert!(interop.severity() < dims.severity());
    }
}
