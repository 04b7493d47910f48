//! # pixel_pool
//!
//! Pooled, overflow-checked allocation of large pixel buffers for image
//! processing.
//!
//! ## Architecture
//!
//! - `core::geometry`: rectangles and the checked `bpp * width * height`
//!   length computation
//! - `core::buffer_pool`: the thread-safe pool of fixed-capacity blocks
//! - `image_view`: per-format constructors composing the two into an [`Image`]
//! - `format`: the supported pixel formats
//! - `config`: pool sizing, with environment overrides
//! - `error`: error types and classification
//! - `logging`: `tracing` subscriber setup for binaries
//!
//! ## Example
//!
//! ```rust
//! use pixel_pool::{BlockPool, PixelFormat, Rectangle};
//!
//! let pool = BlockPool::default();
//!
//! // A 4-byte format over 100x50 pixels needs exactly 20000 bytes.
//! let mut img = pool.new_rgba(Rectangle::from_size(100, 50));
//! assert_eq!(img.pix().len(), 20_000);
//! img.pix_mut().fill(0);
//! img.release();
//!
//! // Inverted bounds are rejected before anything is allocated.
//! let err = pool
//!     .try_new_image(PixelFormat::Rgba, Rectangle::new(0, 0, -1, 50))
//!     .unwrap_err();
//! assert!(err.to_string().contains("huge or negative dimensions"));
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod image_view;
pub mod logging;

pub use crate::config::PoolConfig;
pub use crate::core::buffer_pool::{BlockPool, PixelBuffer, PoolStats};
pub use crate::core::geometry::{Point, Rectangle, checked_buffer_length, pixel_buffer_length};
pub use crate::error::{HasSeverity, PixelBufferError, PixelResult};
pub use crate::format::PixelFormat;
pub use crate::image_view::Image;
