//! # Pooled Images
//!
//! Per-format constructors that size a buffer for a rectangle, take it from a
//! [`BlockPool`] and wrap it in an [`Image`].
//!
//! Every constructor comes in two forms:
//!
//! - `try_new_*` returns [`PixelBufferError::InvalidDimensions`] when the
//!   rectangle's extents are negative or too large to represent.
//! - `new_*` panics with that error's message instead. Callers are expected to
//!   validate rectangles upstream; this is the last line of defence against an
//!   under-sized buffer.
//!
//! Methods on [`BlockPool`] use that pool. The free functions in this module
//! use [`BlockPool::global`].
//!
//! ```rust
//! use pixel_pool::{BlockPool, Rectangle};
//!
//! let pool = BlockPool::default();
//! let img = pool.new_rgba(Rectangle::from_size(100, 50));
//! assert_eq!(img.pix().len(), 20_000);
//! assert_eq!(img.stride(), 400);
//! img.release();
//! ```

use fast_image_resize as fir;
use image::{ImageBuffer, Luma, Rgba};
use tracing::error;

use crate::core::buffer_pool::{BlockPool, PixelBuffer};
use crate::core::geometry::{Rectangle, pixel_buffer_length, row_stride};
use crate::error::{PixelBufferError, PixelResult};
use crate::format::PixelFormat;

/// Pixel data laid out row-major, `stride` bytes per row with no padding.
///
/// The image owns its buffer; dropping it or calling [`release`](Self::release)
/// returns the storage to the pool it came from.
#[derive(Debug)]
pub struct Image {
    pix: PixelBuffer,
    stride: usize,
    rect: Rectangle,
    format: PixelFormat,
}

impl Image {
    pub fn pix(&self) -> &[u8] {
        &self.pix
    }

    pub fn pix_mut(&mut self) -> &mut [u8] {
        &mut self.pix
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn is_pooled(&self) -> bool {
        self.pix.is_pooled()
    }

    /// Index into [`pix`](Self::pix) of the first byte of pixel `(x, y)`, or
    /// `None` if the point lies outside the image.
    pub fn pix_offset(&self, x: isize, y: isize) -> Option<usize> {
        if !self.rect.contains(x, y) {
            return None;
        }
        let row = (y - self.rect.min.y) as usize;
        let col = (x - self.rect.min.x) as usize;
        Some(row * self.stride + col * self.format.bytes_per_pixel())
    }

    /// Returns the buffer to its pool.
    pub fn release(self) {
        self.pix.release();
    }

    /// Mutable `fast_image_resize` view over the pixels, for use as a resize
    /// source or destination.
    pub fn as_fir_image(&mut self) -> PixelResult<fir::images::Image<'_>> {
        let width = fir_extent(self.rect.dx())?;
        let height = fir_extent(self.rect.dy())?;
        let pixel_type = self.format.fir_pixel_type();
        fir::images::Image::from_slice_u8(width, height, &mut self.pix, pixel_type)
            .map_err(|e| PixelBufferError::interop("fast_image_resize", e.to_string()))
    }

    /// Borrowed `image` view for 8-bit RGBA data. `None` for other formats.
    pub fn as_rgba8(&self) -> Option<ImageBuffer<Rgba<u8>, &[u8]>> {
        if !matches!(self.format, PixelFormat::Rgba | PixelFormat::Nrgba) {
            return None;
        }
        let (width, height) = self.image_extents()?;
        ImageBuffer::from_raw(width, height, &self.pix[..])
    }

    /// Borrowed `image` view for 8-bit grayscale data. `None` for other formats.
    pub fn as_luma8(&self) -> Option<ImageBuffer<Luma<u8>, &[u8]>> {
        if self.format != PixelFormat::Gray {
            return None;
        }
        let (width, height) = self.image_extents()?;
        ImageBuffer::from_raw(width, height, &self.pix[..])
    }

    fn image_extents(&self) -> Option<(u32, u32)> {
        let width = u32::try_from(self.rect.dx()?).ok()?;
        let height = u32::try_from(self.rect.dy()?).ok()?;
        Some((width, height))
    }
}

fn fir_extent(extent: Option<isize>) -> PixelResult<u32> {
    extent.and_then(|e| u32::try_from(e).ok()).ok_or_else(|| {
        PixelBufferError::interop("fast_image_resize", format!("extent {extent:?} exceeds u32"))
    })
}

macro_rules! format_constructors {
    ($($format:ident => $new:ident, $try_new:ident;)*) => {
        impl BlockPool {
            $(
                #[doc = concat!("Allocates a `", stringify!($format), "` image covering `r`, panicking on invalid dimensions.")]
                pub fn $new(&self, r: Rectangle) -> Image {
                    self.new_image(PixelFormat::$format, r)
                }

                #[doc = concat!("Allocates a `", stringify!($format), "` image covering `r`.")]
                pub fn $try_new(&self, r: Rectangle) -> PixelResult<Image> {
                    self.try_new_image(PixelFormat::$format, r)
                }
            )*
        }

        $(
            #[doc = concat!("Allocates a `", stringify!($format), "` image from the global pool, panicking on invalid dimensions.")]
            pub fn $new(r: Rectangle) -> Image {
                BlockPool::global().$new(r)
            }

            #[doc = concat!("Allocates a `", stringify!($format), "` image from the global pool.")]
            pub fn $try_new(r: Rectangle) -> PixelResult<Image> {
                BlockPool::global().$try_new(r)
            }
        )*
    };
}

format_constructors! {
    Gray => new_gray, try_new_gray;
    Gray16 => new_gray16, try_new_gray16;
    Rgba => new_rgba, try_new_rgba;
    Nrgba => new_nrgba, try_new_nrgba;
    Rgba64 => new_rgba64, try_new_rgba64;
    Nrgba64 => new_nrgba64, try_new_nrgba64;
}

impl BlockPool {
    /// Allocates an image of `format` covering `r`.
    ///
    /// Sizing happens before any allocation, so a rejected rectangle leaves
    /// the pool untouched.
    pub fn try_new_image(&self, format: PixelFormat, r: Rectangle) -> PixelResult<Image> {
        let size = pixel_buffer_length(format, &r)?;
        let pix = self.acquire(size);
        Ok(Image {
            pix,
            stride: row_stride(format, &r),
            rect: r,
            format,
        })
    }

    /// Like [`try_new_image`](Self::try_new_image), but panics on invalid
    /// dimensions.
    pub fn new_image(&self, format: PixelFormat, r: Rectangle) -> Image {
        match self.try_new_image(format, r) {
            Ok(image) => image,
            Err(e) => {
                error!(error = %e, "rejecting pixel buffer request");
                panic!("{e}");
            }
        }
    }
}
