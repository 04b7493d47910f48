//! # Geometry and Buffer Sizing
//!
//! Rectangles and the overflow-checked length computation that guards every
//! pixel buffer allocation.
//!
//! ## Sizing Rules
//!
//! The length of a pixel buffer is `bytes_per_pixel * dx * dy`. The product is
//! computed in two widening steps on 128-bit intermediates, so the high half of
//! each partial product can be inspected before narrowing back down. A request
//! is rejected when:
//!
//! - an extent does not fit in `isize` (bounds too far apart, either way)
//! - any operand is negative (inverted rectangle bounds), before multiplying
//! - either partial product does not fit in 64 bits
//! - the final product does not fit in `isize`
//!
//! ## Example
//!
//! ```rust
//! use pixel_pool::core::geometry::{checked_buffer_length, Rectangle};
//!
//! assert_eq!(checked_buffer_length(4, 100, 50), Some(20_000));
//! assert_eq!(checked_buffer_length(4, -1, 50), None);
//!
//! let r = Rectangle::new(10, 10, 110, 60);
//! assert_eq!((r.dx(), r.dy()), (Some(100), Some(50)));
//! ```

use crate::error::{PixelBufferError, PixelResult};
use crate::format::PixelFormat;

/// A point in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: isize,
    pub y: isize,
}

impl Point {
    pub const fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle covering `min.x <= x < max.x`, `min.y <= y < max.y`.
///
/// Bounds are not normalized: a rectangle with `max < min` is kept as-is and
/// reports negative extents, which the sizer rejects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub min: Point,
    pub max: Point,
}

impl Rectangle {
    pub const fn new(x0: isize, y0: isize, x1: isize, y1: isize) -> Self {
        Self {
            min: Point::new(x0, y0),
            max: Point::new(x1, y1),
        }
    }

    /// Rectangle anchored at the origin with the given extents.
    pub const fn from_size(width: isize, height: isize) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Width, or `None` if `max.x - min.x` does not fit in `isize`.
    pub fn dx(&self) -> Option<isize> {
        self.max.x.checked_sub(self.min.x)
    }

    /// Height, or `None` if `max.y - min.y` does not fit in `isize`.
    pub fn dy(&self) -> Option<isize> {
        self.max.y.checked_sub(self.min.y)
    }

    /// True when the rectangle contains no pixels.
    pub fn is_empty(&self) -> bool {
        let (dx, dy) = self.wide_extents();
        dx <= 0 || dy <= 0
    }

    /// Exact extents. The difference of two `isize` values always fits in `i128`.
    fn wide_extents(&self) -> (i128, i128) {
        (
            self.max.x as i128 - self.min.x as i128,
            self.max.y as i128 - self.min.y as i128,
        )
    }

    /// True when `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: isize, y: isize) -> bool {
        self.min.x <= x && x < self.max.x && self.min.y <= y && y < self.max.y
    }
}

impl TryFrom<image::math::Rect> for Rectangle {
    type Error = PixelBufferError;

    /// Fails when a bound of `r` does not fit in `isize`.
    fn try_from(r: image::math::Rect) -> PixelResult<Self> {
        let bound = |origin: u32, extent: u32| {
            let origin = isize::try_from(origin).ok()?;
            let max = origin.checked_add(isize::try_from(extent).ok()?)?;
            Some((origin, max))
        };
        let out_of_range = || {
            PixelBufferError::interop(
                "Rectangle",
                format!(
                    "bounds of {}x{}+{}+{} exceed isize",
                    r.width, r.height, r.x, r.y
                ),
            )
        };
        let (x0, x1) = bound(r.x, r.width).ok_or_else(out_of_range)?;
        let (y0, y1) = bound(r.y, r.height).ok_or_else(out_of_range)?;
        Ok(Self::new(x0, y0, x1, y1))
    }
}

/// Returns `bytes_per_pixel * width * height`, or `None` if any operand is
/// negative or the product does not fit in `isize`.
pub fn checked_buffer_length(bytes_per_pixel: isize, width: isize, height: isize) -> Option<usize> {
    if bytes_per_pixel < 0 || width < 0 || height < 0 {
        return None;
    }
    let lo = widening_mul(bytes_per_pixel as u64, width as u64)?;
    let lo = widening_mul(lo, height as u64)?;
    let len = isize::try_from(lo).ok()?;
    usize::try_from(len).ok()
}

/// Multiplies in 128 bits and keeps the low half only if the high half is zero.
#[inline]
fn widening_mul(x: u64, y: u64) -> Option<u64> {
    let wide = u128::from(x) * u128::from(y);
    if wide >> 64 != 0 {
        return None;
    }
    Some(wide as u64)
}

/// Length of the pixel buffer backing a `format` image covering `r`.
///
/// Fails with `InvalidDimensions` when an extent is negative, when it does not
/// fit in `isize`, or when the product overflows.
pub fn pixel_buffer_length(format: PixelFormat, r: &Rectangle) -> PixelResult<usize> {
    let invalid = || {
        let (dx, dy) = r.wide_extents();
        PixelBufferError::invalid_dimensions(format, dx, dy)
    };
    let (Some(dx), Some(dy)) = (r.dx(), r.dy()) else {
        return Err(invalid());
    };
    checked_buffer_length(format.bytes_per_pixel() as isize, dx, dy).ok_or_else(invalid)
}

/// Bytes per row of a `format` image covering `r`.
///
/// Only meaningful once [`pixel_buffer_length`] has accepted `r`.
pub fn row_stride(format: PixelFormat, r: &Rectangle) -> usize {
    format.bytes_per_pixel() * r.dx().map_or(0, |dx| dx.max(0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_products() {
        assert_eq!(checked_buffer_length(4, 100, 50), Some(20_000));
        assert_eq!(checked_buffer_length(8, 0, 1 << 20), Some(0));
        assert_eq!(checked_buffer_length(1, 1, 1), Some(1));
        assert_eq!(checked_buffer_length(2, 3, 7), Some(42));
    }

    #[test]
    fn test_negative_operands_rejected() {
        assert_eq!(checked_buffer_length(-1, 1, 1), None);
        assert_eq!(checked_buffer_length(4, -1, 50), None);
        assert_eq!(checked_buffer_length(4, 100, -50), None);
        assert_eq!(checked_buffer_length(4, isize::MIN, isize::MIN), None);
        // Would be positive after two's-complement wraparound.
        assert_eq!(checked_buffer_length(4, -1, -1), None);
    }

    #[test]
    fn test_overflow_rejected() {
        assert_eq!(checked_buffer_length(1, isize::MAX, 2), None);
        assert_eq!(checked_buffer_length(8, isize::MAX, isize::MAX), None);
        assert_eq!(checked_buffer_length(2, isize::MAX / 2 + 1, 1), None);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_second_step_overflow() {
        // 8 * 2^31 fits, the product with the second 2^31 is 2^65.
        assert_eq!(checked_buffer_length(8, 1 << 31, 1 << 31), None);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_isize_boundary() {
        // 2^63 fits in u64 but not in isize.
        assert_eq!(checked_buffer_length(1, 1 << 32, 1 << 31), None);
        assert_eq!(
            checked_buffer_length(1, isize::MAX, 1),
            Some(isize::MAX as usize)
        );
        assert_eq!(
            checked_buffer_length(1, 1 << 32, (1 << 31) - 1),
            Some((1usize << 63) - (1 << 32))
        );
    }

    #[test]
    fn test_widening_mul_high_half() {
        assert_eq!(widening_mul(u64::MAX, 1), Some(u64::MAX));
        assert_eq!(widening_mul(u64::MAX, 2), None);
        assert_eq!(widening_mul(1 << 32, 1 << 32), None);
        assert_eq!(
            widening_mul(1 << 32, (1 << 32) - 1),
            Some(u64::MAX - u64::from(u32::MAX))
        );
    }

    #[test]
    fn test_rectangle_extents() {
        let r = Rectangle::new(-5, 3, 5, 8);
        assert_eq!(r.dx(), Some(10));
        assert_eq!(r.dy(), Some(5));
        assert!(!r.is_empty());
        assert!(r.contains(-5, 3));
        assert!(!r.contains(5, 3));

        let inverted = Rectangle::new(10, 0, 0, 10);
        assert_eq!(inverted.dx(), Some(-10));
        assert!(inverted.is_empty());
    }

    #[test]
    fn test_unrepresentable_extents_rejected() {
        // isize::MAX + 2 columns.
        let wide = Rectangle::new(-2, 0, isize::MAX, 1);
        assert_eq!(wide.dx(), None);
        assert!(!wide.is_empty());
        let err = pixel_buffer_length(PixelFormat::Gray, &wide).expect_err("wide extent");
        assert_eq!(err.category(), "invalid_dimensions");
        assert_eq!(err.format(), Some(PixelFormat::Gray));
        assert!(err.to_string().contains(&format!("dx={}", isize::MAX as i128 + 2)));

        let inverted = Rectangle::new(isize::MAX, 0, isize::MIN, 1);
        assert_eq!(inverted.dx(), None);
        assert!(inverted.is_empty());
        let err = pixel_buffer_length(PixelFormat::Gray, &inverted).expect_err("inverted extent");
        assert_eq!(err.category(), "invalid_dimensions");
        assert_eq!(err.format(), Some(PixelFormat::Gray));

        let tall = Rectangle::new(0, isize::MIN, 1, 1);
        assert!(pixel_buffer_length(PixelFormat::Rgba, &tall).is_err());
        assert_eq!(row_stride(PixelFormat::Rgba, &tall), 4);
    }

    #[test]
    fn test_from_image_rect() {
        let r = Rectangle::try_from(image::math::Rect {
            x: 2,
            y: 4,
            width: 10,
            height: 20,
        });
        assert_eq!(r.ok(), Some(Rectangle::new(2, 4, 12, 24)));
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn test_from_image_rect_out_of_range() {
        let r = Rectangle::try_from(image::math::Rect {
            x: u32::MAX,
            y: 0,
            width: 1,
            height: 1,
        });
        assert_eq!(r.expect_err("x exceeds isize").category(), "interop");
    }

    #[test]
    fn test_pixel_buffer_length() {
        let r = Rectangle::from_size(100, 50);
        assert_eq!(pixel_buffer_length(PixelFormat::Rgba, &r).ok(), Some(20_000));
        assert_eq!(row_stride(PixelFormat::Rgba, &r), 400);

        let err = pixel_buffer_length(PixelFormat::Gray16, &Rectangle::from_size(-1, 5))
            .expect_err("negative width must be rejected");
        assert_eq!(err.format(), Some(PixelFormat::Gray16));
        assert!(err.to_string().contains("NewGray16"));
    }
}
