//! Pixel format descriptors.
//!
//! A [`PixelFormat`] fixes the number of bytes each pixel occupies. The name is
//! only used in diagnostics.

use std::fmt;

use fast_image_resize::PixelType;

/// Supported pixel layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit grayscale.
    Gray,
    /// 16-bit grayscale, big-endian samples.
    Gray16,
    /// 8-bit RGBA, alpha-premultiplied.
    Rgba,
    /// 8-bit RGBA, non-premultiplied.
    Nrgba,
    /// 16-bit RGBA, alpha-premultiplied, big-endian samples.
    Rgba64,
    /// 16-bit RGBA, non-premultiplied, big-endian samples.
    Nrgba64,
}

impl PixelFormat {
    /// Every supported format, narrowest first.
    pub const ALL: [PixelFormat; 6] = [
        PixelFormat::Gray,
        PixelFormat::Gray16,
        PixelFormat::Rgba,
        PixelFormat::Nrgba,
        PixelFormat::Rgba64,
        PixelFormat::Nrgba64,
    ];

    /// Bytes occupied by one pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Gray16 => 2,
            PixelFormat::Rgba | PixelFormat::Nrgba => 4,
            PixelFormat::Rgba64 | PixelFormat::Nrgba64 => 8,
        }
    }

    /// Human-readable name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            PixelFormat::Gray => "Gray",
            PixelFormat::Gray16 => "Gray16",
            PixelFormat::Rgba => "RGBA",
            PixelFormat::Nrgba => "NRGBA",
            PixelFormat::Rgba64 => "RGBA64",
            PixelFormat::Nrgba64 => "NRGBA64",
        }
    }

    /// The `fast_image_resize` pixel type with the same sample layout.
    ///
    /// Premultiplication is not encoded in `PixelType`, and 16-bit formats are
    /// stored big-endian here while `fast_image_resize` reads native-endian
    /// samples; callers resizing 16-bit data must byte-swap first.
    pub const fn fir_pixel_type(self) -> PixelType {
        match self {
            PixelFormat::Gray => PixelType::U8,
            PixelFormat::Gray16 => PixelType::U16,
            PixelFormat::Rgba | PixelFormat::Nrgba => PixelType::U8x4,
            PixelFormat::Rgba64 | PixelFormat::Nrgba64 => PixelType::U16x4,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_pixel() {
        let widths: Vec<usize> = PixelFormat::ALL.iter().map(|f| f.bytes_per_pixel()).collect();
        assert_eq!(widths, vec![1, 2, 4, 4, 8, 8]);
    }

    #[test]
    fn test_fir_pixel_type_matches_width() {
        for format in PixelFormat::ALL {
            assert_eq!(format.fir_pixel_type().size(), format.bytes_per_pixel());
        }
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(PixelFormat::Rgba64.to_string(), "RGBA64");
        assert_eq!(format!("{}", PixelFormat::Gray16), "Gray16");
    }
}
