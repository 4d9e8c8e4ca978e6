use pt_core::color::{Rgb, composite, luma};
use pt_core::frame::{ColorType, PixelBuffer};

/// Convertit les échantillons d'un pixel en luminance 8 bits.
///
/// Alpha channels are composited over a background luminance computed once
/// from the configured background color.
///
/// # Example
/// ```
/// use pt_core::color::Rgb;
/// use pt_core::frame::ColorType;
/// use pt_ascii::luminance::ColorMapper;
///
/// let mapper = ColorMapper::new(ColorType::GrayAlpha, Rgb(255, 255, 255));
/// assert_eq!(mapper.luminance(&[0, 0]), 255);
/// assert_eq!(mapper.luminance(&[0, 255]), 0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ColorMapper {
    color_type: ColorType,
    background_luma: u8,
}

impl ColorMapper {
    /// Mapper for `color_type` pixels over `background`.
    #[must_use]
    pub fn new(color_type: ColorType, background: Rgb) -> Self {
        Self {
            color_type,
            background_luma: background.luma(),
        }
    }

    /// Luminance of the background color.
    #[must_use]
    pub fn background_luma(&self) -> u8 {
        self.background_luma
    }

    /// Luminance of one pixel's samples (`bytes_per_pixel` long).
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, px: &[u8]) -> u8 {
        match (self.color_type, px) {
            (ColorType::Grayscale, &[g, ..]) => g,
            (ColorType::Rgb, &[r, g, b, ..]) => luma(r, g, b),
            (ColorType::GrayAlpha, &[g, a, ..]) => composite(g, a, self.background_luma),
            (ColorType::Rgba, &[r, g, b, a, ..]) => composite(luma(r, g, b), a, self.background_luma),
            // Pixel slice shorter than the color type: treat as background.
            _ => self.background_luma,
        }
    }

    /// Luminance at (x, y) in `buffer`.
    #[inline(always)]
    #[must_use]
    pub fn luminance_at(&self, buffer: &PixelBuffer, x: u32, y: u32) -> u8 {
        self.luminance(buffer.pixel(x, y))
    }
}
