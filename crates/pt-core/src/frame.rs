use std::fmt::Write as _;
use std::io::{self, Write};

use crate::error::DecodeError;

/// Type de couleur PNG supporté. Le type 3 (palette) n'est jamais construit.
///
/// # Example
/// ```
/// use pt_core::frame::ColorType;
/// assert_eq!(ColorType::try_from(6).unwrap(), ColorType::Rgba);
/// assert_eq!(ColorType::Rgb.bytes_per_pixel(), 3);
/// assert!(ColorType::try_from(3).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorType {
    /// 0 — one gray sample.
    Grayscale,
    /// 2 — red, green, blue.
    Rgb,
    /// 4 — gray then alpha.
    GrayAlpha,
    /// 6 — red, green, blue, alpha.
    Rgba,
}

impl ColorType {
    /// Octets par pixel à 8 bits par canal.
    #[inline(always)]
    #[must_use]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Grayscale => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Raw IHDR value.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Grayscale => 0,
            Self::Rgb => 2,
            Self::GrayAlpha => 4,
            Self::Rgba => 6,
        }
    }

    /// Short label for `--info` output and logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Rgb => "rgb",
            Self::GrayAlpha => "gray+alpha",
            Self::Rgba => "rgba",
        }
    }
}

impl TryFrom<u8> for ColorType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Grayscale),
            2 => Ok(Self::Rgb),
            4 => Ok(Self::GrayAlpha),
            6 => Ok(Self::Rgba),
            3 => Err(DecodeError::unsupported(
                "indexed-color (palette) images are not handled",
            )),
            other => Err(DecodeError::unsupported(format!(
                "unknown color type {other}"
            ))),
        }
    }
}

/// Contenu validé d'un chunk IHDR.
///
/// Only headers that pass [`ImageHeader::new`] exist, so downstream stages
/// can rely on 8-bit, non-interlaced, non-palette data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageHeader {
    /// Width in pixels, never zero.
    pub width: u32,
    /// Height in pixels, never zero.
    pub height: u32,
    /// Always 8.
    pub bit_depth: u8,
    /// Channel layout.
    pub color_type: ColorType,
    /// Always 0 (deflate).
    pub compression_method: u8,
    /// Always 0 (adaptive per-row filtering).
    pub filter_method: u8,
    /// Always 0 (no interlace).
    pub interlace_method: u8,
}

impl ImageHeader {
    /// Validate raw IHDR fields.
    ///
    /// Checks run in a fixed order: compression/filter method, interlace,
    /// bit depth, color type, then dimensions.
    ///
    /// # Errors
    /// `UnsupportedFormat` for anything outside the supported subset,
    /// `InvalidDimensions` for a zero width or height.
    ///
    /// # Example
    /// ```
    /// use pt_core::frame::{ColorType, ImageHeader};
    /// let h = ImageHeader::new(4, 2, 8, 2, 0, 0, 0).unwrap();
    /// assert_eq!(h.color_type, ColorType::Rgb);
    /// assert_eq!(h.stride(), 12);
    /// assert!(ImageHeader::new(4, 2, 8, 2, 0, 0, 1).is_err());
    /// ```
    pub fn new(
        width: u32,
        height: u32,
        bit_depth: u8,
        color_type: u8,
        compression_method: u8,
        filter_method: u8,
        interlace_method: u8,
    ) -> Result<Self, DecodeError> {
        if compression_method != 0 || filter_method != 0 {
            return Err(DecodeError::unsupported(format!(
                "compression method {compression_method} / filter method {filter_method}"
            )));
        }
        if interlace_method != 0 {
            return Err(DecodeError::unsupported(
                "interlaced images are not handled",
            ));
        }
        if bit_depth != 8 {
            return Err(DecodeError::unsupported(format!(
                "bit depth {bit_depth} (only 8 is handled)"
            )));
        }
        let color_type = ColorType::try_from(color_type)?;
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            bit_depth,
            color_type,
            compression_method,
            filter_method,
            interlace_method,
        })
    }

    /// Octets par pixel.
    #[inline(always)]
    #[must_use]
    pub fn bytes_per_pixel(&self) -> usize {
        self.color_type.bytes_per_pixel()
    }

    /// Bytes per reconstructed row, `width × bpp`.
    #[inline(always)]
    #[must_use]
    pub fn stride(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Expected inflated length, `height × (1 + stride)`.
    ///
    /// # Errors
    /// `InvalidDimensions` when the product overflows `usize`.
    pub fn inflated_len(&self) -> Result<usize, DecodeError> {
        (self.width as usize)
            .checked_mul(self.bytes_per_pixel())
            .and_then(|stride| stride.checked_add(1))
            .and_then(|row| row.checked_mul(self.height as usize))
            .ok_or(DecodeError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })
    }
}

/// Pixels décodés : row-major, canaux entrelacés, `height × stride` octets.
///
/// # Example
/// ```
/// use pt_core::frame::{ColorType, PixelBuffer};
/// let buf = PixelBuffer::new(3, 2, ColorType::GrayAlpha);
/// assert_eq!(buf.data.len(), 3 * 2 * 2);
/// assert_eq!(buf.stride(), 6);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channel layout of `data`.
    pub color_type: ColorType,
    /// Raw samples.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Zero-filled buffer of the given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32, color_type: ColorType) -> Self {
        let len = width as usize * height as usize * color_type.bytes_per_pixel();
        Self {
            width,
            height,
            color_type,
            data: vec![0u8; len],
        }
    }

    /// Octets par pixel.
    #[inline(always)]
    #[must_use]
    pub fn bytes_per_pixel(&self) -> usize {
        self.color_type.bytes_per_pixel()
    }

    /// Bytes per row.
    #[inline(always)]
    #[must_use]
    pub fn stride(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Samples of pixel (x, y), `bytes_per_pixel` long.
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let bpp = self.bytes_per_pixel();
        let idx = y as usize * self.stride() + x as usize * bpp;
        &self.data[idx..idx + bpp]
    }
}

/// Caractère demi-bloc supérieur : fg = pixel du haut, bg = pixel du bas.
pub const HALF_BLOCK: char = '▀';

/// Reset SGR emitted at the end of every line.
pub const RESET: &str = "\x1b[0m";

/// One character cell covering two stacked pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HalfBlockCell {
    /// 256-color index of the top pixel (foreground).
    pub fg: u8,
    /// 256-color index of the bottom pixel (background).
    pub bg: u8,
}

/// Grille de sortie demi-blocs. Une ligne de texte = deux lignes de pixels.
///
/// # Example
/// ```
/// use pt_core::frame::{HalfBlockCell, TerminalFrame};
/// let mut frame = TerminalFrame::new(2, 1);
/// frame.set(1, 0, HalfBlockCell { fg: 255, bg: 232 });
/// let lines = frame.lines();
/// assert_eq!(lines.len(), 1);
/// assert!(lines[0].ends_with("\x1b[38;5;255m\x1b[48;5;232m▀\x1b[0m"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminalFrame {
    /// Flat array of cells, row-major.
    pub cells: Vec<HalfBlockCell>,
    /// Width in characters.
    pub width: usize,
    /// Height in text lines.
    pub height: usize,
}

impl TerminalFrame {
    /// Pre-allocated frame with default cells.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![HalfBlockCell::default(); width * height],
            width,
            height,
        }
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, cell: HalfBlockCell) {
        self.cells[y * self.width + x] = cell;
    }

    /// Get a cell at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> HalfBlockCell {
        self.cells[y * self.width + x]
    }

    /// Encode every row as an ANSI 256-color line terminated by a reset.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        if self.width == 0 {
            return vec![RESET.to_owned(); self.height];
        }
        self.cells
            .chunks(self.width)
            .map(|row| {
                // ~22 bytes per cell
                let mut line = String::with_capacity(row.len() * 22 + RESET.len());
                for cell in row {
                    let _ = write!(line, "\x1b[38;5;{}m\x1b[48;5;{}m{HALF_BLOCK}", cell.fg, cell.bg);
                }
                line.push_str(RESET);
                line
            })
            .collect()
    }

    /// Write all lines, newline-terminated, then flush.
    ///
    /// # Errors
    /// Propagates write errors from `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.lines() {
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_rejects_in_documented_order() {
        // interlace + bad depth: compression/filter checked first, then interlace.
        let err = ImageHeader::new(1, 1, 4, 3, 0, 0, 1).unwrap_err();
        assert!(err.to_string().contains("interlaced"), "{err}");

        let err = ImageHeader::new(1, 1, 4, 3, 0, 0, 0).unwrap_err();
        assert!(err.to_string().contains("bit depth 4"), "{err}");

        let err = ImageHeader::new(1, 1, 8, 3, 0, 0, 0).unwrap_err();
        assert!(err.to_string().contains("palette"), "{err}");

        let err = ImageHeader::new(1, 1, 8, 0, 1, 0, 0).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat { .. }));

        let err = ImageHeader::new(1, 1, 8, 0, 0, 1, 0).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat { .. }));
    }

    #[test]
    fn header_rejects_zero_dimensions() {
        let err = ImageHeader::new(0, 5, 8, 0, 0, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidDimensions {
                width: 0,
                height: 5
            }
        ));
    }

    #[test]
    fn inflated_len_counts_filter_bytes() {
        let h = ImageHeader::new(3, 2, 8, 6, 0, 0, 0).unwrap();
        assert_eq!(h.inflated_len().unwrap(), 2 * (1 + 3 * 4));
    }

    #[test]
    fn pixel_slices_interleaved_channels() {
        let mut buf = PixelBuffer::new(2, 2, ColorType::Rgb);
        for (i, b) in buf.data.iter_mut().enumerate() {
            *b = i as u8;
        }
        assert_eq!(buf.pixel(1, 1), &[9, 10, 11]);
        assert_eq!(buf.pixel(0, 1), &[6, 7, 8]);
    }

    #[test]
    fn write_to_emits_one_line_per_row() {
        let frame = TerminalFrame::new(3, 2);
        let mut out = Vec::new();
        frame.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
        assert_eq!(text.matches(RESET).count(), 2);
        assert!(text.ends_with("\x1b[0m\n"));
    }
}
