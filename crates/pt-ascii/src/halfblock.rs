use pt_core::color::Rgb;
use pt_core::frame::{HalfBlockCell, PixelBuffer, TerminalFrame};

use crate::color_map::RampLut;
use crate::luminance::ColorMapper;

/// Process a buffer in half-block mode (▀ character).
///
/// Each terminal cell covers 2 vertical pixels. The top pixel's gray goes
/// to fg, the bottom pixel's gray goes to bg. The buffer is expected at
/// its final size (see `pt_source::resize`); an odd last row is paired
/// with the background.
///
/// # Example
/// ```
/// use pt_core::color::Rgb;
/// use pt_core::frame::{ColorType, PixelBuffer};
/// use pt_ascii::halfblock::process_halfblock;
///
/// let mut buf = PixelBuffer::new(1, 2, ColorType::Grayscale);
/// buf.data.copy_from_slice(&[255, 0]);
/// let frame = process_halfblock(&buf, Rgb::BLACK);
/// assert_eq!((frame.width, frame.height), (1, 1));
/// assert_eq!(frame.get(0, 0).fg, 255);
/// assert_eq!(frame.get(0, 0).bg, 232);
/// ```
#[must_use]
pub fn process_halfblock(buffer: &PixelBuffer, background: Rgb) -> TerminalFrame {
    let mapper = ColorMapper::new(buffer.color_type, background);
    let lut = RampLut::new();
    let rows = buffer.height.div_ceil(2);
    let mut frame = TerminalFrame::new(buffer.width as usize, rows as usize);
    let fill = lut.map(mapper.background_luma());

    for cy in 0..rows {
        let y_top = cy * 2;
        let y_bot = y_top + 1;
        for cx in 0..buffer.width {
            let fg = lut.map(mapper.luminance_at(buffer, cx, y_top));
            let bg = if y_bot < buffer.height {
                lut.map(mapper.luminance_at(buffer, cx, y_bot))
            } else {
                fill
            };
            frame.set(cx as usize, cy as usize, HalfBlockCell { fg, bg });
        }
    }

    log::debug!("rendered {}×{} cells", frame.width, frame.height);
    frame
}
