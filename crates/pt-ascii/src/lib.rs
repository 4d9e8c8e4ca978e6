pub mod color_map;
/// Grayscale half-block rendering for pixterm.
///
/// Converts decoded pixel buffers to luminance, maps it onto the 256-color
/// grayscale ramp, and packs two pixel rows per text line.
pub mod halfblock;
pub mod luminance;

pub use halfblock::process_halfblock;
