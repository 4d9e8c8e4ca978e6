/// PNG decoding for pixterm: container parsing, inflate, scanline
/// reconstruction, and nearest-neighbour resampling.

pub mod chunk;
pub mod image;
pub mod inflate;
pub mod resize;
pub mod unfilter;

pub use image::{DecodeOptions, DecodedImage, decode_file, decode_reader};
