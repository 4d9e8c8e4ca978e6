/// Shared types, errors, and configuration for pixterm.
///
/// This crate contains the image header and buffer types handed between the
/// decoding and rendering stages, the decode error taxonomy, and the view
/// configuration.

pub mod color;
pub mod config;
pub mod error;
pub mod frame;

pub use color::Rgb;
pub use config::ViewConfig;
pub use error::DecodeError;
pub use frame::{ColorType, HalfBlockCell, ImageHeader, PixelBuffer, TerminalFrame};
