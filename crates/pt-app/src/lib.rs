/// Command-line front end for pixterm.

pub mod cli;
pub mod render;

pub use render::{RenderError, render_file};
