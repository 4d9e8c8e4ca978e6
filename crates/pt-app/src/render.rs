use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use pt_ascii::process_halfblock;
use pt_core::config::ViewConfig;
use pt_core::error::DecodeError;
use pt_core::frame::{ImageHeader, TerminalFrame};
use pt_source::chunk::read_container;
use pt_source::resize::fit_to_columns;
use pt_source::{DecodeOptions, decode_file};
use thiserror::Error;

/// Échec de l'affichage d'un fichier.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The file could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Writing the rendered frame failed.
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

/// Terminal width in columns, `None` when stdout is not a terminal or the
/// size query fails.
#[must_use]
pub fn terminal_columns() -> Option<u16> {
    match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 0 => Some(cols),
        Ok(_) => None,
        Err(e) => {
            log::debug!("terminal size unavailable: {e}");
            None
        }
    }
}

/// Decode `path` and build the half-block frame, without writing anything.
///
/// # Errors
/// Any [`DecodeError`] from the decoding pipeline.
pub fn render_to_frame(
    path: &Path,
    config: &ViewConfig,
    terminal_columns: Option<u16>,
) -> Result<TerminalFrame, DecodeError> {
    let options = DecodeOptions {
        verify_checksums: config.verify_checksums,
    };
    let image = decode_file(path, options)?;
    let columns = config.columns(terminal_columns);
    let pixels = fit_to_columns(image.pixels, columns);
    Ok(process_halfblock(&pixels, config.background))
}

/// Render the PNG at `path` to `out` as ANSI half-block lines.
///
/// Output is only written once the whole frame has been built, so a failing
/// file never produces partial output.
///
/// # Errors
/// `RenderError::Decode` for any decoding failure, `RenderError::Output`
/// if `out` cannot be written.
///
/// # Example
/// ```no_run
/// use pt_app::render::{render_file, terminal_columns};
/// use pt_core::config::ViewConfig;
/// use std::path::Path;
///
/// let mut stdout = std::io::stdout().lock();
/// render_file(Path::new("cat.png"), &ViewConfig::default(), terminal_columns(), &mut stdout)
///     .unwrap();
/// ```
pub fn render_file<W: Write>(
    path: &Path,
    config: &ViewConfig,
    terminal_columns: Option<u16>,
    out: &mut W,
) -> Result<(), RenderError> {
    let frame = render_to_frame(path, config, terminal_columns)?;
    frame.write_to(out).map_err(RenderError::Output)
}

/// Read only the container and return the validated header.
///
/// # Errors
/// Container-level [`DecodeError`]s; pixel data is not inflated.
pub fn describe_file(path: &Path, config: &ViewConfig) -> Result<ImageHeader, DecodeError> {
    let file = File::open(path)?;
    let (header, _) = read_container(BufReader::new(file), config.verify_checksums)?;
    Ok(header)
}

/// One-line summary used by `--info`.
#[must_use]
pub fn header_summary(path: &Path, header: &ImageHeader) -> String {
    format!(
        "{}: {}×{} {}, {}-bit, {} byte(s)/pixel",
        path.display(),
        header.width,
        header.height,
        header.color_type.name(),
        header.bit_depth,
        header.bytes_per_pixel()
    )
}
