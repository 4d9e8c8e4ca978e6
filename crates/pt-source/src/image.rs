use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use pt_core::error::DecodeError;
use pt_core::frame::{ImageHeader, PixelBuffer};

use crate::chunk::read_container;
use crate::inflate::inflate;
use crate::unfilter::unfilter;

/// Decoder switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Vérifier le CRC de chaque chunk avant de l'accepter.
    pub verify_checksums: bool,
}

/// Image PNG décodée : en-tête validé et pixels reconstruits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Header as read from IHDR.
    pub header: ImageHeader,
    /// Unfiltered samples, `height × stride` bytes.
    pub pixels: PixelBuffer,
}

/// Decode a PNG byte stream: parse, inflate, unfilter.
///
/// # Errors
/// Any [`DecodeError`]; nothing is returned for a partially decoded image.
///
/// # Example
/// ```
/// use pt_source::image::{decode_reader, DecodeOptions};
/// use pt_core::DecodeError;
/// let err = decode_reader(&b"GIF89a.."[..], DecodeOptions::default()).unwrap_err();
/// assert!(matches!(err, DecodeError::BadSignature));
/// ```
pub fn decode_reader<R: Read>(reader: R, options: DecodeOptions) -> Result<DecodedImage, DecodeError> {
    let (header, payload) = read_container(reader, options.verify_checksums)?;
    let inflated = inflate(&payload, &header)?;
    drop(payload);
    let pixels = unfilter(&inflated, &header)?;
    Ok(DecodedImage { header, pixels })
}

/// Open `path` and decode it. The file is closed before returning, on every
/// path.
///
/// # Errors
/// `Io` if the file cannot be opened or read, otherwise as [`decode_reader`].
///
/// # Example
/// ```no_run
/// use pt_source::image::{decode_file, DecodeOptions};
/// use std::path::Path;
/// let image = decode_file(Path::new("test.png"), DecodeOptions::default()).unwrap();
/// ```
pub fn decode_file(path: &Path, options: DecodeOptions) -> Result<DecodedImage, DecodeError> {
    let file = File::open(path)?;
    log::debug!("decoding {}", path.display());
    decode_reader(BufReader::new(file), options)
}
