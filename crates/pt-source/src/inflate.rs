use std::io::Read;

use flate2::read::ZlibDecoder;
use pt_core::error::DecodeError;
use pt_core::frame::ImageHeader;

/// Upper bound on the up-front allocation; larger images grow as they inflate.
const MAX_PREALLOC: usize = 64 * 1024 * 1024;

/// Inflate the concatenated IDAT payload and check its length.
///
/// At most `expected + 1` bytes are pulled from the decoder, which is enough
/// to detect an oversized stream without inflating all of it.
///
/// # Errors
/// `Decompression` for a malformed zlib stream, `CorruptData` when the
/// inflated length differs from `height × (1 + stride)`, `InvalidDimensions`
/// when that length does not fit in memory.
///
/// # Example
/// ```
/// use std::io::Write;
/// use flate2::{write::ZlibEncoder, Compression};
/// use pt_core::frame::ImageHeader;
/// use pt_source::inflate::inflate;
///
/// let header = ImageHeader::new(2, 1, 8, 0, 0, 0, 0).unwrap();
/// let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
/// enc.write_all(&[0, 7, 9]).unwrap();
/// let payload = enc.finish().unwrap();
/// assert_eq!(inflate(&payload, &header).unwrap(), vec![0, 7, 9]);
/// ```
pub fn inflate(payload: &[u8], header: &ImageHeader) -> Result<Vec<u8>, DecodeError> {
    let expected = header.inflated_len()?;
    let mut out = Vec::with_capacity(expected.min(MAX_PREALLOC));

    ZlibDecoder::new(payload)
        .take(expected as u64 + 1)
        .read_to_end(&mut out)
        .map_err(DecodeError::Decompression)?;

    if out.len() != expected {
        return Err(DecodeError::CorruptData {
            expected,
            actual: out.len(),
        });
    }
    log::debug!("inflated {} → {} bytes", payload.len(), out.len());
    Ok(out)
}
