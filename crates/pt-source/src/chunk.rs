use std::io::{self, Read};

use flate2::Crc;
use pt_core::error::DecodeError;
use pt_core::frame::ImageHeader;

/// Les 8 octets magiques en tête de tout fichier PNG.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Taille fixe du payload IHDR.
pub const IHDR_LEN: u32 = 13;

/// Length and tag of one chunk record, read before its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Payload length in bytes.
    pub length: u32,
    /// Four ASCII bytes, e.g. `*b"IDAT"`.
    pub tag: [u8; 4],
}

impl ChunkHeader {
    /// Tag as printable text for errors and logs.
    #[must_use]
    pub fn tag_str(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }
}

/// Lecteur séquentiel de chunks PNG.
///
/// Each call to [`ChunkReader::next_header`] must be followed by exactly one
/// of [`ChunkReader::read_payload`] or [`ChunkReader::skip_payload`], which
/// also consume the trailing CRC.
///
/// # Example
/// ```
/// use pt_source::chunk::{ChunkReader, PNG_SIGNATURE};
///
/// let mut bytes = PNG_SIGNATURE.to_vec();
/// bytes.extend_from_slice(&[0, 0, 0, 0]);
/// bytes.extend_from_slice(b"IEND");
/// bytes.extend_from_slice(&[0xAE, 0x42, 0x60, 0x82]);
///
/// let mut chunks = ChunkReader::new(&bytes[..], true).unwrap();
/// let head = chunks.next_header().unwrap().unwrap();
/// assert_eq!(&head.tag, b"IEND");
/// chunks.skip_payload(&head).unwrap();
/// assert!(chunks.next_header().unwrap().is_none());
/// ```
pub struct ChunkReader<R: Read> {
    inner: R,
    verify_checksums: bool,
}

impl<R: Read> ChunkReader<R> {
    /// Consume and validate the signature.
    ///
    /// # Errors
    /// `BadSignature` if the stream does not start with [`PNG_SIGNATURE`],
    /// including streams shorter than eight bytes.
    pub fn new(mut inner: R, verify_checksums: bool) -> Result<Self, DecodeError> {
        let mut magic = Vec::with_capacity(PNG_SIGNATURE.len());
        (&mut inner)
            .take(PNG_SIGNATURE.len() as u64)
            .read_to_end(&mut magic)?;
        if magic != PNG_SIGNATURE {
            return Err(DecodeError::BadSignature);
        }
        Ok(Self {
            inner,
            verify_checksums,
        })
    }

    /// Read the next length + tag pair.
    ///
    /// Returns `None` when the stream ends exactly on a chunk boundary.
    ///
    /// # Errors
    /// `Io(UnexpectedEof)` if the stream ends inside the eight header bytes.
    pub fn next_header(&mut self) -> Result<Option<ChunkHeader>, DecodeError> {
        let mut raw = [0u8; 8];
        if !read_exact_or_eof(&mut self.inner, &mut raw)? {
            return Ok(None);
        }
        let [l0, l1, l2, l3, t0, t1, t2, t3] = raw;
        Ok(Some(ChunkHeader {
            length: u32::from_be_bytes([l0, l1, l2, l3]),
            tag: [t0, t1, t2, t3],
        }))
    }

    /// Append the payload of `header` to `out`, then consume the CRC.
    ///
    /// # Errors
    /// `Io(UnexpectedEof)` on a short payload or CRC, `ChecksumMismatch`
    /// when verification is enabled and the CRC is wrong.
    pub fn read_payload(
        &mut self,
        header: &ChunkHeader,
        out: &mut Vec<u8>,
    ) -> Result<(), DecodeError> {
        let start = out.len();
        let n = (&mut self.inner)
            .take(u64::from(header.length))
            .read_to_end(out)?;
        if n != header.length as usize {
            return Err(truncated(header).into());
        }
        self.finish(header, &out[start..])
    }

    /// Discard the payload of `header` and its CRC.
    ///
    /// # Errors
    /// Same as [`ChunkReader::read_payload`].
    pub fn skip_payload(&mut self, header: &ChunkHeader) -> Result<(), DecodeError> {
        if self.verify_checksums {
            let mut scratch = Vec::new();
            return self.read_payload(header, &mut scratch);
        }
        let n = io::copy(
            &mut (&mut self.inner).take(u64::from(header.length)),
            &mut io::sink(),
        )?;
        if n != u64::from(header.length) {
            return Err(truncated(header).into());
        }
        self.finish(header, &[])
    }

    fn finish(&mut self, header: &ChunkHeader, payload: &[u8]) -> Result<(), DecodeError> {
        let mut stored = [0u8; 4];
        self.inner.read_exact(&mut stored)?;
        if !self.verify_checksums {
            return Ok(());
        }
        let expected = u32::from_be_bytes(stored);
        let mut crc = Crc::new();
        crc.update(&header.tag);
        crc.update(payload);
        let actual = crc.sum();
        if actual != expected {
            return Err(DecodeError::ChecksumMismatch {
                tag: header.tag_str(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

/// Parse the container: signature, IHDR, and the concatenated IDAT payload.
///
/// Unknown chunks are skipped, IEND stops the walk, and anything after IEND
/// is never read.
///
/// # Errors
/// `BadSignature`, `UnsupportedFormat`/`InvalidDimensions` (from IHDR),
/// `MalformedChunk`, `MissingData`, `ChecksumMismatch`, or `Io`.
pub fn read_container<R: Read>(
    reader: R,
    verify_checksums: bool,
) -> Result<(ImageHeader, Vec<u8>), DecodeError> {
    let mut chunks = ChunkReader::new(reader, verify_checksums)?;
    let mut header: Option<ImageHeader> = None;
    // Accumulates every IDAT body in stream order.
    let mut payload = Vec::new();
    let mut idat_count = 0usize;

    while let Some(chunk) = chunks.next_header()? {
        match &chunk.tag {
            b"IHDR" => {
                if chunk.length != IHDR_LEN {
                    return Err(DecodeError::MalformedChunk {
                        tag: chunk.tag_str(),
                        length: chunk.length,
                    });
                }
                let mut body = Vec::with_capacity(IHDR_LEN as usize);
                chunks.read_payload(&chunk, &mut body)?;
                if header.is_some() {
                    log::warn!("duplicate IHDR chunk, later one wins");
                }
                let parsed = parse_ihdr(&body)?;
                log::debug!(
                    "IHDR {}×{} {} (bpp {})",
                    parsed.width,
                    parsed.height,
                    parsed.color_type.name(),
                    parsed.bytes_per_pixel()
                );
                header = Some(parsed);
            }
            b"IDAT" => {
                chunks.read_payload(&chunk, &mut payload)?;
                idat_count += 1;
            }
            b"IEND" => {
                log::debug!("IEND after {idat_count} IDAT chunk(s)");
                break;
            }
            _ => {
                log::debug!("skipping {} chunk ({} bytes)", chunk.tag_str(), chunk.length);
                chunks.skip_payload(&chunk)?;
            }
        }
    }

    let header = header.ok_or(DecodeError::MissingData { what: "IHDR" })?;
    if payload.is_empty() {
        return Err(DecodeError::MissingData { what: "IDAT" });
    }
    Ok((header, payload))
}

/// Decode and validate the 13-byte IHDR payload.
///
/// # Errors
/// `MalformedChunk` for a wrong length, otherwise see [`ImageHeader::new`].
///
/// # Example
/// ```
/// use pt_source::chunk::parse_ihdr;
/// let body = [0, 0, 0, 2, 0, 0, 0, 3, 8, 6, 0, 0, 0];
/// let h = parse_ihdr(&body).unwrap();
/// assert_eq!((h.width, h.height), (2, 3));
/// ```
pub fn parse_ihdr(body: &[u8]) -> Result<ImageHeader, DecodeError> {
    let &[w0, w1, w2, w3, h0, h1, h2, h3, depth, color, compression, filter, interlace] = body
    else {
        return Err(DecodeError::MalformedChunk {
            tag: "IHDR".to_owned(),
            length: body.len() as u32,
        });
    };
    ImageHeader::new(
        u32::from_be_bytes([w0, w1, w2, w3]),
        u32::from_be_bytes([h0, h1, h2, h3]),
        depth,
        color,
        compression,
        filter,
        interlace,
    )
}

/// Fill `buf` completely, or return `Ok(false)` if the stream was already at EOF.
fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream ended inside a chunk header",
                ));
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

fn truncated(header: &ChunkHeader) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("{} chunk payload cut short", header.tag_str()),
    )
}
