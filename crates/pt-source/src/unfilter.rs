use pt_core::error::DecodeError;
use pt_core::frame::{ImageHeader, PixelBuffer};

/// Filtre de ligne PNG (méthode 0). Un tag hors 0–4 n'a pas de variante.
///
/// # Example
/// ```
/// use pt_source::unfilter::FilterType;
/// assert_eq!(FilterType::try_from(4), Ok(FilterType::Paeth));
/// assert_eq!(FilterType::try_from(5), Err(5));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterType {
    /// Raw bytes.
    None,
    /// Delta from the byte `bpp` to the left.
    Sub,
    /// Delta from the byte above.
    Up,
    /// Delta from the floored mean of left and up.
    Average,
    /// Delta from the Paeth predictor.
    Paeth,
}

impl FilterType {
    /// Every filter, in tag order.
    pub const ALL: [Self; 5] = [Self::None, Self::Sub, Self::Up, Self::Average, Self::Paeth];

    /// Raw tag byte.
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Sub => 1,
            Self::Up => 2,
            Self::Average => 3,
            Self::Paeth => 4,
        }
    }
}

impl TryFrom<u8> for FilterType {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::None),
            1 => Ok(Self::Sub),
            2 => Ok(Self::Up),
            3 => Ok(Self::Average),
            4 => Ok(Self::Paeth),
            other => Err(other),
        }
    }
}

/// Prédicteur de Paeth. Égalités départagées dans l'ordre a, b, c.
///
/// # Example
/// ```
/// use pt_source::unfilter::paeth;
/// assert_eq!(paeth(10, 20, 30), 10);
/// assert_eq!(paeth(20, 10, 30), 10);
/// assert_eq!(paeth(30, 20, 10), 30);
/// ```
#[inline(always)]
#[must_use]
pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let (ia, ib, ic) = (i16::from(a), i16::from(b), i16::from(c));
    let p = ia + ib - ic;
    let pa = (p - ia).abs();
    let pb = (p - ib).abs();
    let pc = (p - ic).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Reconstruct one row in place.
///
/// `prev` is the previous reconstructed row, all zeros for row 0. Neighbours
/// are addressed by byte offset, so each channel looks `bpp` bytes back.
/// All slices must have the same length.
pub fn unfilter_row(filter: FilterType, bpp: usize, filtered: &[u8], prev: &[u8], out: &mut [u8]) {
    debug_assert_eq!(filtered.len(), out.len());
    debug_assert_eq!(prev.len(), out.len());

    match filter {
        FilterType::None => out.copy_from_slice(filtered),
        FilterType::Sub => {
            for x in 0..out.len() {
                let left = if x >= bpp { out[x - bpp] } else { 0 };
                out[x] = filtered[x].wrapping_add(left);
            }
        }
        FilterType::Up => {
            for ((o, &f), &up) in out.iter_mut().zip(filtered).zip(prev) {
                *o = f.wrapping_add(up);
            }
        }
        FilterType::Average => {
            for x in 0..out.len() {
                let left = if x >= bpp { u16::from(out[x - bpp]) } else { 0 };
                let up = u16::from(prev[x]);
                out[x] = filtered[x].wrapping_add(((left + up) / 2) as u8);
            }
        }
        FilterType::Paeth => {
            for x in 0..out.len() {
                let (left, up_left) = if x >= bpp {
                    (out[x - bpp], prev[x - bpp])
                } else {
                    (0, 0)
                };
                out[x] = filtered[x].wrapping_add(paeth(left, prev[x], up_left));
            }
        }
    }
}

/// Apply the forward filter to one raw row. Inverse of [`unfilter_row`].
pub fn filter_row(filter: FilterType, bpp: usize, raw: &[u8], prev: &[u8], out: &mut [u8]) {
    debug_assert_eq!(raw.len(), out.len());
    debug_assert_eq!(prev.len(), out.len());

    for x in 0..out.len() {
        let left = if x >= bpp { raw[x - bpp] } else { 0 };
        let up = prev[x];
        let up_left = if x >= bpp { prev[x - bpp] } else { 0 };
        let predicted = match filter {
            FilterType::None => 0,
            FilterType::Sub => left,
            FilterType::Up => up,
            FilterType::Average => ((u16::from(left) + u16::from(up)) / 2) as u8,
            FilterType::Paeth => paeth(left, up, up_left),
        };
        out[x] = raw[x].wrapping_sub(predicted);
    }
}

/// Filter a whole buffer into the inflated scanline layout, one filter per
/// row (`filters` is cycled if shorter than the image).
///
/// # Example
/// ```
/// use pt_core::frame::{ColorType, PixelBuffer};
/// use pt_source::unfilter::{filter_image, FilterType};
/// let mut buf = PixelBuffer::new(3, 1, ColorType::Grayscale);
/// buf.data.copy_from_slice(&[10, 12, 15]);
/// assert_eq!(filter_image(&buf, &[FilterType::Sub]), vec![1, 10, 2, 3]);
/// ```
#[must_use]
pub fn filter_image(buffer: &PixelBuffer, filters: &[FilterType]) -> Vec<u8> {
    let stride = buffer.stride();
    let bpp = buffer.bytes_per_pixel();
    let mut out = Vec::with_capacity(buffer.data.len() + buffer.height as usize);
    let zero_row = vec![0u8; stride];
    let mut row = vec![0u8; stride];

    for (y, raw) in buffer.data.chunks_exact(stride.max(1)).enumerate() {
        let filter = if filters.is_empty() {
            FilterType::None
        } else {
            filters[y % filters.len()]
        };
        let prev = if y == 0 {
            &zero_row[..]
        } else {
            &buffer.data[(y - 1) * stride..y * stride]
        };
        filter_row(filter, bpp, raw, prev, &mut row);
        out.push(filter.tag());
        out.extend_from_slice(&row);
    }
    out
}

/// Reconstruct the pixel buffer from inflated scanlines.
///
/// The output buffer is the arena: row `y` is written while rows `0..y`
/// are read through a disjoint borrow, so "previous" never aliases
/// "current".
///
/// # Errors
/// `CorruptData` when `inflated` is not `height × (1 + stride)` bytes,
/// `UnsupportedFilter` on the first row whose tag is outside 0–4.
///
/// # Example
/// ```
/// use pt_core::frame::ImageHeader;
/// use pt_source::unfilter::unfilter;
/// let header = ImageHeader::new(3, 2, 8, 0, 0, 0, 0).unwrap();
/// let raw = [0, 1, 2, 3, 2, 1, 1, 1];
/// assert_eq!(unfilter(&raw, &header).unwrap().data, vec![1, 2, 3, 2, 3, 4]);
/// ```
pub fn unfilter(inflated: &[u8], header: &ImageHeader) -> Result<PixelBuffer, DecodeError> {
    let expected = header.inflated_len()?;
    if inflated.len() != expected {
        return Err(DecodeError::CorruptData {
            expected,
            actual: inflated.len(),
        });
    }

    let stride = header.stride();
    let bpp = header.bytes_per_pixel();
    let mut pixels = PixelBuffer::new(header.width, header.height, header.color_type);
    let zero_row = vec![0u8; stride];

    for (y, record) in inflated.chunks_exact(stride + 1).enumerate() {
        let (tag, filtered) = (record[0], &record[1..]);
        let filter =
            FilterType::try_from(tag).map_err(|tag| DecodeError::UnsupportedFilter { row: y, tag })?;

        let (done, rest) = pixels.data.split_at_mut(y * stride);
        let prev = if y == 0 {
            &zero_row[..]
        } else {
            &done[(y - 1) * stride..]
        };
        unfilter_row(filter, bpp, filtered, prev, &mut rest[..stride]);
        log::trace!("row {y}: {filter:?}");
    }

    Ok(pixels)
}
