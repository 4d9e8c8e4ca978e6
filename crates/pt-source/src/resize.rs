use pt_core::frame::PixelBuffer;

/// Dimensions cibles pour un budget de colonnes donné.
///
/// Never upscales horizontally. The height keeps the aspect ratio, is at
/// least 1, and is bumped to the next even number because every text line
/// packs two pixel rows. Exact halves round up rather than truncating, so
/// `fit_dimensions(4, 5, 2)` scales 5 to 2.5 → 3 → 4, not 2. A height that
/// lands on `u32::MAX` (odd) is stepped down to `u32::MAX - 1` instead.
///
/// # Example
/// ```
/// use pt_source::resize::fit_dimensions;
/// assert_eq!(fit_dimensions(200, 100, 80), (80, 40));
/// assert_eq!(fit_dimensions(10, 5, 80), (10, 6));
/// assert_eq!(fit_dimensions(1000, 1, 50), (50, 2));
/// ```
#[must_use]
pub fn fit_dimensions(width: u32, height: u32, columns: u32) -> (u32, u32) {
    let target_w = width.min(columns.max(1));
    // round(height × target_w / width) in integers; target_w <= width keeps
    // the quotient within u32.
    let (w, h, tw) = (u128::from(width.max(1)), u128::from(height), u128::from(target_w));
    let rounded = ((2 * h * tw + w) / (2 * w)).max(1);
    let mut target_h = u32::try_from(rounded).unwrap_or(u32::MAX);
    if target_h % 2 == 1 {
        target_h = target_h.checked_add(1).unwrap_or(target_h - 1);
    }
    (target_w, target_h)
}

/// Nearest-neighbour resample to `width × height`.
///
/// Destination (x2, y2) copies source (x2·W/width, y2·H/height), floored.
/// The source is consumed; when the dimensions already match it is returned
/// as is.
///
/// # Example
/// ```
/// use pt_core::frame::{ColorType, PixelBuffer};
/// use pt_source::resize::resize_nearest;
/// let mut src = PixelBuffer::new(4, 2, ColorType::Grayscale);
/// src.data.copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
/// let dst = resize_nearest(src, 2, 2);
/// assert_eq!(dst.data, vec![1, 3, 5, 7]);
/// ```
#[must_use]
pub fn resize_nearest(src: PixelBuffer, width: u32, height: u32) -> PixelBuffer {
    if src.width == width && src.height == height {
        return src;
    }

    let bpp = src.bytes_per_pixel();
    let src_stride = src.stride();
    let mut dst = PixelBuffer::new(width, height, src.color_type);
    let dst_stride = dst.stride();

    // Source byte offset of each destination column.
    let columns: Vec<usize> = (0..width)
        .map(|x2| (u64::from(x2) * u64::from(src.width) / u64::from(width)) as usize * bpp)
        .collect();

    for y2 in 0..height {
        let y = (u64::from(y2) * u64::from(src.height) / u64::from(height)) as usize;
        let src_row = &src.data[y * src_stride..(y + 1) * src_stride];
        let dst_row = &mut dst.data[y2 as usize * dst_stride..(y2 as usize + 1) * dst_stride];
        for (px, &sx) in dst_row.chunks_exact_mut(bpp).zip(&columns) {
            px.copy_from_slice(&src_row[sx..sx + bpp]);
        }
    }

    dst
}

/// Fit a decoded image into `columns` terminal columns.
///
/// Convenience for [`fit_dimensions`] followed by [`resize_nearest`].
#[must_use]
pub fn fit_to_columns(src: PixelBuffer, columns: u32) -> PixelBuffer {
    let (w, h) = fit_dimensions(src.width, src.height, columns);
    if (w, h) == (src.width, src.height) {
        log::debug!("{w}×{h} fits in {columns} columns, no resample");
    } else {
        log::debug!("resample {}×{} → {w}×{h}", src.width, src.height);
    }
    resize_nearest(src, w, h)
}

#[cfg(test)]
mod tests {
    use pt_core::frame::ColorType;

    use super::*;

    fn ramp(width: u32, height: u32, ct: ColorType) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height, ct);
        for (i, b) in buf.data.iter_mut().enumerate() {
            *b = (i * 7 % 251) as u8;
        }
        buf
    }

    #[test]
    fn identity_resize_is_bit_exact() {
        let src = ramp(5, 4, ColorType::Rgba);
        let copy = src.clone();
        let ptr = src.data.as_ptr();
        let out = resize_nearest(src, 5, 4);
        assert_eq!(out, copy);
        // Same allocation: passed through, not copied.
        assert_eq!(out.data.as_ptr(), ptr);
    }

    #[test]
    fn never_upscales_width() {
        assert_eq!(fit_dimensions(3, 4, 500), (3, 4));
        assert_eq!(fit_dimensions(3, 3, 500), (3, 4));
    }

    #[test]
    fn height_rounds_half_up_then_evens() {
        // 3 × 1/2 = 1.5 → 2.
        assert_eq!(fit_dimensions(2, 3, 1), (1, 2));
        // 5 × 2/4 = 2.5 → 3 → 4.
        assert_eq!(fit_dimensions(4, 5, 2), (2, 4));
        // 7 × 10/100 = 0.7 → 1 → 2.
        assert_eq!(fit_dimensions(100, 7, 10), (10, 2));
    }

    #[test]
    fn extreme_dimensions_do_not_overflow() {
        assert_eq!(fit_dimensions(1, u32::MAX, 80), (1, u32::MAX - 1));
        assert_eq!(
            fit_dimensions(u32::MAX, u32::MAX, u32::MAX),
            (u32::MAX, u32::MAX - 1)
        );
        // Half of u32::MAX rounds up to 2^31, already even.
        assert_eq!(fit_dimensions(2, u32::MAX, 1), (1, 1 << 31));
        assert_eq!(fit_dimensions(u32::MAX, 1, 80), (80, 2));
    }

    #[test]
    fn zero_column_budget_is_one_column() {
        assert_eq!(fit_dimensions(8, 8, 0), (1, 2));
    }

    #[test]
    fn odd_height_duplicates_a_source_row() {
        let src = ramp(2, 3, ColorType::Grayscale);
        let out = fit_to_columns(src.clone(), 80);
        assert_eq!((out.width, out.height), (2, 4));
        // y2 → floor(y2 × 3 / 4): 0, 0, 1, 2
        assert_eq!(&out.data[0..2], &src.data[0..2]);
        assert_eq!(&out.data[2..4], &src.data[0..2]);
        assert_eq!(&out.data[4..6], &src.data[2..4]);
        assert_eq!(&out.data[6..8], &src.data[4..6]);
    }

    #[test]
    fn multi_channel_pixels_move_together() {
        let src = ramp(4, 4, ColorType::Rgb);
        let out = resize_nearest(src.clone(), 2, 2);
        assert_eq!(out.pixel(0, 0), src.pixel(0, 0));
        assert_eq!(out.pixel(1, 0), src.pixel(2, 0));
        assert_eq!(out.pixel(0, 1), src.pixel(0, 2));
        assert_eq!(out.pixel(1, 1), src.pixel(2, 2));
    }
}
