use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use pt_core::DecodeError;
use pt_core::frame::{ColorType, PixelBuffer};
use pt_source::chunk::PNG_SIGNATURE;
use pt_source::unfilter::{FilterType, filter_image};
use pt_source::{DecodeOptions, decode_file, decode_reader};

fn chunk(out: &mut Vec<u8>, tag: &[u8; 4], body: &[u8]) {
    let mut crc = Crc::new();
    crc.update(tag);
    crc.update(body);
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(body);
    out.extend_from_slice(&crc.sum().to_be_bytes());
}

/// Minimal PNG: IHDR, the compressed scanlines split into `idat_parts`
/// IDAT chunks, IEND.
fn make_png(width: u32, height: u32, color_type: u8, scanlines: &[u8], idat_parts: usize) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(scanlines).unwrap();
    let compressed = enc.finish().unwrap();

    let mut ihdr = width.to_be_bytes().to_vec();
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[8, color_type, 0, 0, 0]);

    let mut out = PNG_SIGNATURE.to_vec();
    chunk(&mut out, b"IHDR", &ihdr);
    chunk(&mut out, b"gAMA", &45455u32.to_be_bytes());
    let part = compressed.len().div_ceil(idat_parts.max(1)).max(1);
    for piece in compressed.chunks(part) {
        chunk(&mut out, b"IDAT", piece);
    }
    chunk(&mut out, b"IEND", &[]);
    out
}

fn encode_with_image_crate(buf: &PixelBuffer) -> Vec<u8> {
    let color = match buf.color_type {
        ColorType::Grayscale => ExtendedColorType::L8,
        ColorType::GrayAlpha => ExtendedColorType::La8,
        ColorType::Rgb => ExtendedColorType::Rgb8,
        ColorType::Rgba => ExtendedColorType::Rgba8,
    };
    let mut out = Vec::new();
    PngEncoder::new_with_quality(&mut out, CompressionType::Best, PngFilter::Adaptive)
        .write_image(&buf.data, buf.width, buf.height, color)
        .unwrap();
    out
}

fn gradient(width: u32, height: u32, ct: ColorType) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height, ct);
    let bpp = ct.bytes_per_pixel();
    for y in 0..height as usize {
        for x in 0..width as usize {
            for c in 0..bpp {
                let i = (y * width as usize + x) * bpp + c;
                buf.data[i] = ((x * 31 + y * 17 + c * 89) ^ (x * y)) as u8;
            }
        }
    }
    buf
}

#[test]
fn two_by_two_grayscale_decodes_exactly() {
    let png = make_png(2, 2, 0, &[0, 0, 255, 0, 128, 64], 1);
    let image = decode_reader(&png[..], DecodeOptions::default()).unwrap();
    assert_eq!(image.header.width, 2);
    assert_eq!(image.header.height, 2);
    assert_eq!(image.header.color_type, ColorType::Grayscale);
    assert_eq!(image.pixels.data, vec![0, 255, 128, 64]);
}

#[test]
fn idat_split_across_chunks_matches_single_chunk() {
    let src = gradient(9, 5, ColorType::Rgb);
    let scanlines = filter_image(&src, &FilterType::ALL);
    let single = make_png(9, 5, 2, &scanlines, 1);
    let split = make_png(9, 5, 2, &scanlines, 7);

    let a = decode_reader(&single[..], DecodeOptions::default()).unwrap();
    let b = decode_reader(&split[..], DecodeOptions { verify_checksums: true }).unwrap();
    assert_eq!(a.pixels, src);
    assert_eq!(b.pixels, src);
}

#[test]
fn image_crate_output_decodes_for_every_color_type() {
    for ct in [
        ColorType::Grayscale,
        ColorType::GrayAlpha,
        ColorType::Rgb,
        ColorType::Rgba,
    ] {
        let src = gradient(37, 23, ct);
        let png = encode_with_image_crate(&src);
        let image = decode_reader(&png[..], DecodeOptions { verify_checksums: true })
            .unwrap_or_else(|e| panic!("{ct:?}: {e}"));
        assert_eq!(image.header.color_type, ct);
        assert_eq!(image.pixels, src, "{ct:?} pixels differ");
    }
}

#[test]
fn bad_filter_tag_fails_whole_decode() {
    let png = make_png(2, 2, 0, &[0, 1, 2, 9, 3, 4], 1);
    let err = decode_reader(&png[..], DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, DecodeError::UnsupportedFilter { row: 1, tag: 9 }));
}

#[test]
fn scanline_count_mismatch_is_corrupt() {
    // Header says 2 rows, stream holds 1.
    let png = make_png(2, 2, 0, &[0, 1, 2], 1);
    let err = decode_reader(&png[..], DecodeOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::CorruptData {
            expected: 6,
            actual: 3
        }
    ));
}

#[test]
fn decode_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.png");
    std::fs::write(&path, make_png(2, 2, 0, &[0, 0, 255, 0, 128, 64], 2)).unwrap();

    let image = decode_file(&path, DecodeOptions::default()).unwrap();
    assert_eq!(image.pixels.data, vec![0, 255, 128, 64]);

    let missing = decode_file(&dir.path().join("nope.png"), DecodeOptions::default());
    match missing {
        Err(DecodeError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected Io(NotFound), got {other:?}"),
    }
}
