//! PNG encoding for 8-bit grayscale+alpha image data.
//!
//! Images are written as a single IDAT chunk with filter type 0 on every
//! scanline. Only the two-channel (color type 4) layout is produced.

use std::io::Write;

use crate::error::{RenderError, Result};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// PNG color type 4: grayscale with alpha
const COLOR_TYPE_GRAY_ALPHA: u8 = 4;

/// Create a PNG image from interleaved luminance/alpha pixel data.
///
/// # Arguments
/// - `pixels`: LA pixel data (2 bytes per pixel)
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
/// - `level`: zlib compression level for IDAT
pub fn create_png_gray_alpha(
    pixels: &[u8],
    width: usize,
    height: usize,
    level: flate2::Compression,
) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(RenderError::Png(format!("empty image {}x{}", width, height)));
    }
    if pixels.len() != width * height * 2 {
        return Err(RenderError::Png(format!(
            "{} bytes for a {}x{} gray+alpha image",
            pixels.len(),
            width,
            height
        )));
    }

    let mut png = Vec::new();

    // PNG signature
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(COLOR_TYPE_GRAY_ALPHA);
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // IDAT chunk (image data)
    let idat_data = deflate_idat(pixels, width * 2, height, level)
        .map_err(|e| RenderError::Png(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    // IEND chunk
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    // CRC covers the chunk type and data
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate scanlines of `stride` bytes for the IDAT chunk.
fn deflate_idat(
    pixels: &[u8],
    stride: usize,
    height: usize,
    level: flate2::Compression,
) -> std::io::Result<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for row in pixels.chunks_exact(stride) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), level);
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_and_header() {
        let pixels = [0, 0, 0, 128, 0, 255, 0, 64];
        let png = create_png_gray_alpha(&pixels, 2, 2, flate2::Compression::fast()).unwrap();

        assert_eq!(&png[0..8], &PNG_SIGNATURE);
        assert_eq!(&png[12..16], b"IHDR");
        assert_eq!(&png[16..20], &2u32.to_be_bytes());
        assert_eq!(&png[20..24], &2u32.to_be_bytes());
        assert_eq!(png[24], 8);
        assert_eq!(png[25], COLOR_TYPE_GRAY_ALPHA);
        assert_eq!(&png[png.len() - 8..png.len() - 4], b"IEND");
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(create_png_gray_alpha(&[0, 0, 0], 1, 1, flate2::Compression::fast()).is_err());
        assert!(create_png_gray_alpha(&[], 0, 0, flate2::Compression::fast()).is_err());
    }

    #[test]
    fn test_chunk_crc() {
        let mut png = Vec::new();
        write_chunk(&mut png, b"IEND", &[]);
        // Well-known CRC of an empty IEND chunk
        assert_eq!(&png[8..12], &[0xAE, 0x42, 0x60, 0x82]);
    }
}
