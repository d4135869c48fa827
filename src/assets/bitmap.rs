//! 8-bit indexed bitmap reader.
//!
//! The tile encoder needs the original palette indices of the artwork, not
//! composited RGB, so this is a small purpose-built BMP reader rather than a
//! general image decoder: it accepts uncompressed 8-bit-per-pixel BMP files
//! only and hands back row-major top-down indices plus the RGB palette.

use anyhow::Context;

use crate::foundation::error::{GraphyteError, GraphyteResult};

/// Decoded 8-bit indexed bitmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedBitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB palette, up to 256 entries.
    pub palette: Vec<(u8, u8, u8)>,
    /// Row-major top-down palette indices, `width * height` bytes.
    pub pixels: Vec<u8>,
}

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_MIN_LEN: usize = 40;

/// Decode an uncompressed 8-bit indexed BMP from memory.
///
/// Rejects other bit depths, compressed data, and truncated headers or
/// pixel data with a codec error.
pub fn decode_indexed_bmp(bytes: &[u8]) -> GraphyteResult<IndexedBitmap> {
    if bytes.len() < FILE_HEADER_LEN + INFO_HEADER_MIN_LEN {
        return Err(GraphyteError::codec("bitmap header truncated"));
    }
    if &bytes[0..2] != b"BM" {
        return Err(GraphyteError::codec("not a BMP file (bad magic)"));
    }

    let pixel_offset = u32_le(bytes, 10)? as usize;
    let header_len = u32_le(bytes, 14)? as usize;
    if header_len < INFO_HEADER_MIN_LEN {
        return Err(GraphyteError::codec("unsupported BMP header"));
    }

    let width_raw = u32_le(bytes, 18)? as i32;
    let height_raw = u32_le(bytes, 22)? as i32;
    let bits_per_pixel = u16_le(bytes, 28)?;
    let compression = u32_le(bytes, 30)?;
    let colors_used = u32_le(bytes, 46)? as usize;

    if bits_per_pixel != 8 {
        return Err(GraphyteError::codec(format!(
            "only 8-bit indexed bitmaps are supported (got {bits_per_pixel} bpp)"
        )));
    }
    if compression != 0 {
        return Err(GraphyteError::codec("compressed bitmaps are not supported"));
    }
    if width_raw <= 0 || height_raw == 0 {
        return Err(GraphyteError::codec("bitmap has invalid dimensions"));
    }

    let width = width_raw as usize;
    // Positive height means bottom-up row order.
    let bottom_up = height_raw > 0;
    let height = height_raw.unsigned_abs() as usize;

    let palette_len = if colors_used == 0 { 256 } else { colors_used.min(256) };
    let palette_at = FILE_HEADER_LEN + header_len;
    let mut palette = Vec::with_capacity(palette_len);
    for i in 0..palette_len {
        // BMP palette entries are stored B, G, R, reserved.
        let at = palette_at + 4 * i;
        let entry = bytes
            .get(at..at + 4)
            .ok_or_else(|| GraphyteError::codec("bitmap palette truncated"))?;
        palette.push((entry[2], entry[1], entry[0]));
    }

    // Rows are padded to a 4-byte boundary. The file must actually contain
    // the claimed extent before the pixel buffer is sized from it.
    let stride = (width + 3) & !3;
    let claimed_end = stride
        .checked_mul(height - 1)
        .and_then(|v| v.checked_add(pixel_offset))
        .and_then(|v| v.checked_add(width))
        .ok_or_else(|| GraphyteError::codec("bitmap pixel data truncated"))?;
    if claimed_end > bytes.len() {
        return Err(GraphyteError::codec("bitmap pixel data truncated"));
    }
    let mut pixels = vec![0u8; width * height];
    for y in 0..height {
        let src_row = if bottom_up { height - 1 - y } else { y };
        let at = pixel_offset + src_row * stride;
        let row = bytes
            .get(at..at + width)
            .ok_or_else(|| GraphyteError::codec("bitmap pixel data truncated"))?;
        pixels[y * width..(y + 1) * width].copy_from_slice(row);
    }

    Ok(IndexedBitmap {
        width: width as u32,
        height: height as u32,
        palette,
        pixels,
    })
}

/// Read and decode an uncompressed 8-bit indexed BMP file.
pub fn read_indexed_bmp(path: &std::path::Path) -> GraphyteResult<IndexedBitmap> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read bitmap file {}", path.display()))?;
    decode_indexed_bmp(&bytes)
}

fn u16_le(bytes: &[u8], at: usize) -> GraphyteResult<u16> {
    bytes
        .get(at..at + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or_else(|| GraphyteError::codec("bitmap header truncated"))
}

fn u32_le(bytes: &[u8], at: usize) -> GraphyteResult<u32> {
    bytes
        .get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| GraphyteError::codec("bitmap header truncated"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/bitmap.rs"]
mod tests;
