//! Minimal PNG encoder for figure output.
//!
//! Writes 8-bit RGBA with filter type 0 on every scanline, which keeps
//! the encoder small and fast. Figures are modest in size, so encode
//! speed matters more than ratio.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{RenderError, Result};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Encodes an RGBA pixel buffer as a PNG image.
pub fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(RenderError::invalid_dimensions(format!(
            "cannot encode a {}x{} image",
            width, height
        )));
    }
    if pixels.len() != width * height * 4 {
        return Err(RenderError::invalid_dimensions(format!(
            "expected {} bytes for {}x{} RGBA, got {}",
            width * height * 4,
            width,
            height,
            pixels.len()
        )));
    }

    let mut png = Vec::with_capacity(pixels.len() / 4 + 64);
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(6); // color type: RGBA
    ihdr.push(0); // compression
    ihdr.push(0); // filter method
    ihdr.push(0); // interlace
    write_chunk(&mut png, b"IHDR", &ihdr);

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::fast());
    let stride = width * 4;
    for row in pixels.chunks_exact(stride) {
        // Filter type 0 (none) per scanline.
        write_scanline(&mut encoder, row)
            .map_err(|e| RenderError::encode(format!("deflate write failed: {}", e)))?;
    }
    let idat = encoder
        .finish()
        .map_err(|e| RenderError::encode(format!("deflate finish failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn write_scanline(encoder: &mut ZlibEncoder<Vec<u8>>, row: &[u8]) -> std::io::Result<()> {
    encoder.write_all(&[0])?;
    encoder.write_all(row)
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);
    let mut crc_data = Vec::with_capacity(4 + data.len());
    crc_data.extend_from_slice(chunk_type);
    crc_data.extend_from_slice(data);
    png.extend_from_slice(&crc32fast::hash(&crc_data).to_be_bytes());
}
