//! Offline photo header inspection
//!
//! Parses dimensions, format and animation flags out of raw image bytes so
//! profile snapshots can be built without any network access. Header parsing
//! is best-effort: `imagesize` first, the `image` crate as fallback.

use image::ImageFormat;
use std::error::Error;
use std::fmt;
use std::io::Cursor;

/// Basic facts about a photo, extracted from its byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub is_animated: bool,
}

impl PhotoInfo {
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

#[derive(Debug)]
pub enum PhotoParseError {
    Empty,
    UnknownFormat,
    InvalidHeader(String),
}

impl fmt::Display for PhotoParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoParseError::Empty => write!(f, "Empty image data"),
            PhotoParseError::UnknownFormat => write!(f, "Unrecognized image format"),
            PhotoParseError::InvalidHeader(msg) => write!(f, "Invalid image header: {msg}"),
        }
    }
}

impl Error for PhotoParseError {}

/// Extract photo facts from raw image bytes.
pub fn read_photo_info(data: &[u8]) -> Result<PhotoInfo, Box<dyn Error + Send + Sync>> {
    if data.is_empty() {
        return Err(Box::new(PhotoParseError::Empty));
    }

    let format = image::guess_format(data).map_err(|_| PhotoParseError::UnknownFormat)?;
    let (width, height) = dimensions(data)?;
    let is_animated = match format {
        ImageFormat::Gif => has_multiple_gif_frames(data),
        ImageFormat::WebP => has_webp_animation_flag(data),
        ImageFormat::Png => has_actl_chunk(data),
        _ => false,
    };

    Ok(PhotoInfo {
        width,
        height,
        format,
        is_animated,
    })
}

fn dimensions(data: &[u8]) -> Result<(u32, u32), Box<dyn Error + Send + Sync>> {
    // imagesize only needs the header bytes and is the fast path
    if let Ok(size) = imagesize::blob_size(data) {
        return Ok((size.width as u32, size.height as u32));
    }

    // Last resort: let the image crate sniff and decode the header
    let reader = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| PhotoParseError::InvalidHeader(e.to_string()))?;
    reader
        .into_dimensions()
        .map_err(|e| PhotoParseError::InvalidHeader(e.to_string()).into())
}

/// Look for a second Image Separator in the GIF stream.
fn has_multiple_gif_frames(data: &[u8]) -> bool {
    let mut frame_count = 0;
    for i in 0..data.len().saturating_sub(1) {
        if data[i] == 0x00 && data[i + 1] == 0x2C {
            frame_count += 1;
            if frame_count > 1 {
                return true;
            }
        }
    }
    false
}

/// Check the VP8X chunk's animation bit.
fn has_webp_animation_flag(data: &[u8]) -> bool {
    data.len() > 30 && &data[12..16] == b"VP8X" && (data[20] & 0x02) != 0
}

/// Look for an acTL chunk before IDAT (APNG).
fn has_actl_chunk(data: &[u8]) -> bool {
    if data.len() < 8 {
        return false;
    }

    let mut pos = 8; // Skip PNG signature
    while pos + 8 < data.len() {
        let chunk_len =
            u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]) as usize;
        let chunk_type = &data[pos + 4..pos + 8];

        if chunk_type == b"acTL" {
            return true;
        }

        pos += 12 + chunk_len;

        if chunk_type == b"IDAT" || chunk_type == b"IEND" {
            break;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal PNG: signature + IHDR with the given dimensions.
    fn png_header(width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(&13u32.to_be_bytes()); // IHDR length
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[8, 6, 0, 0, 0]); // bit depth, color type, etc.
        data.extend_from_slice(&[0, 0, 0, 0]); // CRC (unchecked by header parsers)
        data
    }

    /// Minimal GIF89a logical screen descriptor.
    fn gif_header(width: u16, height: u16) -> Vec<u8> {
        let mut data = b"GIF89a".to_vec();
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&[0x00, 0x00, 0x00]);
        data
    }

    #[test]
    fn test_png_dimensions() {
        let info = read_photo_info(&png_header(640, 480)).unwrap();
        assert_eq!(info.width, 640);
        assert_eq!(info.height, 480);
        assert_eq!(info.format, ImageFormat::Png);
        assert!(!info.is_animated);
    }

    #[test]
    fn test_pixel_count() {
        let info = read_photo_info(&png_header(4000, 3000)).unwrap();
        assert_eq!(info.pixel_count(), 12_000_000);
    }

    #[test]
    fn test_animated_gif_detected() {
        let mut data = gif_header(2, 2);
        // Two image separators mark a multi-frame GIF
        data.extend_from_slice(&[0x00, 0x2C, 0x01, 0x00, 0x2C]);
        let info = read_photo_info(&data).unwrap();
        assert_eq!(info.format, ImageFormat::Gif);
        assert!(info.is_animated);
    }

    #[test]
    fn test_single_frame_gif_not_animated() {
        let mut data = gif_header(2, 2);
        data.extend_from_slice(&[0x00, 0x2C]);
        let info = read_photo_info(&data).unwrap();
        assert!(!info.is_animated);
    }

    #[test]
    fn test_empty_data_rejected() {
        assert!(read_photo_info(&[]).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(read_photo_info(b"not an image at all").is_err());
    }
}
