// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Clipboard image access for pasted maps.

use super::media::MapSource;

/// Name shown for maps pasted from the clipboard.
pub const PASTED_NAME: &str = "pasted image";

/// Read an image from the system clipboard.
///
/// Returns `Ok(None)` when the clipboard holds something other than an image.
pub fn read_image() -> Result<Option<MapSource>, arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    match clipboard.get_image() {
        Ok(image) => Ok(Some(pixels_source(image.width, image.height, &image.bytes))),
        Err(arboard::Error::ContentNotAvailable) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Wrap RGBA8 clipboard pixels as a map source.
fn pixels_source(width: usize, height: usize, rgba: &[u8]) -> MapSource {
    // Oversized dimensions fail the length check in `media::decode`.
    MapSource::Pixels {
        name: PASTED_NAME.to_string(),
        width: u32::try_from(width).unwrap_or(u32::MAX),
        height: u32::try_from(height).unwrap_or(u32::MAX),
        rgba: rgba.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::media::{load_map, CropRect};

    #[test]
    fn test_clipboard_pixels_load_as_map() {
        let rgba = vec![128u8; 30 * 50 * 4];
        let source = pixels_source(30, 50, &rgba);
        assert_eq!(source.name(), PASTED_NAME);

        let map = load_map(&source).unwrap();
        assert_eq!((map.source_width, map.source_height), (30, 50));
        assert_eq!(map.crop, CropRect { x: 0, y: 10, side: 30 });
    }

    #[test]
    fn test_truncated_clipboard_pixels_are_unsupported() {
        let source = pixels_source(30, 50, &[0u8; 16]);
        assert!(load_map(&source).unwrap_err().is_unsupported());
    }
}
