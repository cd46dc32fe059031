// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Map image loading and the square fit transform.
//!
//! A source image of any aspect ratio is center-cropped to a square and
//! scaled to exactly [`TARGET_SIZE`] on each side. The resulting surface
//! defines the pixel space every marker is placed in.

use image::{imageops::FilterType, DynamicImage, ImageFormat, RgbaImage};
use std::path::PathBuf;
use std::sync::Arc;

/// Side length of the square display surface, in pixels.
pub const TARGET_SIZE: u32 = 800;

/// File extensions offered by the open dialog.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp", "tiff", "tif"];

// ── Error type ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum LoadError {
    /// The input is not recognisable image data.
    Unsupported { name: String },
    /// The input looked like an image but could not be decoded.
    Decode { name: String, source: image::ImageError },
    /// The file could not be read.
    Io { name: String, source: std::io::Error },
    /// Decoded fine but has no pixels to crop.
    EmptyImage { width: u32, height: u32 },
}

impl LoadError {
    /// Whether the user picked something that is not an image at all.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, LoadError::Unsupported { .. })
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported { name } => write!(f, "{} is not a supported image file", name),
            Self::Decode { name, source } => write!(f, "failed to decode {}: {}", name, source),
            Self::Io { name, source } => write!(f, "failed to read {}: {}", name, source),
            Self::EmptyImage { width, height } => {
                write!(f, "image has no pixels to display ({}x{})", width, height)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ── Sources ──────────────────────────────────────────────────────────────

/// Where a map image comes from.
#[derive(Debug, Clone)]
pub enum MapSource {
    /// A file picked from disk or dropped with a known path.
    Path(PathBuf),
    /// Raw encoded bytes, e.g. a dropped file without a path.
    Bytes { name: String, bytes: Arc<[u8]> },
    /// Already decoded RGBA8 pixels, e.g. an image pasted from the clipboard.
    Pixels {
        name: String,
        width: u32,
        height: u32,
        rgba: Arc<[u8]>,
    },
}

impl MapSource {
    /// Display name used in logs and notifications.
    pub fn name(&self) -> String {
        match self {
            MapSource::Path(path) => path.display().to_string(),
            MapSource::Bytes { name, .. } | MapSource::Pixels { name, .. } => name.clone(),
        }
    }
}

// ── Fit transform ────────────────────────────────────────────────────────

/// Region of the source image that ends up on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

/// Largest centered square inside a `width` x `height` image.
pub fn centered_square_crop(width: u32, height: u32) -> CropRect {
    if width > height {
        CropRect {
            x: (width - height) / 2,
            y: 0,
            side: height,
        }
    } else if width < height {
        CropRect {
            x: 0,
            y: (height - width) / 2,
            side: width,
        }
    } else {
        CropRect { x: 0, y: 0, side: width }
    }
}

/// Crop `source` to its centered square and scale it to the display surface.
pub fn fit(source: &DynamicImage) -> Result<(RgbaImage, CropRect), LoadError> {
    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 {
        return Err(LoadError::EmptyImage { width, height });
    }

    let crop = centered_square_crop(width, height);
    let surface = source
        .crop_imm(crop.x, crop.y, crop.side, crop.side)
        .resize_exact(TARGET_SIZE, TARGET_SIZE, FilterType::Triangle)
        .to_rgba8();

    Ok((surface, crop))
}

/// Result of loading and fitting a map image.
#[derive(Debug)]
pub struct FittedMap {
    pub name: String,
    pub source_width: u32,
    pub source_height: u32,
    pub crop: CropRect,
    /// RGBA pixels of the `TARGET_SIZE` x `TARGET_SIZE` surface.
    pub surface: RgbaImage,
}

/// Decode an image from `source`, rejecting anything that is not image data.
pub fn decode(source: &MapSource) -> Result<DynamicImage, LoadError> {
    let name = source.name();
    match source {
        MapSource::Path(path) => {
            let bytes = std::fs::read(path).map_err(|e| LoadError::Io {
                name: name.clone(),
                source: e,
            })?;
            // File contents first; the extension only decides when the
            // signature is not recognised.
            let format = image::guess_format(&bytes)
                .or_else(|_| ImageFormat::from_path(path))
                .map_err(|_| LoadError::Unsupported { name: name.clone() })?;
            image::load_from_memory_with_format(&bytes, format)
                .map_err(|e| LoadError::Decode { name, source: e })
        }
        MapSource::Bytes { bytes, .. } => {
            let format = image::guess_format(bytes)
                .map_err(|_| LoadError::Unsupported { name: name.clone() })?;
            image::load_from_memory_with_format(bytes, format)
                .map_err(|e| LoadError::Decode { name, source: e })
        }
        MapSource::Pixels {
            width, height, rgba, ..
        } => {
            if *width == 0 || *height == 0 {
                return Err(LoadError::EmptyImage {
                    width: *width,
                    height: *height,
                });
            }
            RgbaImage::from_raw(*width, *height, rgba.to_vec())
                .map(DynamicImage::ImageRgba8)
                .ok_or(LoadError::Unsupported { name })
        }
    }
}

/// Decode and fit a map image. Runs off the UI thread.
pub fn load_map(source: &MapSource) -> Result<FittedMap, LoadError> {
    let image = decode(source)?;
    let (surface, crop) = fit(&image)?;

    Ok(FittedMap {
        name: source.name(),
        source_width: image.width(),
        source_height: image.height(),
        crop,
        surface,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255])))
    }

    fn encode_png(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_crop_landscape() {
        assert_eq!(
            centered_square_crop(1600, 1000),
            CropRect { x: 300, y: 0, side: 1000 }
        );
    }

    #[test]
    fn test_crop_portrait() {
        assert_eq!(
            centered_square_crop(600, 1000),
            CropRect { x: 0, y: 200, side: 600 }
        );
    }

    #[test]
    fn test_crop_square_and_odd_difference() {
        assert_eq!(centered_square_crop(512, 512), CropRect { x: 0, y: 0, side: 512 });
        assert_eq!(centered_square_crop(101, 100), CropRect { x: 0, y: 0, side: 100 });
        assert_eq!(centered_square_crop(103, 100), CropRect { x: 1, y: 0, side: 100 });
    }

    #[test]
    fn test_fit_always_produces_target_size() {
        for (w, h) in [(1600, 1000), (1000, 1600), (800, 800), (37, 5), (1, 1), (3000, 3000)] {
            let (surface, _) = fit(&solid(w, h)).unwrap();
            assert_eq!(surface.dimensions(), (TARGET_SIZE, TARGET_SIZE), "{}x{}", w, h);
        }
    }

    #[test]
    fn test_fit_keeps_centered_region() {
        // Left and right thirds red, middle third green: the centered square
        // crop of a 300x100 image is exactly the green band.
        let mut img = RgbaImage::from_pixel(300, 100, Rgba([255, 0, 0, 255]));
        for y in 0..100 {
            for x in 100..200 {
                img.put_pixel(x, y, Rgba([0, 255, 0, 255]));
            }
        }
        let (surface, crop) = fit(&DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(crop, CropRect { x: 100, y: 0, side: 100 });
        assert_eq!(surface.get_pixel(400, 400), &Rgba([0, 255, 0, 255]));
        assert_eq!(surface.get_pixel(5, 400)[0], 0);
        assert_eq!(surface.get_pixel(794, 400)[0], 0);
    }

    #[test]
    fn test_fit_rejects_empty_image() {
        let err = fit(&solid(0, 10)).unwrap_err();
        assert!(matches!(err, LoadError::EmptyImage { width: 0, height: 10 }));
    }

    #[test]
    fn test_load_map_from_bytes() {
        let bytes = encode_png(&solid(1600, 1000));
        let source = MapSource::Bytes {
            name: "dropped.png".to_string(),
            bytes: bytes.into(),
        };
        let map = load_map(&source).unwrap();
        assert_eq!((map.source_width, map.source_height), (1600, 1000));
        assert_eq!(map.crop, CropRect { x: 300, y: 0, side: 1000 });
        assert_eq!(map.surface.dimensions(), (TARGET_SIZE, TARGET_SIZE));
        assert_eq!(map.name, "dropped.png");
    }

    #[test]
    fn test_non_image_bytes_are_unsupported() {
        let source = MapSource::Bytes {
            name: "notes.txt".to_string(),
            bytes: b"just some text".to_vec().into(),
        };
        let err = load_map(&source).unwrap_err();
        assert!(err.is_unsupported());
        assert!(err.to_string().contains("notes.txt"));
    }

    #[test]
    fn test_non_image_extension_is_unsupported() {
        let path = std::env::temp_dir().join("rangefinder_media_test.txt");
        std::fs::write(&path, "hello").unwrap();
        let err = load_map(&MapSource::Path(path.clone())).unwrap_err();
        assert!(err.is_unsupported());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_png_without_extension_loads() {
        let path = std::env::temp_dir().join("rangefinder_media_test_no_extension");
        std::fs::write(&path, encode_png(&solid(40, 20))).unwrap();
        let map = load_map(&MapSource::Path(path.clone())).unwrap();
        assert_eq!((map.source_width, map.source_height), (40, 20));
        assert_eq!(map.surface.dimensions(), (TARGET_SIZE, TARGET_SIZE));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_png_with_wrong_extension_loads() {
        let path = std::env::temp_dir().join("rangefinder_media_test_misnamed.txt");
        std::fs::write(&path, encode_png(&solid(10, 10))).unwrap();
        assert!(load_map(&MapSource::Path(path.clone())).is_ok());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_map_from_pixels() {
        let image = RgbaImage::from_pixel(1000, 600, Rgba([1, 2, 3, 255]));
        let source = MapSource::Pixels {
            name: "clipboard image".to_string(),
            width: 1000,
            height: 600,
            rgba: image.into_raw().into(),
        };
        let map = load_map(&source).unwrap();
        assert_eq!((map.source_width, map.source_height), (1000, 600));
        assert_eq!(map.crop, CropRect { x: 200, y: 0, side: 600 });
        assert_eq!(map.surface.get_pixel(400, 400), &Rgba([1, 2, 3, 255]));
        assert_eq!(map.name, "clipboard image");
    }

    #[test]
    fn test_pixels_with_wrong_length_are_unsupported() {
        let source = MapSource::Pixels {
            name: "clipboard image".to_string(),
            width: 10,
            height: 10,
            rgba: vec![0u8; 12].into(),
        };
        assert!(load_map(&source).unwrap_err().is_unsupported());

        let empty = MapSource::Pixels {
            name: "clipboard image".to_string(),
            width: 0,
            height: 5,
            rgba: Vec::<u8>::new().into(),
        };
        assert!(matches!(
            load_map(&empty).unwrap_err(),
            LoadError::EmptyImage { width: 0, height: 5 }
        ));
    }

    #[test]
    fn test_corrupt_image_is_decode_error() {
        let path = std::env::temp_dir().join("rangefinder_media_test_corrupt.png");
        let mut bytes = encode_png(&solid(4, 4));
        bytes.truncate(bytes.len() / 2);
        std::fs::write(&path, &bytes).unwrap();
        let err = load_map(&MapSource::Path(path.clone())).unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }), "{}", err);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("rangefinder_definitely_missing.png");
        let err = load_map(&MapSource::Path(path)).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
