//! Image loading utilities for texture data
//!
//! Provides PNG loading through the `image` crate, plus a placeholder loader
//! for hosts that run without texture files on disk.

use std::path::Path;

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The file could not be opened or decoded
    #[error("Failed to load image {path}: {message}")]
    LoadFailed {
        /// Offending path
        path: String,
        /// Decoder message
        message: String,
    },
}

/// Loaded image data ready for GPU upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of color channels (always 4 for RGBA)
    pub channels: u8,
}

impl ImageData {
    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();

        log::debug!("Loading image from: {:?}", path_ref);

        let img = image::open(path_ref).map_err(|e| AssetError::LoadFailed {
            path: path_ref.display().to_string(),
            message: e.to_string(),
        })?;

        // Convert to RGBA8 format (standard for GPU upload)
        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::debug!("Loaded image {}x{} from {:?}", width, height, path_ref);

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
            channels: 4,
        })
    }

    /// Create a solid color image (useful for testing and defaults)
    #[must_use]
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = pixel_count(width, height);
        let mut data = Vec::with_capacity(pixel_count * 4);

        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }

        Self {
            data,
            width,
            height,
            channels: 4,
        }
    }

    /// Get the size of the image data in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Pixel count of a `width` x `height` image, computed without `u32` overflow
fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// Source of decoded images, keyed by path
pub trait ImageLoader {
    /// Produce the pixels for `path`
    fn load(&self, path: &Path) -> Result<ImageData, AssetError>;
}

/// Decodes image files from disk
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageLoader;

impl ImageLoader for FileImageLoader {
    fn load(&self, path: &Path) -> Result<ImageData, AssetError> {
        ImageData::from_file(path)
    }
}

/// Returns a 1x1 image for every path without touching the filesystem.
///
/// Normal-map paths (file stem ending in `_NRM`) get a flat tangent-space
/// normal, everything else mid grey.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderImageLoader;

impl ImageLoader for PlaceholderImageLoader {
    fn load(&self, path: &Path) -> Result<ImageData, AssetError> {
        let is_normal_map = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.ends_with("_NRM"));

        let color = if is_normal_map { [128, 128, 255, 255] } else { [128, 128, 128, 255] };
        Ok(ImageData::solid_color(1, 1, color))
    }
}
