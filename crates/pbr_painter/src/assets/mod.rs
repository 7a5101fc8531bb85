//! Asset loading
//!
//! CPU-side image decoding. GPU upload and texture lifetime are handled by
//! [`crate::render::material::TextureManager`] and the graphics backend.

pub mod image_loader;

pub use image_loader::{AssetError, FileImageLoader, ImageData, ImageLoader, PlaceholderImageLoader};
