//! Texture Management for the Material System
//!
//! Loads each texture file once, uploads it through the graphics backend and
//! hands out [`TextureHandle`]s. Handles are slot-map keys: copyable,
//! comparable and non-owning, so any number of materials and presets can share
//! one texture. A handle whose texture was unloaded simply stops resolving.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use slotmap::SlotMap;

use crate::assets::{AssetError, ImageLoader};
use crate::render::backend::{BackendError, GraphicsBackend};

slotmap::new_key_type! {
    /// Handle for a GPU texture resource
    pub struct TextureHandle;
}

/// What a texture is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Base color/albedo texture
    Albedo,
    /// Tangent-space normal map
    Normal,
    /// Equirectangular environment panorama
    Environment,
}

/// Texture filtering modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Nearest neighbor filtering
    Nearest,
    /// Linear filtering
    Linear,
}

/// Texture wrapping modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// Repeat the texture
    Repeat,
    /// Mirror the texture
    MirroredRepeat,
    /// Clamp to edge
    ClampToEdge,
}

/// Texture creation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureParams {
    /// Texture filtering mode
    pub filter_mode: FilterMode,
    /// Texture wrapping mode (S and T)
    pub wrap_mode: WrapMode,
    /// Generate mipmaps
    pub generate_mipmaps: bool,
}

impl TextureParams {
    /// Parameters for tiling surface maps (albedo, normal)
    #[must_use]
    pub const fn tiling() -> Self {
        Self {
            filter_mode: FilterMode::Linear,
            wrap_mode: WrapMode::Repeat,
            generate_mipmaps: true,
        }
    }

    /// Parameters for the environment panorama
    #[must_use]
    pub const fn panorama() -> Self {
        Self {
            filter_mode: FilterMode::Linear,
            wrap_mode: WrapMode::ClampToEdge,
            generate_mipmaps: false,
        }
    }
}

impl Default for TextureParams {
    fn default() -> Self {
        Self::tiling()
    }
}

/// Information about a loaded texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    /// Source path
    pub path: PathBuf,
    /// Texture usage
    pub kind: TextureKind,
    /// Creation parameters
    pub params: TextureParams,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Texture loading errors
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// Decoding the image failed
    #[error(transparent)]
    Decode(#[from] AssetError),

    /// The handle does not refer to a loaded texture
    #[error("Unknown texture handle {0:?}")]
    UnknownTexture(TextureHandle),

    /// The backend rejected the upload
    #[error("Failed to upload {path}: {source}")]
    Upload {
        /// Source path
        path: String,
        /// Backend error
        source: BackendError,
    },
}

/// Registry of loaded textures
#[derive(Debug, Default)]
pub struct TextureManager {
    textures: SlotMap<TextureHandle, TextureInfo>,
    by_path: HashMap<PathBuf, TextureHandle>,
}

impl TextureManager {
    /// Create a new texture manager
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a texture, reusing the existing handle if `path` was loaded before
    pub fn load(
        &mut self,
        backend: &mut dyn GraphicsBackend,
        loader: &dyn ImageLoader,
        path: impl AsRef<Path>,
        kind: TextureKind,
        params: TextureParams,
    ) -> Result<TextureHandle, TextureError> {
        let path = path.as_ref();
        if let Some(&handle) = self.by_path.get(path) {
            log::debug!("Texture {:?} already loaded as {:?}", path, handle);
            return Ok(handle);
        }

        let image = loader.load(path)?;
        let handle = self.textures.insert(TextureInfo {
            path: path.to_path_buf(),
            kind,
            params,
            width: image.width,
            height: image.height,
        });

        if let Err(source) = backend.upload_texture(handle, &image, &params) {
            self.textures.remove(handle);
            return Err(TextureError::Upload {
                path: path.display().to_string(),
                source,
            });
        }

        self.by_path.insert(path.to_path_buf(), handle);
        log::debug!(
            "Loaded {:?} texture {:?} ({}x{}) from {:?}",
            kind,
            handle,
            image.width,
            image.height,
            path
        );
        Ok(handle)
    }

    /// Get texture information
    #[must_use]
    pub fn get(&self, handle: TextureHandle) -> Option<&TextureInfo> {
        self.textures.get(handle)
    }

    /// Whether `handle` still refers to a loaded texture
    #[must_use]
    pub fn contains(&self, handle: TextureHandle) -> bool {
        self.textures.contains_key(handle)
    }

    /// Free a texture; outstanding copies of the handle stop resolving
    pub fn unload(
        &mut self,
        backend: &mut dyn GraphicsBackend,
        handle: TextureHandle,
    ) -> Result<TextureInfo, TextureError> {
        let info = self
            .textures
            .remove(handle)
            .ok_or(TextureError::UnknownTexture(handle))?;
        self.by_path.remove(&info.path);
        backend.delete_texture(handle);
        log::debug!("Unloaded texture {:?} ({:?})", handle, info.path);
        Ok(info)
    }

    /// Unload every texture
    pub fn clear(&mut self, backend: &mut dyn GraphicsBackend) {
        for (handle, _) in self.textures.drain() {
            backend.delete_texture(handle);
        }
        self.by_path.clear();
    }

    /// Get number of loaded textures
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::PlaceholderImageLoader;
    use crate::render::backend::{BackendCall, RecordingBackend};

    #[test]
    fn test_texture_manager_creation() {
        let manager = TextureManager::new();
        assert_eq!(manager.texture_count(), 0);
    }

    #[test]
    fn test_same_path_loads_once() {
        let mut backend = RecordingBackend::new();
        let mut manager = TextureManager::new();

        let first = manager
            .load(&mut backend, &PlaceholderImageLoader, "env.png", TextureKind::Environment, TextureParams::panorama())
            .unwrap();
        let second = manager
            .load(&mut backend, &PlaceholderImageLoader, "env.png", TextureKind::Environment, TextureParams::panorama())
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(manager.texture_count(), 1);
        let uploads = backend
            .calls()
            .iter()
            .filter(|call| matches!(call, BackendCall::UploadTexture { .. }))
            .count();
        assert_eq!(uploads, 1);
    }

    #[test]
    fn test_unloaded_handle_stops_resolving() {
        let mut backend = RecordingBackend::new();
        let mut manager = TextureManager::new();
        let handle = manager
            .load(&mut backend, &PlaceholderImageLoader, "a_NRM.png", TextureKind::Normal, TextureParams::tiling())
            .unwrap();

        let copy = handle;
        assert!(manager.unload(&mut backend, handle).is_ok());
        assert!(!manager.contains(copy));
        assert!(manager.get(copy).is_none());
        assert!(matches!(
            manager.unload(&mut backend, copy),
            Err(TextureError::UnknownTexture(h)) if h == copy
        ));
    }

    #[test]
    fn test_every_upload_is_matched_by_a_delete() {
        let mut backend = RecordingBackend::new();
        let mut manager = TextureManager::new();

        for _ in 0..3 {
            let handle = manager
                .load(&mut backend, &PlaceholderImageLoader, "a.png", TextureKind::Albedo, TextureParams::tiling())
                .unwrap();
            manager.unload(&mut backend, handle).unwrap();
        }

        let uploads = backend
            .calls()
            .iter()
            .filter(|call| matches!(call, BackendCall::UploadTexture { .. }))
            .count();
        let deletes = backend
            .calls()
            .iter()
            .filter(|call| matches!(call, BackendCall::DeleteTexture(_)))
            .count();
        assert_eq!(uploads, 3);
        assert_eq!(deletes, 3);
        assert_eq!(backend.live_texture_count(), 0);
    }

    #[test]
    fn test_clear_frees_everything() {
        let mut backend = RecordingBackend::new();
        let mut manager = TextureManager::new();
        for path in ["a.png", "b_NRM.png", "env.png"] {
            manager
                .load(&mut backend, &PlaceholderImageLoader, path, TextureKind::Albedo, TextureParams::tiling())
                .unwrap();
        }

        manager.clear(&mut backend);
        assert_eq!(manager.texture_count(), 0);
        assert_eq!(backend.live_texture_count(), 0);
    }

    #[test]
    fn test_decode_failure_leaves_registry_empty() {
        let mut backend = RecordingBackend::new();
        let mut manager = TextureManager::new();
        let result = manager.load(
            &mut backend,
            &crate::assets::FileImageLoader,
            "missing/texture.png",
            TextureKind::Albedo,
            TextureParams::tiling(),
        );
        assert!(matches!(result, Err(TextureError::Decode(_))));
        assert_eq!(manager.texture_count(), 0);
    }
}
