//! Material system
//!
//! Live materials, the preset catalog they are materialized from, and the
//! texture registry that owns every handle they reference.

pub mod material;
pub mod preset;
pub mod texture_registry;

// Re-export commonly used types
pub use material::{Albedo, AlbedoMode, MaterialError, PbrMaterial, ProgramVariant};
pub use preset::{
    AlbedoPreset, MaterialPresetCatalog, NormalMapPreset, Preset, PresetDefinition, PresetTextures,
};
pub use texture_registry::{
    FilterMode, TextureError, TextureHandle, TextureInfo, TextureKind, TextureManager, TextureParams,
    WrapMode,
};
