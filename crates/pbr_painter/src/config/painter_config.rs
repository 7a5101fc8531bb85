//! # Painter Configuration
//!
//! Everything the painter needs at initialization: where its textures and
//! programs live, how the camera and projection are set up and which preset is
//! active on the first frame. Serializable through [`Config`] as TOML or RON.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Config;
use crate::render::material::{Preset, ProgramVariant};

/// Where texture pixels come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextureSource {
    /// Decode the configured image files
    #[default]
    Files,
    /// Substitute solid-colour images (headless runs, tests)
    Placeholder,
}

/// Texture file locations, one per shared resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureConfig {
    /// Pixel source for every texture below
    pub source: TextureSource,
    /// Scratched metal albedo
    pub albedo_metal: PathBuf,
    /// Plastic albedo
    pub albedo_plastic: PathBuf,
    /// Stone albedo
    pub albedo_stone: PathBuf,
    /// Tiles albedo
    pub albedo_tiles: PathBuf,
    /// Scratched metal normal map
    pub normal_metal: PathBuf,
    /// Plastic normal map
    pub normal_plastic: PathBuf,
    /// Stone normal map
    pub normal_stone: PathBuf,
    /// Tiles normal map
    pub normal_tiles: PathBuf,
    /// Panorama environment map shared by every preset
    pub environment: PathBuf,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            source: TextureSource::Files,
            albedo_metal: "data/pbr/metal/MetalScratches_COLOR.png".into(),
            albedo_plastic: "data/pbr/plastic/Plastic_COLOR.png".into(),
            albedo_stone: "data/pbr/stone/Stone_COLOR.png".into(),
            albedo_tiles: "data/pbr/tiles/TilesPlain_COLOR.png".into(),
            normal_metal: "data/pbr/metal/MetalScratches_NRM.png".into(),
            normal_plastic: "data/pbr/plastic/Plastic_NRM.png".into(),
            normal_stone: "data/pbr/stone/Stone_NRM.png".into(),
            normal_tiles: "data/pbr/tiles/TilesPlain_NRM.png".into(),
            environment: "data/pbr/Panorama_0.png".into(),
        }
    }
}

/// Vertex and fragment source of one program variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSources {
    /// Vertex shader path
    pub vertex: PathBuf,
    /// Fragment shader path
    pub fragment: PathBuf,
}

impl ProgramSources {
    /// Create a new pair of shader paths
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// Shader sources for the closed set of program variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// Program sampling the environment map
    pub with_environment_map: ProgramSources,
    /// Program without environment lookups
    pub without_environment_map: ProgramSources,
}

impl ProgramConfig {
    /// Shader sources for `variant`
    #[must_use]
    pub const fn sources(&self, variant: ProgramVariant) -> &ProgramSources {
        match variant {
            ProgramVariant::WithEnvironmentMap => &self.with_environment_map,
            ProgramVariant::WithoutEnvironmentMap => &self.without_environment_map,
        }
    }
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            with_environment_map: ProgramSources::new(
                "data/pbr/icosahedron_env.vert",
                "data/pbr/icosahedron_env.frag",
            ),
            without_environment_map: ProgramSources::new(
                "data/pbr/icosahedron_noEnv.vert",
                "data/pbr/icosahedron_noEnv.frag",
            ),
        }
    }
}

/// Look-at camera placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Eye position in world space
    pub eye: [f32; 3],
    /// Point the camera looks at
    pub center: [f32; 3],
    /// Up direction
    pub up: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [-1.2, 2.1, -2.8],
            center: [0.9, 0.5, 2.0],
            up: [0.0, 1.0, 0.0],
        }
    }
}

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Near clipping plane
    pub z_near: f32,
    /// Far clipping plane
    pub z_far: f32,
    /// Vertical field of view in degrees
    pub fovy_degrees: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            z_near: 0.3,
            z_far: 15.0,
            fovy_degrees: 50.0,
        }
    }
}

/// Top-level painter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterConfig {
    /// Texture locations
    pub textures: TextureConfig,
    /// Program variant sources
    pub programs: ProgramConfig,
    /// Camera placement
    pub camera: CameraConfig,
    /// Projection parameters
    pub projection: ProjectionConfig,
    /// Framebuffer clear colour (RGBA)
    pub clear_color: [f32; 4],
    /// World-space translation of the icosahedron
    pub icosahedron_translation: [f32; 3],
    /// Subdivision iterations of the icosahedron
    pub icosahedron_iterations: u8,
    /// Preset active after initialization
    pub initial_preset: Preset,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            textures: TextureConfig::default(),
            programs: ProgramConfig::default(),
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            clear_color: [0.85, 0.87, 0.91, 1.0],
            icosahedron_translation: [0.0, 1.0, 0.0],
            icosahedron_iterations: 3,
            initial_preset: Preset::Gold,
        }
    }
}

impl PainterConfig {
    /// Default configuration with placeholder textures, for headless hosts
    #[must_use]
    pub fn headless() -> Self {
        let mut config = Self::default();
        config.textures.source = TextureSource::Placeholder;
        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let projection = &self.projection;
        if projection.z_near <= 0.0 {
            return Err(format!("z_near must be positive, got {}", projection.z_near));
        }
        if projection.z_far <= projection.z_near {
            return Err(format!(
                "z_far ({}) must be greater than z_near ({})",
                projection.z_far, projection.z_near
            ));
        }
        if !(0.0..180.0).contains(&projection.fovy_degrees) || projection.fovy_degrees == 0.0 {
            return Err(format!("fovy must be in (0, 180) degrees, got {}", projection.fovy_degrees));
        }
        if self.camera.eye == self.camera.center {
            return Err("camera eye and center must differ".to_string());
        }
        Ok(())
    }
}

impl Config for PainterConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PainterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_preset, Preset::Gold);
        assert_eq!(config.icosahedron_iterations, 3);
    }

    #[test]
    fn test_invalid_projection_rejected() {
        let mut config = PainterConfig::default();
        config.projection.z_far = 0.1;
        assert!(config.validate().is_err());

        let mut config = PainterConfig::default();
        config.projection.fovy_degrees = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("pbr_painter_config_{}.toml", std::process::id()));
        let mut config = PainterConfig::headless();
        config.initial_preset = Preset::Stone;

        config.save_to_file(&path).unwrap();
        let loaded = PainterConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let loaded: PainterConfig = ron::from_str("(initial_preset: tiles)").unwrap();
        assert_eq!(loaded.initial_preset, Preset::Tiles);
        assert_eq!(loaded.programs, ProgramConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = PainterConfig::default().save_to_file("painter.json");
        assert!(matches!(result, Err(crate::config::ConfigError::UnsupportedFormat(_))));
    }
}
