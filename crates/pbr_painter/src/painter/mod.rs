//! # PBR Painter
//!
//! Frame hooks driven by the host: [`PbrPainter::on_initialize`] compiles the
//! program variants, loads the shared textures and builds the preset catalog;
//! [`PbrPainter::on_paint`] draws the icosahedron with the material of the
//! host-owned [`ActiveSelection`].
//!
//! ## Frame flow
//!
//! ```text
//! viewport (if changed) -> clear -> depth test -> bind -> draw -> release
//! ```
//!
//! A frame whose material cannot be bound (missing environment map, program
//! that never compiled) is skipped and reported as [`FrameOutcome::Skipped`];
//! the painter keeps running.

pub mod properties;
pub mod selection;


pub use properties::{
    PropertyDescriptor, PropertyError, PropertyId, PropertyKind, PropertyTable, PropertyValue,
};
pub use selection::{ActiveSelection, Channel};

use std::path::Path;

use crate::assets::{FileImageLoader, ImageLoader, PlaceholderImageLoader};
use crate::config::{ConfigError, PainterConfig, TextureConfig, TextureSource};
use crate::foundation::math::{utils, Mat4};
use crate::render::backend::{GraphicsBackend, Primitive};
use crate::render::binding::{FrameUniforms, RenderableBinding};
use crate::render::camera::{Camera, PerspectiveProjection, Viewport, ViewportState};
use crate::render::material::{
    MaterialError, MaterialPresetCatalog, PresetTextures, ProgramVariant, TextureError,
    TextureKind, TextureManager, TextureParams,
};
use crate::render::pipeline::ProgramRegistry;

/// Painter errors
#[derive(Debug, thiserror::Error)]
pub enum PainterError {
    /// A frame hook or accessor was used before `on_initialize`
    #[error("Painter is not initialized")]
    NotInitialized,

    /// The configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Texture loading failed
    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    /// Material or binding error
    #[error("Material error: {0}")]
    Material(#[from] MaterialError),

    /// Property access failed
    #[error("Property error: {0}")]
    Property(#[from] PropertyError),

    /// Configuration file could not be read or written
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result of one paint call
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The icosahedron was drawn with this program variant
    Drawn {
        /// Variant the material resolved to
        variant: ProgramVariant,
    },
    /// Nothing was drawn this frame
    Skipped {
        /// Why the material could not be bound
        reason: MaterialError,
    },
}

/// Painter for the PBR icosahedron scene
#[derive(Debug)]
pub struct PbrPainter {
    config: PainterConfig,
    textures: TextureManager,
    programs: ProgramRegistry,
    catalog: Option<MaterialPresetCatalog>,
    binding: RenderableBinding,
    camera: Camera,
    projection: PerspectiveProjection,
    viewport: ViewportState,
    model_transform: Mat4,
    last_skip: Option<MaterialError>,
}

impl PbrPainter {
    /// Create a painter; nothing touches the backend until [`Self::on_initialize`]
    pub fn new(config: PainterConfig) -> Result<Self, PainterError> {
        config.validate().map_err(PainterError::InvalidConfig)?;

        let translation = utils::vec3_from_array(config.icosahedron_translation);
        Ok(Self {
            camera: Camera::from(&config.camera),
            projection: PerspectiveProjection::from(&config.projection),
            model_transform: Mat4::new_translation(&translation),
            config,
            textures: TextureManager::new(),
            programs: ProgramRegistry::new(),
            catalog: None,
            binding: RenderableBinding::new(),
            viewport: ViewportState::default(),
            last_skip: None,
        })
    }

    /// One-time setup using the texture source named in the configuration
    pub fn on_initialize(&mut self, backend: &mut dyn GraphicsBackend) -> Result<ActiveSelection, PainterError> {
        match self.config.textures.source {
            TextureSource::Files => self.on_initialize_with_loader(backend, &FileImageLoader),
            TextureSource::Placeholder => self.on_initialize_with_loader(backend, &PlaceholderImageLoader),
        }
    }

    /// One-time setup with an explicit image loader.
    ///
    /// Program compilation failures are recorded and surface later as skipped
    /// frames; texture failures abort initialization.
    pub fn on_initialize_with_loader(
        &mut self,
        backend: &mut dyn GraphicsBackend,
        loader: &dyn ImageLoader,
    ) -> Result<ActiveSelection, PainterError> {
        log::info!("Initializing PBR painter...");

        if self.is_initialized() {
            log::info!("Re-initializing; releasing previous programs and textures");
        }
        self.release_resources(backend);

        self.programs = ProgramRegistry::compile_all(backend, &self.config.programs);
        let textures = load_preset_textures(&mut self.textures, backend, loader, &self.config.textures)?;
        let catalog = MaterialPresetCatalog::standard(&textures);
        let selection = ActiveSelection::new(&catalog, self.config.initial_preset)?;

        log::info!(
            "PBR painter initialized: {}/{} programs ready, {} textures, {} presets, starting on {}",
            self.programs.ready_count(),
            ProgramVariant::ALL.len(),
            self.textures.texture_count(),
            catalog.len(),
            selection.preset()
        );

        self.catalog = Some(catalog);
        self.last_skip = None;
        Ok(selection)
    }

    /// Free every program and texture; the painter must be initialized again before painting
    pub fn on_deinitialize(&mut self, backend: &mut dyn GraphicsBackend) {
        self.release_resources(backend);
        self.catalog = None;
        self.last_skip = None;
        log::info!("PBR painter deinitialized");
    }

    fn release_resources(&mut self, backend: &mut dyn GraphicsBackend) {
        self.programs.delete_all(backend);
        self.textures.clear(backend);
    }

    /// Draw one frame with the material of `selection`
    pub fn on_paint(
        &mut self,
        backend: &mut dyn GraphicsBackend,
        selection: &ActiveSelection,
    ) -> Result<FrameOutcome, PainterError> {
        if self.catalog.is_none() {
            return Err(PainterError::NotInitialized);
        }

        if let Some(viewport) = self.viewport.take_changed() {
            log::debug!("Applying viewport {:?}", viewport);
            backend.set_viewport(viewport);
        }
        backend.clear(self.config.clear_color);
        backend.set_depth_test(true);

        let aspect = self.viewport.viewport().aspect();
        let frame = FrameUniforms {
            projection: self.projection.matrix(aspect) * self.camera.view(),
            transform: self.model_transform,
            eye: self.camera.eye,
        };

        match self.binding.bind(backend, &self.programs, selection.material(), &frame) {
            Ok(bound) => {
                backend.draw(Primitive::Icosahedron {
                    iterations: self.config.icosahedron_iterations,
                });
                let variant = bound.variant();
                self.binding.release(backend, bound);
                if self.note_drawn() {
                    log::info!("Drawing resumed with {}", variant.name());
                }
                Ok(FrameOutcome::Drawn { variant })
            }
            Err(reason @ (MaterialError::ProgramUnavailable(_) | MaterialError::MissingResource(_))) => {
                if self.note_skip(&reason) {
                    log::error!("Skipping frame: {}", reason);
                }
                Ok(FrameOutcome::Skipped { reason })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Record a skipped frame; true when `reason` differs from the previous skip
    fn note_skip(&mut self, reason: &MaterialError) -> bool {
        if self.last_skip.as_ref() == Some(reason) {
            return false;
        }
        self.last_skip = Some(reason.clone());
        true
    }

    /// Record a drawn frame; true when it ends a run of skipped frames
    fn note_drawn(&mut self) -> bool {
        self.last_skip.take().is_some()
    }

    /// Viewport capability: the next paint applies the rectangle once
    pub fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport.set(Viewport { x, y, width, height });
    }

    /// Current viewport
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    /// Preset catalog built by `on_initialize`
    pub fn catalog(&self) -> Result<&MaterialPresetCatalog, PainterError> {
        self.catalog.as_ref().ok_or(PainterError::NotInitialized)
    }

    /// Whether `on_initialize` completed
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.catalog.is_some()
    }

    /// Compiled program variants
    #[must_use]
    pub const fn programs(&self) -> &ProgramRegistry {
        &self.programs
    }

    /// Loaded textures
    #[must_use]
    pub const fn textures(&self) -> &TextureManager {
        &self.textures
    }

    /// Camera
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera, e.g. for a host navigation controller
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Configuration the painter was created with
    #[must_use]
    pub const fn config(&self) -> &PainterConfig {
        &self.config
    }
}

fn load_preset_textures(
    manager: &mut TextureManager,
    backend: &mut dyn GraphicsBackend,
    loader: &dyn ImageLoader,
    config: &TextureConfig,
) -> Result<PresetTextures, TextureError> {
    let mut surface = |path: &Path, kind: TextureKind| {
        manager.load(&mut *backend, loader, path, kind, TextureParams::tiling())
    };

    let albedo_metal = surface(config.albedo_metal.as_path(), TextureKind::Albedo)?;
    let albedo_plastic = surface(config.albedo_plastic.as_path(), TextureKind::Albedo)?;
    let albedo_stone = surface(config.albedo_stone.as_path(), TextureKind::Albedo)?;
    let albedo_tiles = surface(config.albedo_tiles.as_path(), TextureKind::Albedo)?;
    let normal_metal = surface(config.normal_metal.as_path(), TextureKind::Normal)?;
    let normal_plastic = surface(config.normal_plastic.as_path(), TextureKind::Normal)?;
    let normal_stone = surface(config.normal_stone.as_path(), TextureKind::Normal)?;
    let normal_tiles = surface(config.normal_tiles.as_path(), TextureKind::Normal)?;

    let environment = manager.load(
        backend,
        loader,
        &config.environment,
        TextureKind::Environment,
        TextureParams::panorama(),
    )?;

    Ok(PresetTextures {
        albedo_metal,
        albedo_plastic,
        albedo_stone,
        albedo_tiles,
        normal_metal,
        normal_plastic,
        normal_stone,
        normal_tiles,
        environment,
    })
}
