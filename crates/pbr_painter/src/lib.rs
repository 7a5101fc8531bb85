//! # PBR Painter
//!
//! Physically based material presets and per-frame program binding for a
//! painter host.
//!
//! ## Features
//!
//! - **Materials**: Albedo colour or texture, normal map, microsurface and
//!   reflectivity, validated at the call that would introduce invalid state
//! - **Presets**: Immutable, compiled-in preset catalog (gold, plastic, stone,
//!   tiles) plus a manual mode that continues from the last visible material
//! - **Program variants**: Closed set of two precompiled programs selected by
//!   whether the material samples an environment map
//! - **Binding**: `Unbound -> Bound -> Unbound` per-frame state machine that
//!   pushes uniforms through a [`render::backend::GraphicsBackend`]
//! - **Property surface**: Index-addressed descriptor table for UI binding
//! - **Stochastic transparency options**: Settings holder with a consumable
//!   sample-count dirty flag
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pbr_painter::prelude::*;
//!
//! fn main() -> Result<(), PainterError> {
//!     let mut backend = RecordingBackend::new();
//!     let mut painter = PbrPainter::new(PainterConfig::headless())?;
//!     let mut selection = painter.on_initialize(&mut backend)?;
//!
//!     selection.set_preset(painter.catalog()?, Preset::Manual)?;
//!     selection.material_mut().set_microsurface(0.5)?;
//!
//!     let outcome = painter.on_paint(&mut backend, &selection)?;
//!     log::info!("frame: {:?}", outcome);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;
pub mod painter;
pub mod transparency;

/// Common imports for painter hosts
pub mod prelude {
    pub use crate::{
        assets::{FileImageLoader, ImageData, ImageLoader, PlaceholderImageLoader},
        config::{Config, ConfigError, PainterConfig},
        foundation::math::{Mat4, Vec3},
        painter::{
            ActiveSelection, FrameOutcome, PainterError, PbrPainter, PropertyError, PropertyId,
            PropertyTable, PropertyValue,
        },
        render::{
            backend::{GraphicsBackend, RecordingBackend},
            binding::{BoundProgram, RenderableBinding},
            material::{
                AlbedoPreset, MaterialError, MaterialPresetCatalog, NormalMapPreset, PbrMaterial,
                Preset, ProgramVariant, TextureHandle,
            },
        },
        transparency::{StochasticTransparencyOptimization, StochasticTransparencyOptions},
    };
}
