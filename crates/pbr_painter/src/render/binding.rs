//! Per-frame material binding
//!
//! [`RenderableBinding`] moves between `Unbound` and `Bound`. `bind` resolves
//! the material's program variant, makes it current and pushes the transform,
//! eye position and every material parameter; the caller draws and hands the
//! returned [`BoundProgram`] back to `release`, which unbinds everything the
//! bind touched. Each bind pushes the full parameter set, so identical
//! material state always produces identical backend calls.

use crate::foundation::math::{Mat4, Vec3};
use crate::render::backend::{GraphicsBackend, ProgramHandle, UniformValue};
use crate::render::material::{Albedo, MaterialError, PbrMaterial, ProgramVariant};
use crate::render::pipeline::ProgramRegistry;

/// Texture unit of the albedo texture
pub const ALBEDO_TEXTURE_UNIT: u32 = 0;
/// Texture unit of the normal map
pub const NORMAL_MAP_UNIT: u32 = 1;
/// Texture unit of the environment map
pub const ENVIRONMENT_MAP_UNIT: u32 = 2;

/// Camera and object inputs of one draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// Combined `projection * view` matrix
    pub projection: Mat4,
    /// Model transform of the drawn object
    pub transform: Mat4,
    /// Eye position in world space
    pub eye: Vec3,
}

/// Token proving a program is bound; pass it back to [`RenderableBinding::release`]
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a bound program must be released"]
pub struct BoundProgram {
    program: ProgramHandle,
    variant: ProgramVariant,
}

impl BoundProgram {
    /// Program made current by the bind
    #[must_use]
    pub const fn program(&self) -> ProgramHandle {
        self.program
    }

    /// Variant the material resolved to
    #[must_use]
    pub const fn variant(&self) -> ProgramVariant {
        self.variant
    }
}

#[derive(Debug, Default)]
enum BindingState {
    #[default]
    Unbound,
    Bound {
        program: ProgramHandle,
        texture_units: Vec<u32>,
    },
}

/// Binds one material at a time to its program variant
#[derive(Debug, Default)]
pub struct RenderableBinding {
    state: BindingState,
}

impl RenderableBinding {
    /// Create an unbound binding
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a program is currently bound
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        matches!(self.state, BindingState::Bound { .. })
    }

    /// Bind `material` with the given frame inputs.
    ///
    /// Fails without touching the backend when the material lacks a resource
    /// its variant needs, when the variant's program is unavailable, or when a
    /// previous bind was not released.
    pub fn bind(
        &mut self,
        backend: &mut dyn GraphicsBackend,
        programs: &ProgramRegistry,
        material: &PbrMaterial,
        frame: &FrameUniforms,
    ) -> Result<BoundProgram, MaterialError> {
        if self.is_bound() {
            return Err(MaterialError::AlreadyBound);
        }
        material.validate_for_binding()?;
        let variant = material.program_variant();
        let program = programs.resolve(variant)?;

        backend.use_program(program);
        backend.set_uniform(program, "projection", UniformValue::Mat4(frame.projection));
        backend.set_uniform(program, "transform", UniformValue::Mat4(frame.transform));
        backend.set_uniform(program, "a_eye", UniformValue::Vec3(frame.eye));

        let mut texture_units = Vec::with_capacity(3);

        match material.albedo() {
            Albedo::Color(color) => {
                backend.set_uniform(program, "useAlbedoTexture", UniformValue::Bool(false));
                backend.set_uniform(program, "albedoColor", UniformValue::Vec3(color));
            }
            Albedo::Texture(texture) => {
                backend.set_uniform(program, "useAlbedoTexture", UniformValue::Bool(true));
                backend.bind_texture(ALBEDO_TEXTURE_UNIT, texture);
                backend.set_uniform(program, "albedoTexture", UniformValue::Sampler(ALBEDO_TEXTURE_UNIT));
                texture_units.push(ALBEDO_TEXTURE_UNIT);
            }
        }

        if let Some(normal_map) = material.normal_map() {
            backend.set_uniform(program, "useNormalMap", UniformValue::Bool(true));
            backend.bind_texture(NORMAL_MAP_UNIT, normal_map);
            backend.set_uniform(program, "normalMap", UniformValue::Sampler(NORMAL_MAP_UNIT));
            texture_units.push(NORMAL_MAP_UNIT);
        } else {
            backend.set_uniform(program, "useNormalMap", UniformValue::Bool(false));
        }

        backend.set_uniform(program, "microsurface", UniformValue::Float(material.microsurface()));
        backend.set_uniform(program, "reflectivity", UniformValue::Vec3(material.reflectivity()));

        if variant.requires_environment_map() {
            // validate_for_binding guarantees the map is present
            if let Some(environment) = material.environment_map() {
                backend.bind_texture(ENVIRONMENT_MAP_UNIT, environment);
                backend.set_uniform(program, "envMap", UniformValue::Sampler(ENVIRONMENT_MAP_UNIT));
                texture_units.push(ENVIRONMENT_MAP_UNIT);
            }
        }

        self.state = BindingState::Bound { program, texture_units };
        Ok(BoundProgram { program, variant })
    }

    /// Unbind the textures and program of a previous bind
    pub fn release(&mut self, backend: &mut dyn GraphicsBackend, bound: BoundProgram) {
        match std::mem::take(&mut self.state) {
            BindingState::Bound { program, texture_units } => {
                if program != bound.program {
                    log::warn!(
                        "Releasing {:?} but {:?} was bound; releasing both",
                        bound.program,
                        program
                    );
                    backend.release_program(bound.program);
                }
                for unit in texture_units {
                    backend.unbind_texture(unit);
                }
                backend.release_program(program);
            }
            BindingState::Unbound => {
                log::warn!("Release of {:?} on an unbound binding", bound.program);
                backend.release_program(bound.program);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProgramConfig;
    use crate::render::backend::{BackendCall, RecordingBackend};
    use crate::render::material::preset::tests::test_textures;
    use crate::render::material::{MaterialPresetCatalog, PresetDefinition};

    fn frame() -> FrameUniforms {
        FrameUniforms {
            projection: Mat4::identity(),
            transform: Mat4::new_translation(&Vec3::new(0.0, 1.0, 0.0)),
            eye: Vec3::new(-1.2, 2.1, -2.8),
        }
    }

    fn setup() -> (RecordingBackend, ProgramRegistry, MaterialPresetCatalog) {
        let mut backend = RecordingBackend::new();
        let programs = ProgramRegistry::compile_all(&mut backend, &ProgramConfig::default());
        backend.take_calls();
        (backend, programs, MaterialPresetCatalog::standard(&test_textures()))
    }

    #[test]
    fn test_gold_binds_environment_program() {
        let (mut backend, programs, catalog) = setup();
        let gold = catalog.materialize("gold").unwrap();
        let mut binding = RenderableBinding::new();

        let bound = binding.bind(&mut backend, &programs, &gold, &frame()).unwrap();
        assert_eq!(bound.variant(), ProgramVariant::WithEnvironmentMap);
        assert_eq!(Ok(bound.program()), programs.resolve(ProgramVariant::WithEnvironmentMap));
        assert!(binding.is_bound());
        assert_eq!(backend.last_uniform("microsurface"), Some(UniformValue::Float(0.86)));
        assert_eq!(backend.last_uniform("useAlbedoTexture"), Some(UniformValue::Bool(false)));
        assert_eq!(backend.bound_textures().len(), 2);

        binding.release(&mut backend, bound);
        assert!(!binding.is_bound());
    }

    #[test]
    fn test_release_leaves_clean_state() {
        let (mut backend, programs, catalog) = setup();
        let mut binding = RenderableBinding::new();

        let tiles = catalog.materialize("tiles").unwrap();
        let bound = binding.bind(&mut backend, &programs, &tiles, &frame()).unwrap();
        assert_eq!(backend.bound_textures().len(), 3);
        binding.release(&mut backend, bound);

        assert_eq!(backend.current_program(), None);
        assert!(backend.bound_textures().is_empty());

        let stone = catalog.materialize("stone").unwrap();
        let bound = binding.bind(&mut backend, &programs, &stone, &frame()).unwrap();
        assert_eq!(bound.variant(), ProgramVariant::WithoutEnvironmentMap);
        assert!(!backend.bound_textures().contains_key(&ENVIRONMENT_MAP_UNIT));
        binding.release(&mut backend, bound);
    }

    #[test]
    fn test_bind_is_idempotent() {
        let (mut backend, programs, catalog) = setup();
        let plastic = catalog.materialize("plastic").unwrap();
        let mut binding = RenderableBinding::new();

        let bound = binding.bind(&mut backend, &programs, &plastic, &frame()).unwrap();
        binding.release(&mut backend, bound);
        let first = backend.take_calls();

        let bound = binding.bind(&mut backend, &programs, &plastic, &frame()).unwrap();
        binding.release(&mut backend, bound);
        let second = backend.take_calls();

        assert_eq!(first, second);
    }

    #[test]
    fn test_double_bind_rejected() {
        let (mut backend, programs, catalog) = setup();
        let gold = catalog.materialize("gold").unwrap();
        let mut binding = RenderableBinding::new();

        let bound = binding.bind(&mut backend, &programs, &gold, &frame()).unwrap();
        assert_eq!(
            binding.bind(&mut backend, &programs, &gold, &frame()),
            Err(MaterialError::AlreadyBound)
        );
        binding.release(&mut backend, bound);
    }

    #[test]
    fn test_missing_environment_map_fails_before_backend_calls() {
        let (mut backend, programs, catalog) = setup();
        let mut gold = catalog.materialize("gold").unwrap();
        gold.clear_environment_map();
        let mut binding = RenderableBinding::new();

        assert_eq!(
            binding.bind(&mut backend, &programs, &gold, &frame()),
            Err(MaterialError::MissingResource("environment map"))
        );
        assert!(backend.calls().is_empty());
        assert!(!binding.is_bound());
    }

    #[test]
    fn test_unavailable_program() {
        let config = ProgramConfig::default();
        let mut backend =
            RecordingBackend::new().with_failing_shader(config.without_environment_map.vertex.clone());
        let programs = ProgramRegistry::compile_all(&mut backend, &config);

        let mut catalog = MaterialPresetCatalog::new();
        catalog
            .insert(PresetDefinition {
                name: "stone".to_string(),
                program_variant: ProgramVariant::WithoutEnvironmentMap,
                environment_map: None,
                normal_map: None,
                albedo: crate::render::material::Albedo::Color(Vec3::new(0.5, 0.5, 0.5)),
                microsurface: 0.29,
                reflectivity: Vec3::new(0.24, 0.24, 0.25),
            })
            .unwrap();
        let stone = catalog.materialize("stone").unwrap();
        let mut binding = RenderableBinding::new();

        assert_eq!(
            binding.bind(&mut backend, &programs, &stone, &frame()),
            Err(MaterialError::ProgramUnavailable(ProgramVariant::WithoutEnvironmentMap))
        );
        assert!(!backend.calls().iter().any(|call| matches!(call, BackendCall::UseProgram(_))));
    }
}
