//! Program registry for the closed set of program variants
//!
//! Both variants are compiled once at initialization. A variant whose
//! compilation failed stays registered as [`ProgramState::Failed`], so the
//! painter keeps running and frames that need it are skipped instead.

use std::collections::HashMap;

use crate::config::ProgramConfig;
use crate::render::backend::{GraphicsBackend, ProgramHandle};
use crate::render::material::{MaterialError, ProgramVariant};

/// Compilation outcome of one variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramState {
    /// Compiled and linked
    Ready(ProgramHandle),
    /// Compilation or linking failed upstream
    Failed(String),
}

/// Compiled program per variant
#[derive(Debug, Default)]
pub struct ProgramRegistry {
    programs: HashMap<ProgramVariant, ProgramState>,
}

impl ProgramRegistry {
    /// Create an empty registry; every variant resolves as unavailable
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every variant listed in `config`
    pub fn compile_all(backend: &mut dyn GraphicsBackend, config: &ProgramConfig) -> Self {
        log::info!("Compiling material program variants...");

        let mut registry = Self::new();
        for variant in ProgramVariant::ALL {
            let sources = config.sources(variant);
            let state = match backend.compile_program(&sources.vertex, &sources.fragment) {
                Ok(handle) => {
                    log::info!("Program {} ready ({:?})", variant.name(), handle);
                    ProgramState::Ready(handle)
                }
                Err(e) => {
                    log::error!("Program {} unavailable: {}", variant.name(), e);
                    ProgramState::Failed(e.to_string())
                }
            };
            registry.register(variant, state);
        }
        registry
    }

    /// Record the compilation outcome of a variant
    pub fn register(&mut self, variant: ProgramVariant, state: ProgramState) {
        self.programs.insert(variant, state);
    }

    /// Compilation outcome of a variant, if it was ever compiled
    #[must_use]
    pub fn state(&self, variant: ProgramVariant) -> Option<&ProgramState> {
        self.programs.get(&variant)
    }

    /// Resolve a variant to its compiled program
    pub fn resolve(&self, variant: ProgramVariant) -> Result<ProgramHandle, MaterialError> {
        match self.programs.get(&variant) {
            Some(ProgramState::Ready(handle)) => Ok(*handle),
            _ => Err(MaterialError::ProgramUnavailable(variant)),
        }
    }

    /// Delete every compiled program; all variants resolve as unavailable afterwards
    pub fn delete_all(&mut self, backend: &mut dyn GraphicsBackend) {
        for (variant, state) in self.programs.drain() {
            if let ProgramState::Ready(handle) = state {
                log::debug!("Deleting program {} ({:?})", variant.name(), handle);
                backend.delete_program(handle);
            }
        }
    }

    /// Number of variants that compiled successfully
    #[must_use]
    pub fn ready_count(&self) -> usize {
        self.programs
            .values()
            .filter(|state| matches!(state, ProgramState::Ready(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::RecordingBackend;

    #[test]
    fn test_compile_all_variants() {
        let mut backend = RecordingBackend::new();
        let registry = ProgramRegistry::compile_all(&mut backend, &ProgramConfig::default());

        assert_eq!(registry.ready_count(), 2);
        let with_env = registry.resolve(ProgramVariant::WithEnvironmentMap).unwrap();
        let without_env = registry.resolve(ProgramVariant::WithoutEnvironmentMap).unwrap();
        assert_ne!(with_env, without_env);
    }

    #[test]
    fn test_failed_variant_is_unavailable() {
        let config = ProgramConfig::default();
        let mut backend =
            RecordingBackend::new().with_failing_shader(config.with_environment_map.fragment.clone());
        let registry = ProgramRegistry::compile_all(&mut backend, &config);

        assert_eq!(registry.ready_count(), 1);
        assert!(matches!(
            registry.state(ProgramVariant::WithEnvironmentMap),
            Some(ProgramState::Failed(_))
        ));
        assert_eq!(
            registry.resolve(ProgramVariant::WithEnvironmentMap),
            Err(MaterialError::ProgramUnavailable(ProgramVariant::WithEnvironmentMap))
        );
        assert!(registry.resolve(ProgramVariant::WithoutEnvironmentMap).is_ok());
    }

    #[test]
    fn test_delete_all_frees_ready_programs() {
        let config = ProgramConfig::default();
        let mut backend =
            RecordingBackend::new().with_failing_shader(config.with_environment_map.vertex.clone());
        let mut registry = ProgramRegistry::compile_all(&mut backend, &config);
        assert_eq!(backend.live_program_count(), 1);

        registry.delete_all(&mut backend);
        assert_eq!(backend.live_program_count(), 0);
        assert_eq!(registry.ready_count(), 0);
        assert!(registry.resolve(ProgramVariant::WithoutEnvironmentMap).is_err());
    }

    #[test]
    fn test_empty_registry() {
        let registry = ProgramRegistry::new();
        assert!(registry.resolve(ProgramVariant::WithoutEnvironmentMap).is_err());
        assert_eq!(registry.ready_count(), 0);
    }
}
