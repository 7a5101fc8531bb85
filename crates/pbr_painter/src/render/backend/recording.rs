//! Recording backend
//!
//! A [`GraphicsBackend`] that performs no GPU work and records every call.
//! Headless hosts use it to drive the painter without a graphics context, and
//! tests use the recorded calls and the tracked pipeline state to check what a
//! frame actually did.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use super::{BackendError, BackendResult, GraphicsBackend, Primitive, ProgramHandle, UniformValue};
use crate::assets::ImageData;
use crate::render::camera::Viewport;
use crate::render::material::{TextureHandle, TextureParams};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// `compile_program` succeeded
    CompileProgram {
        /// Vertex shader path
        vertex: PathBuf,
        /// Resulting handle
        program: ProgramHandle,
    },
    /// `upload_texture`
    UploadTexture {
        /// Target texture
        texture: TextureHandle,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },
    /// `delete_texture`
    DeleteTexture(TextureHandle),
    /// `set_viewport`
    SetViewport(Viewport),
    /// `clear`
    Clear([f32; 4]),
    /// `set_depth_test`
    SetDepthTest(bool),
    /// `use_program`
    UseProgram(ProgramHandle),
    /// `set_uniform`
    SetUniform {
        /// Program receiving the value
        program: ProgramHandle,
        /// Input name
        name: String,
        /// Value pushed
        value: UniformValue,
    },
    /// `bind_texture`
    BindTexture {
        /// Texture unit
        unit: u32,
        /// Bound texture
        texture: TextureHandle,
    },
    /// `unbind_texture`
    UnbindTexture(u32),
    /// `draw`
    Draw(Primitive),
    /// `release_program`
    ReleaseProgram(ProgramHandle),
    /// `delete_program`
    DeleteProgram(ProgramHandle),
}

/// Headless backend recording every call
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    next_program: u64,
    failing_shaders: HashSet<PathBuf>,
    current_program: Option<ProgramHandle>,
    bound_textures: BTreeMap<u32, TextureHandle>,
    live_textures: HashSet<TextureHandle>,
    live_programs: HashSet<ProgramHandle>,
}

impl RecordingBackend {
    /// Create a new recording backend
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_program: 1,
            ..Self::default()
        }
    }

    /// Make compilation fail for any program using `shader` as vertex or fragment stage
    #[must_use]
    pub fn with_failing_shader(mut self, shader: impl Into<PathBuf>) -> Self {
        self.failing_shaders.insert(shader.into());
        self
    }

    /// All calls recorded so far
    #[must_use]
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Drain the recorded calls
    pub fn take_calls(&mut self) -> Vec<BackendCall> {
        std::mem::take(&mut self.calls)
    }

    /// Program currently in use, if any
    #[must_use]
    pub const fn current_program(&self) -> Option<ProgramHandle> {
        self.current_program
    }

    /// Texture units that currently hold a texture
    #[must_use]
    pub const fn bound_textures(&self) -> &BTreeMap<u32, TextureHandle> {
        &self.bound_textures
    }

    /// Last value pushed to `name`, across all programs
    #[must_use]
    pub fn last_uniform(&self, name: &str) -> Option<UniformValue> {
        self.calls.iter().rev().find_map(|call| match call {
            BackendCall::SetUniform { name: n, value, .. } if n == name => Some(*value),
            _ => None,
        })
    }

    /// Textures uploaded and not yet deleted
    #[must_use]
    pub fn live_texture_count(&self) -> usize {
        self.live_textures.len()
    }

    /// Programs compiled and not yet deleted
    #[must_use]
    pub fn live_program_count(&self) -> usize {
        self.live_programs.len()
    }

    /// Number of draw calls recorded
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, BackendCall::Draw(_)))
            .count()
    }
}

impl GraphicsBackend for RecordingBackend {
    fn compile_program(&mut self, vertex: &Path, fragment: &Path) -> BackendResult<ProgramHandle> {
        for stage in [vertex, fragment] {
            if self.failing_shaders.contains(stage) {
                return Err(BackendError::CompilationFailed(format!(
                    "{}: simulated compile error",
                    stage.display()
                )));
            }
        }

        let program = ProgramHandle(self.next_program);
        self.next_program += 1;
        self.live_programs.insert(program);
        self.calls.push(BackendCall::CompileProgram {
            vertex: vertex.to_path_buf(),
            program,
        });
        Ok(program)
    }

    fn upload_texture(
        &mut self,
        texture: TextureHandle,
        image: &ImageData,
        _params: &TextureParams,
    ) -> BackendResult<()> {
        if image.data.is_empty() {
            return Err(BackendError::UploadFailed("empty image".to_string()));
        }
        self.live_textures.insert(texture);
        self.calls.push(BackendCall::UploadTexture {
            texture,
            width: image.width,
            height: image.height,
        });
        Ok(())
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        if !self.live_textures.remove(&texture) {
            log::warn!("Deleting texture {:?} that was never uploaded", texture);
        }
        self.bound_textures.retain(|_, bound| *bound != texture);
        self.calls.push(BackendCall::DeleteTexture(texture));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.calls.push(BackendCall::SetViewport(viewport));
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.calls.push(BackendCall::Clear(color));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.calls.push(BackendCall::SetDepthTest(enabled));
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.current_program = Some(program);
        self.calls.push(BackendCall::UseProgram(program));
    }

    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: UniformValue) {
        self.calls.push(BackendCall::SetUniform {
            program,
            name: name.to_string(),
            value,
        });
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        self.bound_textures.insert(unit, texture);
        self.calls.push(BackendCall::BindTexture { unit, texture });
    }

    fn unbind_texture(&mut self, unit: u32) {
        self.bound_textures.remove(&unit);
        self.calls.push(BackendCall::UnbindTexture(unit));
    }

    fn draw(&mut self, primitive: Primitive) {
        self.calls.push(BackendCall::Draw(primitive));
    }

    fn release_program(&mut self, program: ProgramHandle) {
        if self.current_program == Some(program) {
            self.current_program = None;
        }
        self.calls.push(BackendCall::ReleaseProgram(program));
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        if !self.live_programs.remove(&program) {
            log::warn!("Deleting program {:?} that was never compiled", program);
        }
        if self.current_program == Some(program) {
            self.current_program = None;
        }
        self.calls.push(BackendCall::DeleteProgram(program));
    }
}
