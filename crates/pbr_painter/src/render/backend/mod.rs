//! Backend abstraction traits for the rendering system
//!
//! This module defines the trait a host graphics API must implement so the
//! painter can compile its programs, upload textures and issue per-frame
//! binding and draw calls without knowing which API sits underneath.

use std::path::Path;

use crate::assets::ImageData;
use crate::foundation::math::{Mat4, Vec3};
use crate::render::camera::Viewport;
use crate::render::material::{TextureHandle, TextureParams};

pub mod recording;

pub use recording::{BackendCall, RecordingBackend};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors reported by a graphics backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Shader compilation or program linking failed
    #[error("Program compilation failed: {0}")]
    CompilationFailed(String),

    /// Texture upload failed
    #[error("Texture upload failed: {0}")]
    UploadFailed(String),
}

/// Handle to a compiled program stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u64);

/// Value pushed to a named program input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// 4x4 matrix
    Mat4(Mat4),
    /// 3-component vector or RGB colour
    Vec3(Vec3),
    /// Scalar
    Float(f32),
    /// Boolean flag
    Bool(bool),
    /// Texture unit a sampler reads from
    Sampler(u32),
}

/// Geometry the painter can ask the host to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Subdivided icosahedron
    Icosahedron {
        /// Subdivision iterations
        iterations: u8,
    },
}

/// Main rendering backend trait
///
/// All calls happen on the thread owning the graphics context. Texture and
/// program lifetimes are owned by the backend; the painter only holds handles.
pub trait GraphicsBackend {
    /// Compile and link a program from a vertex and fragment shader file
    fn compile_program(&mut self, vertex: &Path, fragment: &Path) -> BackendResult<ProgramHandle>;

    /// Upload decoded pixels for `texture`
    fn upload_texture(
        &mut self,
        texture: TextureHandle,
        image: &ImageData,
        params: &TextureParams,
    ) -> BackendResult<()>;

    /// Free the GPU storage of `texture`
    fn delete_texture(&mut self, texture: TextureHandle);

    /// Set the viewport rectangle
    fn set_viewport(&mut self, viewport: Viewport);

    /// Clear colour and depth of the current framebuffer
    fn clear(&mut self, color: [f32; 4]);

    /// Enable or disable depth testing
    fn set_depth_test(&mut self, enabled: bool);

    /// Make `program` current
    fn use_program(&mut self, program: ProgramHandle);

    /// Push a value to a named input of `program`
    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: UniformValue);

    /// Bind `texture` to a texture unit
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    /// Clear a texture unit
    fn unbind_texture(&mut self, unit: u32);

    /// Issue a draw call with the current program
    fn draw(&mut self, primitive: Primitive);

    /// Stop using `program`
    fn release_program(&mut self, program: ProgramHandle);

    /// Destroy a compiled program
    fn delete_program(&mut self, program: ProgramHandle);
}
