//! Rendering module
//!
//! Materials, presets and textures live in [`material`], the two program
//! variants in [`pipeline`], the per-frame binding state machine in
//! [`binding`] and the seam to the host's graphics API in [`backend`].

pub mod backend;
pub mod binding;
pub mod camera;
pub mod material;
pub mod pipeline;

pub use backend::{BackendError, GraphicsBackend, Primitive, ProgramHandle, RecordingBackend, UniformValue};
pub use binding::{BoundProgram, FrameUniforms, RenderableBinding};
pub use camera::{Camera, PerspectiveProjection, Viewport, ViewportState};
