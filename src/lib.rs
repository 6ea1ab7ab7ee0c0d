//! Draws one colour-cycling quad with OpenGL.
//!
//! The GPU side lives behind [`opengl::GlDriver`]; every object it hands out is
//! owned by exactly one wrapper that releases it on drop, and every driver call
//! goes through [`gl_call!`] so errors are pinned on the call that raised them.

pub mod animation;
pub mod buffer;
pub mod config;
pub mod debug;
pub mod error;
pub mod logging;
pub mod opengl;
pub mod program;
pub mod renderer;
pub mod scene;
pub mod shaders;
pub mod vertex_array;

#[cfg(test)]
mod stub;

pub use buffer::{IndexBuffer, VertexBuffer};
pub use config::AppConfig;
pub use error::{DriverError, GlError, RenderError, ShaderError};
pub use opengl::GlDriver;
pub use program::ShaderProgram;
pub use scene::QuadScene;
pub use shaders::{parse_shader, ShaderProgramSource, ShaderStage};
