use std::path::PathBuf;

use thiserror::Error;

use crate::shaders::ShaderStage;

/// A single error flag reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GlError {
    #[error("invalid enum")]
    InvalidEnum,
    #[error("invalid value")]
    InvalidValue,
    #[error("invalid operation")]
    InvalidOperation,
    #[error("stack overflow")]
    StackOverflow,
    #[error("stack underflow")]
    StackUnderflow,
    #[error("out of memory")]
    OutOfMemory,
    #[error("invalid framebuffer operation")]
    InvalidFramebufferOperation,
    #[error("context lost")]
    ContextLost,
    #[error("unknown error")]
    Unknown(u32),
}

impl GlError {
    /// Decodes a value returned by `glGetError`. `NO_ERROR` decodes to `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        let error = match code {
            glow::NO_ERROR => return None,
            glow::INVALID_ENUM => GlError::InvalidEnum,
            glow::INVALID_VALUE => GlError::InvalidValue,
            glow::INVALID_OPERATION => GlError::InvalidOperation,
            glow::STACK_OVERFLOW => GlError::StackOverflow,
            glow::STACK_UNDERFLOW => GlError::StackUnderflow,
            glow::OUT_OF_MEMORY => GlError::OutOfMemory,
            glow::INVALID_FRAMEBUFFER_OPERATION => GlError::InvalidFramebufferOperation,
            glow::CONTEXT_LOST => GlError::ContextLost,
            other => GlError::Unknown(other),
        };

        Some(error)
    }

    pub fn code(&self) -> u32 {
        match self {
            GlError::InvalidEnum => glow::INVALID_ENUM,
            GlError::InvalidValue => glow::INVALID_VALUE,
            GlError::InvalidOperation => glow::INVALID_OPERATION,
            GlError::StackOverflow => glow::STACK_OVERFLOW,
            GlError::StackUnderflow => glow::STACK_UNDERFLOW,
            GlError::OutOfMemory => glow::OUT_OF_MEMORY,
            GlError::InvalidFramebufferOperation => glow::INVALID_FRAMEBUFFER_OPERATION,
            GlError::ContextLost => glow::CONTEXT_LOST,
            GlError::Unknown(code) => *code,
        }
    }
}

/// A driver call that left one or more error flags behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[OpenGL Error] ({}): {call} {file}:{line}", describe_codes(.errors))]
pub struct DriverError {
    pub call: &'static str,
    pub file: &'static str,
    pub line: u32,
    pub errors: Vec<GlError>,
}

fn describe_codes(errors: &[GlError]) -> String {
    errors
        .iter()
        .map(|error| format!("{:#06x} {error}", error.code()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shader source has no {0} section")]
    MissingStage(ShaderStage),

    #[error("failed to create shader object: {0}")]
    Create(String),

    #[error("failed to compile {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("failed to link shader program: {log}")]
    Link { log: String },

    #[error("shader program failed validation: {log}")]
    Validate { log: String },

    #[error("could not find the uniform called '{0}'")]
    UniformNotFound(String),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to allocate GPU resource: {0}")]
    Allocation(String),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Shader(#[from] ShaderError),
}
