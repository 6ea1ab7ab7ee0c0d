use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use cgmath::Vector4;

use crate::error::{DriverError, ShaderError};
use crate::gl_call;
use crate::opengl::GlDriver;
use crate::shaders::{parse_shader, ShaderProgramSource, ShaderStage};

/// Compiles one stage. On any failure the shader object is deleted again;
/// a rejected source returns the driver's diagnostic log in the error.
pub fn compile_shader<D: GlDriver>(
    gl: &D,
    stage: ShaderStage,
    source: &str,
) -> Result<D::Shader, ShaderError> {
    let shader = gl_call!(gl, gl.create_shader(stage.gl_type()))?.map_err(ShaderError::Create)?;

    match compile(gl, stage, shader, source) {
        Ok(()) => Ok(shader),
        Err(err) => {
            let _ = gl_call!(gl, gl.delete_shader(shader));
            Err(err)
        }
    }
}

fn compile<D: GlDriver>(
    gl: &D,
    stage: ShaderStage,
    shader: D::Shader,
    source: &str,
) -> Result<(), ShaderError> {
    gl_call!(gl, gl.shader_source(shader, source))?;
    gl_call!(gl, gl.compile_shader(shader))?;

    if gl.get_shader_compile_status(shader) {
        return Ok(());
    }

    let mut log = gl.get_shader_info_log(shader);
    if log.trim().is_empty() {
        log = "driver returned no diagnostic output".to_string();
    }
    tracing::error!(%stage, log = %log.trim_end(), "failed to compile shader");

    Err(ShaderError::Compile { stage, log })
}

/// Creates a program from two compiled stages, then links and validates it.
/// The program is deleted again if any step fails.
fn link<D: GlDriver>(
    gl: &D,
    vertex: D::Shader,
    fragment: D::Shader,
) -> Result<D::Program, ShaderError> {
    let program = gl_call!(gl, gl.create_program())?.map_err(ShaderError::Create)?;

    match link_stages(gl, program, vertex, fragment) {
        Ok(()) => Ok(program),
        Err(err) => {
            let _ = gl_call!(gl, gl.delete_program(program));
            Err(err)
        }
    }
}

fn link_stages<D: GlDriver>(
    gl: &D,
    program: D::Program,
    vertex: D::Shader,
    fragment: D::Shader,
) -> Result<(), ShaderError> {
    gl_call!(gl, gl.attach_shader(program, vertex))?;
    gl_call!(gl, gl.attach_shader(program, fragment))?;
    gl_call!(gl, gl.link_program(program))?;

    if !gl.get_program_link_status(program) {
        let log = gl.get_program_info_log(program);
        tracing::error!(log = %log.trim_end(), "failed to link shader program");
        return Err(ShaderError::Link { log });
    }

    gl_call!(gl, gl.validate_program(program))?;

    if !gl.get_program_validate_status(program) {
        let log = gl.get_program_info_log(program);
        tracing::error!(log = %log.trim_end(), "shader program failed validation");
        return Err(ShaderError::Validate { log });
    }

    Ok(())
}

/// Deletes every stage object, even after a failed delete. Returns the first
/// driver error.
fn delete_shaders<D: GlDriver>(gl: &D, shaders: &[D::Shader]) -> Result<(), DriverError> {
    let mut result = Ok(());
    for &shader in shaders {
        let deleted = gl_call!(gl, gl.delete_shader(shader));
        result = result.and(deleted);
    }
    result
}

/// A linked vertex + fragment program and the uniform locations looked up on it.
#[derive(Debug)]
pub struct ShaderProgram<D: GlDriver> {
    gl: Arc<D>,
    handle: D::Program,
    uniforms: HashMap<String, D::UniformLocation>,
}

impl<D: GlDriver> ShaderProgram<D> {
    pub fn new(gl: Arc<D>, source: &ShaderProgramSource) -> Result<Self, ShaderError> {
        for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
            if source.stage(stage).trim().is_empty() {
                return Err(ShaderError::MissingStage(stage));
            }
        }

        let vertex = compile_shader(&*gl, ShaderStage::Vertex, &source.vertex)?;
        let fragment = match compile_shader(&*gl, ShaderStage::Fragment, &source.fragment) {
            Ok(fragment) => fragment,
            Err(err) => {
                let _ = delete_shaders(&*gl, &[vertex]);
                return Err(err);
            }
        };

        let linked = link(&*gl, vertex, fragment);

        // The program keeps what it needs from the stage objects.
        let released = delete_shaders(&*gl, &[vertex, fragment]);

        let handle = linked?;
        if let Err(err) = released {
            let _ = gl_call!(gl, gl.delete_program(handle));
            return Err(err.into());
        }
        tracing::debug!(handle = ?handle, "linked shader program");

        Ok(Self {
            gl,
            handle,
            uniforms: HashMap::new(),
        })
    }

    pub fn from_file<P: AsRef<Path>>(gl: Arc<D>, path: P) -> Result<Self, ShaderError> {
        let source = parse_shader(path)?;
        Self::new(gl, &source)
    }

    pub fn bind(&self) -> Result<(), DriverError> {
        gl_call!(self.gl, self.gl.use_program(Some(self.handle)))
    }

    pub fn unbind(&self) -> Result<(), DriverError> {
        gl_call!(self.gl, self.gl.use_program(None))
    }

    pub fn handle(&self) -> D::Program {
        self.handle
    }

    /// Looks up `name` once and serves later requests from the cache.
    pub fn uniform_location(&mut self, name: &str) -> Result<D::UniformLocation, ShaderError> {
        if let Some(location) = self.uniforms.get(name) {
            return Ok(location.clone());
        }

        let location = gl_call!(self.gl, self.gl.get_uniform_location(self.handle, name))?
            .ok_or_else(|| ShaderError::UniformNotFound(name.to_string()))?;

        self.uniforms.insert(name.to_string(), location.clone());
        Ok(location)
    }

    pub fn set_uniform_4f(&mut self, name: &str, value: Vector4<f32>) -> Result<(), ShaderError> {
        let location = self.uniform_location(name)?;
        gl_call!(
            self.gl,
            self.gl
                .uniform_4_f32(Some(&location), value.x, value.y, value.z, value.w)
        )?;
        Ok(())
    }
}

impl<D: GlDriver> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        tracing::debug!(handle = ?self.handle, "releasing shader program");
        let _ = gl_call!(self.gl, self.gl.delete_program(self.handle));
    }
}
