use std::sync::Arc;

use cgmath::Vector4;

use crate::animation::ColorPulse;
use crate::buffer::{IndexBuffer, VertexBuffer};
use crate::error::RenderError;
use crate::opengl::GlDriver;
use crate::program::ShaderProgram;
use crate::renderer::Renderer;
use crate::shaders::ShaderProgramSource;
use crate::vertex_array::{VertexArray, VertexLayout};

#[rustfmt::skip]
pub const QUAD_POSITIONS: [f32; 8] = [
    -0.5, -0.5, // 0
     0.5, -0.5, // 1
     0.5,  0.5, // 2
    -0.5,  0.5, // 3
];

#[rustfmt::skip]
pub const QUAD_INDICES: [u32; 6] = [
    0, 1, 2,
    2, 3, 0,
];

/// Name of the colour uniform the fragment stage reads.
pub const COLOR_UNIFORM: &str = "u_Color";

/// The one quad this program draws, with everything it needs on the GPU.
pub struct QuadScene<D: GlDriver> {
    gl: Arc<D>,
    // Field order is release order.
    program: ShaderProgram<D>,
    index_buffer: IndexBuffer<D>,
    vertex_buffer: VertexBuffer<D>,
    vertex_array: VertexArray<D>,
    pulse: ColorPulse,
}

impl<D: GlDriver> QuadScene<D> {
    pub fn new(
        gl: Arc<D>,
        source: &ShaderProgramSource,
        color_step: f32,
    ) -> Result<Self, RenderError> {
        let vertex_array = VertexArray::new(gl.clone())?;
        let vertex_buffer = VertexBuffer::from_slice(gl.clone(), &QUAD_POSITIONS)?;
        vertex_array.add_buffer(&vertex_buffer, &VertexLayout::new().push_f32(2))?;

        let index_buffer = IndexBuffer::new(gl.clone(), &QUAD_INDICES)?;

        let mut program = ShaderProgram::new(gl.clone(), source)?;
        program.bind()?;
        program.set_uniform_4f(COLOR_UNIFORM, Vector4::new(0.8, 0.3, 0.8, 1.0))?;

        tracing::info!(
            vertices = QUAD_POSITIONS.len() / 2,
            indices = index_buffer.count(),
            "quad uploaded"
        );

        Ok(Self {
            gl,
            program,
            index_buffer,
            vertex_buffer,
            vertex_array,
            pulse: ColorPulse::new(color_step),
        })
    }

    /// Draws one frame, then moves the red channel one step along.
    pub fn render(&mut self) -> Result<(), RenderError> {
        Renderer::clear(&*self.gl)?;

        // Still bound from setup or the previous draw.
        self.program.set_uniform_4f(
            COLOR_UNIFORM,
            Vector4::new(self.pulse.value(), 0.3, 0.8, 1.0),
        )?;

        Renderer::draw(
            &*self.gl,
            &self.vertex_array,
            &self.index_buffer,
            &self.program,
        )?;

        self.pulse.advance();
        Ok(())
    }

    pub fn resize(&self, width: u32, height: u32) -> Result<(), RenderError> {
        Renderer::set_viewport(&*self.gl, width, height)?;
        Ok(())
    }

    pub fn red(&self) -> f32 {
        self.pulse.value()
    }

    pub fn vertex_buffer(&self) -> &VertexBuffer<D> {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &IndexBuffer<D> {
        &self.index_buffer
    }

    pub fn program(&self) -> &ShaderProgram<D> {
        &self.program
    }
}
