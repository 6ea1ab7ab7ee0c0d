use crate::buffer::IndexBuffer;
use crate::error::DriverError;
use crate::gl_call;
use crate::opengl::GlDriver;
use crate::program::ShaderProgram;
use crate::vertex_array::VertexArray;

pub struct Renderer;

impl Renderer {
    pub fn clear<D: GlDriver>(gl: &D) -> Result<(), DriverError> {
        gl_call!(gl, gl.clear_color(0.0, 0.0, 0.0, 1.0))?;
        gl_call!(gl, gl.clear(glow::COLOR_BUFFER_BIT))
    }

    /// Keeps rendering inside the window after a resize.
    pub fn set_viewport<D: GlDriver>(gl: &D, width: u32, height: u32) -> Result<(), DriverError> {
        gl_call!(gl, gl.viewport(0, 0, width as i32, height as i32))
    }

    /// Issues one indexed triangle draw over everything in `index_buffer`.
    pub fn draw<D: GlDriver>(
        gl: &D,
        vertex_array: &VertexArray<D>,
        index_buffer: &IndexBuffer<D>,
        program: &ShaderProgram<D>,
    ) -> Result<(), DriverError> {
        program.bind()?;
        vertex_array.bind()?;
        index_buffer.bind()?;

        gl_call!(
            gl,
            gl.draw_elements(
                glow::TRIANGLES,
                index_buffer.count() as i32,
                glow::UNSIGNED_INT,
                0,
            )
        )
    }
}
