use std::sync::Arc;

use crate::buffer::VertexBuffer;
use crate::error::{DriverError, RenderError};
use crate::gl_call;
use crate::opengl::GlDriver;

/// One vertex attribute inside an interleaved vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub index: u32,
    pub size: i32,
    pub gl_type: u32,
    pub normalized: bool,
    pub offset: usize,
}

impl Layout {
    pub fn new(index: u32, size: i32, gl_type: u32, normalized: bool, offset: usize) -> Self {
        Self {
            index,
            size,
            gl_type,
            normalized,
            offset,
        }
    }

    fn byte_size(&self) -> usize {
        let component = match self.gl_type {
            glow::UNSIGNED_SHORT | glow::SHORT => 2,
            glow::UNSIGNED_BYTE | glow::BYTE => 1,
            _ => 4,
        };
        self.size as usize * component
    }
}

/// Attributes of a vertex buffer in declaration order, with offsets computed
/// as they are pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    layouts: Vec<Layout>,
    stride: usize,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute of `count` floats.
    pub fn push_f32(mut self, count: i32) -> Self {
        let layout = Layout::new(
            self.layouts.len() as u32,
            count,
            glow::FLOAT,
            false,
            self.stride,
        );
        self.stride += layout.byte_size();
        self.layouts.push(layout);
        self
    }

    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    /// Bytes from one vertex to the next.
    pub fn stride(&self) -> usize {
        self.stride
    }
}

/// Sole owner of a vertex array object.
#[derive(Debug)]
pub struct VertexArray<D: GlDriver> {
    gl: Arc<D>,
    handle: D::VertexArray,
}

impl<D: GlDriver> VertexArray<D> {
    pub fn new(gl: Arc<D>) -> Result<Self, RenderError> {
        let handle = gl.create_vertex_array().map_err(RenderError::Allocation)?;
        let vertex_array = Self { gl, handle };
        vertex_array.bind()?;

        tracing::debug!(handle = ?handle, "created vertex array");
        Ok(vertex_array)
    }

    /// Records where each attribute of `layout` lives inside `buffer`.
    pub fn add_buffer(
        &self,
        buffer: &VertexBuffer<D>,
        layout: &VertexLayout,
    ) -> Result<(), DriverError> {
        self.bind()?;
        buffer.bind()?;

        let stride = layout.stride() as i32;
        for attribute in layout.layouts() {
            gl_call!(self.gl, self.gl.enable_vertex_attrib_array(attribute.index))?;
            gl_call!(
                self.gl,
                self.gl.vertex_attrib_pointer_f32(
                    attribute.index,
                    attribute.size,
                    attribute.gl_type,
                    attribute.normalized,
                    stride,
                    attribute.offset as i32,
                )
            )?;
        }

        Ok(())
    }

    pub fn bind(&self) -> Result<(), DriverError> {
        gl_call!(self.gl, self.gl.bind_vertex_array(Some(self.handle)))
    }

    pub fn unbind(&self) -> Result<(), DriverError> {
        gl_call!(self.gl, self.gl.bind_vertex_array(None))
    }

    pub fn handle(&self) -> D::VertexArray {
        self.handle
    }
}

impl<D: GlDriver> Drop for VertexArray<D> {
    fn drop(&mut self) {
        tracing::debug!(handle = ?self.handle, "releasing vertex array");
        let _ = gl_call!(self.gl, self.gl.delete_vertex_array(self.handle));
    }
}
