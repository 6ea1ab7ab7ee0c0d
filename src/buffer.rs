use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{DriverError, RenderError};
use crate::gl_call;
use crate::opengl::GlDriver;

/// Binding point a [`Buffer`] is created for.
pub trait BufferTarget {
    const TARGET: u32;
    const NAME: &'static str;
}

#[derive(Debug)]
pub enum ArrayBuffer {}

impl BufferTarget for ArrayBuffer {
    const TARGET: u32 = glow::ARRAY_BUFFER;
    const NAME: &'static str = "vertex";
}

#[derive(Debug)]
pub enum ElementArrayBuffer {}

impl BufferTarget for ElementArrayBuffer {
    const TARGET: u32 = glow::ELEMENT_ARRAY_BUFFER;
    const NAME: &'static str = "index";
}

/// Sole owner of one static GPU buffer.
///
/// The data is uploaded once on creation and the buffer is deleted exactly
/// once when the wrapper is dropped.
#[derive(Debug)]
pub struct Buffer<D: GlDriver, T: BufferTarget> {
    gl: Arc<D>,
    handle: D::Buffer,
    size: usize,
    _target: PhantomData<T>,
}

pub type VertexBuffer<D> = Buffer<D, ArrayBuffer>;

impl<D: GlDriver, T: BufferTarget> Buffer<D, T> {
    pub fn new(gl: Arc<D>, data: &[u8]) -> Result<Self, RenderError> {
        let handle = gl.create_buffer().map_err(RenderError::Allocation)?;

        // Owned from here on, so a failed upload still releases the handle.
        let buffer = Self {
            gl,
            handle,
            size: data.len(),
            _target: PhantomData,
        };

        gl_call!(buffer.gl, buffer.gl.bind_buffer(T::TARGET, Some(handle)))?;
        gl_call!(
            buffer.gl,
            buffer
                .gl
                .buffer_data_u8_slice(T::TARGET, data, glow::STATIC_DRAW)
        )?;

        tracing::debug!(kind = T::NAME, handle = ?handle, bytes = data.len(), "created buffer");
        Ok(buffer)
    }

    pub fn from_slice<P: bytemuck::Pod>(gl: Arc<D>, data: &[P]) -> Result<Self, RenderError> {
        Self::new(gl, bytemuck::cast_slice(data))
    }

    pub fn bind(&self) -> Result<(), DriverError> {
        gl_call!(self.gl, self.gl.bind_buffer(T::TARGET, Some(self.handle)))
    }

    pub fn unbind(&self) -> Result<(), DriverError> {
        gl_call!(self.gl, self.gl.bind_buffer(T::TARGET, None))
    }

    pub fn handle(&self) -> D::Buffer {
        self.handle
    }

    /// Size of the allocation in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl<D: GlDriver, T: BufferTarget> Drop for Buffer<D, T> {
    fn drop(&mut self) {
        tracing::debug!(kind = T::NAME, handle = ?self.handle, "releasing buffer");
        // Any error has already been logged by the check.
        let _ = gl_call!(self.gl, self.gl.delete_buffer(self.handle));
    }
}

/// Index data for indexed draws, with the number of indices it holds.
#[derive(Debug)]
pub struct IndexBuffer<D: GlDriver> {
    buffer: Buffer<D, ElementArrayBuffer>,
    count: usize,
}

impl<D: GlDriver> IndexBuffer<D> {
    pub fn new(gl: Arc<D>, indices: &[u32]) -> Result<Self, RenderError> {
        Ok(Self {
            buffer: Buffer::from_slice(gl, indices)?,
            count: indices.len(),
        })
    }

    pub fn bind(&self) -> Result<(), DriverError> {
        self.buffer.bind()
    }

    pub fn unbind(&self) -> Result<(), DriverError> {
        self.buffer.unbind()
    }

    pub fn handle(&self) -> D::Buffer {
        self.buffer.handle()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn size(&self) -> usize {
        self.buffer.size()
    }
}
