use anyhow::Result;
use bytemuck::{Pod, Zeroable};

use crate::device::{BindTarget, Driver, Gl};

/// One 2D vertex position, as laid out in the vertex buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// The triangle uploaded at startup.
pub const TRIANGLE: [Position; 3] = [
    Position { x: -0.5, y: -0.5 },
    Position { x: 0.5, y: -0.5 },
    Position { x: 0.0, y: 0.5 },
];

/// Attribute slot the position is fed through.
pub const POSITION_ATTRIBUTE: u32 = 0;

/// Vertex array + buffer holding [`TRIANGLE`].
///
/// Created once and never modified or deleted.
#[derive(Debug)]
pub struct TriangleGeometry {
    vertex_array: u32,
    buffer: u32,
    vertex_count: i32,
}

impl TriangleGeometry {
    /// Creates the vertex array and buffer, uploads the vertices and declares
    /// the attribute layout.
    ///
    /// Both objects are bound only for the duration of the call; prior bindings
    /// are restored on return.
    pub fn upload<D: Driver>(gl: &Gl<D>) -> Result<Self> {
        let vertex_array = gl.call("glGenVertexArrays", |d| d.create_vertex_array());
        anyhow::ensure!(vertex_array != 0, "driver returned no vertex array object");
        let _vao = gl.bind(BindTarget::VertexArray, vertex_array);

        let buffer = gl.call("glGenBuffers", |d| d.create_buffer());
        anyhow::ensure!(buffer != 0, "driver returned no buffer object");
        let _vbo = gl.bind(BindTarget::ArrayBuffer, buffer);

        let bytes: &[u8] = bytemuck::cast_slice(&TRIANGLE);
        gl.call("glBufferData", |d| {
            d.buffer_data(glow::ARRAY_BUFFER, bytes, glow::STATIC_DRAW)
        });

        let stride = std::mem::size_of::<Position>() as i32;
        gl.call("glEnableVertexAttribArray", |d| {
            d.enable_vertex_attrib_array(POSITION_ATTRIBUTE)
        });
        gl.call("glVertexAttribPointer", |d| {
            d.vertex_attrib_pointer_f32(POSITION_ATTRIBUTE, 2, false, stride, 0)
        });

        log::debug!(
            "uploaded triangle: vao #{vertex_array}, vbo #{buffer}, {} bytes",
            bytes.len()
        );

        Ok(Self {
            vertex_array,
            buffer,
            vertex_count: TRIANGLE.len() as i32,
        })
    }

    pub fn vertex_array(&self) -> u32 {
        self.vertex_array
    }

    pub fn buffer(&self) -> u32 {
        self.buffer
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }

    /// Reads the vertex buffer back from the driver as flat `[x, y, ...]` floats.
    pub fn read_back<D: Driver>(&self, gl: &Gl<D>) -> Vec<f32> {
        let mut floats = vec![0.0f32; self.vertex_count as usize * 2];
        let _vbo = gl.bind(BindTarget::ArrayBuffer, self.buffer);
        gl.call("glGetBufferSubData", |d| {
            d.get_buffer_sub_data(glow::ARRAY_BUFFER, 0, bytemuck::cast_slice_mut(&mut floats))
        });
        floats
    }
}
