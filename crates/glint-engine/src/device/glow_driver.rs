use std::num::NonZeroU32;

use glow::HasContext;

use super::driver::{Driver, UniformLocation};

/// [`Driver`] backed by a live `glow::Context`.
///
/// The context must be current on the calling thread for the lifetime of this
/// value; `GlWindowHost` guarantees that for the driver it hands out.
///
/// glow uses non-zero typed handles, so a call that names object `0` where the
/// driver expects a real object is dropped here (with a debug line) instead of
/// reaching GL.
pub struct GlowDriver {
    gl: glow::Context,
}

impl GlowDriver {
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// Returns the wrapped context.
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }
}

fn shader(name: u32) -> Option<glow::NativeShader> {
    NonZeroU32::new(name).map(glow::NativeShader)
}

fn program(name: u32) -> Option<glow::NativeProgram> {
    NonZeroU32::new(name).map(glow::NativeProgram)
}

fn buffer(name: u32) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(name).map(glow::NativeBuffer)
}

fn vertex_array(name: u32) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(name).map(glow::NativeVertexArray)
}

fn dropped(call: &str) {
    log::debug!("{call}: object name 0 ignored");
}

impl Driver for GlowDriver {
    fn get_error(&self) -> u32 {
        unsafe { self.gl.get_error() }
    }

    fn get_string(&self, name: u32) -> String {
        unsafe { self.gl.get_parameter_string(name) }
    }

    fn get_integer(&self, pname: u32) -> i32 {
        unsafe { self.gl.get_parameter_i32(pname) }
    }

    fn create_shader(&self, kind: u32) -> u32 {
        match unsafe { self.gl.create_shader(kind) } {
            Ok(s) => s.0.get(),
            Err(e) => {
                log::error!("glCreateShader failed: {e}");
                0
            }
        }
    }

    fn shader_source(&self, name: u32, source: &str) {
        let Some(s) = shader(name) else { return dropped("glShaderSource") };
        unsafe { self.gl.shader_source(s, source) }
    }

    fn compile_shader(&self, name: u32) {
        let Some(s) = shader(name) else { return dropped("glCompileShader") };
        unsafe { self.gl.compile_shader(s) }
    }

    fn shader_compile_status(&self, name: u32) -> bool {
        shader(name).is_some_and(|s| unsafe { self.gl.get_shader_compile_status(s) })
    }

    fn shader_info_log(&self, name: u32) -> String {
        shader(name)
            .map(|s| unsafe { self.gl.get_shader_info_log(s) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, name: u32) {
        // Deleting name 0 is a silent no-op in GL as well.
        if let Some(s) = shader(name) {
            unsafe { self.gl.delete_shader(s) }
        }
    }

    fn create_program(&self) -> u32 {
        match unsafe { self.gl.create_program() } {
            Ok(p) => p.0.get(),
            Err(e) => {
                log::error!("glCreateProgram failed: {e}");
                0
            }
        }
    }

    fn attach_shader(&self, program_name: u32, shader_name: u32) {
        let (Some(p), Some(s)) = (program(program_name), shader(shader_name)) else {
            return dropped("glAttachShader");
        };
        unsafe { self.gl.attach_shader(p, s) }
    }

    fn link_program(&self, name: u32) {
        let Some(p) = program(name) else { return dropped("glLinkProgram") };
        unsafe { self.gl.link_program(p) }
    }

    fn validate_program(&self, name: u32) {
        let Some(p) = program(name) else { return dropped("glValidateProgram") };
        unsafe { self.gl.validate_program(p) }
    }

    fn program_link_status(&self, name: u32) -> bool {
        program(name).is_some_and(|p| unsafe { self.gl.get_program_link_status(p) })
    }

    fn program_validate_status(&self, name: u32) -> bool {
        program(name).is_some_and(|p| unsafe {
            self.gl.get_program_parameter_i32(p, glow::VALIDATE_STATUS) != 0
        })
    }

    fn program_info_log(&self, name: u32) -> String {
        program(name)
            .map(|p| unsafe { self.gl.get_program_info_log(p) })
            .unwrap_or_default()
    }

    fn use_program(&self, name: u32) {
        unsafe { self.gl.use_program(program(name)) }
    }

    fn create_vertex_array(&self) -> u32 {
        match unsafe { self.gl.create_vertex_array() } {
            Ok(v) => v.0.get(),
            Err(e) => {
                log::error!("glGenVertexArrays failed: {e}");
                0
            }
        }
    }

    fn bind_vertex_array(&self, name: u32) {
        unsafe { self.gl.bind_vertex_array(vertex_array(name)) }
    }

    fn create_buffer(&self) -> u32 {
        match unsafe { self.gl.create_buffer() } {
            Ok(b) => b.0.get(),
            Err(e) => {
                log::error!("glGenBuffers failed: {e}");
                0
            }
        }
    }

    fn bind_buffer(&self, target: u32, name: u32) {
        unsafe { self.gl.bind_buffer(target, buffer(name)) }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.gl.buffer_data_u8_slice(target, data, usage) }
    }

    fn get_buffer_sub_data(&self, target: u32, offset: i32, dst: &mut [u8]) {
        unsafe { self.gl.get_buffer_sub_data(target, offset, dst) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, glow::FLOAT, normalized, stride, offset)
        }
    }

    fn get_uniform_location(&self, name: u32, uniform: &str) -> Option<UniformLocation> {
        let p = program(name)?;
        unsafe { self.gl.get_uniform_location(p, uniform) }.map(|l| UniformLocation(l.0))
    }

    fn uniform_1_f32(&self, location: Option<UniformLocation>, value: f32) {
        let location = location.map(|l| glow::NativeUniformLocation(l.0));
        unsafe { self.gl.uniform_1_f32(location.as_ref(), value) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear(&self, mask: u32) {
        unsafe { self.gl.clear(mask) }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode, first, count) }
    }
}
