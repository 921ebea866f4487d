/// Opaque uniform location returned by the driver.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub u32);

/// The set of graphics-driver entry points used by the engine.
///
/// Objects are addressed by raw GL names; `0` means "no object" everywhere,
/// matching the driver's own convention (`bind_*(0)` unbinds, `create_*`
/// returns `0` on failure). Enum arguments are GL enums (`glow::*` constants).
///
/// Implementations must never panic on bad input. Invalid calls are expected to
/// record an error code that a later `get_error` returns, which is what the
/// diagnostics layer in [`super::Gl`] relies on.
pub trait Driver {
    /// Pops one code from the error queue; `glow::NO_ERROR` when empty.
    fn get_error(&self) -> u32;

    fn get_string(&self, name: u32) -> String;
    fn get_integer(&self, pname: u32) -> i32;

    // shaders
    fn create_shader(&self, kind: u32) -> u32;
    fn shader_source(&self, shader: u32, source: &str);
    fn compile_shader(&self, shader: u32);
    fn shader_compile_status(&self, shader: u32) -> bool;
    fn shader_info_log(&self, shader: u32) -> String;
    fn delete_shader(&self, shader: u32);

    // programs
    fn create_program(&self) -> u32;
    fn attach_shader(&self, program: u32, shader: u32);
    fn link_program(&self, program: u32);
    fn validate_program(&self, program: u32);
    fn program_link_status(&self, program: u32) -> bool;
    fn program_validate_status(&self, program: u32) -> bool;
    fn program_info_log(&self, program: u32) -> String;
    fn use_program(&self, program: u32);

    // vertex arrays + buffers
    fn create_vertex_array(&self) -> u32;
    fn bind_vertex_array(&self, vertex_array: u32);
    fn create_buffer(&self) -> u32;
    fn bind_buffer(&self, target: u32, buffer: u32);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn get_buffer_sub_data(&self, target: u32, offset: i32, dst: &mut [u8]);
    fn enable_vertex_attrib_array(&self, index: u32);
    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );

    // uniforms
    fn get_uniform_location(&self, program: u32, name: &str) -> Option<UniformLocation>;

    /// Writes a float uniform of the current program. `None` is a no-op.
    fn uniform_1_f32(&self, location: Option<UniformLocation>, value: f32);

    // framebuffer + draw
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: u32);
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);
}
