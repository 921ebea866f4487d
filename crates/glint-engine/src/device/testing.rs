//! In-memory stand-in for a GL driver.
//!
//! Models just enough of the GL object and error model for the engine's tests:
//! an error queue, shader/program/buffer/vertex-array tables, binding points,
//! a crude GLSL checker and an active-uniform table per linked program.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use super::diagnostics::{DiagnosticEvent, DiagnosticSink};
use super::driver::{Driver, UniformLocation};

/// Vertex shader that moves the triangle by `offset`.
pub(crate) const OFFSET_VS: &str = "#version 410 core
layout(location = 0) in vec2 position;
uniform float offset;
void main() {
    gl_Position = vec4(position.x + offset, position.y, 0.0, 1.0);
}
";

/// Vertex shader without any uniform.
pub(crate) const PASSTHROUGH_VS: &str = "#version 410 core
layout(location = 0) in vec2 position;
void main() {
    gl_Position = vec4(position, 0.0, 1.0);
}
";

/// Fragment shader without any uniform.
pub(crate) const SOLID_FS: &str = "#version 410 core
out vec4 color;
void main() {
    color = vec4(1.0, 0.5, 0.2, 1.0);
}
";

/// Fragment shader missing its closing brace.
pub(crate) const BROKEN_FS: &str = "#version 410 core
out vec4 color;
void main() {
    color = vec4(1.0, 0.5, 0.2, 1.0);
";

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct DrawCall {
    pub program: u32,
    pub vertex_array: u32,
    pub mode: u32,
    pub first: i32,
    pub count: i32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct AttribPointer {
    pub size: i32,
    pub normalized: bool,
    pub stride: i32,
    pub offset: i32,
    pub buffer: u32,
}

struct FakeShader {
    kind: u32,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Clone)]
struct Attachment {
    shader: u32,
    kind: u32,
    compiled: bool,
    source: String,
}

#[derive(Default)]
struct FakeProgram {
    attached: Vec<Attachment>,
    linked: bool,
    validated: bool,
    log: String,
    uniforms: Vec<String>,
}

#[derive(Default)]
struct FakeVertexArray {
    enabled: Vec<u32>,
    pointers: HashMap<u32, AttribPointer>,
}

#[derive(Default)]
struct State {
    next_name: u32,
    errors: VecDeque<u32>,
    stuck_error: Option<u32>,
    refuse_creation: bool,
    forced_link_failure: Option<String>,
    forced_validate_failure: Option<String>,

    shaders: HashMap<u32, FakeShader>,
    programs: HashMap<u32, FakeProgram>,
    vertex_arrays: HashMap<u32, FakeVertexArray>,
    buffers: HashMap<u32, Vec<u8>>,

    bound_vertex_array: u32,
    bound_array_buffer: u32,
    current_program: u32,

    uniform_values: HashMap<(u32, u32), f32>,
    clear_color: [f32; 4],
    clears: usize,
    draws: Vec<DrawCall>,
    viewport: Option<[i32; 4]>,
    journal: Vec<&'static str>,
}

impl State {
    fn fail(&mut self, code: u32) {
        self.errors.push_back(code);
    }

    fn next(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }
}

#[derive(Default)]
pub(crate) struct FakeDriver {
    state: RefCell<State>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_error(&self, code: u32) {
        self.state.borrow_mut().fail(code);
    }

    /// Makes `get_error` return `code` forever (`None` restores normal behavior).
    pub fn set_stuck_error(&self, code: Option<u32>) {
        self.state.borrow_mut().stuck_error = code;
    }

    /// Makes every `create_*` call return 0.
    pub fn refuse_creation(&self, refuse: bool) {
        self.state.borrow_mut().refuse_creation = refuse;
    }

    /// Makes every later link fail with `log`, even with both stages compiled.
    pub fn fail_link(&self, log: &str) {
        self.state.borrow_mut().forced_link_failure = Some(log.to_string());
    }

    /// Makes every later validation of a linked program fail with `log`.
    pub fn fail_validate(&self, log: &str) {
        self.state.borrow_mut().forced_validate_failure = Some(log.to_string());
    }

    /// Names of the driver calls made so far, in order (`get_error` and
    /// `get_integer` excluded).
    pub fn journal(&self) -> Vec<&'static str> {
        self.state.borrow().journal.clone()
    }

    pub fn buffer_contents(&self, buffer: u32) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&buffer).cloned()
    }

    pub fn attrib_enabled(&self, vertex_array: u32, index: u32) -> bool {
        self.state
            .borrow()
            .vertex_arrays
            .get(&vertex_array)
            .is_some_and(|v| v.enabled.contains(&index))
    }

    pub fn attrib_pointer(&self, vertex_array: u32, index: u32) -> Option<AttribPointer> {
        self.state
            .borrow()
            .vertex_arrays
            .get(&vertex_array)
            .and_then(|v| v.pointers.get(&index).copied())
    }

    pub fn uniform_value(&self, program: u32, name: &str) -> Option<f32> {
        let s = self.state.borrow();
        let index = s.programs.get(&program)?.uniforms.iter().position(|u| u == name)?;
        s.uniform_values.get(&(program, index as u32)).copied()
    }

    pub fn attached(&self, program: u32) -> Vec<u32> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.attached.iter().map(|a| a.shader).collect())
            .unwrap_or_default()
    }

    /// Number of shader objects not yet deleted.
    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.state.borrow().draws.clone()
    }

    pub fn clears(&self) -> usize {
        self.state.borrow().clears
    }

    pub fn clear_color_value(&self) -> [f32; 4] {
        self.state.borrow().clear_color
    }

    pub fn viewport_value(&self) -> Option<[i32; 4]> {
        self.state.borrow().viewport
    }

    fn log(&self, call: &'static str) -> std::cell::RefMut<'_, State> {
        let mut s = self.state.borrow_mut();
        s.journal.push(call);
        s
    }
}

/// Rough stand-in for a GLSL front end: balanced delimiters, no stray
/// characters, a `main` function.
fn check_glsl(source: &str) -> Result<(), String> {
    let mut depth = 0i32;
    for (i, line) in source.lines().enumerate() {
        let line_no = i + 1;
        for ch in line.chars() {
            match ch {
                '{' | '(' => depth += 1,
                '}' | ')' => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(format!(
                            "ERROR: 0:{line_no}: '{ch}' : syntax error, unexpected '{ch}'"
                        ));
                    }
                }
                '$' | '@' | '`' => {
                    return Err(format!(
                        "ERROR: 0:{line_no}: '{ch}' : syntax error, unexpected character"
                    ));
                }
                _ => {}
            }
        }
    }

    if depth != 0 {
        let last = source.lines().count().max(1);
        return Err(format!(
            "ERROR: 0:{last}: '' : syntax error, unexpected end of file"
        ));
    }
    if !source.contains("void main") {
        return Err("ERROR: 0:1: 'main' : function not defined".to_string());
    }
    Ok(())
}

fn declared_uniforms(source: &str, out: &mut Vec<String>) {
    for line in source.lines() {
        let mut words = line.split_whitespace();
        if words.next() != Some("uniform") {
            continue;
        }
        let Some(name) = words.nth(1) else { continue };
        let name = name.trim_end_matches(';').to_string();
        if !name.is_empty() && !out.contains(&name) {
            out.push(name);
        }
    }
}

impl Driver for FakeDriver {
    fn get_error(&self) -> u32 {
        let mut s = self.state.borrow_mut();
        if let Some(code) = s.stuck_error {
            return code;
        }
        s.errors.pop_front().unwrap_or(glow::NO_ERROR)
    }

    fn get_string(&self, name: u32) -> String {
        let mut s = self.log("get_string");
        match name {
            glow::VERSION => "4.1 glint-fake".to_string(),
            glow::RENDERER => "glint fake driver".to_string(),
            glow::SHADING_LANGUAGE_VERSION => "4.10".to_string(),
            _ => {
                s.fail(glow::INVALID_ENUM);
                String::new()
            }
        }
    }

    fn get_integer(&self, pname: u32) -> i32 {
        let mut s = self.state.borrow_mut();
        let value = match pname {
            glow::VERTEX_ARRAY_BINDING => s.bound_vertex_array,
            glow::ARRAY_BUFFER_BINDING => s.bound_array_buffer,
            glow::CURRENT_PROGRAM => s.current_program,
            _ => {
                s.fail(glow::INVALID_ENUM);
                0
            }
        };
        value as i32
    }

    fn create_shader(&self, kind: u32) -> u32 {
        let mut s = self.log("create_shader");
        if s.refuse_creation {
            return 0;
        }
        if kind != glow::VERTEX_SHADER && kind != glow::FRAGMENT_SHADER {
            s.fail(glow::INVALID_ENUM);
            return 0;
        }
        let name = s.next();
        s.shaders.insert(
            name,
            FakeShader { kind, source: String::new(), compiled: false, log: String::new() },
        );
        name
    }

    fn shader_source(&self, shader: u32, source: &str) {
        let mut s = self.log("shader_source");
        match s.shaders.get_mut(&shader) {
            Some(sh) => sh.source = source.to_string(),
            None => s.fail(glow::INVALID_VALUE),
        }
    }

    fn compile_shader(&self, shader: u32) {
        let mut s = self.log("compile_shader");
        match s.shaders.get_mut(&shader) {
            Some(sh) => match check_glsl(&sh.source) {
                Ok(()) => {
                    sh.compiled = true;
                    sh.log.clear();
                }
                Err(log) => {
                    sh.compiled = false;
                    sh.log = log;
                }
            },
            None => s.fail(glow::INVALID_VALUE),
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        let mut s = self.log("shader_compile_status");
        match s.shaders.get(&shader) {
            Some(sh) => sh.compiled,
            None => {
                s.fail(glow::INVALID_VALUE);
                false
            }
        }
    }

    fn shader_info_log(&self, shader: u32) -> String {
        let mut s = self.log("shader_info_log");
        match s.shaders.get(&shader) {
            Some(sh) => sh.log.clone(),
            None => {
                s.fail(glow::INVALID_VALUE);
                String::new()
            }
        }
    }

    fn delete_shader(&self, shader: u32) {
        let mut s = self.log("delete_shader");
        if shader != 0 && s.shaders.remove(&shader).is_none() {
            s.fail(glow::INVALID_VALUE);
        }
    }

    fn create_program(&self) -> u32 {
        let mut s = self.log("create_program");
        if s.refuse_creation {
            return 0;
        }
        let name = s.next();
        s.programs.insert(name, FakeProgram::default());
        name
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut s = self.log("attach_shader");
        let Some(attachment) = s.shaders.get(&shader).map(|sh| Attachment {
            shader,
            kind: sh.kind,
            compiled: sh.compiled,
            source: sh.source.clone(),
        }) else {
            s.fail(glow::INVALID_VALUE);
            return;
        };
        let Some(p) = s.programs.get_mut(&program) else {
            s.fail(glow::INVALID_VALUE);
            return;
        };
        if p.attached.iter().any(|a| a.shader == shader) {
            s.fail(glow::INVALID_OPERATION);
            return;
        }
        p.attached.push(attachment);
    }

    fn link_program(&self, program: u32) {
        let mut s = self.log("link_program");
        let forced = s.forced_link_failure.clone();
        let Some(p) = s.programs.get_mut(&program) else {
            s.fail(glow::INVALID_VALUE);
            return;
        };

        let stage = |kind: u32| p.attached.iter().find(|a| a.kind == kind).cloned();
        let problem = match (stage(glow::VERTEX_SHADER), stage(glow::FRAGMENT_SHADER)) {
            (None, _) => Some("error: no vertex shader attached".to_string()),
            (_, None) => Some("error: no fragment shader attached".to_string()),
            (Some(v), Some(f)) if !v.compiled || !f.compiled => {
                Some("error: attached shader is not compiled".to_string())
            }
            (Some(_), Some(_)) if forced.is_some() => forced,
            (Some(v), Some(f)) => {
                let mut uniforms = Vec::new();
                declared_uniforms(&v.source, &mut uniforms);
                declared_uniforms(&f.source, &mut uniforms);
                p.uniforms = uniforms;
                None
            }
        };

        p.linked = problem.is_none();
        p.log = problem.unwrap_or_default();
        if !p.linked {
            p.uniforms.clear();
        }
    }

    fn validate_program(&self, program: u32) {
        let mut s = self.log("validate_program");
        let forced = s.forced_validate_failure.clone();
        let Some(p) = s.programs.get_mut(&program) else {
            s.fail(glow::INVALID_VALUE);
            return;
        };
        p.validated = p.linked && forced.is_none();
        if !p.linked {
            p.log.push_str("\nvalidation failed: program is not linked");
        } else if let Some(reason) = forced {
            p.log.push_str(&reason);
        }
    }

    fn program_link_status(&self, program: u32) -> bool {
        let mut s = self.log("program_link_status");
        match s.programs.get(&program) {
            Some(p) => p.linked,
            None => {
                s.fail(glow::INVALID_VALUE);
                false
            }
        }
    }

    fn program_validate_status(&self, program: u32) -> bool {
        let mut s = self.log("program_validate_status");
        match s.programs.get(&program) {
            Some(p) => p.validated,
            None => {
                s.fail(glow::INVALID_VALUE);
                false
            }
        }
    }

    fn program_info_log(&self, program: u32) -> String {
        let mut s = self.log("program_info_log");
        match s.programs.get(&program) {
            Some(p) => p.log.clone(),
            None => {
                s.fail(glow::INVALID_VALUE);
                String::new()
            }
        }
    }

    fn use_program(&self, program: u32) {
        let mut s = self.log("use_program");
        if program == 0 {
            s.current_program = 0;
            return;
        }
        match s.programs.get(&program).map(|p| p.linked) {
            Some(true) => s.current_program = program,
            Some(false) => s.fail(glow::INVALID_OPERATION),
            None => s.fail(glow::INVALID_VALUE),
        }
    }

    fn create_vertex_array(&self) -> u32 {
        let mut s = self.log("create_vertex_array");
        if s.refuse_creation {
            return 0;
        }
        let name = s.next();
        s.vertex_arrays.insert(name, FakeVertexArray::default());
        name
    }

    fn bind_vertex_array(&self, vertex_array: u32) {
        let mut s = self.log("bind_vertex_array");
        if vertex_array == 0 || s.vertex_arrays.contains_key(&vertex_array) {
            s.bound_vertex_array = vertex_array;
        } else {
            s.fail(glow::INVALID_OPERATION);
        }
    }

    fn create_buffer(&self) -> u32 {
        let mut s = self.log("create_buffer");
        if s.refuse_creation {
            return 0;
        }
        let name = s.next();
        s.buffers.insert(name, Vec::new());
        name
    }

    fn bind_buffer(&self, target: u32, buffer: u32) {
        let mut s = self.log("bind_buffer");
        if target != glow::ARRAY_BUFFER {
            s.fail(glow::INVALID_ENUM);
        } else if buffer == 0 || s.buffers.contains_key(&buffer) {
            s.bound_array_buffer = buffer;
        } else {
            s.fail(glow::INVALID_OPERATION);
        }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        let mut s = self.log("buffer_data");
        let usage_ok = matches!(usage, glow::STATIC_DRAW | glow::DYNAMIC_DRAW | glow::STREAM_DRAW);
        if target != glow::ARRAY_BUFFER || !usage_ok {
            s.fail(glow::INVALID_ENUM);
            return;
        }
        let bound = s.bound_array_buffer;
        match s.buffers.get_mut(&bound) {
            Some(contents) if bound != 0 => *contents = data.to_vec(),
            _ => s.fail(glow::INVALID_OPERATION),
        }
    }

    fn get_buffer_sub_data(&self, target: u32, offset: i32, dst: &mut [u8]) {
        let mut s = self.log("get_buffer_sub_data");
        if target != glow::ARRAY_BUFFER {
            s.fail(glow::INVALID_ENUM);
            return;
        }
        let Ok(start) = usize::try_from(offset) else {
            s.fail(glow::INVALID_VALUE);
            return;
        };
        let bound = s.bound_array_buffer;
        let copied = match s.buffers.get(&bound) {
            Some(contents) if bound != 0 => match contents.get(start..start + dst.len()) {
                Some(src) => {
                    dst.copy_from_slice(src);
                    Ok(())
                }
                None => Err(glow::INVALID_VALUE),
            },
            _ => Err(glow::INVALID_OPERATION),
        };
        if let Err(code) = copied {
            s.fail(code);
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        let mut s = self.log("enable_vertex_attrib_array");
        if index >= 16 {
            s.fail(glow::INVALID_VALUE);
            return;
        }
        let bound = s.bound_vertex_array;
        match s.vertex_arrays.get_mut(&bound) {
            Some(vao) if bound != 0 => {
                if !vao.enabled.contains(&index) {
                    vao.enabled.push(index);
                }
            }
            _ => s.fail(glow::INVALID_OPERATION),
        }
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        let mut s = self.log("vertex_attrib_pointer");
        if index >= 16 || !(1..=4).contains(&size) || stride < 0 {
            s.fail(glow::INVALID_VALUE);
            return;
        }
        let (bound_vao, buffer) = (s.bound_vertex_array, s.bound_array_buffer);
        if bound_vao == 0 || buffer == 0 {
            s.fail(glow::INVALID_OPERATION);
            return;
        }
        if let Some(vao) = s.vertex_arrays.get_mut(&bound_vao) {
            vao.pointers
                .insert(index, AttribPointer { size, normalized, stride, offset, buffer });
        }
    }

    fn get_uniform_location(&self, program: u32, name: &str) -> Option<UniformLocation> {
        let mut s = self.log("get_uniform_location");
        let Some(p) = s.programs.get(&program) else {
            s.fail(glow::INVALID_VALUE);
            return None;
        };
        if !p.linked {
            s.fail(glow::INVALID_OPERATION);
            return None;
        }
        p.uniforms
            .iter()
            .position(|u| u == name)
            .map(|i| UniformLocation(i as u32))
    }

    fn uniform_1_f32(&self, location: Option<UniformLocation>, value: f32) {
        let mut s = self.log("uniform_1_f32");
        let Some(UniformLocation(index)) = location else { return };
        let program = s.current_program;
        let in_range = s
            .programs
            .get(&program)
            .is_some_and(|p| (index as usize) < p.uniforms.len());
        if program == 0 || !in_range {
            s.fail(glow::INVALID_OPERATION);
            return;
        }
        s.uniform_values.insert((program, index), value);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        let mut s = self.log("viewport");
        if width < 0 || height < 0 {
            s.fail(glow::INVALID_VALUE);
            return;
        }
        s.viewport = Some([x, y, width, height]);
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        let mut s = self.log("clear_color");
        s.clear_color = [r, g, b, a];
    }

    fn clear(&self, mask: u32) {
        let mut s = self.log("clear");
        let known = glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT | glow::STENCIL_BUFFER_BIT;
        if mask & !known != 0 {
            s.fail(glow::INVALID_VALUE);
            return;
        }
        s.clears += 1;
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        let mut s = self.log("draw_arrays");
        if mode > glow::TRIANGLE_FAN {
            s.fail(glow::INVALID_ENUM);
            return;
        }
        if first < 0 || count < 0 {
            s.fail(glow::INVALID_VALUE);
            return;
        }
        let (program, vertex_array) = (s.current_program, s.bound_vertex_array);
        if program == 0 || vertex_array == 0 {
            s.fail(glow::INVALID_OPERATION);
            return;
        }
        s.draws.push(DrawCall { program, vertex_array, mode, first, count });
    }
}

/// Sink that keeps every event for later inspection.
#[derive(Default)]
pub(crate) struct CollectingSink {
    events: RefCell<Vec<DiagnosticEvent>>,
}

impl CollectingSink {
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.borrow().clone()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, event: &DiagnosticEvent) {
        self.events.borrow_mut().push(*event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glsl_checker_accepts_fixtures() {
        for src in [OFFSET_VS, PASSTHROUGH_VS, SOLID_FS] {
            assert_eq!(check_glsl(src), Ok(()));
        }
    }

    #[test]
    fn glsl_checker_flags_missing_brace() {
        let err = check_glsl(BROKEN_FS).unwrap_err();
        assert!(err.contains("syntax error"), "{err}");
    }

    #[test]
    fn uniform_scan_finds_offset() {
        let mut out = Vec::new();
        declared_uniforms(OFFSET_VS, &mut out);
        declared_uniforms(SOLID_FS, &mut out);
        assert_eq!(out, vec!["offset".to_string()]);
    }

    #[test]
    fn error_queue_is_fifo() {
        let d = FakeDriver::new();
        d.push_error(glow::INVALID_ENUM);
        d.push_error(glow::INVALID_VALUE);
        assert_eq!(d.get_error(), glow::INVALID_ENUM);
        assert_eq!(d.get_error(), glow::INVALID_VALUE);
        assert_eq!(d.get_error(), glow::NO_ERROR);
    }
}
