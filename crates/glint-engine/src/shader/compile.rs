use crate::device::{Driver, Gl};

use super::source::{ShaderSource, ShaderStage};

/// Driver name of a shader object. `NONE` marks a failed compile.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShaderHandle(u32);

impl ShaderHandle {
    pub const NONE: ShaderHandle = ShaderHandle(0);

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// A successfully compiled stage, still owned by whoever received it.
///
/// The holder attaches it to a program and then releases it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CompiledShaderUnit {
    handle: ShaderHandle,
    stage: ShaderStage,
}

impl CompiledShaderUnit {
    pub fn handle(&self) -> ShaderHandle {
        self.handle
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

/// Result of compiling one stage.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileOutcome {
    Compiled(CompiledShaderUnit),
    /// The driver rejected the source; the shader object is already deleted.
    Failed { stage: ShaderStage, log: String },
}

impl CompileOutcome {
    /// The compiled handle, or [`ShaderHandle::NONE`].
    pub fn handle(&self) -> ShaderHandle {
        match self {
            CompileOutcome::Compiled(unit) => unit.handle,
            CompileOutcome::Failed { .. } => ShaderHandle::NONE,
        }
    }

    pub fn stage(&self) -> ShaderStage {
        match self {
            CompileOutcome::Compiled(unit) => unit.stage,
            CompileOutcome::Failed { stage, .. } => *stage,
        }
    }

    pub fn is_compiled(&self) -> bool {
        matches!(self, CompileOutcome::Compiled(_))
    }
}

/// Compiler knobs.
#[derive(Debug, Clone, Default)]
pub struct CompilerOptions {
    /// Cap on the info log kept from a failed compile, in bytes.
    ///
    /// `None` keeps the whole log. `Some(512)` reproduces the classic fixed
    /// buffer size.
    pub max_log_bytes: Option<usize>,
}

/// Compiles one stage.
///
/// Failure is reported through the returned value and a log line; the process
/// keeps running.
pub fn compile_shader<D: Driver>(
    gl: &Gl<D>,
    source: &ShaderSource,
    options: &CompilerOptions,
) -> CompileOutcome {
    let stage = source.stage();

    let name = gl.call("glCreateShader", |d| d.create_shader(stage.gl_enum()));
    if name == 0 {
        let log = format!("driver refused to create a {stage} shader object");
        log::error!("{}: {log}", source.label());
        return CompileOutcome::Failed { stage, log };
    }

    gl.call("glShaderSource", |d| d.shader_source(name, source.text()));
    gl.call("glCompileShader", |d| d.compile_shader(name));

    let compiled = gl.call("glGetShaderiv(GL_COMPILE_STATUS)", |d| d.shader_compile_status(name));
    if compiled {
        log::debug!("compiled {stage} shader {} as #{name}", source.label());
        return CompileOutcome::Compiled(CompiledShaderUnit {
            handle: ShaderHandle(name),
            stage,
        });
    }

    let raw = gl.call("glGetShaderInfoLog", |d| d.shader_info_log(name));
    let mut log = clip_log(&raw, options.max_log_bytes);
    if log.is_empty() {
        log = "compilation failed without a driver log".to_string();
    }
    log::error!("failed to compile {stage} shader {}:\n{log}", source.label());

    gl.call("glDeleteShader", |d| d.delete_shader(name));
    CompileOutcome::Failed { stage, log }
}

/// Deletes a compiled unit's shader object.
pub(crate) fn release<D: Driver>(gl: &Gl<D>, unit: CompiledShaderUnit) {
    gl.call("glDeleteShader", |d| d.delete_shader(unit.handle.raw()));
}

const TRUNCATED: &str = " [log truncated]";

/// Trims trailing NULs and whitespace and caps the log at `max` bytes on a
/// char boundary.
fn clip_log(raw: &str, max: Option<usize>) -> String {
    let log = raw.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
    match max {
        Some(max) if log.len() > max => {
            let mut end = max;
            while !log.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}{TRUNCATED}", &log[..end])
        }
        _ => log.to_string(),
    }
}
