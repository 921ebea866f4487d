use crate::device::{Driver, Gl, UniformLocation};

use super::compile::{CompileOutcome, CompilerOptions, compile_shader, release};
use super::error::{ProgramError, StageFailure};
use super::source::ShaderSource;

/// Driver name of a program object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramHandle(u32);

impl ProgramHandle {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// What to do when a stage fails to compile or the program fails to link or
/// validate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ProgramPolicy {
    /// Stop and return the failure.
    #[default]
    Strict,
    /// Log the failure and hand back the (unusable) program anyway.
    Permissive,
}

/// Status queried from the driver after link + validate.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkReport {
    pub linked: bool,
    pub validated: bool,
    /// Program info log; empty when the driver had nothing to say.
    pub log: String,
}

/// A linked program object. Lives for the rest of the process.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    handle: ProgramHandle,
    report: LinkReport,
}

impl ShaderProgram {
    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    pub fn report(&self) -> &LinkReport {
        &self.report
    }

    /// Linked and validated; safe to draw with.
    pub fn is_usable(&self) -> bool {
        self.report.linked && self.report.validated
    }

    /// Looks `name` up in the driver. Not cached.
    #[track_caller]
    pub fn uniform_location<D: Driver>(&self, gl: &Gl<D>, name: &str) -> Option<UniformLocation> {
        let program = self.handle.raw();
        gl.call("glGetUniformLocation", |d| d.get_uniform_location(program, name))
    }
}

/// Compiles both stages, links them into a new program and validates it.
///
/// Compile outcomes are inspected before anything is attached: a failed stage
/// is never attached. Both shader objects are deleted once linking is done;
/// the program keeps the compiled code.
pub fn build_program<D: Driver>(
    gl: &Gl<D>,
    vertex: &ShaderSource,
    fragment: &ShaderSource,
    policy: ProgramPolicy,
    options: &CompilerOptions,
) -> Result<ShaderProgram, ProgramError> {
    let name = gl.call("glCreateProgram", |d| d.create_program());
    if name == 0 {
        return Err(ProgramError::CreateFailed);
    }

    let outcomes = [
        compile_shader(gl, vertex, options),
        compile_shader(gl, fragment, options),
    ];

    if policy == ProgramPolicy::Strict {
        let mut failures = outcomes.iter().filter_map(|o| match o {
            CompileOutcome::Failed { stage, log } => Some(StageFailure {
                stage: *stage,
                log: log.clone(),
            }),
            CompileOutcome::Compiled(_) => None,
        });
        if let Some(first) = failures.next() {
            let err = ProgramError::Compile {
                stage: first.stage,
                log: first.log,
                others: failures.collect(),
            };
            release_all(gl, &outcomes);
            return Err(err);
        }
    }

    for outcome in &outcomes {
        match outcome {
            CompileOutcome::Compiled(unit) => {
                let shader = unit.handle().raw();
                gl.call("glAttachShader", |d| d.attach_shader(name, shader));
            }
            CompileOutcome::Failed { stage, .. } => {
                log::warn!("{stage} shader failed to compile; not attached to program #{name}");
            }
        }
    }

    gl.call("glLinkProgram", |d| d.link_program(name));
    gl.call("glValidateProgram", |d| d.validate_program(name));

    release_all(gl, &outcomes);

    let linked = gl.call("glGetProgramiv(GL_LINK_STATUS)", |d| d.program_link_status(name));
    let validated =
        gl.call("glGetProgramiv(GL_VALIDATE_STATUS)", |d| d.program_validate_status(name));
    let log = if linked && validated {
        String::new()
    } else {
        gl.call("glGetProgramInfoLog", |d| d.program_info_log(name))
            .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_string()
    };

    let report = LinkReport { linked, validated, log };

    match (policy, linked, validated) {
        (_, true, true) => {
            log::info!(
                "built program #{name} from {} + {}",
                vertex.label(),
                fragment.label()
            );
        }
        (ProgramPolicy::Strict, false, _) => return Err(ProgramError::Link { log: report.log }),
        (ProgramPolicy::Strict, true, false) => {
            return Err(ProgramError::Validate { log: report.log });
        }
        (ProgramPolicy::Permissive, ..) => {
            log::warn!(
                "program #{name} is not usable (linked: {linked}, validated: {validated}): {}",
                report.log
            );
        }
    }

    Ok(ShaderProgram {
        handle: ProgramHandle(name),
        report,
    })
}

fn release_all<D: Driver>(gl: &Gl<D>, outcomes: &[CompileOutcome]) {
    for outcome in outcomes {
        if let CompileOutcome::Compiled(unit) = outcome {
            release(gl, *unit);
        }
    }
}
