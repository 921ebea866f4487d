//! Shader compilation and program linking.
//!
//! Outcomes are explicit values: a failed compile is a
//! [`CompileOutcome::Failed`] carrying the driver log, never a bare zero
//! handle that can flow into a later attach.

mod compile;
mod error;
mod program;
mod source;

pub use compile::{CompileOutcome, CompiledShaderUnit, CompilerOptions, ShaderHandle, compile_shader};
pub use error::{ProgramError, StageFailure};
pub use program::{LinkReport, ProgramHandle, ProgramPolicy, ShaderProgram, build_program};
pub use source::{ShaderSource, ShaderStage};
