use std::fmt;

use super::source::ShaderStage;

/// A stage that failed to compile, with the driver's log.
#[derive(Debug, Clone, PartialEq)]
pub struct StageFailure {
    pub stage: ShaderStage,
    pub log: String,
}

/// Why a program could not be built.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramError {
    /// The driver returned no program object.
    CreateFailed,
    /// `stage` is the first stage that failed; `others` holds any later one.
    Compile {
        stage: ShaderStage,
        log: String,
        others: Vec<StageFailure>,
    },
    Link { log: String },
    Validate { log: String },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::CreateFailed => write!(f, "driver refused to create a program object"),
            ProgramError::Compile { stage, log, others } => {
                write!(f, "{stage} shader failed to compile: {log}")?;
                for other in others {
                    write!(f, "; {} shader failed to compile: {}", other.stage, other.log)?;
                }
                Ok(())
            }
            ProgramError::Link { log } => write!(f, "program failed to link: {log}"),
            ProgramError::Validate { log } => write!(f, "program failed validation: {log}"),
        }
    }
}

impl std::error::Error for ProgramError {}
