use std::error::Error;
use std::fmt;

use crate::shader::ProgramError;

/// A failure before the first frame is drawn.
///
/// Every variant maps to the same process exit code; the variant (and the log
/// line printed for it) tells the stages apart.
#[derive(Debug)]
pub enum StartupError {
    WindowingInit(anyhow::Error),
    WindowCreation(anyhow::Error),
    Loader(anyhow::Error),
    Geometry(anyhow::Error),
    ShaderLoad(anyhow::Error),
    Program(ProgramError),
}

impl StartupError {
    pub const EXIT_CODE: i32 = -1;

    pub fn exit_code(&self) -> i32 {
        Self::EXIT_CODE
    }

    /// Short name of the startup stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            StartupError::WindowingInit(_) => "windowing init",
            StartupError::WindowCreation(_) => "window creation",
            StartupError::Loader(_) => "GL loader",
            StartupError::Geometry(_) => "geometry upload",
            StartupError::ShaderLoad(_) => "shader load",
            StartupError::Program(_) => "program build",
        }
    }
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::WindowingInit(_) => write!(f, "failed to initialize the windowing system"),
            StartupError::WindowCreation(_) => write!(f, "failed to create the window"),
            StartupError::Loader(_) => write!(f, "failed to load OpenGL"),
            StartupError::Geometry(_) => write!(f, "failed to upload triangle geometry"),
            StartupError::ShaderLoad(_) => write!(f, "failed to load shader sources"),
            StartupError::Program(_) => write!(f, "failed to build the shader program"),
        }
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StartupError::WindowingInit(e)
            | StartupError::WindowCreation(e)
            | StartupError::Loader(e)
            | StartupError::Geometry(e)
            | StartupError::ShaderLoad(e) => Some(e.as_ref()),
            StartupError::Program(e) => Some(e),
        }
    }
}
