use std::fmt;
use std::panic::Location;
use std::rc::Rc;

/// Log target used for driver error reports.
pub const LOG_TARGET: &str = "glint::gl";

/// Whether driver calls are error-checked.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DiagnosticsMode {
    /// Drain the error queue before every call and report what the call left behind.
    Checked,
    /// Call straight through.
    Off,
}

impl Default for DiagnosticsMode {
    /// `Checked` in debug builds, `Off` in release builds.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            DiagnosticsMode::Checked
        } else {
            DiagnosticsMode::Off
        }
    }
}

/// Identity of one instrumented call site.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CallSite {
    pub call: &'static str,
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    /// Captures the caller's location.
    #[track_caller]
    pub fn here(call: &'static str) -> Self {
        let loc = Location::caller();
        Self {
            call,
            file: loc.file(),
            line: loc.line(),
        }
    }
}

/// One error code left in the driver's queue by an instrumented call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DiagnosticEvent {
    pub site: CallSite,
    pub code: u32,
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[OpenGL Error] ({:#x}", self.code)?;
        if let Some(name) = error_name(self.code) {
            write!(f, " {name}")?;
        }
        write!(
            f,
            ") {} {}:{}",
            self.site.call, self.site.file, self.site.line
        )
    }
}

/// Symbolic name for a GL error code.
pub fn error_name(code: u32) -> Option<&'static str> {
    let name = match code {
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        glow::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        _ => return None,
    };
    Some(name)
}

/// Receives diagnostic events as they are produced.
///
/// Sinks must not call back into the driver.
pub trait DiagnosticSink {
    fn report(&self, event: &DiagnosticEvent);
}

/// Writes every event to the `log` facade at error level.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, event: &DiagnosticEvent) {
        log::error!(target: LOG_TARGET, "{event}");
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Rc<S> {
    fn report(&self, event: &DiagnosticEvent) {
        (**self).report(event);
    }
}
