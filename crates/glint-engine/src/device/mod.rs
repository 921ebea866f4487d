//! Graphics driver access.
//!
//! This module is responsible for:
//! - the [`Driver`] trait: the raw GL entry points the engine uses
//! - [`GlowDriver`]: the `glow`-backed implementation for a live context
//! - [`Gl`]: the instrumented handle every engine call goes through
//! - scoped bindings for the driver's bind-then-configure state model

mod bind;
mod diagnostics;
mod driver;
mod gl;
mod glow_driver;

#[cfg(test)]
pub(crate) mod testing;

pub use bind::{BindTarget, Bound};
pub use diagnostics::{
    CallSite, DiagnosticEvent, DiagnosticSink, DiagnosticsMode, LOG_TARGET, LogSink, error_name,
};
pub use driver::{Driver, UniformLocation};
pub use gl::Gl;
pub use glow_driver::GlowDriver;
