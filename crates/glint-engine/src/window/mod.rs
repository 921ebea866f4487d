//! Window host and runtime.
//!
//! [`GlWindowHost`] owns the winit event loop, the window and its GL context.
//! [`Runtime`] wires it to the device, shader and render layers.

mod error;
mod gl_host;
mod host;
mod runtime;


pub use error::StartupError;
pub use gl_host::GlWindowHost;
pub use host::{WindowConfig, WindowHost};
pub use runtime::{RunSummary, Runtime, RuntimeConfig, build_scene, drive};
