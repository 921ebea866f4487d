//! Glint engine crate.
//!
//! Draws one animated triangle through instrumented OpenGL: every GL call runs
//! through [`device::Gl`], which reports the error codes the call left behind
//! together with its source location.

pub mod device;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod shader;
pub mod window;
