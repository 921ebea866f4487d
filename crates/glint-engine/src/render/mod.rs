//! Per-frame rendering.
//!
//! [`Scene`] owns the GPU objects built at startup; [`FrameLoop`] draws it once
//! per iteration until the window closes.

mod animation;
mod frame_loop;
mod scene;

pub use animation::AnimationState;
pub use frame_loop::{FrameLoop, LoopState, OFFSET_UNIFORM};
pub use scene::Scene;
