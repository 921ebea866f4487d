use crate::device::{BindTarget, Driver, Gl};
use crate::window::WindowHost;

use super::animation::AnimationState;
use super::scene::Scene;

/// Uniform the animation offset is written to.
pub const OFFSET_UNIFORM: &str = "offset";

/// Frames between periodic debug statistics.
const STATS_INTERVAL: u64 = 600;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Per-frame driver: clear, animate, draw, present, pump events.
///
/// The close flag is checked only at the top of an iteration, so a frame that
/// has started always completes.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    state: LoopState,
    animation: AnimationState,
    clear_color: [f32; 4],
    nudged: bool,
    frames: u64,
}

impl FrameLoop {
    pub fn new(animation: AnimationState, clear_color: [f32; 4]) -> Self {
        Self {
            state: LoopState::Running,
            animation,
            clear_color,
            nudged: false,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    /// Frames fully rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether the one-time window nudge has been done.
    pub fn has_nudged(&self) -> bool {
        self.nudged
    }

    /// Runs one iteration.
    pub fn step<D, W>(&mut self, gl: &Gl<D>, scene: &Scene, host: &mut W) -> LoopState
    where
        D: Driver,
        W: WindowHost + ?Sized,
    {
        if self.state == LoopState::Terminated {
            return self.state;
        }

        if host.should_close() {
            self.state = LoopState::Terminated;
            log::info!(
                "window closed after {} frames (offset {:.3})",
                self.frames,
                self.animation.offset()
            );
            return self.state;
        }

        if let Some((width, height)) = host.take_resize() {
            gl.call("glViewport", |d| d.viewport(0, 0, width as i32, height as i32));
        }

        self.draw(gl, scene);

        if let Err(e) = host.swap_buffers() {
            log::warn!("failed to present frame {}: {e:#}", self.frames);
        }

        // Some compositors only show the window after it moves once.
        if !self.nudged {
            nudge_window(host);
            self.nudged = true;
        }

        host.poll_events();

        self.frames += 1;
        if self.frames % STATS_INTERVAL == 0 {
            log::debug!("frame {} offset {:.3}", self.frames, self.animation.offset());
        }

        self.state
    }

    /// Steps until the window closes. Returns the number of frames rendered.
    pub fn run<D, W>(&mut self, gl: &Gl<D>, scene: &Scene, host: &mut W) -> u64
    where
        D: Driver,
        W: WindowHost + ?Sized,
    {
        while self.step(gl, scene, host) == LoopState::Running {}
        self.frames
    }

    fn draw<D: Driver>(&mut self, gl: &Gl<D>, scene: &Scene) {
        let [r, g, b, a] = self.clear_color;
        gl.call("glClearColor", |d| d.clear_color(r, g, b, a));
        gl.call("glClear", |d| d.clear(glow::COLOR_BUFFER_BIT));

        let offset = self.animation.advance();

        let _program = gl.bind(BindTarget::Program, scene.program.handle().raw());
        // An unknown uniform resolves to None and the write below does nothing.
        let location = scene.program.uniform_location(gl, OFFSET_UNIFORM);
        gl.call("glUniform1f", |d| d.uniform_1_f32(location, offset));

        let _vao = gl.bind(BindTarget::VertexArray, scene.geometry.vertex_array());
        let count = scene.geometry.vertex_count();
        gl.call("glDrawArrays", |d| d.draw_arrays(glow::TRIANGLES, 0, count));
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(AnimationState::default(), [0.0, 0.0, 0.0, 1.0])
    }
}

fn nudge_window<W: WindowHost + ?Sized>(host: &mut W) {
    match host.window_position() {
        Some((x, y)) => {
            host.set_window_position(x + 1, y);
            host.set_window_position(x, y);
        }
        None => log::debug!("window position unavailable; skipping repaint nudge"),
    }
}
