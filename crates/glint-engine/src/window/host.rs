use anyhow::Result;

/// Window/context settings.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Inner size in physical pixels.
    pub width: u32,
    pub height: u32,
    /// Requested core-profile GL version `(major, minor)`.
    pub gl_version: (u8, u8),
    /// Wait for vertical blank on swap.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Hello world!".to_string(),
            width: 640,
            height: 480,
            gl_version: (4, 1),
            vsync: true,
        }
    }
}

/// The windowing collaborator as seen by the render loop.
///
/// Implementations own a window with a current GL context.
pub trait WindowHost {
    /// Whether the user asked for the window to close.
    fn should_close(&self) -> bool;

    /// Presents the back buffer.
    fn swap_buffers(&mut self) -> Result<()>;

    /// Processes pending window events without blocking.
    fn poll_events(&mut self);

    /// Outer window position in screen pixels, if the platform reports one.
    fn window_position(&self) -> Option<(i32, i32)>;

    fn set_window_position(&mut self, x: i32, y: i32);

    /// New drawable size since the last call, if the window was resized.
    fn take_resize(&mut self) -> Option<(u32, u32)> {
        None
    }

    /// Tears the window and context down. Called once, after the loop exits.
    fn terminate(&mut self) {}
}
