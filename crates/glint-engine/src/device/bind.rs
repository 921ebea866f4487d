use super::diagnostics::CallSite;
use super::driver::Driver;
use super::gl::Gl;

/// A binding point in the driver's global state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BindTarget {
    VertexArray,
    ArrayBuffer,
    Program,
}

impl BindTarget {
    fn query(self) -> u32 {
        match self {
            BindTarget::VertexArray => glow::VERTEX_ARRAY_BINDING,
            BindTarget::ArrayBuffer => glow::ARRAY_BUFFER_BINDING,
            BindTarget::Program => glow::CURRENT_PROGRAM,
        }
    }

    fn call_name(self) -> &'static str {
        match self {
            BindTarget::VertexArray => "glBindVertexArray",
            BindTarget::ArrayBuffer => "glBindBuffer",
            BindTarget::Program => "glUseProgram",
        }
    }

    fn apply<D: Driver>(self, driver: &D, name: u32) {
        match self {
            BindTarget::VertexArray => driver.bind_vertex_array(name),
            BindTarget::ArrayBuffer => driver.bind_buffer(glow::ARRAY_BUFFER, name),
            BindTarget::Program => driver.use_program(name),
        }
    }
}

/// Scoped binding. The previous binding of the same target is restored on drop.
///
/// Guards nest; drop them in reverse order of creation (the default for locals).
/// Errors raised by the restore are attributed to the `bind` call site.
#[must_use = "the binding is undone as soon as the guard is dropped"]
pub struct Bound<'g, D: Driver> {
    gl: &'g Gl<D>,
    target: BindTarget,
    previous: u32,
    site: CallSite,
}

impl<D: Driver> Bound<'_, D> {
    pub fn target(&self) -> BindTarget {
        self.target
    }
}

impl<D: Driver> Gl<D> {
    /// Binds `name` to `target` until the returned guard drops.
    #[track_caller]
    pub fn bind(&self, target: BindTarget, name: u32) -> Bound<'_, D> {
        let site = CallSite::here(target.call_name());
        let previous = self.call("glGetIntegerv", |d| d.get_integer(target.query()));
        self.call_at(site, |d| target.apply(d, name));
        Bound {
            gl: self,
            target,
            previous: u32::try_from(previous).unwrap_or(0),
            site,
        }
    }
}

impl<D: Driver> Drop for Bound<'_, D> {
    fn drop(&mut self) {
        let (target, previous) = (self.target, self.previous);
        self.gl.call_at(self.site, |d| target.apply(d, previous));
    }
}
