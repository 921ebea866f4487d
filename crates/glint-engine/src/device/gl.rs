use super::diagnostics::{
    CallSite, DiagnosticEvent, DiagnosticSink, DiagnosticsMode, LOG_TARGET, LogSink,
};
use super::driver::Driver;

/// Upper bound on codes pulled from the error queue in one drain.
///
/// A lost context can report the same error forever.
const MAX_DRAIN: usize = 32;

/// Instrumented driver handle.
///
/// Every driver call in the engine goes through [`Gl::call`], which wraps it in
/// the drain / execute / report protocol when diagnostics are enabled. The
/// wrapper is purely observational: the closure's return value and side effects
/// are passed through untouched and nothing here can fail.
pub struct Gl<D> {
    driver: D,
    mode: DiagnosticsMode,
    sink: Box<dyn DiagnosticSink>,
}

impl<D: Driver> Gl<D> {
    /// Wraps `driver`, reporting to the log.
    pub fn new(driver: D, mode: DiagnosticsMode) -> Self {
        Self::with_sink(driver, mode, LogSink)
    }

    pub fn with_sink(driver: D, mode: DiagnosticsMode, sink: impl DiagnosticSink + 'static) -> Self {
        Self {
            driver,
            mode,
            sink: Box::new(sink),
        }
    }

    pub fn mode(&self) -> DiagnosticsMode {
        self.mode
    }

    /// Uninstrumented access to the driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Runs one driver call named `call`, attributed to the caller's location.
    #[track_caller]
    pub fn call<T>(&self, call: &'static str, f: impl FnOnce(&D) -> T) -> T {
        self.call_at(CallSite::here(call), f)
    }

    /// Like [`Gl::call`], attributed to an explicit `site`.
    pub(crate) fn call_at<T>(&self, site: CallSite, f: impl FnOnce(&D) -> T) -> T {
        if self.mode == DiagnosticsMode::Off {
            return f(&self.driver);
        }

        // Codes already queued belong to earlier, unchecked calls.
        let stale = self.drain(|_| {});
        if stale > 0 {
            log::trace!(target: LOG_TARGET, "discarded {stale} stale error(s) before {}", site.call);
        }

        let out = f(&self.driver);

        self.drain(|code| self.sink.report(&DiagnosticEvent { site, code }));
        out
    }

    /// Pops error codes until the queue is empty, handing each to `on_code`.
    fn drain(&self, mut on_code: impl FnMut(u32)) -> usize {
        for n in 0..MAX_DRAIN {
            let code = self.driver.get_error();
            if code == glow::NO_ERROR {
                return n;
            }
            on_code(code);
        }
        log::warn!(
            target: LOG_TARGET,
            "error queue did not empty after {MAX_DRAIN} reads; context may be lost"
        );
        MAX_DRAIN
    }
}
