use std::path::PathBuf;

use crate::device::{BindTarget, DiagnosticsMode, Driver, Gl, GlowDriver};
use crate::geometry::TriangleGeometry;
use crate::render::{AnimationState, FrameLoop, Scene};
use crate::shader::{CompilerOptions, ProgramPolicy, ShaderSource, ShaderStage, build_program};

use super::error::StartupError;
use super::gl_host::GlWindowHost;
use super::host::{WindowConfig, WindowHost};

/// Everything the runtime needs to open a window and draw the triangle.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub window: WindowConfig,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub diagnostics: DiagnosticsMode,
    pub policy: ProgramPolicy,
    pub compiler: CompilerOptions,
    pub clear_color: [f32; 4],
    pub animation: AnimationState,
}

impl Default for RuntimeConfig {
    /// Shader paths resolve against the working directory.
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            vertex_shader: PathBuf::from("shader.vs"),
            fragment_shader: PathBuf::from("shader.fs"),
            diagnostics: DiagnosticsMode::default(),
            policy: ProgramPolicy::default(),
            compiler: CompilerOptions::default(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            animation: AnimationState::default(),
        }
    }
}

/// What a completed run did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub final_offset: f32,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, builds the scene and renders until the window closes.
    ///
    /// Startup is all-or-nothing: the first failing stage is returned and
    /// nothing is drawn.
    pub fn run(config: RuntimeConfig) -> Result<RunSummary, StartupError> {
        let mut host = GlWindowHost::init().map_err(StartupError::WindowingInit)?;
        host.create_window(&config.window)
            .map_err(StartupError::WindowCreation)?;
        let driver: GlowDriver = host.load_driver().map_err(StartupError::Loader)?;

        let gl = Gl::new(driver, config.diagnostics);
        log::debug!("GL diagnostics: {:?}", gl.mode());

        let scene = build_scene(&gl, &config)?;
        let summary = drive(&gl, &scene, &mut host, &config);

        host.terminate();
        Ok(summary)
    }
}

/// Uploads the triangle and builds its program.
pub fn build_scene<D: Driver>(gl: &Gl<D>, config: &RuntimeConfig) -> Result<Scene, StartupError> {
    let geometry = TriangleGeometry::upload(gl).map_err(StartupError::Geometry)?;

    let vertex = ShaderSource::load(ShaderStage::Vertex, &config.vertex_shader)
        .map_err(StartupError::ShaderLoad)?;
    let fragment = ShaderSource::load(ShaderStage::Fragment, &config.fragment_shader)
        .map_err(StartupError::ShaderLoad)?;

    // Validation checks the program against current state; core profiles
    // reject it when no vertex array is bound.
    let program = {
        let _vao = gl.bind(BindTarget::VertexArray, geometry.vertex_array());
        build_program(gl, &vertex, &fragment, config.policy, &config.compiler)
            .map_err(StartupError::Program)?
    };

    log::info!(
        "scene ready: program #{} ({} + {}), {} vertices",
        program.handle().raw(),
        vertex.label(),
        fragment.label(),
        geometry.vertex_count()
    );

    Ok(Scene::new(program, geometry))
}

/// Runs the frame loop over `host` until it asks to close.
pub fn drive<D, W>(gl: &Gl<D>, scene: &Scene, host: &mut W, config: &RuntimeConfig) -> RunSummary
where
    D: Driver,
    W: WindowHost + ?Sized,
{
    let mut frame_loop = FrameLoop::new(config.animation, config.clear_color);
    let frames = frame_loop.run(gl, scene, host);
    RunSummary {
        frames,
        final_offset: frame_loop.animation().offset(),
    }
}
