use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Pipeline stage a shader unit is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// GL enum passed to `glCreateShader`.
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Shader text for one stage. Submitted to the driver verbatim.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    stage: ShaderStage,
    text: String,
    origin: Option<PathBuf>,
}

impl ShaderSource {
    pub fn new(stage: ShaderStage, text: impl Into<String>) -> Self {
        Self {
            stage,
            text: text.into(),
            origin: None,
        }
    }

    /// Reads `path` as UTF-8 text.
    ///
    /// A missing or unreadable file is an error. An empty file is accepted with a
    /// warning; the compiler will reject it.
    pub fn load(stage: ShaderStage, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {stage} shader {}", path.display()))?;

        if text.trim().is_empty() {
            log::warn!("{stage} shader {} is empty", path.display());
        } else {
            log::debug!("loaded {stage} shader {} ({} bytes)", path.display(), text.len());
        }

        Ok(Self {
            stage,
            text,
            origin: Some(path.to_path_buf()),
        })
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// File the text was read from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Short label for log lines: the file path, or the stage name.
    pub fn label(&self) -> String {
        match &self.origin {
            Some(p) => p.display().to_string(),
            None => format!("<inline {} shader>", self.stage),
        }
    }
}
