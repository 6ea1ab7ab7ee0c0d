use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::ShaderError;

/// Token that introduces a section line, e.g. `#shader vertex`.
pub const SECTION_MARKER: &str = "#shader";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_type(&self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }

    fn from_marker(line: &str) -> Option<Self> {
        if line.contains("vertex") {
            Some(ShaderStage::Vertex)
        } else if line.contains("fragment") {
            Some(ShaderStage::Fragment)
        } else {
            None
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Vertex and fragment source text split out of one shader file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProgramSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderProgramSource {
    /// Splits `text` into its vertex and fragment sections.
    ///
    /// Marker lines are dropped, as is everything before the first marker that
    /// names a stage. A marker naming neither stage keeps the current section.
    pub fn parse(text: &str) -> Self {
        let mut source = ShaderProgramSource::default();
        let mut current: Option<ShaderStage> = None;

        for line in text.lines() {
            if line.contains(SECTION_MARKER) {
                if let Some(stage) = ShaderStage::from_marker(line) {
                    current = Some(stage);
                }
                continue;
            }

            let Some(stage) = current else {
                continue;
            };

            let section = source.stage_mut(stage);
            section.push_str(line);
            section.push('\n');
        }

        source
    }

    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }

    fn stage_mut(&mut self, stage: ShaderStage) -> &mut String {
        match stage {
            ShaderStage::Vertex => &mut self.vertex,
            ShaderStage::Fragment => &mut self.fragment,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertex.is_empty() && self.fragment.is_empty()
    }
}

/// Reads and splits the shader file at `path`.
pub fn parse_shader<P: AsRef<Path>>(path: P) -> Result<ShaderProgramSource, ShaderError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let source = ShaderProgramSource::parse(&text);
    tracing::debug!(
        path = %path.display(),
        vertex_bytes = source.vertex.len(),
        fragment_bytes = source.fragment.len(),
        "parsed shader file"
    );

    Ok(source)
}
