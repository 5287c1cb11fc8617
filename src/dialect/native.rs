//! Native structured convention
//!
//! The lossless JSON/YAML encoding of a [`ParameterSpace`]. Declarations keep their
//! order and every one carries a `type` tag.

use crate::dialect::{Compiled, PcsReader, PcsWriter};
use crate::error::{PcsError, Result};
use crate::space::ParameterSpace;
use std::path::Path;

/// Serialization format of a native document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NativeFormat {
    Json,
    /// YAML is a superset of JSON, so reading YAML accepts both
    #[default]
    Yaml,
}

impl NativeFormat {
    /// Pick the format from a file suffix: `.json`, `.yaml` or `.yml`
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            _ => Err(PcsError::UnsupportedFileType {
                path: path.display().to_string(),
            }),
        }
    }
}

/// Reader for native documents
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeReader {
    format: NativeFormat,
}

impl NativeReader {
    pub fn new(format: NativeFormat) -> Self {
        Self { format }
    }
}

impl PcsReader for NativeReader {
    fn parse(&self, text: &str) -> Result<ParameterSpace> {
        let space = match self.format {
            NativeFormat::Json => ParameterSpace::from_json(text)?,
            NativeFormat::Yaml => ParameterSpace::from_yaml(text)?,
        };
        tracing::debug!(format = ?self.format, declarations = space.len(), "loaded native document");
        Ok(space)
    }
}

/// Writer for native documents
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeWriter {
    format: NativeFormat,
}

impl NativeWriter {
    pub fn new(format: NativeFormat) -> Self {
        Self { format }
    }
}

impl PcsWriter for NativeWriter {
    fn compile(&self, space: &ParameterSpace) -> Result<Compiled> {
        space.validate()?;
        let text = match self.format {
            NativeFormat::Json => space.to_json()?,
            NativeFormat::Yaml => space.to_yaml()?,
        };
        Ok(Compiled {
            text,
            ..Compiled::default()
        })
    }
}
