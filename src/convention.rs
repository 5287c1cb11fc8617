//! Convention dispatch
//!
//! [`Convention`] names every supported PCS encoding. [`PcsConverter`] owns one
//! [`ParameterSpace`] and maps each convention to its reader or writer.

use crate::config::ExportOptions;
use crate::configspace::{build, BuildReport, ConfigurationSpace};
use crate::dialect::irace::IraceWriter;
use crate::dialect::native::{NativeFormat, NativeReader, NativeWriter};
use crate::dialect::paramils::ParamIlsWriter;
use crate::dialect::smac::SmacReader;
use crate::dialect::{Compiled, ConversionWarning, PcsReader, PcsWriter};
use crate::error::{PcsError, Result};
use crate::space::ParameterSpace;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A PCS encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    /// SMAC-style line grammar (read only)
    Smac,
    /// ParamILS value lists (write only)
    ParamIls,
    /// IRACE parameter table plus forbidden file (write only)
    Irace,
    /// Native JSON/YAML encoding (read and write)
    ConfigSpace,
}

impl Convention {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smac => "smac",
            Self::ParamIls => "paramils",
            Self::Irace => "irace",
            Self::ConfigSpace => "configspace",
        }
    }

    fn unsupported(&self, direction: &'static str) -> PcsError {
        PcsError::UnsupportedConvention {
            convention: self.as_str().to_string(),
            direction,
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Convention {
    type Err = PcsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smac" | "smac2" => Ok(Self::Smac),
            "paramils" => Ok(Self::ParamIls),
            "irace" => Ok(Self::Irace),
            "configspace" | "native" => Ok(Self::ConfigSpace),
            _ => Err(PcsError::UnsupportedConvention {
                convention: s.to_string(),
                direction: "any operation",
            }),
        }
    }
}

/// Loads, converts and exports one parameter space
///
/// # Examples
///
/// ```
/// use pcs_rs::{Convention, PcsConverter};
///
/// let mut converter = PcsConverter::new();
/// converter
///     .parse("x integer [1, 100] [10]\ny categorical {a,b,c} [a]", Convention::Smac)
///     .unwrap();
///
/// let compiled = converter.compile(Convention::ParamIls).unwrap();
/// assert!(compiled.text.starts_with("x {1,"));
///
/// let cs = converter.get_configuration_space().unwrap();
/// assert_eq!(cs.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PcsConverter {
    space: ParameterSpace,
    options: ExportOptions,
}

impl PcsConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExportOptions) -> Self {
        Self {
            space: ParameterSpace::new(),
            options,
        }
    }

    /// Wrap an existing space
    pub fn from_space(space: ParameterSpace) -> Self {
        Self {
            space,
            options: ExportOptions::default(),
        }
    }

    pub fn space(&self) -> &ParameterSpace {
        &self.space
    }

    pub fn space_mut(&mut self) -> &mut ParameterSpace {
        &mut self.space
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    fn reader(convention: Convention, format: NativeFormat) -> Result<Box<dyn PcsReader>> {
        match convention {
            Convention::Smac => Ok(Box::new(SmacReader::new())),
            Convention::ConfigSpace => Ok(Box::new(NativeReader::new(format))),
            Convention::ParamIls | Convention::Irace => Err(convention.unsupported("parsing")),
        }
    }

    fn writer(&self, convention: Convention, format: NativeFormat) -> Result<Box<dyn PcsWriter>> {
        match convention {
            Convention::ParamIls => Ok(Box::new(ParamIlsWriter::new(self.options.clone()))),
            Convention::Irace => Ok(Box::new(IraceWriter::new(self.options.clone()))),
            Convention::ConfigSpace => Ok(Box::new(NativeWriter::new(format))),
            Convention::Smac => Err(convention.unsupported("export")),
        }
    }

    /// Replace the space with the contents of a file
    ///
    /// The native convention picks JSON or YAML from the file suffix. On error the
    /// current space is left untouched.
    pub fn load(&mut self, path: impl AsRef<Path>, convention: Convention) -> Result<()> {
        let path = path.as_ref();
        let format = match convention {
            Convention::ConfigSpace => NativeFormat::from_path(path)?,
            _ => NativeFormat::default(),
        };
        let reader = Self::reader(convention, format)?;
        let text = fs::read_to_string(path)?;
        self.space = reader.parse(&text)?;
        tracing::debug!(path = %path.display(), %convention, "loaded parameter space");
        Ok(())
    }

    /// Replace the space with a parsed document
    pub fn parse(&mut self, text: &str, convention: Convention) -> Result<()> {
        self.space = Self::reader(convention, NativeFormat::default())?.parse(text)?;
        Ok(())
    }

    /// Render the space in memory; the native convention renders JSON
    pub fn compile(&self, convention: Convention) -> Result<Compiled> {
        self.writer(convention, NativeFormat::Json)?.compile(&self.space)
    }

    /// Write the space to `destination` in the given convention
    ///
    /// Text dialects start with the configured header line. IRACE additionally writes
    /// its forbidden combinations to `<stem>_forbidden.txt` next to the destination;
    /// if that write fails the destination is removed again.
    ///
    /// # Returns
    ///
    /// The warnings for everything the convention could not express
    pub fn export(
        &self,
        destination: impl AsRef<Path>,
        convention: Convention,
    ) -> Result<Vec<ConversionWarning>> {
        let destination = destination.as_ref();
        let format = match convention {
            Convention::ConfigSpace => NativeFormat::from_path(destination)?,
            _ => NativeFormat::default(),
        };
        let compiled = self.writer(convention, format)?.compile(&self.space)?;

        let contents = match convention {
            Convention::ConfigSpace => compiled.text,
            _ => format!("{}\n{}\n", self.options.header, compiled.text),
        };
        let sibling = compiled.forbidden.map(|forbidden| {
            let contents = if forbidden.is_empty() {
                forbidden
            } else {
                format!("{}\n", forbidden)
            };
            (forbidden_path(destination), contents)
        });

        fs::write(destination, contents)?;
        if let Some((path, contents)) = sibling {
            if let Err(err) = fs::write(&path, contents) {
                // Never leave a table without its forbidden combinations behind.
                if let Err(cleanup) = fs::remove_file(destination) {
                    tracing::warn!(
                        path = %destination.display(),
                        %cleanup,
                        "could not remove partial export"
                    );
                }
                return Err(err.into());
            }
            tracing::debug!(path = %path.display(), "wrote forbidden combinations");
        }

        tracing::debug!(
            path = %destination.display(),
            %convention,
            warnings = compiled.warnings.len(),
            "exported parameter space"
        );
        Ok(compiled.warnings)
    }

    /// Build the configuration space; warnings are logged
    pub fn get_configuration_space(&self) -> Result<ConfigurationSpace> {
        Ok(self.build_configuration_space()?.space)
    }

    /// Build the configuration space and return it with its warnings
    pub fn build_configuration_space(&self) -> Result<BuildReport> {
        build(&self.space)
    }
}

/// `<dir>/<stem>_forbidden.txt` for a destination `<dir>/<stem>.<ext>`
pub fn forbidden_path(destination: &Path) -> PathBuf {
    let stem = destination
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!("{}_forbidden.txt", stem))
}
