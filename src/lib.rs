//! # pcs-rs
//!
//! `pcs-rs` converts solver parameter configuration spaces (PCS) between the
//! conventions used by algorithm configurators.
//!
//! The library provides:
//! - A dialect-independent [`ParameterSpace`] model of parameters, activation
//!   constraints and forbidden value combinations
//! - A SMAC-style reader and a lossless JSON/YAML native form
//! - ParamILS and IRACE writers that report everything they cannot express
//! - A typed [`ConfigurationSpace`] built from a parameter space
//!
//! ## Basic Usage
//!
//! ```
//! use pcs_rs::{Convention, PcsConverter};
//!
//! let mut converter = PcsConverter::new();
//! converter
//!     .parse(
//!         "x integer [1, 100] [10]\n\
//!          y categorical {a,b,c} [a]\n\
//!          y | x > 50",
//!         Convention::Smac,
//!     )
//!     .unwrap();
//!
//! let irace = converter.compile(Convention::Irace).unwrap();
//! assert!(irace.text.contains("| x > 50"));
//!
//! let cs = converter.get_configuration_space().unwrap();
//! assert!(cs.condition_for("y").is_some());
//! ```

// Public modules
pub mod config;
pub mod configspace;
pub mod convention;
pub mod dialect;
pub mod error;
pub mod space;

// Re-exports for convenience
pub use config::ExportOptions;
pub use configspace::{BuildReport, Configuration, ConfigurationSpace};
pub use convention::{Convention, PcsConverter};
pub use dialect::{Compiled, ConversionWarning, PcsReader, PcsWriter};
pub use error::{PcsError, Result};
pub use space::ParameterSpace;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
