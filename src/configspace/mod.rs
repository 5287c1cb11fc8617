//! # Configuration Space
//!
//! A constraint-aware, queryable view of a parameter space, in the form configurators
//! consume it: typed [`Hyperparameter`]s, one activation [`Condition`] per conditioned
//! hyperparameter and [`ForbiddenAndConjunction`]s over value combinations.
//!
//! ## Example Usage
//!
//! ```rust
//! use pcs_rs::configspace::build;
//! use pcs_rs::dialect::{smac::SmacReader, PcsReader};
//!
//! let space = SmacReader::new()
//!     .parse("x integer [1, 100] [10]\ny categorical {a,b,c} [a]\ny | x > 50")
//!     .unwrap();
//! let cs = build(&space).unwrap().space;
//!
//! // x defaults to 10, so y is inactive in the default configuration
//! let config = cs.default_configuration();
//! assert!(config.contains("x"));
//! assert!(!config.contains("y"));
//! assert!(cs.check_configuration(&config).is_ok());
//! ```

pub mod builder;
pub mod conditions;
pub mod forbidden;
pub mod hyperparameter;
pub mod space;

// Re-export key types
pub use builder::{build, BuildReport};
pub use conditions::Condition;
pub use forbidden::{ForbiddenAndConjunction, ForbiddenEquals};
pub use hyperparameter::Hyperparameter;
pub use space::{Configuration, ConfigurationSpace};
