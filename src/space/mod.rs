//! # Parameter Space Model
//!
//! This module provides the canonical, dialect-independent representation of a
//! solver's parameter configuration space (PCS). Every dialect parser builds a
//! [`ParameterSpace`], and every exporter and the configuration-space builder read one.
//!
//! ## Core Components
//!
//! - [`Parameter`]: a named parameter with a typed [`Domain`], [`Scale`] and default
//! - [`Constraint`]: activates a child parameter when a [`ConditionTree`] holds
//! - [`ConditionChain`]: the linear `(operator, term)` form a condition is read in,
//!   folded strictly left to right into a tree
//! - [`ForbiddenClause`]: a value combination that must never co-occur
//! - [`ParameterSpace`]: the ordered collection of all declarations
//!
//! ## Example Usage
//!
//! ```rust
//! use pcs_rs::space::{ParameterSpace, Scale, Structure};
//!
//! let mut space = ParameterSpace::new();
//! space.add_param("x", Structure::Integer, &["1", "100"], Scale::Linear, "10", None).unwrap();
//! space.add_param("y", Structure::Categorical, &["a", "b", "c"], Scale::Linear, "a", None).unwrap();
//!
//! assert_eq!(space.names(), vec!["x".to_string(), "y".to_string()]);
//! assert!(space.validate().is_ok());
//! ```

pub mod condition;
pub mod forbidden;
pub mod parameter;
pub mod space;

// Re-export key types
pub use condition::{
    ChainTerm, ConditionChain, ConditionClause, ConditionTree, Constraint, LogicalOp, Quantifier,
};
pub use forbidden::{ForbiddenClause, ForbiddenExpression, ForbiddenPair};
pub use parameter::{Domain, Parameter, ParameterError, Scale, Structure, Value};
pub use space::{Comment, Declaration, ParameterSpace};
