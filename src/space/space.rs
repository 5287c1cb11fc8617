//! The ordered parameter space
//!
//! [`ParameterSpace`] is the canonical, dialect-independent model every parser fills
//! and every exporter reads. Declarations keep their source order; order only affects
//! output layout.

use crate::error::{PcsError, Result};
use crate::space::condition::Constraint;
use crate::space::forbidden::{ForbiddenClause, ForbiddenExpression};
use crate::space::parameter::{Parameter, ParameterError, Scale, Structure};
use serde::{Deserialize, Serialize};

/// A free-standing comment line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
}

/// One tagged record of a parameter space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Declaration {
    Parameter(Parameter),
    Constraint(Constraint),
    Forbidden(ForbiddenClause),
    Comment(Comment),
}

/// An ordered collection of parameters, constraints, forbidden clauses and comments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpace {
    declarations: Vec<Declaration>,
}

impl ParameterSpace {
    /// Create a new empty parameter space
    ///
    /// # Examples
    ///
    /// ```
    /// use pcs_rs::space::ParameterSpace;
    ///
    /// let space = ParameterSpace::new();
    /// assert!(space.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a space from declarations, re-running every parameter check
    ///
    /// Used for input that bypassed [`Parameter::new`], such as deserialized documents.
    pub fn from_declarations(declarations: Vec<Declaration>) -> Result<Self> {
        let mut space = Self::new();
        for declaration in declarations {
            match declaration {
                Declaration::Parameter(param) => {
                    param.validate()?;
                    space.add(param)?;
                }
                other => space.declarations.push(other),
            }
        }
        Ok(space)
    }

    /// Add a parameter declaration
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the parameter, unique within the space
    /// * `structure` - Integer, real, categorical or ordinal
    /// * `domain` - Two bounds for numeric structures, the value tokens otherwise
    /// * `scale` - Linear or log (ignored for categorical and ordinal)
    /// * `default` - Default value as text
    /// * `comment` - Optional comment
    ///
    /// # Returns
    ///
    /// `Ok(())` if the parameter was added, or an error if it is invalid or its name
    /// is already taken
    ///
    /// # Examples
    ///
    /// ```
    /// use pcs_rs::space::{ParameterSpace, Scale, Structure};
    ///
    /// let mut space = ParameterSpace::new();
    /// space.add_param("x", Structure::Integer, &["1", "100"], Scale::Linear, "10", None).unwrap();
    /// assert_eq!(space.get("x").unwrap().default(), "10");
    /// ```
    pub fn add_param<S: AsRef<str>>(
        &mut self,
        name: &str,
        structure: Structure,
        domain: &[S],
        scale: Scale,
        default: &str,
        comment: Option<&str>,
    ) -> std::result::Result<(), ParameterError> {
        let param = Parameter::new(name, structure, domain, scale, default, comment)?;
        self.add(param)
    }

    /// Add an already constructed parameter
    pub fn add(&mut self, param: Parameter) -> std::result::Result<(), ParameterError> {
        if self.contains(param.name()) {
            return Err(ParameterError::DuplicateName {
                name: param.name().to_string(),
            });
        }
        self.declarations.push(Declaration::Parameter(param));
        Ok(())
    }

    /// Add a constraint; references are checked by [`ParameterSpace::validate`]
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.declarations.push(Declaration::Constraint(constraint));
    }

    /// Add a forbidden clause; references are checked by [`ParameterSpace::validate`]
    pub fn add_forbidden(&mut self, clause: ForbiddenClause) {
        self.declarations.push(Declaration::Forbidden(clause));
    }

    /// Add a comment line
    pub fn add_comment(&mut self, text: &str) {
        self.declarations.push(Declaration::Comment(Comment {
            text: text.trim().to_string(),
        }));
    }

    /// Remove every declaration
    pub fn clear(&mut self) {
        self.declarations.clear();
    }

    /// Get a parameter by name
    ///
    /// # Returns
    ///
    /// A reference to the parameter with the given name, or `None` if no such parameter exists
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters().find(|p| p.name() == name)
    }

    /// Check if a parameter with the given name is declared
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of declarations of any kind
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// All declarations in source order
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Parameter(p) => Some(p),
            _ => None,
        })
    }

    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Constraint(c) => Some(c),
            _ => None,
        })
    }

    pub fn forbidden_clauses(&self) -> impl Iterator<Item = &ForbiddenClause> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Forbidden(f) => Some(f),
            _ => None,
        })
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Comment(c) => Some(c),
            _ => None,
        })
    }

    /// Constraints whose child is the named parameter
    pub fn constraints_for<'a>(&'a self, child: &'a str) -> impl Iterator<Item = &'a Constraint> {
        self.constraints().filter(move |c| c.parameter == child)
    }

    /// Get the names of all parameters, in declaration order
    pub fn names(&self) -> Vec<String> {
        self.parameters().map(|p| p.name().to_string()).collect()
    }

    /// Check that every cross-reference resolves to a declared parameter
    ///
    /// Covers constraint children, condition parents and the parameters of simple
    /// forbidden clauses. Advanced clauses are raw text and are not inspected.
    pub fn validate(&self) -> Result<()> {
        let unknown = |name: &str, context: String| PcsError::UnknownParameterReference {
            name: name.to_string(),
            context,
        };

        for constraint in self.constraints() {
            if !self.contains(&constraint.parameter) {
                return Err(unknown(
                    &constraint.parameter,
                    format!("constraint '{}'", constraint),
                ));
            }
            for clause in constraint.conditions.clauses() {
                if !self.contains(clause.parameter()) {
                    return Err(unknown(
                        clause.parameter(),
                        format!("constraint '{}'", constraint),
                    ));
                }
            }
        }

        for clause in self.forbidden_clauses() {
            if let ForbiddenExpression::Simple { pairs } = &clause.expression {
                for pair in pairs {
                    if !self.contains(&pair.parameter) {
                        return Err(unknown(
                            &pair.parameter,
                            format!("forbidden clause '{}'", clause),
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Convert the space to a pretty JSON document
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a space from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let space: ParameterSpace = serde_json::from_str(json)?;
        Self::from_declarations(space.declarations)
    }

    /// Convert the space to a YAML document
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parse a space from a YAML (or JSON) document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let space: ParameterSpace = serde_yaml::from_str(yaml)?;
        Self::from_declarations(space.declarations)
    }
}
