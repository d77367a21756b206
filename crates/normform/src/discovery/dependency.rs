//! The functional dependency pair.

use std::fmt;

use serde::Serialize;

use super::determinant::Determinant;
use crate::error::{NormformError, Result};

/// A determinant together with one attribute it determines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionalDependency {
    /// The determining attributes.
    pub determinant: Determinant,
    /// The determined attribute, never a member of the determinant.
    pub dependent: String,
}

impl FunctionalDependency {
    /// Pair a determinant with a dependent attribute outside it.
    pub fn new(determinant: Determinant, dependent: impl Into<String>) -> Result<Self> {
        let dependent = dependent.into();
        if determinant.contains(&dependent) {
            return Err(NormformError::Config(format!(
                "dependent '{}' is part of its determinant {}",
                dependent, determinant
            )));
        }
        Ok(Self {
            determinant,
            dependent,
        })
    }
}

impl fmt::Display for FunctionalDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.determinant, self.dependent)
    }
}
