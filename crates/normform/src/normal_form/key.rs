//! Primary keys supplied by the caller.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::discovery::Determinant;

/// A non-empty set of attributes declared as a dataset's primary key.
///
/// The key is not checked against the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PrimaryKey {
    attributes: BTreeSet<String>,
}

impl PrimaryKey {
    /// Create a key, or `None` if no attributes are given.
    pub fn new<I, S>(attributes: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attributes: BTreeSet<String> = attributes.into_iter().map(Into::into).collect();
        if attributes.is_empty() {
            None
        } else {
            Some(Self { attributes })
        }
    }

    /// Key attributes in name order.
    pub fn attributes(&self) -> &BTreeSet<String> {
        &self.attributes
    }

    /// Number of key attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true if the key has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Returns true if `attribute` is a prime attribute.
    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.contains(attribute)
    }

    /// Returns true if `determinant` is a strict subset of the key.
    pub fn strictly_contains(&self, determinant: &Determinant) -> bool {
        determinant.len() < self.len() && determinant.attributes().iter().all(|a| self.contains(a))
    }

    /// Returns true if every key attribute is part of `determinant`.
    pub fn is_covered_by(&self, determinant: &Determinant) -> bool {
        self.attributes.iter().all(|a| determinant.contains(a))
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.attributes.iter().map(String::as_str).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
