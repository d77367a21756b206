//! Candidate determinants and their enumeration.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::dataset::Dataset;
use crate::error::{NormformError, Result};

/// A non-empty, proper subset of a dataset's attributes.
///
/// Attributes are kept in column order together with their positions in the
/// dataset the determinant was built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Determinant {
    attributes: Vec<String>,
    positions: Vec<usize>,
}

impl Determinant {
    /// Build a determinant from attribute names of `dataset`.
    ///
    /// Fails when the set is empty, names an unknown attribute, repeats an
    /// attribute, or covers every attribute of the dataset.
    pub fn resolve<I, S>(dataset: &Dataset, attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut positions = Vec::new();
        let mut seen = HashSet::new();
        for attribute in attributes {
            let attribute = attribute.as_ref();
            let position = dataset.column_index(attribute).ok_or_else(|| {
                NormformError::Config(format!(
                    "'{}' has no attribute '{}'",
                    dataset.name(),
                    attribute
                ))
            })?;
            if seen.insert(position) {
                positions.push(position);
            }
        }

        if positions.is_empty() {
            return Err(NormformError::missing_input(
                dataset.name(),
                "determinant has no attributes",
            ));
        }
        if positions.len() >= dataset.attribute_count() {
            return Err(NormformError::Config(format!(
                "determinant must be a proper subset of the {} attributes of '{}'",
                dataset.attribute_count(),
                dataset.name()
            )));
        }

        positions.sort_unstable();
        Ok(Self::from_positions(dataset.attributes(), positions))
    }

    fn from_positions(all: &[String], positions: Vec<usize>) -> Self {
        Self {
            attributes: positions.iter().map(|&p| all[p].clone()).collect(),
            positions,
        }
    }

    /// Attribute names in column order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Column positions in ascending order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Returns true if this determinant was resolved against a dataset with
    /// the same attributes at the same positions as `dataset`.
    pub fn fits(&self, dataset: &Dataset) -> bool {
        self.positions.len() < dataset.attribute_count()
            && self
                .positions
                .iter()
                .zip(&self.attributes)
                .all(|(&p, name)| dataset.attributes().get(p) == Some(name))
    }

    /// Number of attributes in the determinant.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true if the determinant has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Returns true if `attribute` is part of the determinant.
    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }
}

impl fmt::Display for Determinant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.attributes.join(", "))
    }
}

impl Serialize for Determinant {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.attributes)
    }
}

/// Lazily enumerates every determinant of an attribute list.
///
/// Subsets come by increasing size, and lexicographically by column position
/// within one size, so cheaper determinants are tested first. Over `n`
/// attributes the full enumeration yields `2^n - 2` determinants.
#[derive(Debug, Clone)]
pub struct Determinants<'a> {
    attributes: &'a [String],
    max_size: usize,
    indices: Vec<usize>,
    exhausted: bool,
}

impl<'a> Determinants<'a> {
    /// Enumerate all non-empty proper subsets of `attributes`.
    pub fn new(attributes: &'a [String]) -> Self {
        let max_size = attributes.len().saturating_sub(1);
        Self {
            attributes,
            max_size,
            indices: vec![0],
            exhausted: max_size == 0,
        }
    }

    /// Stop after subsets of `max_size` attributes.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = self.max_size.min(max_size);
        if self.max_size < self.indices.len() {
            self.exhausted = true;
        }
        self
    }

    /// Number of determinants over `n` attributes, optionally capped in size.
    pub fn count_for(n: usize, max_size: Option<usize>) -> u64 {
        let top = max_size.map_or(n.saturating_sub(1), |m| m.min(n.saturating_sub(1)));
        let mut total: u64 = 0;
        let mut binomial: u64 = 1;
        for k in 1..=top {
            // C(n, k) = C(n, k - 1) * (n - k + 1) / k
            binomial = match binomial.checked_mul((n - k + 1) as u64) {
                Some(product) => product / k as u64,
                None => return u64::MAX,
            };
            total = total.saturating_add(binomial);
        }
        total
    }

    /// Move `indices` to the next combination, growing the size when the
    /// current size is used up.
    fn advance(&mut self) {
        let n = self.attributes.len();
        let k = self.indices.len();

        match (0..k).rev().find(|&i| self.indices[i] < n - k + i) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None if k < self.max_size => {
                self.indices = (0..=k).collect();
            }
            None => self.exhausted = true,
        }
    }
}

impl Iterator for Determinants<'_> {
    type Item = Determinant;

    fn next(&mut self) -> Option<Determinant> {
        if self.exhausted {
            return None;
        }
        let determinant = Determinant::from_positions(self.attributes, self.indices.clone());
        self.advance();
        Some(determinant)
    }
}
