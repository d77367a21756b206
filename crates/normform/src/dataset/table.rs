//! The in-memory table analyzed by discovery and classification.

use std::collections::HashSet;

use crate::error::{NormformError, Result};

use super::value::Value;

/// An ordered set of rows over a fixed, ordered set of attributes.
///
/// A dataset is validated once on construction and is read-only afterwards:
/// attribute names are unique and every row holds exactly one value per
/// attribute.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    attributes: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Create a dataset, rejecting duplicate attributes and ragged rows.
    pub fn new(
        name: impl Into<String>,
        attributes: Vec<String>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self> {
        let name = name.into();

        let mut seen = HashSet::with_capacity(attributes.len());
        for attribute in &attributes {
            if !seen.insert(attribute.as_str()) {
                return Err(NormformError::malformed(
                    &name,
                    format!("duplicate attribute '{}'", attribute),
                ));
            }
        }

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != attributes.len())
        {
            return Err(NormformError::malformed(
                &name,
                format!(
                    "row {} has {} values, expected {}",
                    index + 1,
                    row.len(),
                    attributes.len()
                ),
            ));
        }

        Ok(Self {
            name,
            attributes,
            rows,
        })
    }

    /// Start building a dataset row by row.
    pub fn builder(name: impl Into<String>) -> DatasetBuilder {
        DatasetBuilder::new(name)
    }

    /// Identifier of the dataset, usually its file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute names in column order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Get the number of attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Position of an attribute by name.
    pub fn column_index(&self, attribute: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a == attribute)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Every cell, row by row.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.rows.iter().flatten()
    }
}

/// Incremental construction of a [`Dataset`].
#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    name: String,
    attributes: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DatasetBuilder {
    /// Create a builder for a named dataset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the attribute names.
    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Append a row.
    pub fn row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    /// Validate and produce the dataset.
    pub fn build(self) -> Result<Dataset> {
        Dataset::new(self.name, self.attributes, self.rows)
    }
}
