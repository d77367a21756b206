//! Primary keys per dataset, loaded from a JSON file.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{NormformError, Result};
use crate::normal_form::PrimaryKey;

/// Maps dataset identifiers (usually file names) to primary key attributes.
///
/// The on-disk form is a JSON object:
///
/// ```json
/// { "salary.csv": ["EmployeeID", "PayrollDate"], "project.csv": ["ProjectID"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyRegistry {
    keys: IndexMap<String, BTreeSet<String>>,
}

impl KeyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the key attributes of a dataset, replacing any previous entry.
    pub fn insert<I, S>(&mut self, dataset: impl Into<String>, attributes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.insert(
            dataset.into(),
            attributes.into_iter().map(Into::into).collect(),
        );
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<I, S>(mut self, dataset: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(dataset, attributes);
        self
    }

    /// Key attributes for a dataset; empty when the dataset is unknown.
    pub fn lookup(&self, dataset: &str) -> BTreeSet<String> {
        self.keys.get(dataset).cloned().unwrap_or_default()
    }

    /// The primary key for a dataset.
    ///
    /// Fails with [`NormformError::MissingInput`] when the dataset is unknown
    /// or registered with no attributes.
    pub fn primary_key_for(&self, dataset: &str) -> Result<PrimaryKey> {
        PrimaryKey::new(self.lookup(dataset)).ok_or_else(|| {
            NormformError::missing_input(dataset, "no primary key registered")
        })
    }

    /// Number of registered datasets.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Registered datasets and their key attributes, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse a registry from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a registry from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| NormformError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let reader = BufReader::new(file);
        let registry: KeyRegistry = serde_json::from_reader(reader).map_err(|e| {
            NormformError::Config(format!(
                "Failed to parse key registry '{}': {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %path.display(), datasets = registry.len(), "Loaded key registry");
        Ok(registry)
    }

    /// Save the registry to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| NormformError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let file = File::create(path).map_err(|e| NormformError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
