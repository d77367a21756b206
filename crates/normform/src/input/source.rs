//! Provenance of a loaded dataset.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::dataset::{Dataset, ValueKind};

/// Where a dataset came from and how its cells were read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub path: PathBuf,
    /// `sha256:` digest of the raw bytes.
    pub sha256: String,
    pub size_bytes: u64,
    /// Field delimiter the file was split on.
    pub delimiter: char,
    /// Inferred kind of every attribute, in column order.
    pub columns: IndexMap<String, ValueKind>,
    /// Cells read as missing (empty or a null token).
    pub missing_cells: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe `dataset` as loaded from `contents` at `path`.
    pub(crate) fn describe(
        path: PathBuf,
        contents: &[u8],
        delimiter: u8,
        dataset: &Dataset,
        kinds: &[ValueKind],
    ) -> Self {
        let columns = dataset
            .attributes()
            .iter()
            .cloned()
            .zip(kinds.iter().copied())
            .collect();
        let missing_cells = dataset.values().filter(|v| v.is_missing()).count();

        Self {
            path,
            sha256: format!("sha256:{:x}", Sha256::digest(contents)),
            size_bytes: contents.len() as u64,
            delimiter: delimiter as char,
            columns,
            missing_cells,
            loaded_at: Utc::now(),
        }
    }
}
