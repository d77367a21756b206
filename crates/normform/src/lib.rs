//! normform: functional dependency discovery and normal form classification
//! for tabular datasets.
//!
//! Given a table and a caller-supplied primary key, normform finds which sets
//! of columns determine other columns and reports whether the table is in
//! first, second and third normal form, together with the dependencies that
//! violate 2NF and 3NF.
//!
//! # Pipeline
//!
//! - [`Determinants`] enumerates every non-empty proper subset of the columns
//! - [`Evaluator`] partitions the rows by one determinant and decides what it
//!   determines under a [`DependencyRule`]
//! - [`discover`] collects the results into one dependency list
//! - [`classify`] checks the list against a [`PrimaryKey`]
//!
//! # Example
//!
//! ```no_run
//! use normform::{KeyRegistry, Normalizer};
//!
//! let registry = KeyRegistry::load("keys.json").unwrap();
//! let result = Normalizer::new()
//!     .analyze_with_registry("data/salary.csv", &registry)
//!     .unwrap();
//!
//! println!("Dependencies: {}", result.dependencies.len());
//! println!("3NF: {}", result.normal_forms.is_3nf);
//! ```

pub mod dataset;
pub mod discovery;
pub mod error;
pub mod input;
pub mod normal_form;
pub mod registry;

mod normalizer;

pub use crate::normalizer::{
    AnalysisResult, AnalysisSummary, BatchEntry, Normalizer, NormalizerConfig,
};
pub use dataset::{Dataset, DatasetBuilder, Value, ValueKind};
pub use discovery::{
    Determinant, Determinants, DependencyRule, DiscoveryConfig, Evaluator, FunctionalDependency,
    MissingKeys, discover,
};
pub use error::{NormformError, Result};
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use normal_form::{NormalForm, NormalFormResult, PrimaryKey, classify};
pub use registry::KeyRegistry;
