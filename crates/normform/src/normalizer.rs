//! Main Normalizer struct and public API.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::dataset::Dataset;
use crate::discovery::{DiscoveryConfig, FunctionalDependency, discover};
use crate::error::{NormformError, Result};
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::normal_form::{NormalForm, NormalFormResult, PrimaryKey, classify};
use crate::registry::KeyRegistry;

/// File extensions picked up by directory analysis.
const DATA_EXTENSIONS: &[&str] = &["csv", "tsv"];

/// Configuration for an analysis run.
#[derive(Debug, Clone, Default)]
pub struct NormalizerConfig {
    /// Loader configuration.
    pub parser: ParserConfig,
    /// Dependency discovery configuration.
    pub discovery: DiscoveryConfig,
}

/// Result of analyzing one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Dataset identifier.
    pub dataset: String,
    /// Metadata about the source file, when loaded from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    /// The primary key the dataset was classified against.
    pub primary_key: PrimaryKey,
    /// Every discovered dependency, in discovery order.
    pub dependencies: Vec<FunctionalDependency>,
    /// Normal form verdicts and violations.
    pub normal_forms: NormalFormResult,
    /// Summary counts.
    pub summary: AnalysisSummary,
}

/// Summary of one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub row_count: usize,
    pub attribute_count: usize,
    /// Determinants evaluated.
    pub candidate_count: u64,
    pub dependency_count: usize,
    /// Highest normal form reached, if any.
    pub highest_normal_form: Option<NormalForm>,
}

/// Outcome for one file of a directory analysis.
#[derive(Debug)]
pub struct BatchEntry {
    /// File name of the dataset.
    pub dataset: String,
    /// Full path of the file.
    pub path: PathBuf,
    /// Analysis result, or the error that stopped it.
    pub outcome: Result<AnalysisResult>,
}

/// The main analysis engine.
///
/// Every call is independent: nothing is carried from one dataset to the
/// next.
pub struct Normalizer {
    config: NormalizerConfig,
    parser: Parser,
}

impl Normalizer {
    /// Create a new Normalizer with default configuration.
    pub fn new() -> Self {
        Self::with_config(NormalizerConfig::default())
    }

    /// Create a Normalizer with custom configuration.
    pub fn with_config(config: NormalizerConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self { config, parser }
    }

    /// The active configuration.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Load a data file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        self.parser.parse_file(path)
    }

    /// Discover the functional dependencies of a dataset.
    pub fn discover(&self, dataset: &Dataset) -> Result<Vec<FunctionalDependency>> {
        discover(dataset, &self.config.discovery)
    }

    /// Analyze a data file against an explicit primary key.
    pub fn analyze(&self, path: impl AsRef<Path>, key: &PrimaryKey) -> Result<AnalysisResult> {
        let (dataset, source) = self.load(path)?;
        let mut result = self.analyze_dataset(&dataset, key)?;
        result.source = Some(source);
        Ok(result)
    }

    /// Analyze a data file, looking up its primary key by file name.
    ///
    /// The key is resolved before the file is read, so an unregistered file
    /// fails without being loaded.
    pub fn analyze_with_registry(
        &self,
        path: impl AsRef<Path>,
        registry: &KeyRegistry,
    ) -> Result<AnalysisResult> {
        let path = path.as_ref();
        let key = registry.primary_key_for(&file_name(path))?;
        self.analyze(path, &key)
    }

    /// Discover dependencies of an in-memory dataset and classify it.
    pub fn analyze_dataset(&self, dataset: &Dataset, key: &PrimaryKey) -> Result<AnalysisResult> {
        let span = tracing::info_span!("analyze", dataset = %dataset.name());
        let _guard = span.enter();

        let dependencies = self.discover(dataset)?;
        let normal_forms = classify(dataset, &dependencies, key);

        let summary = AnalysisSummary {
            row_count: dataset.row_count(),
            attribute_count: dataset.attribute_count(),
            candidate_count: self.config.discovery.candidate_count(dataset),
            dependency_count: dependencies.len(),
            highest_normal_form: normal_forms.highest(),
        };

        tracing::info!(
            dependencies = summary.dependency_count,
            highest = ?summary.highest_normal_form,
            "Analysis complete"
        );

        Ok(AnalysisResult {
            dataset: dataset.name().to_string(),
            source: None,
            primary_key: key.clone(),
            dependencies,
            normal_forms,
            summary,
        })
    }

    /// Analyze every data file in a directory, sorted by file name.
    ///
    /// A failure on one file is recorded in its entry and does not stop the
    /// others. Only an unreadable directory fails the whole call.
    pub fn analyze_directory(
        &self,
        dir: impl AsRef<Path>,
        registry: &KeyRegistry,
    ) -> Result<Vec<BatchEntry>> {
        Ok(self.iter_directory(dir, registry)?.collect())
    }

    /// Like [`analyze_directory`](Self::analyze_directory), but each file is
    /// analyzed only when its entry is pulled from the iterator.
    ///
    /// The file list is read up front; dropping the iterator leaves the
    /// remaining files untouched.
    pub fn iter_directory<'a>(
        &'a self,
        dir: impl AsRef<Path>,
        registry: &'a KeyRegistry,
    ) -> Result<impl Iterator<Item = BatchEntry> + 'a> {
        let files = data_files(dir.as_ref())?;
        tracing::info!(dir = %dir.as_ref().display(), files = files.len(), "Analyzing directory");

        Ok(files.into_iter().map(move |path| {
            let outcome = self.analyze_with_registry(&path, registry);
            if let Err(ref e) = outcome {
                tracing::warn!(file = %path.display(), error = %e, "Dataset analysis failed");
            }
            BatchEntry {
                dataset: file_name(&path),
                path,
                outcome,
            }
        }))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Data files directly inside `dir`, sorted by path.
fn data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |source| NormformError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_data = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| DATA_EXTENSIONS.iter().any(|d| d.eq_ignore_ascii_case(e)));
        if path.is_file() && is_data {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
