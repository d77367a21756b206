//! Building the full dependency list of a dataset.

use serde::{Deserialize, Serialize};

use super::dependency::FunctionalDependency;
use super::determinant::Determinants;
use super::evaluator::{DependencyRule, Evaluator, MissingKeys};
use crate::dataset::Dataset;
use crate::error::{NormformError, Result};

/// Configuration for dependency discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Rule deciding when a determinant determines an attribute.
    pub rule: DependencyRule,
    /// Partitioning of rows with missing determinant values.
    pub missing_keys: MissingKeys,
    /// Largest determinant to test (None = all proper subsets).
    pub max_determinant_size: Option<usize>,
}

impl DiscoveryConfig {
    /// Number of determinants discovery will evaluate for `dataset`.
    pub fn candidate_count(&self, dataset: &Dataset) -> u64 {
        Determinants::count_for(dataset.attribute_count(), self.max_determinant_size)
    }

    fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.rule).with_missing_keys(self.missing_keys)
    }
}

/// Discover every functional dependency of `dataset`.
///
/// Determinants are evaluated in enumeration order and each one contributes
/// its dependents in column order. The same dependent may appear under
/// several determinants; no deduplication or minimal cover is computed.
///
/// A single-attribute dataset has no determinants and yields no dependencies.
pub fn discover(dataset: &Dataset, config: &DiscoveryConfig) -> Result<Vec<FunctionalDependency>> {
    if dataset.attribute_count() == 0 {
        return Err(NormformError::EmptyData(format!(
            "{}: no attributes to analyze",
            dataset.name()
        )));
    }

    tracing::debug!(
        dataset = %dataset.name(),
        candidates = config.candidate_count(dataset),
        rows = dataset.row_count(),
        rule = ?config.rule,
        "Discovering functional dependencies"
    );

    let evaluator = config.evaluator();
    let mut determinants = Determinants::new(dataset.attributes());
    if let Some(max) = config.max_determinant_size {
        determinants = determinants.with_max_size(max);
    }

    let mut dependencies = Vec::new();
    for determinant in determinants {
        let determined = evaluator.determined_attributes(dataset, &determinant)?;
        if determined.is_empty() {
            continue;
        }
        tracing::trace!(determinant = %determinant, count = determined.len(), "Determinant qualifies");
        for dependent in determined {
            dependencies.push(FunctionalDependency::new(determinant.clone(), dependent)?);
        }
    }

    tracing::debug!(
        dataset = %dataset.name(),
        dependencies = dependencies.len(),
        "Discovery finished"
    );

    Ok(dependencies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    fn sample() -> Dataset {
        Dataset::builder("sample.csv")
            .attributes(["A", "B", "C"])
            .row([Value::from(1), Value::from("x"), Value::from("p")])
            .row([Value::from(1), Value::from("x"), Value::from("q")])
            .row([Value::from(2), Value::from("y"), Value::from("p")])
            .build()
            .unwrap()
    }

    fn rendered(dependencies: &[FunctionalDependency]) -> Vec<String> {
        dependencies.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_discover_row_uniqueness() {
        let dependencies = discover(&sample(), &DiscoveryConfig::default()).unwrap();
        assert_eq!(rendered(&dependencies), ["{A, C} -> B", "{B, C} -> A"]);
    }

    #[test]
    fn test_discover_value_consistency() {
        let config = DiscoveryConfig {
            rule: DependencyRule::ValueConsistency,
            ..Default::default()
        };
        let dependencies = discover(&sample(), &config).unwrap();
        assert_eq!(
            rendered(&dependencies),
            ["{A} -> B", "{B} -> A", "{A, C} -> B", "{B, C} -> A"]
        );
    }

    #[test]
    fn test_duplicates_across_determinants_kept() {
        let dataset = Dataset::builder("ids.csv")
            .attributes(["id", "name", "city"])
            .row([Value::from(1), Value::from("Ann"), Value::from("Oslo")])
            .row([Value::from(2), Value::from("Bo"), Value::from("Oslo")])
            .build()
            .unwrap();
        let dependencies = discover(&dataset, &DiscoveryConfig::default()).unwrap();

        let to_city = dependencies.iter().filter(|fd| fd.dependent == "city").count();
        // {id}, {name} and {id, name} all identify the rows.
        assert_eq!(to_city, 3);
    }

    #[test]
    fn test_max_determinant_size() {
        let config = DiscoveryConfig {
            max_determinant_size: Some(1),
            ..Default::default()
        };
        assert!(discover(&sample(), &config).unwrap().is_empty());
        assert_eq!(config.candidate_count(&sample()), 3);
    }

    #[test]
    fn test_single_attribute_has_no_dependencies() {
        let dataset = Dataset::builder("narrow.csv")
            .attributes(["only"])
            .row([1])
            .row([1])
            .build()
            .unwrap();
        assert!(discover(&dataset, &DiscoveryConfig::default()).unwrap().is_empty());
        assert_eq!(DiscoveryConfig::default().candidate_count(&dataset), 0);
    }

    #[test]
    fn test_no_attributes_is_empty_data() {
        let dataset = Dataset::builder("blank.csv").build().unwrap();
        let err = discover(&dataset, &DiscoveryConfig::default()).unwrap_err();
        assert!(matches!(err, NormformError::EmptyData(_)));
    }

    #[test]
    fn test_null_keys_are_skipped_by_default() {
        let dataset = crate::input::Parser::new()
            .parse_str("codes.csv", "k,v
,a
,b
NA,c
NA,d
X,e
")
            .unwrap();

        let skipped = discover(&dataset, &DiscoveryConfig::default()).unwrap();
        assert_eq!(rendered(&skipped), ["{k} -> v", "{v} -> k"]);

        let grouped = DiscoveryConfig {
            missing_keys: MissingKeys::Group,
            ..Default::default()
        };
        assert_eq!(rendered(&discover(&dataset, &grouped).unwrap()), ["{v} -> k"]);
    }
}
