//! First, second and third normal form tests.

use std::fmt;

use serde::Serialize;

use super::key::PrimaryKey;
use crate::dataset::Dataset;
use crate::discovery::FunctionalDependency;

/// A relational normal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum NormalForm {
    #[serde(rename = "1NF")]
    First,
    #[serde(rename = "2NF")]
    Second,
    #[serde(rename = "3NF")]
    Third,
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalForm::First => write!(f, "1NF"),
            NormalForm::Second => write!(f, "2NF"),
            NormalForm::Third => write!(f, "3NF"),
        }
    }
}

/// Verdicts of one classification, with the dependencies that broke 2NF
/// and 3NF in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalFormResult {
    pub is_1nf: bool,
    pub is_2nf: bool,
    pub is_3nf: bool,
    /// Non-prime attributes determined by a strict subset of the key.
    pub partial_dependencies: Vec<FunctionalDependency>,
    /// Non-prime attributes determined without the whole key.
    pub transitive_dependencies: Vec<FunctionalDependency>,
}

impl NormalFormResult {
    /// Highest normal form reached, counting each form only when every
    /// lower one also holds.
    pub fn highest(&self) -> Option<NormalForm> {
        match (self.is_1nf, self.is_2nf, self.is_3nf) {
            (false, _, _) => None,
            (true, false, _) => Some(NormalForm::First),
            (true, true, false) => Some(NormalForm::Second),
            (true, true, true) => Some(NormalForm::Third),
        }
    }

    /// Verdict for a single normal form.
    pub fn satisfies(&self, form: NormalForm) -> bool {
        match form {
            NormalForm::First => self.is_1nf,
            NormalForm::Second => self.is_2nf,
            NormalForm::Third => self.is_3nf,
        }
    }
}

/// Returns true if every cell of `dataset` holds an atomic value.
pub fn is_first_normal_form(dataset: &Dataset) -> bool {
    dataset.values().all(|value| value.is_atomic())
}

/// Dependencies whose determinant is a strict subset of `key` and whose
/// dependent lies outside it.
pub fn partial_dependencies(
    dependencies: &[FunctionalDependency],
    key: &PrimaryKey,
) -> Vec<FunctionalDependency> {
    dependencies
        .iter()
        .filter(|fd| key.strictly_contains(&fd.determinant) && !key.contains(&fd.dependent))
        .cloned()
        .collect()
}

/// Dependencies of a non-prime attribute on a determinant lacking part of
/// `key`. Prime dependents are never reported.
pub fn transitive_dependencies(
    dependencies: &[FunctionalDependency],
    key: &PrimaryKey,
) -> Vec<FunctionalDependency> {
    dependencies
        .iter()
        .filter(|fd| !key.contains(&fd.dependent))
        .filter(|fd| !key.is_covered_by(&fd.determinant))
        .cloned()
        .collect()
}

/// Classify `dataset` against 1NF, 2NF and 3NF.
///
/// A pure function of its inputs; each call owns its violation lists.
pub fn classify(
    dataset: &Dataset,
    dependencies: &[FunctionalDependency],
    key: &PrimaryKey,
) -> NormalFormResult {
    let is_1nf = is_first_normal_form(dataset);
    let partial = partial_dependencies(dependencies, key);
    let transitive = transitive_dependencies(dependencies, key);

    let result = NormalFormResult {
        is_1nf,
        is_2nf: partial.is_empty(),
        is_3nf: transitive.is_empty(),
        partial_dependencies: partial,
        transitive_dependencies: transitive,
    };

    tracing::debug!(
        dataset = %dataset.name(),
        key = %key,
        is_1nf = result.is_1nf,
        is_2nf = result.is_2nf,
        is_3nf = result.is_3nf,
        partial = result.partial_dependencies.len(),
        transitive = result.transitive_dependencies.len(),
        "Classified normal forms"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;
    use crate::discovery::Determinant;

    fn abc() -> Dataset {
        Dataset::builder("abc.csv")
            .attributes(["A", "B", "C"])
            .row([1, 2, 3])
            .build()
            .unwrap()
    }

    fn fd(dataset: &Dataset, determinant: &[&str], dependent: &str) -> FunctionalDependency {
        let determinant = Determinant::resolve(dataset, determinant).unwrap();
        FunctionalDependency::new(determinant, dependent).unwrap()
    }

    fn key(attributes: &[&str]) -> PrimaryKey {
        PrimaryKey::new(attributes.iter().copied()).unwrap()
    }

    #[test]
    fn test_partial_dependency_needs_strict_subset() {
        let dataset = abc();

        let wider = [fd(&dataset, &["A", "B"], "C")];
        assert!(partial_dependencies(&wider, &key(&["A"])).is_empty());

        let narrower = [fd(&dataset, &["A"], "C")];
        let violations = partial_dependencies(&narrower, &key(&["A", "B"]));
        assert_eq!(violations, narrower);
        assert!(!classify(&dataset, &narrower, &key(&["A", "B"])).is_2nf);
    }

    #[test]
    fn test_partial_dependency_on_prime_attribute_ignored() {
        let dataset = abc();
        let deps = [fd(&dataset, &["A"], "B")];
        assert!(partial_dependencies(&deps, &key(&["A", "B"])).is_empty());
    }

    #[test]
    fn test_transitive_dependency() {
        let dataset = abc();

        let without_key = [fd(&dataset, &["B"], "C")];
        assert_eq!(transitive_dependencies(&without_key, &key(&["A"])), without_key);

        let with_key = [fd(&dataset, &["A", "B"], "C")];
        assert!(transitive_dependencies(&with_key, &key(&["A"])).is_empty());
    }

    #[test]
    fn test_prime_dependents_exempt_from_3nf() {
        let dataset = abc();
        let deps = [fd(&dataset, &["C"], "A")];
        let result = classify(&dataset, &deps, &key(&["A"]));
        assert!(result.is_3nf);
        assert!(result.transitive_dependencies.is_empty());
    }

    #[test]
    fn test_violations_keep_discovery_order() {
        let dataset = abc();
        let deps = [
            fd(&dataset, &["B"], "C"),
            fd(&dataset, &["A"], "C"),
            fd(&dataset, &["C"], "B"),
        ];
        let result = classify(&dataset, &deps, &key(&["A"]));
        assert_eq!(result.transitive_dependencies, vec![deps[0].clone(), deps[2].clone()]);
    }

    #[test]
    fn test_first_normal_form() {
        assert!(is_first_normal_form(&abc()));

        let nested = Dataset::builder("nested.csv")
            .attributes(["id", "tags"])
            .row([Value::from(1), Value::from("a")])
            .row([Value::from(2), Value::List(vec![Value::from("a"), Value::from("b")])])
            .build()
            .unwrap();
        let result = classify(&nested, &[], &key(&["id"]));
        assert!(!result.is_1nf);
        assert!(result.is_2nf && result.is_3nf);
        assert_eq!(result.highest(), None);
    }

    #[test]
    fn test_highest_is_cumulative() {
        let dataset = abc();
        let deps = [fd(&dataset, &["B"], "C")];
        let result = classify(&dataset, &deps, &key(&["A"]));
        assert!(result.is_2nf);
        assert!(!result.is_3nf);
        assert_eq!(result.highest(), Some(NormalForm::Second));
        assert!(result.satisfies(NormalForm::First));
        assert_eq!(classify(&dataset, &[], &key(&["A"])).highest(), Some(NormalForm::Third));
    }
}
