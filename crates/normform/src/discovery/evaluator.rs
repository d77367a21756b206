//! Testing one determinant against the remaining attributes.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::determinant::Determinant;
use crate::dataset::{Dataset, Value};
use crate::error::{NormformError, Result};

/// The rule deciding when a determinant determines an attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyRule {
    /// The determinant must identify every row uniquely. A determinant that
    /// does so determines every other attribute; one that does not
    /// determines none, even attributes constant within each group.
    #[default]
    RowUniqueness,
    /// Textbook functional dependency: rows agreeing on the determinant must
    /// agree on the dependent, whatever the group size.
    ValueConsistency,
}

/// How rows with missing values in the determinant are partitioned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingKeys {
    /// Rows with a missing value in any determinant attribute are left out,
    /// as a `groupby` drops null keys.
    #[default]
    Skip,
    /// Missing is an ordinary key value; missing cells compare equal.
    Group,
}

/// Decides which attributes a determinant functionally determines.
///
/// Each call makes one pass over the rows, partitioning them by their values
/// on the determinant. Row order never affects the outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    rule: DependencyRule,
    missing_keys: MissingKeys,
}

impl Evaluator {
    /// Create an evaluator for the given rule.
    pub fn new(rule: DependencyRule) -> Self {
        Self {
            rule,
            missing_keys: MissingKeys::default(),
        }
    }

    /// Set the missing-value policy for partition keys.
    pub fn with_missing_keys(mut self, missing_keys: MissingKeys) -> Self {
        self.missing_keys = missing_keys;
        self
    }

    /// The rule this evaluator applies.
    pub fn rule(&self) -> DependencyRule {
        self.rule
    }

    /// Attributes outside `determinant` that it determines, in column order.
    ///
    /// Fails with `Config` when `determinant` was resolved against a
    /// differently shaped dataset.
    pub fn determined_attributes<'d>(
        &self,
        dataset: &'d Dataset,
        determinant: &Determinant,
    ) -> Result<Vec<&'d str>> {
        check_fits(dataset, determinant)?;
        let remaining: Vec<usize> = (0..dataset.attribute_count())
            .filter(|p| !determinant.positions().contains(p))
            .collect();

        let determined = match self.rule {
            DependencyRule::RowUniqueness => {
                if self.partitions_are_singletons(dataset, determinant) {
                    remaining
                } else {
                    Vec::new()
                }
            }
            DependencyRule::ValueConsistency => {
                self.consistent_attributes(dataset, determinant, remaining)
            }
        };

        Ok(determined
            .into_iter()
            .map(|p| dataset.attributes()[p].as_str())
            .collect())
    }

    /// Returns true if every partition holds exactly one row.
    pub fn identifies_rows(&self, dataset: &Dataset, determinant: &Determinant) -> Result<bool> {
        check_fits(dataset, determinant)?;
        Ok(self.partitions_are_singletons(dataset, determinant))
    }

    fn partitions_are_singletons(&self, dataset: &Dataset, determinant: &Determinant) -> bool {
        let mut partitions: HashSet<Vec<&Value>> = HashSet::with_capacity(dataset.row_count());
        dataset
            .rows()
            .iter()
            .filter_map(|row| self.partition_key(row, determinant.positions()))
            .all(|key| partitions.insert(key))
    }

    fn consistent_attributes(
        &self,
        dataset: &Dataset,
        determinant: &Determinant,
        remaining: Vec<usize>,
    ) -> Vec<usize> {
        let mut consistent = vec![true; remaining.len()];
        let mut partitions: HashMap<Vec<&Value>, &[Value]> =
            HashMap::with_capacity(dataset.row_count());

        for row in dataset.rows() {
            let Some(key) = self.partition_key(row, determinant.positions()) else {
                continue;
            };
            match partitions.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
                Entry::Occupied(first) => {
                    let first = *first.get();
                    for (ok, &col) in consistent.iter_mut().zip(&remaining) {
                        if *ok && first[col] != row[col] {
                            *ok = false;
                        }
                    }
                    if !consistent.contains(&true) {
                        return Vec::new();
                    }
                }
            }
        }

        remaining
            .into_iter()
            .zip(consistent)
            .filter_map(|(col, ok)| ok.then_some(col))
            .collect()
    }

    fn partition_key<'r>(&self, row: &'r [Value], positions: &[usize]) -> Option<Vec<&'r Value>> {
        let key: Vec<&Value> = positions.iter().map(|&p| &row[p]).collect();
        if self.missing_keys == MissingKeys::Skip && key.iter().any(|v| v.is_missing()) {
            return None;
        }
        Some(key)
    }
}

fn check_fits(dataset: &Dataset, determinant: &Determinant) -> Result<()> {
    if determinant.fits(dataset) {
        Ok(())
    } else {
        Err(NormformError::Config(format!(
            "determinant {} does not belong to '{}'",
            determinant,
            dataset.name()
        )))
    }
}
