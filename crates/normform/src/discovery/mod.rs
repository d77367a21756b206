//! Functional dependency discovery.
//!
//! Discovery enumerates every candidate [`Determinant`], evaluates it with an
//! [`Evaluator`], and collects the results with [`discover`].

mod builder;
mod dependency;
mod determinant;
mod evaluator;

pub use builder::{DiscoveryConfig, discover};
pub use dependency::FunctionalDependency;
pub use determinant::{Determinant, Determinants};
pub use evaluator::{DependencyRule, Evaluator, MissingKeys};
