//! Normal form classification against a caller-supplied primary key.

mod classifier;
mod key;

pub use classifier::{
    NormalForm, NormalFormResult, classify, is_first_normal_form, partial_dependencies,
    transitive_dependencies,
};
pub use key::PrimaryKey;
