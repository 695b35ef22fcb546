//! Semantic version values and bumping.

pub mod bump;
pub mod semantic;

pub use bump::{
    BumpPolicy, BumpSpecifier, DEFAULT_BUILD_LABEL, DEFAULT_PRE_LABEL, LabelPolicy, apply_bump,
};
pub use semantic::{SemanticVersion, Suffix};
