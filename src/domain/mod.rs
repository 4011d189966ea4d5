//! Domain logic - pure release rules independent of git and the filesystem

pub mod branch;
pub mod version;

pub use branch::{BranchOutcome, BranchTarget};
pub use version::{BumpKind, Version};
