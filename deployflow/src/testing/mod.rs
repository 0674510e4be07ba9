//! Testing utilities for deployflow.
//!
//! Fixtures for building definition trees tersely in unit tests,
//! integration tests, and benchmarks.

mod fixtures;

pub use fixtures::{tree_of, two_stage_tree, StackFixture};
