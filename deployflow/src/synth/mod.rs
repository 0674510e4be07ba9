//! The synthesis pipeline.
//!
//! Control flow: collect -> validate -> group -> build -> serialize. Each
//! stage is a pure transformation over immutable inputs; only the graph
//! builder accumulates state, and it owns the graph it populates. A run
//! either yields a complete document or fails before anything is written.

mod artifacts;
mod build;
mod collect;
mod group;
#[cfg(test)]
mod integration_tests;
mod serialize;
mod validate;

pub use artifacts::{ArtifactExtractor, ArtifactPlan};
pub use build::DeploymentGraphBuilder;
pub use collect::StackCollector;
pub use group::{GroupKey, Grouper, StackGroups, StageMembers};
pub use serialize::{to_yaml, write_document};
pub use validate::Validator;

use crate::core::DeploymentGraph;
use crate::errors::SynthError;
use crate::tree::DefinitionTree;
use chrono::{DateTime, Utc};
use std::path::Path;
use uuid::Uuid;

/// Identity of a single synthesis run, used for log correlation only.
///
/// The generated document never contains run identity; an unchanged
/// input tree must re-synthesize to byte-identical output.
#[derive(Debug, Clone)]
pub struct SynthRun {
    run_id: Uuid,
    started_at: DateTime<Utc>,
}

impl SynthRun {
    /// Creates a run identity with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }

    /// The unique id of this run.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// When the run started.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Milliseconds elapsed since the run started.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}

impl Default for SynthRun {
    fn default() -> Self {
        Self::new()
    }
}

/// The synthesis facade.
pub struct Synthesizer;

impl Synthesizer {
    /// Synthesizes the deployment graph for a definition tree.
    ///
    /// # Errors
    ///
    /// Returns the first validation, grouping, or graph-construction error;
    /// see [`SynthError`] for the taxonomy. All errors are fatal and no
    /// partial graph is returned.
    pub fn synthesize(tree: &DefinitionTree) -> Result<DeploymentGraph, SynthError> {
        let run = SynthRun::new();
        let span = tracing::info_span!("synthesize", run_id = %run.run_id());
        let _guard = span.enter();

        let stacks = StackCollector::collect(tree);
        Validator::validate(&stacks)?;
        let groups = Grouper::group(&stacks)?;
        let graph = DeploymentGraphBuilder::new(&groups).build()?;

        tracing::info!(
            deployments = graph.len(),
            stages = graph.allowed_stages().len(),
            elapsed_ms = run.elapsed_ms(),
            "synthesis complete"
        );
        Ok(graph)
    }

    /// Synthesizes and writes the document to `path`.
    ///
    /// # Errors
    ///
    /// Returns any synthesis error before the filesystem is touched, then
    /// any serialization or IO error from the single write.
    pub fn synthesize_to_file(
        tree: &DefinitionTree,
        path: &Path,
    ) -> Result<DeploymentGraph, SynthError> {
        let graph = Self::synthesize(tree)?;
        write_document(&graph, path)?;
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::two_stage_tree;

    #[test]
    fn test_synth_run_ids_are_unique() {
        let a = SynthRun::new();
        let b = SynthRun::new();
        assert_ne!(a.run_id(), b.run_id());
        assert!(a.elapsed_ms() >= 0);
    }

    #[test]
    fn test_synthesize_to_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy.yaml");

        let graph = Synthesizer::synthesize_to_file(&two_stage_tree(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();

        assert_eq!(written, to_yaml(&graph).unwrap());
    }

    #[test]
    fn test_failed_synthesis_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy.yaml");

        let tree = crate::testing::tree_of(vec![
            crate::testing::StackFixture::new("deploy", "CODE").build(),
            crate::testing::StackFixture::new("security", "PROD").build(),
        ]);

        assert!(Synthesizer::synthesize_to_file(&tree, &path).is_err());
        assert!(!path.exists());
    }
}
