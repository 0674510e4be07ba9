//! # Deployflow
//!
//! Deployment manifest synthesis for infrastructure definition forests.
//!
//! Deployflow walks a tree of stack definitions and produces a
//! dependency-ordered deployment graph for an external deployment
//! orchestrator:
//!
//! - **Typed registration**: collaborators register stack definitions into
//!   a [`tree::DefinitionTree`]; no runtime type inspection
//! - **Validation**: the stack/stage matrix must be complete and every
//!   region concrete before anything is grouped
//! - **Grouping**: stacks differing only by stage merge into a single
//!   infrastructure-apply step
//! - **Graph construction**: uploads run first, infrastructure applies
//!   after its artifacts exist, runtime updates after the apply
//! - **Deterministic output**: an unchanged tree re-synthesizes to a
//!   byte-identical YAML document
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use deployflow::prelude::*;
//!
//! let mut tree = DefinitionTree::new();
//! tree.register("stacks/api-code", api_code_stack)?;
//! tree.register("stacks/api-prod", api_prod_stack)?;
//!
//! let graph = Synthesizer::synthesize(&tree)?;
//! write_document(&graph, Path::new("deploy.yaml"))?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod core;
pub mod errors;
pub mod observability;
pub mod synth;
pub mod testing;
pub mod tree;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        DeploymentGraph, DeploymentKind, DeploymentNode, FunctionArtifact, MachineImageBuild,
        RegionValue, ScalingGroupArtifact, StackIdentity, StackRef,
    };
    pub use crate::errors::{
        CyclicDependencyError, DuplicateGroupError, DuplicateScopeError, EmptyGroupError,
        IncompleteMatrixError, MissingDependencyTargetError, SynthError, UnresolvedRegionError,
    };
    pub use crate::synth::{
        to_yaml, write_document, ArtifactExtractor, DeploymentGraphBuilder, GroupKey, Grouper,
        StackCollector, StackGroups, SynthRun, Synthesizer, Validator,
    };
    pub use crate::tree::{DefinitionTree, StackDefinition};
    pub use crate::utils::{cfn_node_name, kebab_case};
}
