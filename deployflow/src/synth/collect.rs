//! Stack collection over the definition tree.

use crate::tree::{DefinitionTree, StackDefinition};

/// Enumerates all stack definitions in a definition tree.
pub struct StackCollector;

impl StackCollector {
    /// Collects every registered stack in registration order.
    ///
    /// No filtering beyond type membership, which the typed registry
    /// already guarantees. An empty result is valid input to later stages.
    #[must_use]
    pub fn collect(tree: &DefinitionTree) -> Vec<&StackDefinition> {
        let stacks: Vec<&StackDefinition> = tree.stacks().iter().collect();
        tracing::debug!(count = stacks.len(), "collected stacks from definition tree");
        stacks
    }
}
