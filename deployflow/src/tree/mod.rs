//! The definition tree and its typed stack registry.
//!
//! Collaborators describe each stack with a [`StackDefinition`] and register
//! it into a [`DefinitionTree`] under a unique scope path. Registration is
//! explicit and typed: the synthesizer never inspects a heterogeneous
//! construct tree at runtime. The tree is the context object every
//! pipeline stage reads, so there is no hidden per-scope singleton state.

use crate::core::{FunctionArtifact, ScalingGroupArtifact, StackIdentity, StackRef};
use crate::errors::{DuplicateScopeError, SynthError};
use std::collections::HashMap;

/// A single stack definition: identity, artifacts, and declared
/// cross-stack dependencies.
#[derive(Debug, Clone, PartialEq)]
pub struct StackDefinition {
    /// The stack's identity.
    pub identity: StackIdentity,
    /// Function artifacts attached to the stack.
    pub functions: Vec<FunctionArtifact>,
    /// Scaling-group artifacts attached to the stack.
    pub scaling_groups: Vec<ScalingGroupArtifact>,
    /// Stacks whose infrastructure must be applied before this one's.
    pub dependencies: Vec<StackRef>,
}

impl StackDefinition {
    /// Creates a stack definition with no artifacts or dependencies.
    #[must_use]
    pub fn new(identity: StackIdentity) -> Self {
        Self {
            identity,
            functions: Vec::new(),
            scaling_groups: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Attaches a function artifact.
    #[must_use]
    pub fn with_function(mut self, function: FunctionArtifact) -> Self {
        self.functions.push(function);
        self
    }

    /// Attaches a scaling-group artifact.
    #[must_use]
    pub fn with_scaling_group(mut self, group: ScalingGroupArtifact) -> Self {
        self.scaling_groups.push(group);
        self
    }

    /// Declares a cross-stack dependency.
    #[must_use]
    pub fn with_dependency(mut self, dependency: StackRef) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// The stack tag of this definition.
    #[must_use]
    pub fn stack_tag(&self) -> &str {
        &self.identity.stack_tag
    }

    /// The stage tag of this definition.
    #[must_use]
    pub fn stage_tag(&self) -> &str {
        &self.identity.stage_tag
    }
}

/// The definition forest the synthesizer reads.
///
/// A scope-keyed registry: each stack registers under a unique scope path,
/// and registration order is the traversal order every later pipeline
/// stage observes.
#[derive(Debug, Clone, Default)]
pub struct DefinitionTree {
    stacks: Vec<StackDefinition>,
    scopes: HashMap<String, usize>,
}

impl DefinitionTree {
    /// Creates an empty definition tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stack definition under a scope path.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateScopeError`] if the scope path is already taken.
    pub fn register(
        &mut self,
        scope: impl Into<String>,
        definition: StackDefinition,
    ) -> Result<(), SynthError> {
        let scope = scope.into();
        if self.scopes.contains_key(&scope) {
            return Err(DuplicateScopeError::new(scope).into());
        }
        self.scopes.insert(scope, self.stacks.len());
        self.stacks.push(definition);
        Ok(())
    }

    /// All registered stacks in registration order.
    #[must_use]
    pub fn stacks(&self) -> &[StackDefinition] {
        &self.stacks
    }

    /// Looks up a stack by its scope path.
    #[must_use]
    pub fn get(&self, scope: &str) -> Option<&StackDefinition> {
        self.scopes.get(scope).and_then(|&i| self.stacks.get(i))
    }

    /// Number of registered stacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    /// Returns `true` if no stacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RegionValue;

    fn definition(stack_tag: &str, stage_tag: &str) -> StackDefinition {
        StackDefinition::new(StackIdentity::new(
            "ApiStack",
            stack_tag,
            stage_tag,
            RegionValue::concrete("eu-west-1"),
            format!("cdk.out/{stack_tag}-{stage_tag}.template.json"),
        ))
    }

    #[test]
    fn test_register_preserves_order() {
        let mut tree = DefinitionTree::new();
        tree.register("stacks/b", definition("b", "CODE")).unwrap();
        tree.register("stacks/a", definition("a", "CODE")).unwrap();

        let tags: Vec<&str> = tree.stacks().iter().map(StackDefinition::stack_tag).collect();
        assert_eq!(tags, ["b", "a"]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_register_rejects_duplicate_scope() {
        let mut tree = DefinitionTree::new();
        tree.register("stacks/a", definition("a", "CODE")).unwrap();

        let err = tree
            .register("stacks/a", definition("a", "PROD"))
            .unwrap_err();
        assert!(matches!(err, SynthError::DuplicateScope(_)));
    }

    #[test]
    fn test_get_by_scope() {
        let mut tree = DefinitionTree::new();
        tree.register("stacks/a", definition("a", "CODE")).unwrap();

        assert_eq!(tree.get("stacks/a").map(StackDefinition::stack_tag), Some("a"));
        assert!(tree.get("stacks/missing").is_none());
    }

    #[test]
    fn test_definition_builder() {
        let def = definition("deploy", "CODE")
            .with_dependency(StackRef::new("DataStack", "deploy", "eu-west-1"));

        assert_eq!(def.dependencies.len(), 1);
        assert_eq!(def.stage_tag(), "CODE");
    }
}
