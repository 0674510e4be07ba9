//! Error types for deployment synthesis.
//!
//! Every error is fatal and surfaced synchronously: synthesis either
//! produces a complete document or fails before anything is written.

use thiserror::Error;

/// The main error type for synthesis operations.
#[derive(Debug, Error)]
pub enum SynthError {
    /// A `(stack tag, stage tag)` combination has no matching stack.
    #[error("{0}")]
    IncompleteMatrix(#[from] IncompleteMatrixError),

    /// A stack's region is still a deferred placeholder.
    #[error("{0}")]
    UnresolvedRegion(#[from] UnresolvedRegionError),

    /// A grouping leaf produced zero stacks.
    #[error("{0}")]
    EmptyGroup(#[from] EmptyGroupError),

    /// Two stacks occupy the same full grouping key.
    #[error("{0}")]
    DuplicateGroup(#[from] DuplicateGroupError),

    /// A declared cross-stack dependency does not resolve to a known group.
    #[error("{0}")]
    MissingDependencyTarget(#[from] MissingDependencyTargetError),

    /// Declared cross-stack dependencies form a cycle.
    #[error("{0}")]
    CyclicDependency(#[from] CyclicDependencyError),

    /// A scope path was registered twice in the definition tree.
    #[error("{0}")]
    DuplicateScope(#[from] DuplicateScopeError),

    /// The deployment graph could not be rendered as a document.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A graph invariant was violated; indicates a logic bug, not user error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error while writing the document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error raised when the stack/stage matrix is not fully covered.
///
/// The deployment definition is only coherent if every stack tag is
/// deployable to every stage tag it claims to support; a partial matrix
/// would silently produce a lopsided deployment graph.
#[derive(Debug, Clone, Error)]
#[error(
    "deployment matrix is incomplete: {} stack/stage combination(s) have no stack\n{table}",
    missing.len()
)]
pub struct IncompleteMatrixError {
    /// The `(stack tag, stage tag)` combinations with no matching stack.
    pub missing: Vec<(String, String)>,
    /// Rendered stack-tag x stage-tag diagnostic table.
    pub table: String,
}

impl IncompleteMatrixError {
    /// Creates a new incomplete matrix error.
    #[must_use]
    pub fn new(missing: Vec<(String, String)>, table: impl Into<String>) -> Self {
        Self {
            missing,
            table: table.into(),
        }
    }

    /// Number of missing combinations.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    /// Converts to a dictionary representation for structured logging.
    #[must_use]
    pub fn to_dict(&self) -> std::collections::HashMap<String, serde_json::Value> {
        let mut map = std::collections::HashMap::new();
        map.insert(
            "missing".to_string(),
            serde_json::Value::Array(
                self.missing
                    .iter()
                    .map(|(stack, stage)| serde_json::json!([stack, stage]))
                    .collect(),
            ),
        );
        map.insert(
            "table".to_string(),
            serde_json::Value::String(self.table.clone()),
        );
        map
    }
}

/// Error raised when a stack's region is still a deferred placeholder.
///
/// Grouping keys and generated node names depend on concrete region
/// strings, so a deferred value would corrupt the graph structure itself.
#[derive(Debug, Clone, Error)]
#[error("stack '{stack_tag}' (stage '{stage_tag}') has an unresolved region token '{token}'")]
pub struct UnresolvedRegionError {
    /// The stack tag of the offending stack.
    pub stack_tag: String,
    /// The stage tag of the offending stack.
    pub stage_tag: String,
    /// The deferred placeholder token.
    pub token: String,
}

impl UnresolvedRegionError {
    /// Creates a new unresolved region error.
    #[must_use]
    pub fn new(
        stack_tag: impl Into<String>,
        stage_tag: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            stack_tag: stack_tag.into(),
            stage_tag: stage_tag.into(),
            token: token.into(),
        }
    }
}

/// Error raised when a grouping leaf holds no stacks.
#[derive(Debug, Clone, Error)]
#[error("group '{group}' produced no stacks")]
pub struct EmptyGroupError {
    /// The group key, rendered as `class/stack/region`.
    pub group: String,
}

impl EmptyGroupError {
    /// Creates a new empty group error.
    #[must_use]
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
        }
    }
}

/// Error raised when two stacks occupy the same full grouping key.
///
/// The correct resolution policy is unspecified, so the synthesizer
/// refuses rather than silently picking one.
#[derive(Debug, Clone, Error)]
#[error(
    "two stacks occupy the same grouping key \
     ({template_class}, {stack_tag}, {region}, {stage_tag})"
)]
pub struct DuplicateGroupError {
    /// The template class of the colliding stacks.
    pub template_class: String,
    /// The stack tag of the colliding stacks.
    pub stack_tag: String,
    /// The region of the colliding stacks.
    pub region: String,
    /// The stage tag of the colliding stacks.
    pub stage_tag: String,
}

impl DuplicateGroupError {
    /// Creates a new duplicate group error.
    #[must_use]
    pub fn new(
        template_class: impl Into<String>,
        stack_tag: impl Into<String>,
        region: impl Into<String>,
        stage_tag: impl Into<String>,
    ) -> Self {
        Self {
            template_class: template_class.into(),
            stack_tag: stack_tag.into(),
            region: region.into(),
            stage_tag: stage_tag.into(),
        }
    }
}

/// Error raised when a declared cross-stack dependency does not resolve.
#[derive(Debug, Clone, Error)]
#[error("group '{from}' depends on unknown stack '{target}'")]
pub struct MissingDependencyTargetError {
    /// The group that declared the dependency.
    pub from: String,
    /// The unresolvable target, rendered as `class/stack/region`.
    pub target: String,
}

impl MissingDependencyTargetError {
    /// Creates a new missing dependency target error.
    #[must_use]
    pub fn new(from: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            target: target.into(),
        }
    }
}

/// Error raised when declared cross-stack dependencies form a cycle.
#[derive(Debug, Clone, Error)]
#[error("cyclic cross-stack dependency: {}", cycle_path.join(" -> "))]
pub struct CyclicDependencyError {
    /// The group keys forming the cycle, first repeated at the end.
    pub cycle_path: Vec<String>,
}

impl CyclicDependencyError {
    /// Creates a new cyclic dependency error.
    #[must_use]
    pub fn new(cycle_path: Vec<String>) -> Self {
        Self { cycle_path }
    }
}

/// Error raised when a scope path is registered twice in a definition tree.
#[derive(Debug, Clone, Error)]
#[error("scope '{scope}' is already registered")]
pub struct DuplicateScopeError {
    /// The scope path that was reused.
    pub scope: String,
}

impl DuplicateScopeError {
    /// Creates a new duplicate scope error.
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }
}
