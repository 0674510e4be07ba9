//! Stack identities and region values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A region value attached to a stack at collection time.
///
/// Regions normally arrive as concrete names, but a definition tree can hand
/// the synthesizer a deferred placeholder that only resolves at apply time.
/// Grouping keys and generated node names depend on the concrete string, so
/// the validator rejects deferred values before any grouping happens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionValue {
    /// A resolved, concrete region name.
    Concrete(String),
    /// An unresolved placeholder token.
    Deferred(String),
}

impl RegionValue {
    /// Creates a concrete region value.
    #[must_use]
    pub fn concrete(name: impl Into<String>) -> Self {
        Self::Concrete(name.into())
    }

    /// Creates a deferred placeholder region value.
    #[must_use]
    pub fn deferred(token: impl Into<String>) -> Self {
        Self::Deferred(token.into())
    }

    /// Returns `true` if the region resolved to a concrete name.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        matches!(self, Self::Concrete(_))
    }

    /// Returns the concrete region name, or `None` while deferred.
    #[must_use]
    pub fn as_concrete(&self) -> Option<&str> {
        match self {
            Self::Concrete(name) => Some(name),
            Self::Deferred(_) => None,
        }
    }
}

impl fmt::Display for RegionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(name) | Self::Deferred(name) => write!(f, "{name}"),
        }
    }
}

/// Identity of a single stack instance in the definition forest.
///
/// Produced once per stack; immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackIdentity {
    /// The template class the stack was instantiated from.
    pub template_class: String,
    /// Logical grouping label spanning multiple stages.
    pub stack_tag: String,
    /// Environment label within the stack tag.
    pub stage_tag: String,
    /// The region the stack deploys into.
    pub region: RegionValue,
    /// Path to the synthesized template file for this stack.
    pub template_file_path: String,
}

impl StackIdentity {
    /// Creates a new stack identity.
    #[must_use]
    pub fn new(
        template_class: impl Into<String>,
        stack_tag: impl Into<String>,
        stage_tag: impl Into<String>,
        region: RegionValue,
        template_file_path: impl Into<String>,
    ) -> Self {
        Self {
            template_class: template_class.into(),
            stack_tag: stack_tag.into(),
            stage_tag: stage_tag.into(),
            region,
            template_file_path: template_file_path.into(),
        }
    }

    /// Projects the identity onto its stage-agnostic `(class, stack, region)`
    /// triple, or `None` while the region is deferred.
    #[must_use]
    pub fn group_ref(&self) -> Option<StackRef> {
        self.region.as_concrete().map(|region| {
            StackRef::new(
                self.template_class.clone(),
                self.stack_tag.clone(),
                region,
            )
        })
    }
}

/// Reference to another stack as a cross-stack dependency target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackRef {
    /// The template class of the referenced stack.
    pub template_class: String,
    /// The stack tag of the referenced stack.
    pub stack_tag: String,
    /// The concrete region of the referenced stack.
    pub region: String,
}

impl StackRef {
    /// Creates a new stack reference.
    #[must_use]
    pub fn new(
        template_class: impl Into<String>,
        stack_tag: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            template_class: template_class.into(),
            stack_tag: stack_tag.into(),
            region: region.into(),
        }
    }
}

impl fmt::Display for StackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.template_class, self.stack_tag, self.region
        )
    }
}
