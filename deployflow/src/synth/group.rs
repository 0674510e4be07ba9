//! Stack grouping by template class, stack tag, and region.
//!
//! Stacks that differ only by stage tag share one group; the builder later
//! merges them into a single cloud-formation node keyed by the group.

use crate::core::{StackIdentity, StackRef};
use crate::errors::{DuplicateGroupError, SynthError};
use crate::tree::StackDefinition;
use std::collections::HashMap;
use std::fmt;

/// The stage-agnostic grouping key: `(template class, stack tag, region)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    /// The template class shared by the group's members.
    pub template_class: String,
    /// The stack tag shared by the group's members.
    pub stack_tag: String,
    /// The concrete region shared by the group's members.
    pub region: String,
}

impl GroupKey {
    /// Creates a group key.
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

    /// Projects a stack identity onto its group key, or `None` while the
    /// region is deferred.
    #[must_use]
    pub fn from_identity(identity: &StackIdentity) -> Option<Self> {
        identity.region.as_concrete().map(|region| {
            Self::new(
                identity.template_class.clone(),
                identity.stack_tag.clone(),
                region,
            )
        })
    }

    /// The group key a cross-stack reference points at.
    #[must_use]
    pub fn from_ref(reference: &StackRef) -> Self {
        Self::new(
            reference.template_class.clone(),
            reference.stack_tag.clone(),
            reference.region.clone(),
        )
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.template_class, self.stack_tag, self.region
        )
    }
}

/// The members of one group, in discovery order, at most one per stage tag.
#[derive(Debug, Default)]
pub struct StageMembers<'a> {
    members: Vec<&'a StackDefinition>,
}

impl<'a> StageMembers<'a> {
    /// Member stacks in discovery order.
    #[must_use]
    pub fn members(&self) -> &[&'a StackDefinition] {
        &self.members
    }

    /// The representative member for stage-agnostic questions (artifacts
    /// are structurally identical across stages by construction).
    #[must_use]
    pub fn representative(&self) -> Option<&'a StackDefinition> {
        self.members.first().copied()
    }
}

/// All groups discovered in one synthesis run, in discovery order, plus
/// every stage tag in first-seen order.
#[derive(Debug, Default)]
pub struct StackGroups<'a> {
    order: Vec<GroupKey>,
    groups: HashMap<GroupKey, StageMembers<'a>>,
    stage_order: Vec<String>,
}

impl<'a> StackGroups<'a> {
    /// Group keys in discovery order.
    #[must_use]
    pub fn keys(&self) -> &[GroupKey] {
        &self.order
    }

    /// The members of a group.
    #[must_use]
    pub fn get(&self, key: &GroupKey) -> Option<&StageMembers<'a>> {
        self.groups.get(key)
    }

    /// Returns `true` if the key names a known group.
    #[must_use]
    pub fn contains(&self, key: &GroupKey) -> bool {
        self.groups.contains_key(key)
    }

    /// Every stage tag observed, in first-seen order.
    #[must_use]
    pub fn stage_order(&self) -> &[String] {
        &self.stage_order
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no groups were discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Partitions validated stacks into groups.
pub struct Grouper;

impl Grouper {
    /// Groups stacks by `(template class, stack tag, region)`.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateGroupError`] when two stacks occupy the same full
    /// 4-tuple, and `SynthError::Internal` if a deferred region survived
    /// validation.
    pub fn group<'a>(stacks: &[&'a StackDefinition]) -> Result<StackGroups<'a>, SynthError> {
        let mut groups = StackGroups::default();

        for stack in stacks {
            let key = GroupKey::from_identity(&stack.identity).ok_or_else(|| {
                SynthError::Internal(format!(
                    "deferred region for stack '{}' survived validation",
                    stack.stack_tag()
                ))
            })?;

            let entry = groups.groups.entry(key.clone()).or_default();
            if entry.members.is_empty() {
                groups.order.push(key.clone());
            }
            if entry
                .members
                .iter()
                .any(|member| member.stage_tag() == stack.stage_tag())
            {
                return Err(DuplicateGroupError::new(
                    key.template_class,
                    key.stack_tag,
                    key.region,
                    stack.stage_tag(),
                )
                .into());
            }
            entry.members.push(*stack);

            let stage_tag = stack.stage_tag();
            if !groups.stage_order.iter().any(|s| s == stage_tag) {
                groups.stage_order.push(stage_tag.to_string());
            }
        }

        tracing::debug!(groups = groups.len(), "grouped stacks");
        Ok(groups)
    }
}
