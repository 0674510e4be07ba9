//! Grouping-completeness and region-resolution checks.
//!
//! Both checks are fail-fast: synthesis aborts with no partial output.

use crate::core::RegionValue;
use crate::errors::{IncompleteMatrixError, SynthError, UnresolvedRegionError};
use crate::tree::StackDefinition;
use std::collections::HashSet;

/// Validates collected stacks before grouping.
pub struct Validator;

impl Validator {
    /// Runs the completeness and region-resolution checks.
    ///
    /// # Errors
    ///
    /// Returns [`IncompleteMatrixError`] when a `(stack tag, stage tag)`
    /// combination has no stack, or [`UnresolvedRegionError`] when a
    /// stack's region is still a deferred placeholder.
    pub fn validate(stacks: &[&StackDefinition]) -> Result<(), SynthError> {
        Self::check_matrix(stacks)?;
        Self::check_regions(stacks)?;
        tracing::debug!(count = stacks.len(), "validated stack matrix and regions");
        Ok(())
    }

    /// Every stack tag must be deployable to every stage tag observed.
    ///
    /// A partially defined matrix would silently produce a lopsided
    /// deployment graph, so any hole aborts synthesis with a diagnostic
    /// table naming each combination.
    fn check_matrix(stacks: &[&StackDefinition]) -> Result<(), SynthError> {
        let mut stack_tags: Vec<&str> = Vec::new();
        let mut stage_tags: Vec<&str> = Vec::new();
        let mut found: HashSet<(&str, &str)> = HashSet::new();

        for stack in stacks {
            let stack_tag = stack.stack_tag();
            let stage_tag = stack.stage_tag();
            if !stack_tags.contains(&stack_tag) {
                stack_tags.push(stack_tag);
            }
            if !stage_tags.contains(&stage_tag) {
                stage_tags.push(stage_tag);
            }
            found.insert((stack_tag, stage_tag));
        }

        let mut missing: Vec<(String, String)> = Vec::new();
        for stack_tag in &stack_tags {
            for stage_tag in &stage_tags {
                if !found.contains(&(*stack_tag, *stage_tag)) {
                    missing.push(((*stack_tag).to_string(), (*stage_tag).to_string()));
                }
            }
        }

        if missing.is_empty() {
            return Ok(());
        }

        let table = render_matrix(&stack_tags, &stage_tags, &found);
        Err(IncompleteMatrixError::new(missing, table).into())
    }

    /// Every region must already be a concrete string.
    fn check_regions(stacks: &[&StackDefinition]) -> Result<(), SynthError> {
        for stack in stacks {
            if let RegionValue::Deferred(token) = &stack.identity.region {
                return Err(UnresolvedRegionError::new(
                    stack.stack_tag(),
                    stack.stage_tag(),
                    token.clone(),
                )
                .into());
            }
        }
        Ok(())
    }
}

/// Renders the stack-tag x stage-tag coverage table used in diagnostics.
fn render_matrix(
    stack_tags: &[&str],
    stage_tags: &[&str],
    found: &HashSet<(&str, &str)>,
) -> String {
    const FOUND: &str = "found";
    const MISSING: &str = "MISSING";

    let label_width = stack_tags
        .iter()
        .map(|tag| tag.len())
        .chain(std::iter::once("stack".len()))
        .max()
        .unwrap_or(0);
    let cell_widths: Vec<usize> = stage_tags
        .iter()
        .map(|stage| stage.len().max(MISSING.len()))
        .collect();

    let mut out = String::new();
    out.push_str(&format!("{:<label_width$}", "stack"));
    for (stage, width) in stage_tags.iter().zip(cell_widths.iter().copied()) {
        out.push_str(&format!("  {stage:<width$}"));
    }
    out.push('\n');

    for stack_tag in stack_tags {
        out.push_str(&format!("{stack_tag:<label_width$}"));
        for (stage_tag, width) in stage_tags.iter().zip(cell_widths.iter().copied()) {
            let cell = if found.contains(&(*stack_tag, *stage_tag)) {
                FOUND
            } else {
                MISSING
            };
            out.push_str(&format!("  {cell:<width$}"));
        }
        out.push('\n');
    }

    out
}
