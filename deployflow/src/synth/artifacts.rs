//! Artifact demand extraction for a stack group.

use crate::core::{FunctionArtifact, ScalingGroupArtifact};
use crate::tree::StackDefinition;

/// The deployment steps a group's artifacts demand.
///
/// Extracted from a single representative stack; artifacts are
/// structurally identical across stages by construction.
#[derive(Debug, Default)]
pub struct ArtifactPlan<'a> {
    /// Functions needing an upload step.
    pub function_uploads: Vec<&'a FunctionArtifact>,
    /// Functions needing an update step.
    pub function_updates: Vec<&'a FunctionArtifact>,
    /// Scaling groups needing an upload step (always all of them).
    pub scaling_uploads: Vec<&'a ScalingGroupArtifact>,
    /// Scaling groups needing a separate runtime deploy step.
    pub scaling_deploys: Vec<&'a ScalingGroupArtifact>,
}

impl ArtifactPlan<'_> {
    /// Returns `true` if no artifact demands any step.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.function_uploads.is_empty()
            && self.function_updates.is_empty()
            && self.scaling_uploads.is_empty()
            && self.scaling_deploys.is_empty()
    }
}

/// Classifies a stack's artifacts into deployment demands.
pub struct ArtifactExtractor;

impl ArtifactExtractor {
    /// Extracts the artifact plan for a representative stack.
    ///
    /// Functions flagged skip-upload get no upload step; functions with an
    /// alias or pinned version get no update step (a published, pinned
    /// artifact must not be silently repointed). Scaling groups always
    /// upload; groups with a rolling update policy are rotated by the
    /// infrastructure apply itself and get no separate deploy step.
    #[must_use]
    pub fn extract(stack: &StackDefinition) -> ArtifactPlan<'_> {
        let mut plan = ArtifactPlan::default();

        for function in &stack.functions {
            if !function.skip_upload {
                plan.function_uploads.push(function);
            }
            if !function.has_alias_or_version {
                plan.function_updates.push(function);
            }
        }

        for group in &stack.scaling_groups {
            plan.scaling_uploads.push(group);
            if !group.has_rolling_update_policy {
                plan.scaling_deploys.push(group);
            }
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FunctionArtifact, MachineImageBuild, ScalingGroupArtifact};
    use crate::testing::StackFixture;

    fn scaling(app: &str) -> ScalingGroupArtifact {
        ScalingGroupArtifact::new(
            app,
            app,
            format!("AMI{app}"),
            MachineImageBuild::new("ubuntu-jammy", false, "CODE"),
        )
    }

    #[test]
    fn test_plain_function_needs_upload_and_update() {
        let stack = StackFixture::new("deploy", "CODE")
            .with_function(FunctionArtifact::new("api", "api"))
            .build();

        let plan = ArtifactExtractor::extract(&stack);
        assert_eq!(plan.function_uploads.len(), 1);
        assert_eq!(plan.function_updates.len(), 1);
    }

    #[test]
    fn test_skip_upload_function_still_updates() {
        let stack = StackFixture::new("deploy", "CODE")
            .with_function(FunctionArtifact::new("api", "api").with_skip_upload(true))
            .build();

        let plan = ArtifactExtractor::extract(&stack);
        assert!(plan.function_uploads.is_empty());
        assert_eq!(plan.function_updates.len(), 1);
    }

    #[test]
    fn test_pinned_function_is_not_updated() {
        let stack = StackFixture::new("deploy", "CODE")
            .with_function(FunctionArtifact::new("api", "api").with_alias_or_version(true))
            .build();

        let plan = ArtifactExtractor::extract(&stack);
        assert_eq!(plan.function_uploads.len(), 1);
        assert!(plan.function_updates.is_empty());
    }

    #[test]
    fn test_rolling_update_group_gets_no_deploy_step() {
        let stack = StackFixture::new("deploy", "CODE")
            .with_scaling_group(scaling("frontend").with_rolling_update_policy(true))
            .build();

        let plan = ArtifactExtractor::extract(&stack);
        assert_eq!(plan.scaling_uploads.len(), 1);
        assert!(plan.scaling_deploys.is_empty());
    }

    #[test]
    fn test_plain_group_gets_upload_and_deploy() {
        let stack = StackFixture::new("deploy", "CODE")
            .with_scaling_group(scaling("frontend"))
            .build();

        let plan = ArtifactExtractor::extract(&stack);
        assert_eq!(plan.scaling_uploads.len(), 1);
        assert_eq!(plan.scaling_deploys.len(), 1);
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_no_artifacts_is_empty_plan() {
        let stack = StackFixture::new("deploy", "CODE").build();
        assert!(ArtifactExtractor::extract(&stack).is_empty());
    }
}
