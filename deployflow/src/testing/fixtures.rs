//! Test fixtures for building definition trees tersely.

use crate::core::{FunctionArtifact, RegionValue, ScalingGroupArtifact, StackIdentity, StackRef};
use crate::tree::{DefinitionTree, StackDefinition};

/// Builder for a stack definition with sensible defaults.
///
/// Defaults: template class `AppStack`, region `eu-west-1`, template file
/// path `cdk.out/{stack}-{stage}.template.json`.
#[derive(Debug, Clone)]
pub struct StackFixture {
    template_class: String,
    stack_tag: String,
    stage_tag: String,
    region: RegionValue,
    template_file_path: Option<String>,
    functions: Vec<FunctionArtifact>,
    scaling_groups: Vec<ScalingGroupArtifact>,
    dependencies: Vec<StackRef>,
}

impl StackFixture {
    /// Creates a fixture for the given stack and stage tags.
    #[must_use]
    pub fn new(stack_tag: impl Into<String>, stage_tag: impl Into<String>) -> Self {
        Self {
            template_class: "AppStack".to_string(),
            stack_tag: stack_tag.into(),
            stage_tag: stage_tag.into(),
            region: RegionValue::concrete("eu-west-1"),
            template_file_path: None,
            functions: Vec::new(),
            scaling_groups: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Overrides the template class.
    #[must_use]
    pub fn with_template_class(mut self, template_class: impl Into<String>) -> Self {
        self.template_class = template_class.into();
        self
    }

    /// Overrides the region with a concrete name.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = RegionValue::concrete(region);
        self
    }

    /// Overrides the region with a deferred placeholder token.
    #[must_use]
    pub fn with_deferred_region(mut self, token: impl Into<String>) -> Self {
        self.region = RegionValue::deferred(token);
        self
    }

    /// Overrides the template file path.
    #[must_use]
    pub fn with_template_file_path(mut self, path: impl Into<String>) -> Self {
        self.template_file_path = Some(path.into());
        self
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

    /// Builds the stack definition.
    #[must_use]
    pub fn build(self) -> StackDefinition {
        let template_file_path = self.template_file_path.unwrap_or_else(|| {
            format!(
                "cdk.out/{}-{}.template.json",
                self.stack_tag, self.stage_tag
            )
        });
        let mut definition = StackDefinition::new(StackIdentity::new(
            self.template_class,
            self.stack_tag,
            self.stage_tag,
            self.region,
            template_file_path,
        ));
        for function in self.functions {
            definition = definition.with_function(function);
        }
        for group in self.scaling_groups {
            definition = definition.with_scaling_group(group);
        }
        for dependency in self.dependencies {
            definition = definition.with_dependency(dependency);
        }
        definition
    }
}

/// Registers definitions under generated `stacks/{index}` scopes.
#[must_use]
pub fn tree_of(definitions: Vec<StackDefinition>) -> DefinitionTree {
    let mut tree = DefinitionTree::new();
    for (index, definition) in definitions.into_iter().enumerate() {
        // Generated scopes are unique, so registration cannot collide.
        let _ = tree.register(format!("stacks/{index}"), definition);
    }
    tree
}

/// A `deploy` stack spanning CODE and PROD with no artifacts.
#[must_use]
pub fn two_stage_tree() -> DefinitionTree {
    tree_of(vec![
        StackFixture::new("deploy", "CODE").build(),
        StackFixture::new("deploy", "PROD").build(),
    ])
}
