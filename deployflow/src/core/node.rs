//! Deployment node types emitted into the deployment graph.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;

/// The kind of step a deployment node performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentKind {
    /// Apply a stack's infrastructure template.
    CloudFormation,
    /// Upload a function package to its storage location.
    FunctionUpload,
    /// Repoint a running function at the freshly uploaded package.
    FunctionUpdate,
    /// Upload a scaling group's application artifact.
    ScalingUpload,
    /// Roll the running scaling group onto the new artifact.
    ScalingUpdate,
    /// A step the synthesizer does not model further.
    Other,
}

impl fmt::Display for DeploymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CloudFormation => write!(f, "cloud-formation"),
            Self::FunctionUpload => write!(f, "function-upload"),
            Self::FunctionUpdate => write!(f, "function-update"),
            Self::ScalingUpload => write!(f, "scaling-upload"),
            Self::ScalingUpdate => write!(f, "scaling-update"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// One step in the generated deployment graph.
///
/// The name is the node's unique key in the graph and is not repeated in
/// the serialized body. `regions` and `stacks` keep insertion order and
/// reject duplicates; `dependencies` and `actions` are omitted from the
/// document when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentNode {
    /// Unique key of the node within the graph.
    #[serde(skip)]
    pub name: String,
    /// The kind of step this node performs.
    pub kind: DeploymentKind,
    /// Regions the step targets, in insertion order.
    pub regions: Vec<String>,
    /// Stack tags the step targets, in insertion order.
    pub stacks: Vec<String>,
    /// The application identifier the step acts for.
    pub app: String,
    /// Directory holding the content the step operates on.
    pub content_directory: String,
    /// Step parameters; nested maps keep insertion order.
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub parameters: Mapping,
    /// Names of nodes that must complete before this one starts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    /// Orchestrator actions the step runs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
}

impl DeploymentNode {
    /// Creates a new deployment node with the given name and kind.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: DeploymentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            regions: Vec::new(),
            stacks: Vec::new(),
            app: String::new(),
            content_directory: String::new(),
            parameters: Mapping::new(),
            dependencies: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Adds a target region, keeping insertion order and ignoring repeats.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        let region = region.into();
        if !self.regions.contains(&region) {
            self.regions.push(region);
        }
        self
    }

    /// Adds a target stack tag, keeping insertion order and ignoring repeats.
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        let stack = stack.into();
        if !self.stacks.contains(&stack) {
            self.stacks.push(stack);
        }
        self
    }

    /// Sets the application identifier.
    #[must_use]
    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = app.into();
        self
    }

    /// Sets the content directory.
    #[must_use]
    pub fn with_content_directory(mut self, dir: impl Into<String>) -> Self {
        self.content_directory = dir.into();
        self
    }

    /// Inserts a parameter, preserving insertion order.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(Value::String(key.into()), value);
        self
    }

    /// Adds a dependency on another node by name.
    #[must_use]
    pub fn with_dependency(mut self, dep: impl Into<String>) -> Self {
        let dep = dep.into();
        if !self.dependencies.contains(&dep) {
            self.dependencies.push(dep);
        }
        self
    }

    /// Adds an orchestrator action.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// Returns `true` if the node depends on `name`.
    #[must_use]
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.iter().any(|dep| dep == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_kebab_case() {
        let yaml = serde_yaml::to_string(&DeploymentKind::CloudFormation).unwrap();
        assert_eq!(yaml.trim(), "cloud-formation");
        assert_eq!(DeploymentKind::FunctionUpload.to_string(), "function-upload");
    }

    #[test]
    fn test_node_builder_dedups_sets() {
        let node = DeploymentNode::new("n", DeploymentKind::Other)
            .with_region("eu-west-1")
            .with_region("eu-west-1")
            .with_stack("deploy")
            .with_dependency("a")
            .with_dependency("a");

        assert_eq!(node.regions, vec!["eu-west-1"]);
        assert_eq!(node.stacks, vec!["deploy"]);
        assert_eq!(node.dependencies, vec!["a"]);
        assert!(node.has_dependency("a"));
        assert!(!node.has_dependency("b"));
    }

    #[test]
    fn test_node_body_omits_empty_collections() {
        let node = DeploymentNode::new("n", DeploymentKind::CloudFormation)
            .with_region("eu-west-1")
            .with_stack("deploy")
            .with_app("app-stack")
            .with_content_directory("cdk.out");

        let yaml = serde_yaml::to_string(&node).unwrap();
        assert!(!yaml.contains("name"));
        assert!(!yaml.contains("dependencies"));
        assert!(!yaml.contains("actions"));
        assert!(!yaml.contains("parameters"));
        assert!(yaml.contains("contentDirectory: cdk.out"));
    }

    #[test]
    fn test_node_parameters_keep_insertion_order() {
        let node = DeploymentNode::new("n", DeploymentKind::CloudFormation)
            .with_region("eu-west-1")
            .with_stack("deploy")
            .with_parameter("zebra", Value::String("z".to_string()))
            .with_parameter("alpha", Value::String("a".to_string()));

        let yaml = serde_yaml::to_string(&node).unwrap();
        let zebra = yaml.find("zebra").unwrap();
        let alpha = yaml.find("alpha").unwrap();
        assert!(zebra < alpha, "parameter order must follow insertion");
    }
}
