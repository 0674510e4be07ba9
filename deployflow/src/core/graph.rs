//! The deployment graph: an insertion-ordered map of deployment nodes.

use super::node::DeploymentNode;
use crate::errors::SynthError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// The full ordered collection of deployment nodes plus the stage tags seen.
///
/// Owned exclusively by one synthesis run; never shared or mutated after
/// serialization. Insertion order is the only ordering signal; no sorting
/// is applied anywhere, so an unchanged input tree re-synthesizes to a
/// byte-identical document.
#[derive(Debug, Clone, Default)]
pub struct DeploymentGraph {
    nodes: HashMap<String, DeploymentNode>,
    node_order: Vec<String>,
    allowed_stages: Vec<String>,
}

impl DeploymentGraph {
    /// Creates an empty deployment graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a stage tag, keeping first-seen order and ignoring repeats.
    pub fn record_stage(&mut self, stage: &str) {
        if !self.allowed_stages.iter().any(|s| s == stage) {
            self.allowed_stages.push(stage.to_string());
        }
    }

    /// Inserts a node at the end of the graph.
    ///
    /// # Errors
    ///
    /// Returns `SynthError::Internal` if the name is already taken or a
    /// dependency references a node not yet inserted. Both indicate a bug
    /// in the builder, not user error.
    pub fn insert(&mut self, node: DeploymentNode) -> Result<(), SynthError> {
        if self.nodes.contains_key(&node.name) {
            return Err(SynthError::Internal(format!(
                "duplicate deployment name '{}'",
                node.name
            )));
        }
        for dep in &node.dependencies {
            if !self.nodes.contains_key(dep) {
                return Err(SynthError::Internal(format!(
                    "deployment '{}' references '{dep}' before it was inserted",
                    node.name
                )));
            }
        }

        self.node_order.push(node.name.clone());
        self.nodes.insert(node.name.clone(), node);
        Ok(())
    }

    /// Returns the node with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DeploymentNode> {
        self.nodes.get(name)
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.node_order.len()
    }

    /// Returns `true` if the graph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_order.is_empty()
    }

    /// Node names in insertion order.
    #[must_use]
    pub fn node_names(&self) -> &[String] {
        &self.node_order
    }

    /// Stage tags in first-seen order.
    #[must_use]
    pub fn allowed_stages(&self) -> &[String] {
        &self.allowed_stages
    }

    /// Iterates nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &DeploymentNode> {
        self.node_order
            .iter()
            .filter_map(|name| self.nodes.get(name))
    }

    /// The transitive dependency closure of a node, in depth-first
    /// discovery order, excluding the node itself.
    #[must_use]
    pub fn transitive_dependencies(&self, name: &str) -> Vec<String> {
        let mut closure = Vec::new();
        let mut pending: Vec<&str> = match self.nodes.get(name) {
            Some(node) => node.dependencies.iter().map(String::as_str).collect(),
            None => return closure,
        };
        pending.reverse();

        while let Some(dep) = pending.pop() {
            if closure.iter().any(|seen| seen == dep) {
                continue;
            }
            closure.push(dep.to_string());
            if let Some(node) = self.nodes.get(dep) {
                for next in node.dependencies.iter().rev() {
                    pending.push(next);
                }
            }
        }

        closure
    }
}

impl Serialize for DeploymentGraph {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("allowedStages", &self.allowed_stages)?;
        map.serialize_entry("deployments", &Deployments(self))?;
        map.end()
    }
}

/// Serializes the node map in insertion order.
struct Deployments<'a>(&'a DeploymentGraph);

impl Serialize for Deployments<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for node in self.0.iter() {
            map.serialize_entry(&node.name, node)?;
        }
        map.end()
    }
}
