//! YAML emission of the deployment graph.

use crate::core::DeploymentGraph;
use crate::errors::SynthError;
use std::path::Path;

/// Renders the graph as the orchestrator's YAML document.
///
/// Map insertion order is preserved everywhere: `allowedStages` first,
/// then `deployments` in node insertion order, with node bodies in
/// declared field order.
///
/// # Errors
///
/// Returns `SynthError::Serialization` if the graph cannot be rendered.
pub fn to_yaml(graph: &DeploymentGraph) -> Result<String, SynthError> {
    serde_yaml::to_string(graph).map_err(|err| SynthError::Serialization(err.to_string()))
}

/// Serializes the graph and writes it to `path` in one step.
///
/// The document is rendered fully before the filesystem is touched, so a
/// failure never leaves a partial file behind.
///
/// # Errors
///
/// Returns `SynthError::Serialization` if rendering fails, or
/// `SynthError::Io` if the single write fails.
pub fn write_document(graph: &DeploymentGraph, path: &Path) -> Result<(), SynthError> {
    let document = to_yaml(graph)?;
    std::fs::write(path, &document)?;
    tracing::info!(
        path = %path.display(),
        bytes = document.len(),
        "wrote deployment document"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeploymentKind, DeploymentNode};

    fn graph() -> DeploymentGraph {
        let mut graph = DeploymentGraph::new();
        graph.record_stage("CODE");
        graph
            .insert(
                DeploymentNode::new("cfn-deploy-eu-west-1-app-stack", DeploymentKind::CloudFormation)
                    .with_region("eu-west-1")
                    .with_stack("deploy")
                    .with_app("app-stack")
                    .with_content_directory("cdk.out"),
            )
            .unwrap();
        graph
    }

    #[test]
    fn test_to_yaml_shape() {
        let yaml = to_yaml(&graph()).unwrap();
        assert!(yaml.starts_with("allowedStages:"));
        assert!(yaml.contains("deployments:"));
        assert!(yaml.contains("cfn-deploy-eu-west-1-app-stack:"));
        assert!(yaml.contains("kind: cloud-formation"));
    }

    #[test]
    fn test_write_document_writes_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy.yaml");

        let graph = graph();
        write_document(&graph, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_yaml(&graph).unwrap());
    }
}
