//! End-to-end tests for the synthesis pipeline.

#[cfg(test)]
mod tests {
    use crate::core::{
        DeploymentKind, FunctionArtifact, MachineImageBuild, ScalingGroupArtifact, StackRef,
    };
    use crate::errors::SynthError;
    use crate::synth::{to_yaml, Synthesizer};
    use crate::testing::{tree_of, two_stage_tree, StackFixture};
    use pretty_assertions::assert_eq;

    fn scaling(app: &str) -> ScalingGroupArtifact {
        ScalingGroupArtifact::new(
            app,
            app,
            format!("AMI{app}"),
            MachineImageBuild::new("ubuntu-jammy", false, "CODE"),
        )
    }

    #[test]
    fn scenario_one_group_two_stages_no_artifacts() {
        let graph = Synthesizer::synthesize(&two_stage_tree()).unwrap();

        assert_eq!(graph.node_names(), ["cfn-deploy-eu-west-1-app-stack"]);
        assert_eq!(graph.allowed_stages(), ["CODE", "PROD"]);

        let node = graph.get("cfn-deploy-eu-west-1-app-stack").unwrap();
        assert_eq!(node.kind, DeploymentKind::CloudFormation);

        let yaml = to_yaml(&graph).unwrap();
        assert!(yaml.contains("templateStagePaths"));
        assert!(yaml.contains("CODE: cdk.out/deploy-CODE.template.json"));
        assert!(yaml.contains("PROD: cdk.out/deploy-PROD.template.json"));
        assert!(!yaml.contains("dependencies"));
    }

    #[test]
    fn scenario_function_artifact_adds_upload_and_update() {
        let tree = tree_of(vec![
            StackFixture::new("deploy", "CODE")
                .with_function(FunctionArtifact::new("api", "api"))
                .build(),
            StackFixture::new("deploy", "PROD")
                .with_function(FunctionArtifact::new("api", "api"))
                .build(),
        ]);

        let graph = Synthesizer::synthesize(&tree).unwrap();
        assert_eq!(
            graph.node_names(),
            [
                "function-upload-deploy-eu-west-1-api",
                "cfn-deploy-eu-west-1-app-stack",
                "function-update-deploy-eu-west-1-api",
            ]
        );

        let upload = graph.get("function-upload-deploy-eu-west-1-api").unwrap();
        assert!(upload.dependencies.is_empty());

        let cfn = graph.get("cfn-deploy-eu-west-1-app-stack").unwrap();
        assert_eq!(cfn.dependencies, ["function-upload-deploy-eu-west-1-api"]);

        let update = graph.get("function-update-deploy-eu-west-1-api").unwrap();
        assert_eq!(update.dependencies, ["cfn-deploy-eu-west-1-app-stack"]);
    }

    #[test]
    fn scenario_rolling_update_group_uploads_without_deploy() {
        let tree = tree_of(vec![StackFixture::new("deploy", "CODE")
            .with_scaling_group(scaling("frontend").with_rolling_update_policy(true))
            .build()]);

        let graph = Synthesizer::synthesize(&tree).unwrap();
        assert_eq!(
            graph.node_names(),
            [
                "scaling-upload-deploy-eu-west-1-frontend",
                "cfn-deploy-eu-west-1-app-stack",
            ]
        );
    }

    #[test]
    fn scenario_missing_matrix_combination_fails() {
        let tree = tree_of(vec![
            StackFixture::new("deploy", "CODE").build(),
            StackFixture::new("deploy", "PROD").build(),
            StackFixture::new("security", "PROD").build(),
        ]);

        let err = match Synthesizer::synthesize(&tree).unwrap_err() {
            SynthError::IncompleteMatrix(err) => err,
            other => panic!("expected IncompleteMatrix, got {other}"),
        };
        assert_eq!(err.missing_count(), 1);
        assert_eq!(err.missing[0], ("security".to_string(), "CODE".to_string()));
    }

    #[test]
    fn scenario_cross_stack_dependency_wires_cfn_nodes() {
        let tree = tree_of(vec![
            StackFixture::new("a", "CODE").build(),
            StackFixture::new("b", "CODE")
                .with_dependency(StackRef::new("AppStack", "a", "eu-west-1"))
                .build(),
        ]);

        let graph = Synthesizer::synthesize(&tree).unwrap();
        let b = graph.get("cfn-b-eu-west-1-app-stack").unwrap();
        assert!(b.has_dependency("cfn-a-eu-west-1-app-stack"));
    }

    #[test]
    fn upload_reaches_update_through_the_cfn_node() {
        let tree = tree_of(vec![StackFixture::new("deploy", "CODE")
            .with_function(FunctionArtifact::new("api", "api"))
            .build()]);

        let graph = Synthesizer::synthesize(&tree).unwrap();
        let closure = graph.transitive_dependencies("function-update-deploy-eu-west-1-api");

        assert_eq!(
            closure,
            [
                "cfn-deploy-eu-west-1-app-stack",
                "function-upload-deploy-eu-west-1-api",
            ]
        );
    }

    #[test]
    fn graph_is_acyclic_with_transitive_dependencies() {
        let tree = tree_of(vec![
            StackFixture::new("a", "CODE").build(),
            StackFixture::new("b", "CODE")
                .with_dependency(StackRef::new("AppStack", "a", "eu-west-1"))
                .build(),
            StackFixture::new("c", "CODE")
                .with_dependency(StackRef::new("AppStack", "b", "eu-west-1"))
                .build(),
        ]);

        let graph = Synthesizer::synthesize(&tree).unwrap();
        for name in graph.node_names() {
            let closure = graph.transitive_dependencies(name);
            assert!(
                !closure.iter().any(|dep| dep == name),
                "node '{name}' reaches itself"
            );
        }
    }

    #[test]
    fn dependency_groups_are_inserted_before_dependents() {
        // The consumer is registered first; its prerequisite must still
        // land in the graph ahead of it.
        let tree = tree_of(vec![
            StackFixture::new("consumer", "CODE")
                .with_dependency(StackRef::new("AppStack", "producer", "eu-west-1"))
                .build(),
            StackFixture::new("producer", "CODE").build(),
        ]);

        let graph = Synthesizer::synthesize(&tree).unwrap();
        assert_eq!(
            graph.node_names(),
            [
                "cfn-producer-eu-west-1-app-stack",
                "cfn-consumer-eu-west-1-app-stack",
            ]
        );
    }

    #[test]
    fn synthesis_is_idempotent() {
        let first = to_yaml(&Synthesizer::synthesize(&two_stage_tree()).unwrap()).unwrap();
        let second = to_yaml(&Synthesizer::synthesize(&two_stage_tree()).unwrap()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn permuting_sibling_stages_keeps_the_same_nodes() {
        let forward = Synthesizer::synthesize(&tree_of(vec![
            StackFixture::new("deploy", "CODE").build(),
            StackFixture::new("deploy", "PROD").build(),
        ]))
        .unwrap();
        let reversed = Synthesizer::synthesize(&tree_of(vec![
            StackFixture::new("deploy", "PROD").build(),
            StackFixture::new("deploy", "CODE").build(),
        ]))
        .unwrap();

        assert_eq!(forward.node_names(), reversed.node_names());
        assert_eq!(forward.allowed_stages(), ["CODE", "PROD"]);
        assert_eq!(reversed.allowed_stages(), ["PROD", "CODE"]);
    }

    #[test]
    fn multi_region_stacks_produce_one_group_per_region() {
        let tree = tree_of(vec![
            StackFixture::new("deploy", "CODE").build(),
            StackFixture::new("deploy", "PROD").build(),
            StackFixture::new("deploy", "CODE").with_region("us-east-1").build(),
            StackFixture::new("deploy", "PROD").with_region("us-east-1").build(),
        ]);

        let graph = Synthesizer::synthesize(&tree).unwrap();
        assert_eq!(
            graph.node_names(),
            [
                "cfn-deploy-eu-west-1-app-stack",
                "cfn-deploy-us-east-1-app-stack",
            ]
        );
    }

    #[test]
    fn empty_tree_synthesizes_to_an_empty_graph() {
        let graph = Synthesizer::synthesize(&tree_of(Vec::new())).unwrap();
        assert!(graph.is_empty());
        assert!(graph.allowed_stages().is_empty());
    }
}
