//! Deployment graph construction.
//!
//! Groups are visited in discovery order; declared cross-stack dependencies
//! are resolved depth-first so a prerequisite group's nodes are always
//! inserted before its dependents. The graph therefore never contains a
//! forward reference, and a dependency chain that re-enters a group being
//! built surfaces as a cycle error instead of recursing forever.

use crate::core::{
    DeploymentGraph, DeploymentKind, DeploymentNode, ScalingGroupArtifact, StackRef,
};
use crate::errors::{
    CyclicDependencyError, EmptyGroupError, MissingDependencyTargetError, SynthError,
};
use crate::synth::artifacts::ArtifactExtractor;
use crate::synth::group::{GroupKey, StackGroups, StageMembers};
use crate::tree::StackDefinition;
use crate::utils::naming;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::path::Path;

/// Builds the deployment graph for a set of validated, grouped stacks.
pub struct DeploymentGraphBuilder<'a> {
    groups: &'a StackGroups<'a>,
    graph: DeploymentGraph,
    built: HashMap<GroupKey, String>,
    path: Vec<GroupKey>,
}

impl<'a> DeploymentGraphBuilder<'a> {
    /// Creates a builder over the grouped stacks.
    #[must_use]
    pub fn new(groups: &'a StackGroups<'a>) -> Self {
        Self {
            groups,
            graph: DeploymentGraph::new(),
            built: HashMap::new(),
            path: Vec::new(),
        }
    }

    /// Builds the full deployment graph.
    ///
    /// # Errors
    ///
    /// Returns [`MissingDependencyTargetError`] for a dependency on an
    /// unknown stack, [`CyclicDependencyError`] for a dependency cycle,
    /// and [`EmptyGroupError`] for a group with no members.
    pub fn build(mut self) -> Result<DeploymentGraph, SynthError> {
        let groups = self.groups;
        for stage in groups.stage_order() {
            self.graph.record_stage(stage);
        }
        for key in groups.keys() {
            self.build_group(key)?;
        }
        Ok(self.graph)
    }

    /// Builds one group's nodes, resolving its dependencies first.
    /// Returns the name of the group's cloud-formation node.
    fn build_group(&mut self, key: &GroupKey) -> Result<String, SynthError> {
        if let Some(name) = self.built.get(key) {
            return Ok(name.clone());
        }
        if let Some(position) = self.path.iter().position(|entered| entered == key) {
            let mut cycle: Vec<String> =
                self.path[position..].iter().map(ToString::to_string).collect();
            cycle.push(key.to_string());
            return Err(CyclicDependencyError::new(cycle).into());
        }
        self.path.push(key.clone());

        let groups = self.groups;
        let members = groups
            .get(key)
            .ok_or_else(|| SynthError::Internal(format!("group '{key}' vanished during build")))?;
        let representative = members
            .representative()
            .ok_or_else(|| EmptyGroupError::new(key.to_string()))?;

        // Prerequisite groups first, so their cfn nodes already exist.
        let mut dependency_cfn_names: Vec<String> = Vec::new();
        for reference in group_dependencies(members) {
            let dependency_key = GroupKey::from_ref(&reference);
            if !groups.contains(&dependency_key) {
                return Err(MissingDependencyTargetError::new(
                    key.to_string(),
                    reference.to_string(),
                )
                .into());
            }
            let name = self.build_group(&dependency_key)?;
            if !dependency_cfn_names.contains(&name) {
                dependency_cfn_names.push(name);
            }
        }

        let stack_tag = key.stack_tag.clone();
        let region = key.region.clone();
        let plan = ArtifactExtractor::extract(representative);

        let mut upload_names: Vec<String> = Vec::new();
        for function in &plan.function_uploads {
            let name =
                naming::artifact_node_name("function-upload", &stack_tag, &region, &function.app);
            let node = DeploymentNode::new(&name, DeploymentKind::FunctionUpload)
                .with_region(&region)
                .with_stack(&stack_tag)
                .with_app(&function.app)
                .with_content_directory(&function.content_directory)
                .with_action("upload");
            self.graph.insert(node)?;
            upload_names.push(name);
        }
        for group in &plan.scaling_uploads {
            let name =
                naming::artifact_node_name("scaling-upload", &stack_tag, &region, &group.app);
            let node = DeploymentNode::new(&name, DeploymentKind::ScalingUpload)
                .with_region(&region)
                .with_stack(&stack_tag)
                .with_app(&group.app)
                .with_content_directory(&group.content_directory)
                .with_action("upload");
            self.graph.insert(node)?;
            upload_names.push(name);
        }

        let cfn_name = naming::cfn_node_name(&stack_tag, &region, &key.template_class);
        let mut cfn = DeploymentNode::new(&cfn_name, DeploymentKind::CloudFormation)
            .with_region(&region)
            .with_stack(&stack_tag)
            .with_app(naming::kebab_case(&key.template_class))
            .with_content_directory(template_directory(representative));

        let mut stage_paths = Mapping::new();
        for member in members.members() {
            stage_paths.insert(
                Value::String(member.stage_tag().to_string()),
                Value::String(member.identity.template_file_path.clone()),
            );
        }
        cfn = cfn.with_parameter("templateStagePaths", Value::Mapping(stage_paths));

        if !representative.scaling_groups.is_empty() {
            cfn = cfn.with_parameter(
                "machineImageParameters",
                Value::Mapping(machine_image_parameters(&representative.scaling_groups)),
            );
        }
        let min_in_service = min_in_service_parameters(&representative.scaling_groups);
        if !min_in_service.is_empty() {
            cfn = cfn.with_parameter(
                "minInstancesInServiceParameters",
                Value::Mapping(min_in_service),
            );
        }

        for name in &upload_names {
            cfn = cfn.with_dependency(name.clone());
        }
        for name in &dependency_cfn_names {
            cfn = cfn.with_dependency(name.clone());
        }
        self.graph.insert(cfn)?;

        for function in &plan.function_updates {
            let name =
                naming::artifact_node_name("function-update", &stack_tag, &region, &function.app);
            let node = DeploymentNode::new(&name, DeploymentKind::FunctionUpdate)
                .with_region(&region)
                .with_stack(&stack_tag)
                .with_app(&function.app)
                .with_content_directory(&function.content_directory)
                .with_dependency(&cfn_name)
                .with_action("update");
            self.graph.insert(node)?;
        }
        for group in &plan.scaling_deploys {
            let name =
                naming::artifact_node_name("scaling-deploy", &stack_tag, &region, &group.app);
            let node = DeploymentNode::new(&name, DeploymentKind::ScalingUpdate)
                .with_region(&region)
                .with_stack(&stack_tag)
                .with_app(&group.app)
                .with_content_directory(&group.content_directory)
                .with_dependency(&cfn_name)
                .with_action("deploy");
            self.graph.insert(node)?;
        }

        self.path.pop();
        self.built.insert(key.clone(), cfn_name.clone());
        tracing::debug!(group = %key, node = %cfn_name, "built deployment group");
        Ok(cfn_name)
    }
}

/// Union of every member's declared dependencies, in first-seen order.
///
/// Dependencies behave like artifacts: stage-agnostic. Taking only the
/// representative's list would silently drop a dependency declared on a
/// single stage.
fn group_dependencies(members: &StageMembers<'_>) -> Vec<StackRef> {
    let mut dependencies: Vec<StackRef> = Vec::new();
    for member in members.members() {
        for reference in &member.dependencies {
            if !dependencies.contains(reference) {
                dependencies.push(reference.clone());
            }
        }
    }
    dependencies
}

/// The directory the group's templates live in.
fn template_directory(stack: &StackDefinition) -> String {
    Path::new(&stack.identity.template_file_path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or_else(|| ".".to_string(), |dir| dir.to_string_lossy().into_owned())
}

/// Machine-image parameter map: AMI parameter name to build metadata.
/// The encryption flag is rendered as a literal string.
fn machine_image_parameters(groups: &[ScalingGroupArtifact]) -> Mapping {
    let mut out = Mapping::new();
    for group in groups {
        let mut build = Mapping::new();
        build.insert("source".into(), Value::String(group.build.source.clone()));
        build.insert(
            "encrypted".into(),
            Value::String(group.build.encrypted.to_string()),
        );
        build.insert("stage".into(), Value::String(group.build.stage.clone()));
        out.insert(
            Value::String(group.ami_parameter_name.clone()),
            Value::Mapping(build),
        );
    }
    out
}

/// Minimum-in-service constraints for scaling groups carrying a scaling
/// policy, keyed by a synthetic parameter name tied to the group's app.
fn min_in_service_parameters(groups: &[ScalingGroupArtifact]) -> Mapping {
    let mut out = Mapping::new();
    for group in groups.iter().filter(|group| group.has_scaling_policy) {
        let key = format!(
            "MinInstancesInServiceFor{}",
            naming::upper_camel(&group.app)
        );
        let mut constraint = Mapping::new();
        constraint.insert("App".into(), Value::String(group.app.clone()));
        out.insert(Value::String(key), Value::Mapping(constraint));
    }
    out
}
