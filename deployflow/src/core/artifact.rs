//! Deployable artifacts attached to a stack.
//!
//! Artifacts are discovered on stack definitions, never created by the
//! synthesizer. Two kinds exist: function packages and machine-image-backed
//! scaling groups.

use serde::{Deserialize, Serialize};

/// Build metadata for the machine image backing a scaling group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineImageBuild {
    /// The image recipe or source the machine image was built from.
    pub source: String,
    /// Whether the image is encrypted at rest.
    pub encrypted: bool,
    /// The build pipeline stage the image came out of.
    pub stage: String,
}

impl MachineImageBuild {
    /// Creates new machine image build metadata.
    #[must_use]
    pub fn new(source: impl Into<String>, encrypted: bool, stage: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            encrypted,
            stage: stage.into(),
        }
    }
}

/// A function package artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionArtifact {
    /// The application identifier the function belongs to.
    pub app: String,
    /// Directory holding the package to upload.
    pub content_directory: String,
    /// Skip the upload step entirely (the package is managed elsewhere).
    pub skip_upload: bool,
    /// An alias or pinned version exists; the generic update step must not
    /// silently repoint it.
    pub has_alias_or_version: bool,
}

impl FunctionArtifact {
    /// Creates a new function artifact with upload and update enabled.
    #[must_use]
    pub fn new(app: impl Into<String>, content_directory: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            content_directory: content_directory.into(),
            skip_upload: false,
            has_alias_or_version: false,
        }
    }

    /// Sets whether the upload step is skipped.
    #[must_use]
    pub fn with_skip_upload(mut self, skip_upload: bool) -> Self {
        self.skip_upload = skip_upload;
        self
    }

    /// Sets whether an alias or pinned version exists.
    #[must_use]
    pub fn with_alias_or_version(mut self, has_alias_or_version: bool) -> Self {
        self.has_alias_or_version = has_alias_or_version;
        self
    }
}

/// A machine-image-backed scaling group artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingGroupArtifact {
    /// The application identifier the group runs.
    pub app: String,
    /// Directory holding the application artifact to upload.
    pub content_directory: String,
    /// Name of the template parameter that receives the machine image.
    pub ami_parameter_name: String,
    /// Build metadata for the machine image.
    pub build: MachineImageBuild,
    /// The group rotates in place during the infrastructure apply; a separate
    /// runtime deploy step would be redundant.
    pub has_rolling_update_policy: bool,
    /// The group carries a scaling policy and needs its minimum-in-service
    /// constraint threaded through as a parameter.
    pub has_scaling_policy: bool,
}

impl ScalingGroupArtifact {
    /// Creates a new scaling group artifact.
    #[must_use]
    pub fn new(
        app: impl Into<String>,
        content_directory: impl Into<String>,
        ami_parameter_name: impl Into<String>,
        build: MachineImageBuild,
    ) -> Self {
        Self {
            app: app.into(),
            content_directory: content_directory.into(),
            ami_parameter_name: ami_parameter_name.into(),
            build,
            has_rolling_update_policy: false,
            has_scaling_policy: false,
        }
    }

    /// Sets whether the group rotates in place during the apply.
    #[must_use]
    pub fn with_rolling_update_policy(mut self, rolling: bool) -> Self {
        self.has_rolling_update_policy = rolling;
        self
    }

    /// Sets whether the group carries a scaling policy.
    #[must_use]
    pub fn with_scaling_policy(mut self, scaling: bool) -> Self {
        self.has_scaling_policy = scaling;
        self
    }
}
