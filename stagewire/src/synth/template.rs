//! The synthesized template model.
//!
//! These are the declarative types handed to the infrastructure-definition
//! engine: plain data, deterministic ordering, every deferred value as
//! token text. Environment bindings survive as a named `env var -> token`
//! association the deployment orchestrator can populate.

use crate::errors::StagewireError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A synthesized output declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTemplate {
    /// The output name.
    pub name: String,
    /// The deferred value token text.
    pub token: String,
}

/// A synthesized resource declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTemplate {
    /// The resource name.
    pub name: String,
    /// The resource kind.
    pub kind: String,
    /// Engine-specific properties.
    pub properties: serde_json::Value,
}

/// A synthesized stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackTemplate {
    /// The stack's scope path.
    pub path: String,
    /// Declared resources in declaration order.
    pub resources: Vec<ResourceTemplate>,
    /// Published outputs in declaration order.
    pub outputs: Vec<OutputTemplate>,
}

/// A synthesized stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTemplate {
    /// The stage's scope path.
    pub path: String,
    /// The owned stack.
    pub stack: StackTemplate,
    /// Names the stage re-exports, in declaration order.
    pub exposed: Vec<String>,
}

/// A synthesized validation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTemplate {
    /// The step name.
    pub name: String,
    /// Environment bindings as `env var -> token text`.
    pub env: BTreeMap<String, String>,
    /// The ordered command list.
    pub commands: Vec<String>,
}

/// A synthesized pipeline: the full declarative hand-off to the external
/// deployment engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineTemplate {
    /// The pipeline name.
    pub name: String,
    /// The source repository reference.
    pub source: crate::pipeline::CodeSource,
    /// The ordered synth command list.
    pub synth_commands: Vec<String>,
    /// The deployed stage.
    pub stage: StageTemplate,
    /// Validation steps that run after the stage, in order.
    pub post_steps: Vec<StepTemplate>,
}

impl PipelineTemplate {
    /// Serializes the template as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, StagewireError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StagewireError::Serialization(e.to_string()))
    }
}
