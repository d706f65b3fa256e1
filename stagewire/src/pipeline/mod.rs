//! Pipeline assembly.
//!
//! This module provides:
//! - The source reference and validation step types
//! - A builder that checks every cross-reference at construction time
//! - The immutable, fully wired [`Pipeline`]

mod builder;
mod source;
mod step;

pub use builder::PipelineBuilder;
pub use source::CodeSource;
pub use step::ValidationStep;

pub(crate) use step::var_pattern;

use crate::outputs::OutputHandle;
use crate::scope::Scope;
use crate::stage::Stage;
use std::sync::Arc;

/// A validation step whose bindings have been resolved against the
/// deployed stage's exposed outputs.
///
/// The environment maps variable names to the stage's own handles, so the
/// association survives synthesis as `env var -> token` text for the
/// deployment orchestrator to populate.
#[derive(Debug)]
pub struct BoundStep {
    name: String,
    env: Vec<(String, Arc<OutputHandle>)>,
    commands: Vec<String>,
}

impl BoundStep {
    /// Returns the step name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resolved environment bindings in declaration order.
    #[must_use]
    pub fn env(&self) -> &[(String, Arc<OutputHandle>)] {
        &self.env
    }

    /// Returns the ordered command list.
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

/// A fully assembled delivery pipeline: source, synth step, one deployed
/// stage, and the validation steps that follow it.
///
/// Pipelines are immutable; all wiring happened in
/// [`PipelineBuilder::build`]. Construction is pure, so building twice
/// from identical inputs yields graphs with identical name sets and
/// command lists.
#[derive(Debug)]
pub struct Pipeline {
    scope: Scope,
    source: CodeSource,
    synth_commands: Vec<String>,
    stage: Stage,
    steps: Vec<BoundStep>,
}

impl Pipeline {
    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.scope.id().unwrap_or_default()
    }

    /// Returns the pipeline's scope.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns the source reference.
    #[must_use]
    pub fn source(&self) -> &CodeSource {
        &self.source
    }

    /// Returns the ordered synth command list.
    #[must_use]
    pub fn synth_commands(&self) -> &[String] {
        &self.synth_commands
    }

    /// Returns the deployed stage.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Returns the validation steps in the order they run after the stage.
    #[must_use]
    pub fn validation_steps(&self) -> &[BoundStep] {
        &self.steps
    }
}
