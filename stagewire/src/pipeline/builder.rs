//! Pipeline builder with construction-time validation.
//!
//! Assembly order mirrors the synthesis pass itself: source and synth
//! commands first, then the deployed stage, then the validation steps that
//! consume the stage's outputs. `build` is where every cross-reference is
//! checked; nothing is deferred to deploy time.

use super::source::CodeSource;
use super::step::{is_valid_env_var, referenced_vars, ValidationStep};
use super::{BoundStep, Pipeline};
use crate::errors::{PipelineValidationError, StagewireError, UnknownOutputError};
use crate::outputs::OutputProvider;
use crate::scope::Scope;
use crate::stage::Stage;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Builder for a validated [`Pipeline`].
#[derive(Debug)]
pub struct PipelineBuilder {
    parent: Scope,
    name: String,
    source: Option<CodeSource>,
    synth_commands: Vec<String>,
    stage: Option<Stage>,
    steps: Vec<ValidationStep>,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder under the given parent scope.
    #[must_use]
    pub fn new(parent: &Scope, name: impl Into<String>) -> Self {
        Self {
            parent: parent.clone(),
            name: name.into(),
            source: None,
            synth_commands: Vec::new(),
            stage: None,
            steps: Vec::new(),
        }
    }

    /// Sets the source repository reference.
    #[must_use]
    pub fn source(mut self, source: CodeSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the ordered synth command list.
    #[must_use]
    pub fn synth_commands(mut self, commands: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.synth_commands = commands.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches the deployed stage.
    ///
    /// # Errors
    ///
    /// Returns an error if a stage was already attached; a pipeline
    /// deploys exactly one.
    pub fn deploy(mut self, stage: Stage) -> Result<Self, PipelineValidationError> {
        if self.stage.is_some() {
            return Err(PipelineValidationError::new(format!(
                "Pipeline '{}' already has a deployed stage",
                self.name
            ))
            .with_fix_hint("Build a separate pipeline for each deployed stage."));
        }
        self.stage = Some(stage);
        Ok(self)
    }

    /// Appends a validation step to run after the deployed stage.
    #[must_use]
    pub fn validation(mut self, step: ValidationStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Validates the assembly and produces an immutable [`Pipeline`].
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid, the source, synth commands
    /// or stage are missing, a step name repeats, or any binding fails to
    /// resolve through the stage's exposed outputs. On error no partial
    /// pipeline is produced.
    pub fn build(self) -> Result<Pipeline, StagewireError> {
        let scope = self.parent.child(&self.name)?;

        let source = self.source.ok_or_else(|| {
            PipelineValidationError::new(format!("Pipeline '{}' has no source", self.name))
                .with_fix_hint("Set a repository reference with `source` before building.")
        })?;

        if self.synth_commands.is_empty() {
            return Err(PipelineValidationError::new(format!(
                "Pipeline '{}' has no synth commands",
                self.name
            ))
            .with_fix_hint("Provide the ordered synth command list with `synth_commands`.")
            .into());
        }

        let stage = self.stage.ok_or_else(|| {
            PipelineValidationError::new(format!(
                "Pipeline '{}' has no deployed stage",
                self.name
            ))
            .with_fix_hint("Attach a stage with `deploy` before adding validation steps.")
        })?;

        let mut seen_steps = HashSet::new();
        let mut bound = Vec::with_capacity(self.steps.len());
        for step in self.steps {
            if !seen_steps.insert(step.name().to_string()) {
                return Err(PipelineValidationError::new(format!(
                    "Duplicate validation step name '{}'",
                    step.name()
                ))
                .with_steps(vec![step.name().to_string()])
                .with_fix_hint("Give each validation step a distinct name.")
                .into());
            }
            bound.push(bind_step(&step, &stage)?);
        }

        debug!(
            pipeline = %scope,
            stage = %stage.scope(),
            steps = bound.len(),
            "validated pipeline"
        );

        Ok(Pipeline {
            scope,
            source,
            synth_commands: self.synth_commands,
            stage,
            steps: bound,
        })
    }
}

/// Resolves a step's bindings through the stage's exposed outputs and
/// checks that every variable its commands reference is bound.
fn bind_step(step: &ValidationStep, stage: &Stage) -> Result<BoundStep, StagewireError> {
    let mut env = Vec::with_capacity(step.bindings().len());
    let mut bound_vars = HashSet::new();

    for (var, output_name) in step.bindings() {
        if !is_valid_env_var(var) {
            return Err(PipelineValidationError::new(format!(
                "Step '{}' binds invalid environment variable name '{}'",
                step.name(),
                var
            ))
            .with_steps(vec![step.name().to_string()])
            .into());
        }
        if !bound_vars.insert(var.clone()) {
            return Err(PipelineValidationError::new(format!(
                "Step '{}' binds environment variable '{}' twice",
                step.name(),
                var
            ))
            .with_steps(vec![step.name().to_string()])
            .into());
        }

        let handle = stage.output(output_name).ok_or_else(|| {
            UnknownOutputError::new(
                stage.scope().path(),
                output_name,
                stage
                    .output_names()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            )
        })?;
        env.push((var.clone(), Arc::clone(&handle)));
    }

    if step.command_list().is_empty() {
        return Err(PipelineValidationError::new(format!(
            "Step '{}' has no commands",
            step.name()
        ))
        .with_steps(vec![step.name().to_string()])
        .into());
    }

    for command in step.command_list() {
        for var in referenced_vars(command) {
            if !bound_vars.contains(&var) {
                return Err(PipelineValidationError::new(format!(
                    "Step '{}' references unbound variable '${}' in command '{}'",
                    step.name(),
                    var,
                    command
                ))
                .with_steps(vec![step.name().to_string()])
                .with_fix_hint(format!(
                    "Bind '{var}' to a stage output before referencing it."
                ))
                .into());
            }
        }
    }

    Ok(BoundStep {
        name: step.name().to_string(),
        env,
        commands: step.command_list().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::Stack;
    use pretty_assertions::assert_eq;

    fn sample_stage() -> Stage {
        let mut stage = Stage::build(&Scope::root(), "Prod", |scope| {
            let mut stack = Stack::new(scope, "App")?;
            stack.add_output("ViewerURL")?;
            stack.add_output("EndpointURL")?;
            Ok(stack)
        })
        .unwrap();
        stage.expose_all();
        stage
    }

    fn sample_builder() -> PipelineBuilder {
        PipelineBuilder::new(&Scope::root(), "Workshop")
            .source(CodeSource::new("workshop-repo", "main"))
            .synth_commands(["npm ci", "npm run build", "npx synth"])
    }

    #[test]
    fn test_builds_with_stage_and_steps() {
        let pipeline = sample_builder()
            .deploy(sample_stage())
            .unwrap()
            .validation(
                ValidationStep::new("TestEndpoint")
                    .bind("ENDPOINT_URL", "EndpointURL")
                    .command("curl -Ssf $ENDPOINT_URL"),
            )
            .build()
            .unwrap();

        assert_eq!(pipeline.name(), "Workshop");
        assert_eq!(pipeline.validation_steps().len(), 1);
    }

    #[test]
    fn test_missing_source_fails() {
        let builder = PipelineBuilder::new(&Scope::root(), "Workshop")
            .synth_commands(["npx synth"]);
        let err = builder.deploy(sample_stage()).unwrap().build().unwrap_err();
        assert!(err.to_string().contains("no source"));
    }

    #[test]
    fn test_missing_synth_commands_fail() {
        let err = PipelineBuilder::new(&Scope::root(), "Workshop")
            .source(CodeSource::new("repo", "main"))
            .deploy(sample_stage())
            .unwrap()
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("no synth commands"));
    }

    #[test]
    fn test_missing_stage_fails() {
        let err = sample_builder().build().unwrap_err();
        assert!(err.to_string().contains("no deployed stage"));
    }

    #[test]
    fn test_second_deploy_rejected() {
        let err = sample_builder()
            .deploy(sample_stage())
            .unwrap()
            .deploy(sample_stage())
            .unwrap_err();
        assert!(err.to_string().contains("already has a deployed stage"));
    }

    #[test]
    fn test_binding_unknown_output_fails_whole_build() {
        let result = sample_builder()
            .deploy(sample_stage())
            .unwrap()
            .validation(
                ValidationStep::new("Broken")
                    .bind("URL", "DoesNotExist")
                    .command("curl -Ssf $URL"),
            )
            .build();

        match result {
            Err(StagewireError::UnknownOutput(err)) => {
                assert_eq!(err.name, "DoesNotExist");
                assert_eq!(err.provider, "Prod");
            }
            other => panic!("expected UnknownOutput, got {other:?}"),
        }
    }

    #[test]
    fn test_unexposed_output_is_not_bindable() {
        let mut stage = Stage::build(&Scope::root(), "Prod", |scope| {
            let mut stack = Stack::new(scope, "App")?;
            stack.add_output("ViewerURL")?;
            stack.add_output("EndpointURL")?;
            Ok(stack)
        })
        .unwrap();
        stage.expose("ViewerURL").unwrap();

        // EndpointURL exists on the stack but the stage never exposed it.
        let result = sample_builder()
            .deploy(stage)
            .unwrap()
            .validation(
                ValidationStep::new("Hidden")
                    .bind("URL", "EndpointURL")
                    .command("curl -Ssf $URL"),
            )
            .build();
        assert!(matches!(result, Err(StagewireError::UnknownOutput(_))));
    }

    #[test]
    fn test_unbound_command_variable_fails() {
        let result = sample_builder()
            .deploy(sample_stage())
            .unwrap()
            .validation(
                ValidationStep::new("TestEndpoint")
                    .bind("ENDPOINT_URL", "EndpointURL")
                    .command("curl -Ssf $OTHER_URL"),
            )
            .build();

        match result {
            Err(StagewireError::Validation(err)) => {
                assert!(err.message.contains("unbound variable '$OTHER_URL'"));
                assert_eq!(err.steps, vec!["TestEndpoint"]);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_step_names_fail() {
        let step = ValidationStep::new("Twice")
            .bind("URL", "ViewerURL")
            .command("curl -Ssf $URL");
        let result = sample_builder()
            .deploy(sample_stage())
            .unwrap()
            .validation(step.clone())
            .validation(step)
            .build();
        assert!(matches!(result, Err(StagewireError::Validation(_))));
    }

    #[test]
    fn test_empty_command_list_fails() {
        let result = sample_builder()
            .deploy(sample_stage())
            .unwrap()
            .validation(ValidationStep::new("NoCommands").bind("URL", "ViewerURL"))
            .build();
        assert!(matches!(result, Err(StagewireError::Validation(_))));
    }

    #[test]
    fn test_duplicate_binding_fails() {
        let result = sample_builder()
            .deploy(sample_stage())
            .unwrap()
            .validation(
                ValidationStep::new("Dup")
                    .bind("URL", "ViewerURL")
                    .bind("URL", "EndpointURL")
                    .command("curl -Ssf $URL"),
            )
            .build();
        assert!(matches!(result, Err(StagewireError::Validation(_))));
    }
}
