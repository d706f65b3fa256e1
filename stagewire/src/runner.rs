//! The external command runner contract.
//!
//! Deployment-time execution belongs to an external system; this module
//! models only its boundary: a runner takes a [`ResolvedStep`] — a flat
//! string environment plus an ordered command list — and a non-zero exit
//! from any command fails the step, halting the rest of its commands.
//! There is no retry policy here; retries belong to the orchestrator.

use crate::errors::{CommandFailedError, StagewireError};
use crate::resolve::ResolvedStep;
use std::process::Command;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// Report for a validation step that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// The step name.
    pub step: String,
    /// Number of commands executed.
    pub commands_run: usize,
}

/// Executes resolved validation steps.
pub trait StepRunner {
    /// Runs every command of the step in order.
    ///
    /// # Errors
    ///
    /// Returns an error if a command cannot be spawned or exits non-zero;
    /// commands after the failing one are not executed.
    fn run_step(&self, step: &ResolvedStep) -> Result<StepReport, StagewireError>;
}

/// Runs each command through `sh -c` with the step's environment exported.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
}

impl ShellRunner {
    /// Creates a runner using `sh`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shell: "sh".to_string(),
        }
    }

    /// Overrides the shell binary.
    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl StepRunner for ShellRunner {
    fn run_step(&self, step: &ResolvedStep) -> Result<StepReport, StagewireError> {
        info!(step = %step.name, commands = step.commands.len(), "running validation step");

        for (index, command) in step.commands.iter().enumerate() {
            debug!(step = %step.name, index, command = %command, "running command");
            let status = Command::new(&self.shell)
                .arg("-c")
                .arg(command)
                .envs(&step.env)
                .status()?;

            if !status.success() {
                return Err(
                    CommandFailedError::new(&step.name, command, status.code()).into(),
                );
            }
        }

        Ok(StepReport {
            step: step.name.clone(),
            commands_run: step.commands.len(),
        })
    }
}

/// A runner that records steps instead of executing them. Useful in tests
/// asserting what would run without touching the host.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    recorded: Mutex<Vec<ResolvedStep>>,
}

impl RecordingRunner {
    /// Creates an empty recording runner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the steps recorded so far.
    #[must_use]
    pub fn recorded(&self) -> Vec<ResolvedStep> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StepRunner for RecordingRunner {
    fn run_step(&self, step: &ResolvedStep) -> Result<StepReport, StagewireError> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(step.clone());
        Ok(StepReport {
            step: step.name.clone(),
            commands_run: step.commands.len(),
        })
    }
}
