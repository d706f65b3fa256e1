//! Error types for the stagewire framework.
//!
//! Construction-time failures (name collisions, unknown outputs, pipeline
//! validation) are kept distinct from resolution and runner failures so
//! callers can tell a mis-wired graph from a failed deployment check.

use thiserror::Error;

/// The main error type for stagewire operations.
#[derive(Debug, Error)]
pub enum StagewireError {
    /// A pipeline validation error occurred.
    #[error("{0}")]
    Validation(#[from] PipelineValidationError),

    /// A construct identifier was rejected.
    #[error("{0}")]
    InvalidId(#[from] InvalidIdError),

    /// Two declarations in one scope used the same name.
    #[error("{0}")]
    NameCollision(#[from] NameCollisionError),

    /// A binding referenced an output the provider does not expose.
    #[error("{0}")]
    UnknownOutput(#[from] UnknownOutputError),

    /// A deferred token had no resolved value at hand-off time.
    #[error("{0}")]
    UnresolvedToken(#[from] UnresolvedTokenError),

    /// A validation command exited non-zero.
    #[error("{0}")]
    CommandFailed(#[from] CommandFailedError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error raised when pipeline assembly fails validation.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PipelineValidationError {
    /// The error message.
    pub message: String,
    /// The validation steps involved, if any.
    pub steps: Vec<String>,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
}

impl PipelineValidationError {
    /// Creates a new pipeline validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            steps: Vec::new(),
            fix_hint: None,
        }
    }

    /// Sets the validation steps involved.
    #[must_use]
    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }
}

/// Error raised when a construct identifier is empty or contains
/// reserved characters.
#[derive(Debug, Clone, Error)]
#[error("Invalid construct id '{id}': {reason}")]
pub struct InvalidIdError {
    /// The rejected identifier.
    pub id: String,
    /// Why it was rejected.
    pub reason: String,
}

impl InvalidIdError {
    /// Creates a new invalid id error.
    #[must_use]
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Error raised when a name is declared twice within one scope.
///
/// Output names become lookup keys for downstream consumers, so a
/// collision is fatal to the whole construction pass.
#[derive(Debug, Clone, Error)]
#[error("Name collision in scope '{scope}': '{name}' is already declared")]
pub struct NameCollisionError {
    /// The scope path where the collision occurred.
    pub scope: String,
    /// The colliding name.
    pub name: String,
}

impl NameCollisionError {
    /// Creates a new name collision error.
    #[must_use]
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
        }
    }
}

/// Error raised when looking up an output a provider does not expose.
#[derive(Debug, Clone, Error)]
#[error("Unknown output '{name}' on '{provider}' (available: {})", available.join(", "))]
pub struct UnknownOutputError {
    /// The provider (stack or stage) that was queried.
    pub provider: String,
    /// The requested output name.
    pub name: String,
    /// The names the provider actually exposes.
    pub available: Vec<String>,
}

impl UnknownOutputError {
    /// Creates a new unknown output error.
    #[must_use]
    pub fn new(
        provider: impl Into<String>,
        name: impl Into<String>,
        available: Vec<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            name: name.into(),
            available,
        }
    }
}

/// Error raised when resolving steps against an incomplete value set.
#[derive(Debug, Clone, Error)]
#[error("No resolved value for output '{output}' (token {token})")]
pub struct UnresolvedTokenError {
    /// The output name the binding pointed at.
    pub output: String,
    /// The unresolved token text.
    pub token: String,
}

impl UnresolvedTokenError {
    /// Creates a new unresolved token error.
    #[must_use]
    pub fn new(output: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            token: token.into(),
        }
    }
}

/// Error raised when a validation command exits non-zero.
///
/// The runner stops at the first failing command; subsequent commands in
/// the step are not executed.
#[derive(Debug, Clone, Error)]
#[error("Validation step '{step}' failed: command '{command}' exited with {}",
    exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
pub struct CommandFailedError {
    /// The validation step name.
    pub step: String,
    /// The command that failed.
    pub command: String,
    /// The exit code, if the process exited normally.
    pub exit_code: Option<i32>,
}

impl CommandFailedError {
    /// Creates a new command failed error.
    #[must_use]
    pub fn new(
        step: impl Into<String>,
        command: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self {
            step: step.into(),
            command: command.into(),
            exit_code,
        }
    }
}
