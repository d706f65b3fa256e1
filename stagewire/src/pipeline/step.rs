//! Post-deployment validation steps.
//!
//! A [`ValidationStep`] is pure data until the pipeline builder attaches
//! it: a step name, `env var -> output name` bindings, and an ordered
//! command list. All lookups against the deployed stage happen at build
//! time, so a binding to a nonexistent output fails the construction pass
//! rather than the deployment.

use regex::Regex;
use std::sync::OnceLock;

static VAR_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Matches `$VAR` and `${VAR}` references in command text.
pub(crate) fn var_pattern() -> &'static Regex {
    VAR_PATTERN.get_or_init(|| {
        Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
            .expect("static pattern is valid")
    })
}

/// Returns the environment variables a command references, in order of
/// first appearance.
pub(crate) fn referenced_vars(command: &str) -> Vec<String> {
    let mut vars = Vec::new();
    for caps in var_pattern().captures_iter(command) {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string());
        if let Some(name) = name {
            if !vars.contains(&name) {
                vars.push(name);
            }
        }
    }
    vars
}

/// Returns true if `name` is usable as an environment variable name.
pub(crate) fn is_valid_env_var(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A named post-deployment check: environment bindings plus an ordered
/// command list for the external runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationStep {
    name: String,
    bindings: Vec<(String, String)>,
    commands: Vec<String>,
}

impl ValidationStep {
    /// Creates a new validation step with no bindings or commands.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Binds an environment variable to a stage output by name.
    #[must_use]
    pub fn bind(mut self, var: impl Into<String>, output: impl Into<String>) -> Self {
        self.bindings.push((var.into(), output.into()));
        self
    }

    /// Appends a command.
    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.commands.push(command.into());
        self
    }

    /// Appends several commands in order.
    #[must_use]
    pub fn commands(mut self, commands: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.commands.extend(commands.into_iter().map(Into::into));
        self
    }

    /// Returns the step name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the `env var -> output name` bindings in declaration order.
    #[must_use]
    pub fn bindings(&self) -> &[(String, String)] {
        &self.bindings
    }

    /// Returns the command list.
    #[must_use]
    pub fn command_list(&self) -> &[String] {
        &self.commands
    }
}
