//! Orchestrator hand-off: resolving deferred values into runnable steps.
//!
//! The deployment orchestrator is external; in this crate it is
//! represented only by the [`OutputValues`] map it would produce. Feeding
//! that map to [`Pipeline::resolve_steps`] yields the flat
//! `env var -> string` environments and expanded command lists the
//! external command runner contract requires.

use crate::errors::{StagewireError, UnresolvedTokenError};
use crate::outputs::{OutputHandle, OutputToken};
use crate::pipeline::{var_pattern, Pipeline};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Resolved output values, keyed by token.
///
/// Built by whoever stands in for the deployment orchestrator; this is the
/// only path that turns a deferred token into a concrete string.
#[derive(Debug, Clone, Default)]
pub struct OutputValues {
    values: HashMap<OutputToken, String>,
}

impl OutputValues {
    /// Creates an empty value set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the resolved value for an output handle.
    #[must_use]
    pub fn with_output(mut self, handle: &OutputHandle, value: impl Into<String>) -> Self {
        self.values.insert(handle.token().clone(), value.into());
        self
    }

    /// Records the resolved value for a raw token.
    #[must_use]
    pub fn with_token(mut self, token: OutputToken, value: impl Into<String>) -> Self {
        self.values.insert(token, value.into());
        self
    }

    /// Looks up the resolved value for a token.
    #[must_use]
    pub fn get(&self, token: &OutputToken) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }
}

/// A validation step ready for the external command runner: a flat
/// environment of resolved strings and commands with every `$VAR` and
/// `${VAR}` occurrence expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStep {
    /// The step name.
    pub name: String,
    /// Environment variable name to resolved string value.
    pub env: BTreeMap<String, String>,
    /// The expanded, ordered command list.
    pub commands: Vec<String>,
}

impl Pipeline {
    /// Resolves every validation step against the given output values.
    ///
    /// # Errors
    ///
    /// Returns an error if any bound output has no resolved value.
    pub fn resolve_steps(
        &self,
        values: &OutputValues,
    ) -> Result<Vec<ResolvedStep>, StagewireError> {
        let mut resolved = Vec::with_capacity(self.validation_steps().len());

        for step in self.validation_steps() {
            let mut env = BTreeMap::new();
            for (var, handle) in step.env() {
                let value = values.get(handle.token()).ok_or_else(|| {
                    UnresolvedTokenError::new(handle.name(), handle.token().to_string())
                })?;
                env.insert(var.clone(), value.to_string());
            }

            let commands = step
                .commands()
                .iter()
                .map(|command| expand_command(command, &env))
                .collect();

            debug!(step = step.name(), vars = env.len(), "resolved validation step");
            resolved.push(ResolvedStep {
                name: step.name().to_string(),
                env,
                commands,
            });
        }

        Ok(resolved)
    }
}

/// Expands `$VAR` and `${VAR}` occurrences using the resolved environment.
///
/// Unknown variables are left as written; the builder already guarantees
/// every referenced variable is bound.
fn expand_command(command: &str, env: &BTreeMap<String, String>) -> String {
    var_pattern()
        .replace_all(command, |caps: &regex::Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            env.get(name)
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
