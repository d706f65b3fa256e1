//! The pass-through aggregator.
//!
//! A [`Stage`] owns exactly one stack and re-exports a chosen subset of its
//! outputs under the stage's own interface. This is the decoupling point of
//! the whole pattern: a pipeline reaches a stack's outputs one level up,
//! through [`OutputProvider`], without ever seeing the stack's concrete
//! shape.

use crate::errors::{StagewireError, UnknownOutputError};
use crate::outputs::{OutputHandle, OutputProvider};
use crate::scope::Scope;
use crate::stack::Stack;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A deployment stage owning one stack and re-exporting some of its outputs.
#[derive(Debug)]
pub struct Stage {
    scope: Scope,
    stack: Stack,
    exposed: HashMap<String, Arc<OutputHandle>>,
    exposed_order: Vec<String>,
}

impl Stage {
    /// Builds a stage, constructing its single stack inside the stage's
    /// scope via the given closure.
    ///
    /// The closure receives the stage's scope so the stack nests correctly;
    /// it runs to completion before the stage exists, which is what makes
    /// the construction pass strictly producer-before-consumer.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid or the closure fails.
    pub fn build<F>(parent: &Scope, id: impl Into<String>, f: F) -> Result<Self, StagewireError>
    where
        F: FnOnce(&Scope) -> Result<Stack, StagewireError>,
    {
        let scope = parent.child(id)?;
        let stack = f(&scope)?;
        debug!(stage = %scope, stack = %stack.scope(), "built stage");
        Ok(Self {
            scope,
            stack,
            exposed: HashMap::new(),
            exposed_order: Vec::new(),
        })
    }

    /// Returns the stage's scope.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns the owned stack. Synthesis needs the full shape; binding
    /// code must go through [`OutputProvider`] instead.
    pub(crate) fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Re-exports a stack output under the same name.
    ///
    /// The exposed handle is the stack's own handle, not a copy: re-export
    /// introduces no transformation.
    ///
    /// # Errors
    ///
    /// Returns an error if the stack publishes no output with this name.
    pub fn expose(&mut self, name: &str) -> Result<Arc<OutputHandle>, UnknownOutputError> {
        let handle = self.stack.output(name).ok_or_else(|| {
            UnknownOutputError::new(
                self.scope.path(),
                name,
                self.stack
                    .output_names()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            )
        })?;

        if !self.exposed.contains_key(name) {
            self.exposed_order.push(name.to_string());
            self.exposed.insert(name.to_string(), Arc::clone(&handle));
        }
        Ok(handle)
    }

    /// Re-exports every output the stack publishes.
    pub fn expose_all(&mut self) {
        let names: Vec<String> = self
            .stack
            .output_names()
            .iter()
            .map(ToString::to_string)
            .collect();
        for name in names {
            // Lookup cannot fail for a name the stack itself reported.
            let _ = self.expose(&name);
        }
    }
}

impl OutputProvider for Stage {
    fn output(&self, name: &str) -> Option<Arc<OutputHandle>> {
        self.exposed.get(name).map(Arc::clone)
    }

    fn output_names(&self) -> Vec<&str> {
        self.exposed_order.iter().map(String::as_str).collect()
    }
}
