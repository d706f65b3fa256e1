//! The leaf deployable unit.
//!
//! A [`Stack`] declares resources and publishes the output handles other
//! constructs are allowed to consume. It is built once per deployment
//! target during the construction pass and is immutable once its owning
//! stage finishes building.

use crate::errors::NameCollisionError;
use crate::outputs::{OutputHandle, OutputProvider};
use crate::scope::Scope;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A declared infrastructure resource.
///
/// Resources are opaque to the wiring layer; the kind string and property
/// bag pass through synthesis untouched for the infrastructure-definition
/// engine to interpret.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// The resource name, unique within its stack.
    pub name: String,
    /// The resource kind (e.g. `"sample::Distribution"`).
    pub kind: String,
    /// Engine-specific properties.
    pub properties: serde_json::Value,
}

impl Resource {
    /// Creates a new resource with no properties.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            properties: serde_json::Value::Null,
        }
    }

    /// Sets the resource properties.
    #[must_use]
    pub fn with_properties(mut self, properties: serde_json::Value) -> Self {
        self.properties = properties;
        self
    }
}

/// The innermost deployable unit: resources plus published outputs.
#[derive(Debug)]
pub struct Stack {
    scope: Scope,
    resources: Vec<Resource>,
    outputs: HashMap<String, Arc<OutputHandle>>,
    output_order: Vec<String>,
}

impl Stack {
    /// Creates an empty stack inside the given parent scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a valid construct id.
    pub fn new(parent: &Scope, id: impl Into<String>) -> Result<Self, crate::errors::InvalidIdError> {
        let scope = parent.child(id)?;
        debug!(stack = %scope, "declared stack");
        Ok(Self {
            scope,
            resources: Vec::new(),
            outputs: HashMap::new(),
            output_order: Vec::new(),
        })
    }

    /// Returns the stack's scope.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Declares a resource.
    ///
    /// # Errors
    ///
    /// Returns an error if a resource with the same name already exists.
    pub fn add_resource(&mut self, resource: Resource) -> Result<(), NameCollisionError> {
        if self.resources.iter().any(|r| r.name == resource.name) {
            return Err(NameCollisionError::new(self.scope.path(), &resource.name));
        }
        self.resources.push(resource);
        Ok(())
    }

    /// Publishes a named output and returns its handle.
    ///
    /// The output's value is deferred: the returned handle carries only a
    /// token, resolved by the deployment orchestrator after this code's
    /// lifetime ends.
    ///
    /// # Errors
    ///
    /// Returns an error if an output with the same name was already
    /// published on this stack.
    pub fn add_output(&mut self, name: impl Into<String>) -> Result<Arc<OutputHandle>, NameCollisionError> {
        let name = name.into();
        if self.outputs.contains_key(&name) {
            return Err(NameCollisionError::new(self.scope.path(), &name));
        }

        let handle = Arc::new(OutputHandle::new(self.scope.clone(), &name));
        debug!(stack = %self.scope, output = %name, token = %handle.token(), "published output");
        self.output_order.push(name.clone());
        self.outputs.insert(name, Arc::clone(&handle));
        Ok(handle)
    }

    /// Returns the declared resources in declaration order.
    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }
}

impl OutputProvider for Stack {
    fn output(&self, name: &str) -> Option<Arc<OutputHandle>> {
        self.outputs.get(name).map(Arc::clone)
    }

    fn output_names(&self) -> Vec<&str> {
        self.output_order.iter().map(String::as_str).collect()
    }
}
