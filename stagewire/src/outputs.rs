//! Output handles and deferred value tokens.
//!
//! An output's real value (a URL, an ARN) only exists after the deployment
//! orchestrator has provisioned infrastructure, long after this code has
//! finished running. Until then the output is represented by an
//! [`OutputToken`] — a distinct type, so a deferred value can never be
//! mistaken for a resolved string.

use crate::scope::Scope;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A deferred value placeholder.
///
/// Tokens render as `${stagewire:<stack path>:<output name>}` and survive
/// synthesis verbatim; the deployment orchestrator substitutes the real
/// string at deploy time. The only way to turn a token into a string inside
/// this crate is through [`OutputValues`](crate::resolve::OutputValues).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputToken(String);

impl OutputToken {
    /// Creates the token for an output declared in the given scope.
    #[must_use]
    pub fn for_output(scope: &Scope, name: &str) -> Self {
        Self(format!("${{stagewire:{}:{}}}", scope.path(), name))
    }

    /// Returns the placeholder text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, deferred output published by a stack.
///
/// Handles are shared by reference: a stage re-exports the same `Arc` its
/// stack declared, so consumers downstream observe the identical handle
/// rather than a copy.
#[derive(Debug, PartialEq, Eq)]
pub struct OutputHandle {
    name: String,
    scope: Scope,
    token: OutputToken,
}

impl OutputHandle {
    /// Creates a new handle for an output declared in `scope`.
    #[must_use]
    pub(crate) fn new(scope: Scope, name: impl Into<String>) -> Self {
        let name = name.into();
        let token = OutputToken::for_output(&scope, &name);
        Self { name, scope, token }
    }

    /// Returns the output name, unique within the declaring stack.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scope of the declaring stack.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns the deferred value token.
    #[must_use]
    pub fn token(&self) -> &OutputToken {
        &self.token
    }
}

/// Capability interface for constructs that expose named output handles.
///
/// A pipeline binds validation environments through this trait only, so it
/// never depends on the concrete shape of whatever declared the outputs.
pub trait OutputProvider {
    /// Looks up an exposed output by name.
    fn output(&self, name: &str) -> Option<Arc<OutputHandle>>;

    /// Returns the exposed output names in declaration order.
    fn output_names(&self) -> Vec<&str>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_token_format() {
        let scope = Scope::root().child("Prod").unwrap().child("App").unwrap();
        let token = OutputToken::for_output(&scope, "ViewerURL");
        assert_eq!(token.as_str(), "${stagewire:Prod/App:ViewerURL}");
    }

    #[test]
    fn test_handle_carries_scope_and_token() {
        let scope = Scope::root().child("App").unwrap();
        let handle = OutputHandle::new(scope.clone(), "EndpointURL");

        assert_eq!(handle.name(), "EndpointURL");
        assert_eq!(handle.scope(), &scope);
        assert_eq!(handle.token().to_string(), "${stagewire:App:EndpointURL}");
    }

    #[test]
    fn test_token_serde_is_transparent() {
        let scope = Scope::root().child("App").unwrap();
        let token = OutputToken::for_output(&scope, "ViewerURL");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"${stagewire:App:ViewerURL}\"");

        let back: OutputToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
