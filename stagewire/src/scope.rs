//! Construct scopes.
//!
//! Every construct takes its parent scope as an explicit argument; there is
//! no ambient root. A scope is just the `/`-joined path of construct ids
//! from the root down, and it is the namespace inside which output names
//! must be unique.

use crate::errors::InvalidIdError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters that would make a scope path ambiguous if they appeared in
/// a construct id.
const RESERVED: &[char] = &['/', ':', '$', '{', '}'];

/// An explicit construct scope.
///
/// Scopes form a tree rooted at [`Scope::root`]; each construct derives its
/// own scope from its parent via [`Scope::child`]. The rendered path is
/// stable for the lifetime of the construction pass and is embedded in
/// output tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    segments: Vec<String>,
}

impl Scope {
    /// Creates the root scope.
    #[must_use]
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Derives a child scope for the construct with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty, whitespace-only, or contains
    /// a reserved character.
    pub fn child(&self, id: impl Into<String>) -> Result<Self, InvalidIdError> {
        let id = id.into();
        validate_id(&id)?;

        let mut segments = self.segments.clone();
        segments.push(id);
        Ok(Self { segments })
    }

    /// Returns the `/`-joined path of this scope, empty for the root.
    #[must_use]
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Returns the innermost construct id, or `None` for the root.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns true if this is the root scope.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns true if `other` lies strictly inside this scope.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        other.segments.len() > self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.path())
        }
    }
}

/// Validates a construct id.
///
/// # Errors
///
/// Returns an error if the id is empty, whitespace-only, or contains a
/// reserved character.
pub(crate) fn validate_id(id: &str) -> Result<(), InvalidIdError> {
    if id.trim().is_empty() {
        return Err(InvalidIdError::new(id, "id cannot be empty or whitespace-only"));
    }
    if let Some(c) = id.chars().find(|c| RESERVED.contains(c)) {
        return Err(InvalidIdError::new(
            id,
            format!("id cannot contain reserved character '{c}'"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_root_scope() {
        let root = Scope::root();
        assert!(root.is_root());
        assert_eq!(root.path(), "");
        assert_eq!(root.id(), None);
        assert_eq!(root.to_string(), "<root>");
    }

    #[test]
    fn test_child_paths() {
        let root = Scope::root();
        let stage = root.child("Prod").unwrap();
        let stack = stage.child("App").unwrap();

        assert_eq!(stage.path(), "Prod");
        assert_eq!(stack.path(), "Prod/App");
        assert_eq!(stack.id(), Some("App"));
    }

    #[test]
    fn test_containment() {
        let root = Scope::root();
        let stage = root.child("Prod").unwrap();
        let stack = stage.child("App").unwrap();
        let other = root.child("Dev").unwrap();

        assert!(root.contains(&stack));
        assert!(stage.contains(&stack));
        assert!(!stage.contains(&other));
        assert!(!stack.contains(&stage));
        assert!(!stage.contains(&stage.clone()));
    }

    #[test]
    fn test_rejects_bad_ids() {
        let root = Scope::root();
        assert!(root.child("").is_err());
        assert!(root.child("   ").is_err());
        assert!(root.child("a/b").is_err());
        assert!(root.child("a:b").is_err());
        assert!(root.child("${x}").is_err());
    }
}
