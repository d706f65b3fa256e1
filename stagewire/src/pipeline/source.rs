//! Source repository reference for the pipeline's synth step.

use serde::{Deserialize, Serialize};

/// A reference to the repository the pipeline builds from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSource {
    /// The repository name or URL.
    pub repository: String,
    /// The branch the pipeline tracks.
    pub branch: String,
}

impl CodeSource {
    /// Creates a new source reference.
    #[must_use]
    pub fn new(repository: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            branch: branch.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_round_trips_through_serde() {
        let source = CodeSource::new("workshop-repo", "main");
        let json = serde_json::to_string(&source).unwrap();
        let back: CodeSource = serde_json::from_str(&json).unwrap();
        assert_eq!(back, source);
    }
}
