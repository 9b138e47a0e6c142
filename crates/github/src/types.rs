use serde::{Deserialize, Serialize};

// =============================================================================
// Labels
// =============================================================================

/// A label attached to an issue. Only the fields the labeler reads are kept;
/// everything else in the API payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddLabelsRequest<'a> {
    pub labels: &'a [String],
}

// =============================================================================
// Comments
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct CreateCommentRequest<'a> {
    pub body: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedComment {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub html_url: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    pub owner: String,
    pub repo: String,
}

impl RepoConfig {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parses `owner/repo`, the format of `GITHUB_REPOSITORY`.
    pub fn from_full_name(full_name: &str) -> Option<Self> {
        let parts: Vec<&str> = full_name.split('/').collect();
        if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
            Some(Self::new(parts[0], parts[1]))
        } else {
            None
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}
