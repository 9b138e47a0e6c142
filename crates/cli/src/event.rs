use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// The parts of a GitHub `issues` event payload the labeler can default from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventIssue {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<EventLabel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventLabel {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    #[serde(default)]
    issue: Option<EventIssue>,
}

impl EventIssue {
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }
}

pub async fn load_event_issue(path: &Path) -> Result<Option<EventIssue>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read event payload {}", path.display()))?;
    let payload: EventPayload = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse event payload {}", path.display()))?;
    Ok(payload.issue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_issue_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(
            &path,
            r#"{
                "action": "labeled",
                "issue": {
                    "number": 17,
                    "body": "Steps to reproduce...",
                    "labels": [{"id": 1, "name": "needs-ai-review"}, {"id": 2, "name": "bug"}]
                },
                "label": {"name": "needs-ai-review"}
            }"#,
        )
        .unwrap();

        let issue = load_event_issue(&path).await.unwrap().unwrap();
        assert_eq!(issue.number, Some(17));
        assert_eq!(issue.body.as_deref(), Some("Steps to reproduce..."));
        assert_eq!(issue.label_names(), vec!["needs-ai-review", "bug"]);
    }

    #[tokio::test]
    async fn test_load_event_without_issue() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, r#"{"action": "workflow_dispatch", "inputs": {}}"#).unwrap();

        assert!(load_event_issue(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_event_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_event_issue(&dir.path().join("nope.json")).await.is_err());
    }
}
