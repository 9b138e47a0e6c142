//! Seams between the engine and the outside world. The engine only sees these
//! traits; the GitHub and inference clients are plugged in by the binary.

use async_trait::async_trait;
use github::GitHubClient;
use inference::{InferenceClient, InferenceRequest};

/// Issue operations the engine needs from the tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn list_labels(&self, issue: u64) -> github::Result<Vec<String>>;

    async fn remove_label(&self, issue: u64, label: &str) -> github::Result<()>;

    async fn add_labels(&self, issue: u64, labels: &[String]) -> github::Result<()>;

    async fn create_comment(&self, issue: u64, body: &str) -> github::Result<()>;
}

/// One completion per call. `None` covers both an empty completion and a
/// failed request; implementations log the cause.
#[async_trait]
pub trait Inference: Send + Sync {
    async fn infer(&self, request: &InferenceRequest) -> Option<String>;
}

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn list_labels(&self, issue: u64) -> github::Result<Vec<String>> {
        let labels = self.list_issue_labels(issue).await?;
        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    async fn remove_label(&self, issue: u64, label: &str) -> github::Result<()> {
        self.remove_issue_label(issue, label).await
    }

    async fn add_labels(&self, issue: u64, labels: &[String]) -> github::Result<()> {
        self.add_issue_labels(issue, labels).await.map(|_| ())
    }

    async fn create_comment(&self, issue: u64, body: &str) -> github::Result<()> {
        self.create_issue_comment(issue, body).await.map(|_| ())
    }
}

#[async_trait]
impl Inference for InferenceClient {
    async fn infer(&self, request: &InferenceRequest) -> Option<String> {
        InferenceClient::infer(self, request).await
    }
}
