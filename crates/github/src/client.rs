use octocrab::Octocrab;
use tracing::{debug, info};

use crate::error::{GitHubError, Result};
use crate::types::{AddLabelsRequest, CreateCommentRequest, CreatedComment, Label, RepoConfig};

const LABELS_PER_PAGE: &str = "100";

pub struct GitHubClient {
    octocrab: Octocrab,
    repo: RepoConfig,
}

impl GitHubClient {
    /// Builds a client against the given API root (github.com, GHES, or a mock server in tests).
    pub fn with_base_url(token: &str, repo: RepoConfig, base_url: &str) -> Result<Self> {
        let octocrab = Octocrab::builder()
            .base_uri(base_url)
            .map_err(|e| GitHubError::Config(e.to_string()))?
            .personal_token(token.to_string())
            .build()
            .map_err(|e| GitHubError::Config(e.to_string()))?;

        Ok(Self { octocrab, repo })
    }

    fn issue_route(&self, number: u64) -> String {
        format!(
            "/repos/{}/{}/issues/{}",
            self.repo.owner, self.repo.repo, number
        )
    }
}

impl GitHubClient {
    pub async fn list_issue_labels(&self, number: u64) -> Result<Vec<Label>> {
        debug!("Listing labels on issue #{}", number);

        let labels: Vec<Label> = self
            .octocrab
            .get(
                format!("{}/labels", self.issue_route(number)),
                Some(&[("per_page", LABELS_PER_PAGE)]),
            )
            .await?;

        Ok(labels)
    }

    pub async fn remove_issue_label(&self, number: u64, label: &str) -> Result<()> {
        debug!("Removing label {:?} from issue #{}", label, number);

        let _remaining: Vec<Label> = self
            .octocrab
            .delete(
                format!(
                    "{}/labels/{}",
                    self.issue_route(number),
                    urlencoding::encode(label)
                ),
                None::<&()>,
            )
            .await?;

        info!("Label \"{}\" removed from issue #{}", label, number);
        Ok(())
    }

    pub async fn add_issue_labels(&self, number: u64, labels: &[String]) -> Result<Vec<Label>> {
        debug!("Adding {} label(s) to issue #{}", labels.len(), number);

        let applied: Vec<Label> = self
            .octocrab
            .post(
                format!("{}/labels", self.issue_route(number)),
                Some(&AddLabelsRequest { labels }),
            )
            .await?;

        Ok(applied)
    }

    pub async fn create_issue_comment(&self, number: u64, body: &str) -> Result<CreatedComment> {
        debug!("Creating comment on issue #{} ({} bytes)", number, body.len());

        let comment: CreatedComment = self
            .octocrab
            .post(
                format!("{}/comments", self.issue_route(number)),
                Some(&CreateCommentRequest { body }),
            )
            .await?;

        info!(
            "Comment created: {}",
            comment.html_url.as_deref().unwrap_or("<no url>")
        );
        Ok(comment)
    }
}
