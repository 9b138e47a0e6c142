use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::assessment::{assessment_label, unable_to_process_label};
use crate::config::RunConfig;
use crate::error::{AssessorError, Result};
use crate::ports::{Inference, IssueTracker};
use crate::prompt::PromptOptions;
use crate::report::{AssessmentOutcome, Reporter, ASSESSMENTS_OUTPUT};

/// What a run accumulated: one label per processed prompt, and the
/// assessments of the prompts that got a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub labels_to_add: Vec<String>,
    pub assessments: Vec<AssessmentOutcome>,
    /// Whether the label batch was sent and accepted
    pub labels_applied: bool,
}

/// How a run ended. Every variant is a successful exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The issue has no labels, or they could not be fetched
    NoLabels,
    /// The trigger label is not on the issue
    NotEligible,
    /// No issue label is mapped to a prompt
    NoMatchingPrompts,
    Completed(RunResult),
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::NoLabels => "no_labels",
            RunOutcome::NotEligible => "not_eligible",
            RunOutcome::NoMatchingPrompts => "no_matching_prompts",
            RunOutcome::Completed(_) => "completed",
        }
    }
}

pub struct AssessmentEngine {
    config: RunConfig,
    tracker: Arc<dyn IssueTracker>,
    inference: Arc<dyn Inference>,
    reporter: Arc<dyn Reporter>,
}

impl AssessmentEngine {
    pub fn new(
        config: RunConfig,
        tracker: Arc<dyn IssueTracker>,
        inference: Arc<dyn Inference>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            config,
            tracker,
            inference,
            reporter,
        }
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let issue = self.config.issue_number;
        info!(
            repo = %self.config.repo.full_name(),
            issue,
            "Starting AI assessment"
        );

        let Some(labels) = self.issue_labels().await else {
            info!("No labels found on the issue.");
            return Ok(RunOutcome::NoLabels);
        };

        if !labels.iter().any(|l| *l == self.config.trigger_label) {
            info!(
                "No AI review required. Issue does not have label: {}",
                self.config.trigger_label
            );
            return Ok(RunOutcome::NotEligible);
        }

        self.retract_trigger_label().await;

        let prompts = self.config.mapping.resolve(&labels);
        if prompts.is_empty() {
            info!(
                "No matching prompt files found. No issue labels matched the configured \
                 label-to-prompt mapping. To run an AI assessment, add a label that \
                 corresponds to a prompt file configured in your workflow."
            );
            return Ok(RunOutcome::NoMatchingPrompts);
        }

        let mut result = RunResult::default();
        for prompt in &prompts {
            self.assess_prompt(prompt, &mut result).await?;
        }

        let assessments = serde_json::to_string(&result.assessments)?;
        self.reporter.set_output(ASSESSMENTS_OUTPUT, &assessments)?;

        self.apply_labels(&mut result).await;

        Ok(RunOutcome::Completed(result))
    }

    /// Labels from the triggering event, else from the API.
    async fn issue_labels(&self) -> Option<Vec<String>> {
        if !self.config.issue_labels.is_empty() {
            return Some(self.config.issue_labels.clone());
        }

        match self.tracker.list_labels(self.config.issue_number).await {
            Ok(labels) if !labels.is_empty() => Some(labels),
            Ok(_) => None,
            Err(e) => {
                error!(error = %e, "Error listing labels on issue");
                None
            }
        }
    }

    async fn retract_trigger_label(&self) {
        let label = &self.config.trigger_label;
        info!("Removing label: {}", label);

        if let Err(e) = self
            .tracker
            .remove_label(self.config.issue_number, label)
            .await
        {
            warn!(label = %label, error = %e, "Error removing trigger label from issue");
        }
    }

    async fn assess_prompt(&self, prompt: &str, result: &mut RunResult) -> Result<()> {
        info!("Using prompt file: {}", prompt);

        let options = PromptOptions::load(prompt, &self.config.prompts_dir)?;
        let request = self.config.inference_request(prompt, &options)?;
        debug!(
            prompt,
            model = %request.model,
            max_tokens = ?request.max_tokens,
            "Running inference"
        );

        let Some(response) = self.inference.infer(&request).await else {
            warn!(prompt, "No response received from AI.");
            result.labels_to_add.push(unable_to_process_label(prompt));
            return Ok(());
        };

        if self.comment_suppressed(&response) {
            info!(prompt, "No comment creation as per AI response directive.");
        } else {
            self.tracker
                .create_comment(self.config.issue_number, &response)
                .await
                .map_err(|e| AssessorError::CommentFailed {
                    issue: self.config.issue_number,
                    reason: e.to_string(),
                })?;
        }

        let label = assessment_label(prompt, &response, &self.config.assessment_regex);
        info!(prompt, label = %label, "Assessment label derived");

        let outcome = AssessmentOutcome {
            prompt: prompt.to_string(),
            assessment_label: label.clone(),
            response,
        };
        if let Err(e) = self.reporter.write_summary(&outcome) {
            warn!(prompt, error = %e, "Failed to write job summary");
        }

        result.labels_to_add.push(label);
        result.assessments.push(outcome);
        Ok(())
    }

    fn comment_suppressed(&self, response: &str) -> bool {
        self.config.suppress_comments
            || self
                .config
                .no_comment_regex
                .as_ref()
                .is_some_and(|re| re.is_match(response))
    }

    /// Failures here are logged and swallowed, same as the trigger retraction.
    async fn apply_labels(&self, result: &mut RunResult) {
        if self.config.suppress_labels {
            info!("Label suppression is enabled. No labels will be added.");
            return;
        }

        if result.labels_to_add.is_empty() {
            info!("No labels to add found.");
            return;
        }

        info!("Adding labels: {}", result.labels_to_add.join(", "));
        match self
            .tracker
            .add_labels(self.config.issue_number, &result.labels_to_add)
            .await
        {
            Ok(()) => result.labels_applied = true,
            Err(e) => error!(error = %e, "Error adding labels to issue"),
        }
    }
}
