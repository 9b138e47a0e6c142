use github::RepoConfig;
use inference::{InferenceRequest, DEFAULT_ENDPOINT};
use regex::Regex;
use std::path::PathBuf;

use crate::error::{AssessorError, Result};
use crate::mapping::LabelMapping;
use crate::pattern::compile_regex;
use crate::prompt::PromptOptions;

/// Raw run inputs as they arrive from the workflow. Blank strings count as unset.
#[derive(Debug, Clone, Default)]
pub struct RunConfigInput {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub issue_number: Option<String>,
    pub issue_body: Option<String>,
    /// Labels already known from the triggering event; fetched from the API when empty
    pub issue_labels: Vec<String>,
    pub prompts_directory: Option<String>,
    pub ai_review_label: Option<String>,
    pub labels_to_prompts_mapping: Option<String>,
    pub assessment_regex_pattern: Option<String>,
    pub assessment_regex_flags: Option<String>,
    pub no_comment_regex_pattern: Option<String>,
    pub no_comment_regex_flags: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<String>,
    pub suppress_labels: Option<String>,
    pub suppress_comments: Option<String>,
}

/// Validated, immutable settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub token: String,
    pub repo: RepoConfig,
    pub issue_number: u64,
    pub issue_body: String,
    pub issue_labels: Vec<String>,
    pub prompts_dir: PathBuf,
    pub trigger_label: String,
    pub mapping: LabelMapping,
    pub assessment_regex: Regex,
    pub no_comment_regex: Option<Regex>,
    pub endpoint: String,
    pub model_override: Option<String>,
    pub max_tokens_override: Option<u32>,
    pub suppress_labels: bool,
    pub suppress_comments: bool,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, name: &'static str) -> Result<String> {
    present(value).ok_or(AssessorError::MissingInput(name))
}

/// Workflow booleans are strings; only the exact value `true` enables a flag.
fn flag(value: Option<String>) -> bool {
    value.as_deref() == Some("true")
}

fn positive_number(value: &str, name: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AssessorError::config(format!(
            "{} must be a positive integer, got {:?}",
            name, value
        ))),
    }
}

/// A run-level token budget of `0` means "not set" and leaves the prompt's own
/// budget in effect.
fn token_budget(value: &str) -> Result<Option<u32>> {
    match value.trim().parse::<u32>() {
        Ok(0) => Ok(None),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(AssessorError::config(format!(
            "max_tokens must be a non-negative integer, got {:?}",
            value
        ))),
    }
}

impl RunConfigInput {
    /// Checks every required input and compiles the regexes and label mapping.
    /// Nothing here touches the network.
    pub fn validate(self) -> Result<RunConfig> {
        let token = required(self.token, "token")?;
        let owner = required(self.owner, "owner")?;
        let repo = required(self.repo, "repo_name")?;
        let issue_number = required(self.issue_number, "issue_number")?;
        let issue_body = required(self.issue_body, "issue_body")?;
        let prompts_directory = required(self.prompts_directory, "prompts_directory")?;
        let trigger_label = required(self.ai_review_label, "ai_review_label")?;
        let mapping = required(self.labels_to_prompts_mapping, "labels_to_prompts_mapping")?;
        let assessment_pattern =
            required(self.assessment_regex_pattern, "assessment_regex_pattern")?;

        let issue_number = positive_number(&issue_number, "issue_number")?;
        let max_tokens_override = match present(self.max_tokens) {
            Some(v) => token_budget(&v)?,
            None => None,
        };

        let assessment_regex = compile_regex(
            &assessment_pattern,
            present(self.assessment_regex_flags).as_deref(),
        )?;
        let no_comment_regex = present(self.no_comment_regex_pattern)
            .map(|pattern| {
                compile_regex(&pattern, present(self.no_comment_regex_flags).as_deref())
            })
            .transpose()?;

        Ok(RunConfig {
            token,
            repo: RepoConfig::new(owner.trim(), repo.trim()),
            issue_number,
            issue_body,
            issue_labels: self
                .issue_labels
                .into_iter()
                .filter(|l| !l.is_empty())
                .collect(),
            prompts_dir: PathBuf::from(prompts_directory.trim()),
            trigger_label: trigger_label.trim().to_string(),
            mapping: LabelMapping::parse(&mapping)?,
            assessment_regex,
            no_comment_regex,
            endpoint: present(self.endpoint)
                .map(|e| e.trim().to_string())
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model_override: present(self.model).map(|m| m.trim().to_string()),
            max_tokens_override,
            suppress_labels: flag(self.suppress_labels),
            suppress_comments: flag(self.suppress_comments),
        })
    }
}

impl RunConfig {
    /// Settings for one prompt: run-level overrides beat the prompt file's defaults.
    pub fn inference_request(&self, prompt: &str, options: &PromptOptions) -> Result<InferenceRequest> {
        let model = self
            .model_override
            .clone()
            .or_else(|| options.model.clone())
            .ok_or_else(|| {
                AssessorError::malformed_prompt(
                    self.prompts_dir.join(prompt),
                    "no model configured and no model override given",
                )
            })?;

        Ok(InferenceRequest {
            content: self.issue_body.clone(),
            system_message: options.system_message.clone(),
            model,
            max_tokens: self.max_tokens_override.or(options.max_tokens),
        })
    }
}
