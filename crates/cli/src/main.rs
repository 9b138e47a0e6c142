use anyhow::{Context, Result};
use assessor::{ActionsReporter, AssessmentEngine, RunConfigInput, RunOutcome};
use clap::Parser;
use github::{GitHubClient, RepoConfig};
use inference::InferenceClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod event;

use event::{load_event_issue, EventIssue};

const DEFAULT_ASSESSMENT_PATTERN: &str = r"^###.*[aA]ssessment:\s*(.+)$";
const DEFAULT_ASSESSMENT_FLAGS: &str = "m";
const DEFAULT_API_URL: &str = "https://api.github.com";

/// Every input can also be given through its GitHub Actions form, `INPUT_<NAME>`.
#[derive(Parser, Debug)]
#[command(name = "ai-assessment")]
#[command(about = "Assess GitHub issues with AI, driven by their labels", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[arg(long, env = "INPUT_OWNER")]
    owner: Option<String>,

    #[arg(long, env = "INPUT_REPO_NAME")]
    repo_name: Option<String>,

    #[arg(long, env = "INPUT_ISSUE_NUMBER")]
    issue_number: Option<String>,

    #[arg(long, env = "INPUT_ISSUE_BODY")]
    issue_body: Option<String>,

    #[arg(long, env = "INPUT_PROMPTS_DIRECTORY")]
    prompts_directory: Option<String>,

    /// Label that marks an issue for assessment; removed once the run starts
    #[arg(long, env = "INPUT_AI_REVIEW_LABEL")]
    ai_review_label: Option<String>,

    /// `label,prompt-file` entries separated by `|`
    #[arg(long, env = "INPUT_LABELS_TO_PROMPTS_MAPPING")]
    labels_to_prompts_mapping: Option<String>,

    #[arg(long, env = "INPUT_ASSESSMENT_REGEX_PATTERN")]
    assessment_regex_pattern: Option<String>,

    #[arg(long, env = "INPUT_ASSESSMENT_REGEX_FLAGS")]
    assessment_regex_flags: Option<String>,

    #[arg(long, env = "INPUT_NO_COMMENT_REGEX_PATTERN")]
    no_comment_regex_pattern: Option<String>,

    #[arg(long, env = "INPUT_NO_COMMENT_REGEX_FLAGS")]
    no_comment_regex_flags: Option<String>,

    #[arg(long, env = "INPUT_ENDPOINT")]
    endpoint: Option<String>,

    #[arg(long, env = "INPUT_MODEL")]
    model: Option<String>,

    #[arg(long, env = "INPUT_MAX_TOKENS")]
    max_tokens: Option<String>,

    #[arg(long, env = "INPUT_SUPPRESS_LABELS")]
    suppress_labels: Option<String>,

    #[arg(long, env = "INPUT_SUPPRESS_COMMENTS")]
    suppress_comments: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide = true, hide_env_values = true)]
    github_token: Option<String>,

    /// `owner/repo`
    #[arg(long, env = "GITHUB_REPOSITORY", hide = true)]
    github_repository: Option<String>,

    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    #[arg(long, env = "GITHUB_STEP_SUMMARY")]
    step_summary: Option<PathBuf>,

    #[arg(long, env = "GITHUB_OUTPUT")]
    output: Option<PathBuf>,

    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Cli {
    /// Merges explicit inputs with what the Actions environment and the event
    /// payload provide. Explicit inputs win.
    fn into_run_input(self, event: Option<EventIssue>) -> RunConfigInput {
        let event = event.unwrap_or_default();
        let repository = non_empty(self.github_repository)
            .as_deref()
            .and_then(RepoConfig::from_full_name);

        RunConfigInput {
            token: non_empty(self.token).or(non_empty(self.github_token)),
            owner: non_empty(self.owner).or_else(|| repository.as_ref().map(|r| r.owner.clone())),
            repo: non_empty(self.repo_name).or_else(|| repository.map(|r| r.repo)),
            issue_number: non_empty(self.issue_number)
                .or_else(|| event.number.map(|n| n.to_string())),
            issue_body: non_empty(self.issue_body).or(event.body.clone()),
            issue_labels: event.label_names(),
            prompts_directory: self.prompts_directory,
            ai_review_label: self.ai_review_label,
            labels_to_prompts_mapping: self.labels_to_prompts_mapping,
            assessment_regex_pattern: non_empty(self.assessment_regex_pattern)
                .or_else(|| Some(DEFAULT_ASSESSMENT_PATTERN.to_string())),
            assessment_regex_flags: non_empty(self.assessment_regex_flags)
                .or_else(|| Some(DEFAULT_ASSESSMENT_FLAGS.to_string())),
            no_comment_regex_pattern: self.no_comment_regex_pattern,
            no_comment_regex_flags: self.no_comment_regex_flags,
            endpoint: self.endpoint,
            model: self.model,
            max_tokens: self.max_tokens,
            suppress_labels: self.suppress_labels,
            suppress_comments: self.suppress_comments,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let event = match &cli.event_path {
        Some(path) => load_event_issue(path).await.unwrap_or_else(|e| {
            warn!("Ignoring event payload: {:#}", e);
            None
        }),
        None => None,
    };

    let reporter = ActionsReporter::new(cli.step_summary.clone(), cli.output.clone());
    let api_url = non_empty(cli.api_url.clone()).unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let config = cli
        .into_run_input(event)
        .validate()
        .context("Required inputs are not set or invalid")?;

    let tracker = GitHubClient::with_base_url(&config.token, config.repo.clone(), &api_url)
        .context("Failed to create GitHub client")?;
    let inference = InferenceClient::new(config.token.clone(), config.endpoint.clone());

    let engine = AssessmentEngine::new(
        config,
        Arc::new(tracker),
        Arc::new(inference),
        Arc::new(reporter),
    );

    let outcome = engine.run().await.context("AI assessment failed")?;
    match &outcome {
        RunOutcome::Completed(result) => info!(
            labels = %result.labels_to_add.join(", "),
            assessments = result.assessments.len(),
            "AI assessment finished"
        ),
        other => info!(outcome = other.as_str(), "AI assessment skipped"),
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_ansi(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ai_assessment=info,assessor=info,github=info,inference=info".into()
            }),
        )
        .init();
}
