//! Label-driven AI assessment of GitHub issues.
//!
//! A run checks that the issue carries the trigger label, removes it, maps the
//! remaining labels to prompt files, asks the model once per prompt, comments
//! with each response and finally applies one `ai:<prompt>:<assessment>` label
//! per prompt.
//!
//! # Architecture
//!
//! - **Config**: validated [`RunConfig`] built once from workflow inputs
//! - **Mapping**: `label,prompt` entries resolved against the issue labels
//! - **Prompt**: `.prompt.yml` loading (system message, model, token budget)
//! - **Assessment**: outcome label extraction from a response
//! - **Engine**: the run itself, talking to the outside through [`ports`]
//! - **Report**: job summary and step outputs

pub mod assessment;
pub mod config;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod pattern;
pub mod ports;
pub mod prompt;
pub mod report;

pub use assessment::{assessment_label, no_assessment_label, unable_to_process_label};
pub use config::{RunConfig, RunConfigInput};
pub use engine::{AssessmentEngine, RunOutcome, RunResult};
pub use error::{AssessorError, Result};
pub use mapping::LabelMapping;
pub use pattern::compile_regex;
pub use ports::{Inference, IssueTracker};
pub use prompt::{prompt_base_name, PromptOptions};
pub use report::{ActionsReporter, AssessmentOutcome, Reporter, ASSESSMENTS_OUTPUT};
