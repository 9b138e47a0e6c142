use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{AssessorError, Result};

/// Name of the structured output holding every assessment of the run.
pub const ASSESSMENTS_OUTPUT: &str = "ai_assessments";

/// One prompt's response and the label derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentOutcome {
    pub prompt: String,
    pub assessment_label: String,
    pub response: String,
}

/// Where run results go besides the issue itself.
pub trait Reporter: Send + Sync {
    /// Human-readable entry for one assessed prompt.
    fn write_summary(&self, outcome: &AssessmentOutcome) -> Result<()>;

    /// Machine-readable step output.
    fn set_output(&self, name: &str, value: &str) -> Result<()>;
}

/// Writes to the files GitHub Actions exposes through `GITHUB_STEP_SUMMARY`
/// and `GITHUB_OUTPUT`. Without them, results are only logged.
#[derive(Debug, Clone, Default)]
pub struct ActionsReporter {
    summary_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
}

impl ActionsReporter {
    pub fn new(summary_path: Option<PathBuf>, output_path: Option<PathBuf>) -> Self {
        Self {
            summary_path,
            output_path,
        }
    }

    fn append(path: &Path, content: &str) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Reporter for ActionsReporter {
    fn write_summary(&self, outcome: &AssessmentOutcome) -> Result<()> {
        match &self.summary_path {
            Some(path) => Self::append(path, &summary_markdown(outcome)),
            None => {
                info!(
                    prompt = %outcome.prompt,
                    label = %outcome.assessment_label,
                    "Assessment complete"
                );
                Ok(())
            }
        }
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        match &self.output_path {
            Some(path) => Self::append(path, &output_entry(name, value)?),
            None => {
                info!("{}={}", name, value);
                Ok(())
            }
        }
    }
}

fn summary_markdown(outcome: &AssessmentOutcome) -> String {
    format!(
        "## Assessment: {prompt}\n\n**Label:** `{label}`\n\n<details>\n<summary>Response</summary>\n\n{response}\n\n</details>\n\n",
        prompt = outcome.prompt,
        label = outcome.assessment_label,
        response = outcome.response.trim_end(),
    )
}

/// Multi-line output in the `name<<DELIMITER` form.
fn output_entry(name: &str, value: &str) -> Result<String> {
    let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
    if name.contains(&delimiter) || value.contains(&delimiter) {
        return Err(AssessorError::Report(format!(
            "output {} collides with delimiter {}",
            name, delimiter
        )));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}
