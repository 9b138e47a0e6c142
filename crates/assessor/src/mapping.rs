//! Label → prompt file mapping.
//!
//! The mapping comes from a single input string, entries separated by `|` or
//! newlines, each entry `label,prompt-file`:
//!
//! ```text
//! bug,bug-review.prompt.yml|support request,request-intake.prompt.yml
//! ```

use tracing::debug;

use crate::error::{AssessorError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub label: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMapping {
    entries: Vec<MappingEntry>,
}

impl LabelMapping {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut entries = Vec::new();

        for entry in raw.split(['|', '\n']) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            let invalid = |reason: &str| AssessorError::InvalidMapping {
                entry: entry.to_string(),
                reason: reason.to_string(),
            };

            let (label, prompt) = entry
                .split_once(',')
                .ok_or_else(|| invalid("expected `label,prompt-file`"))?;
            let (label, prompt) = (label.trim(), prompt.trim());

            if label.is_empty() {
                return Err(invalid("label is empty"));
            }
            if prompt.is_empty() {
                return Err(invalid("prompt file is empty"));
            }

            entries.push(MappingEntry {
                label: label.to_string(),
                prompt: prompt.to_string(),
            });
        }

        if entries.is_empty() {
            return Err(AssessorError::config("label to prompt mapping has no entries"));
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn prompts_for<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.label == label)
            .map(|e| e.prompt.as_str())
    }

    /// Prompt files to run for the given issue labels, in label order, each once.
    ///
    /// An empty result means nothing on the issue is mapped.
    pub fn resolve<S: AsRef<str>>(&self, labels: &[S]) -> Vec<String> {
        let mut prompts: Vec<String> = Vec::new();

        for label in labels {
            for prompt in self.prompts_for(label.as_ref()) {
                if !prompts.iter().any(|p| p == prompt) {
                    debug!(label = label.as_ref(), prompt, "Label matched prompt");
                    prompts.push(prompt.to_string());
                }
            }
        }

        prompts
    }
}
