//! Prompt files in the GitHub Models `.prompt.yml` format.
//!
//! ```yaml
//! messages:
//!   - role: system
//!     content: You are a triage assistant...
//!   - role: user
//!     content: "{{input}}"
//! model: openai/gpt-4o-mini
//! modelParameters:
//!   max_tokens: 200
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AssessorError, Result};

/// Per-prompt settings, loaded once for each resolved prompt file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOptions {
    pub system_message: String,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFile {
    #[serde(default)]
    messages: Vec<PromptMessage>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    model_parameters: Option<ModelParameters>,
}

#[derive(Debug, Deserialize)]
struct PromptMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ModelParameters {
    #[serde(default)]
    max_tokens: Option<u32>,
}

impl PromptOptions {
    /// Loads `prompt` relative to `prompts_dir`.
    pub fn load(prompt: &str, prompts_dir: &Path) -> Result<Self> {
        let path = prompt_path(prompt, prompts_dir);
        debug!(path = %path.display(), "Loading prompt file");

        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AssessorError::PromptNotFound { path: path.clone() },
            _ => AssessorError::malformed_prompt(&path, e.to_string()),
        })?;

        Self::parse(&content, &path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let file: PromptFile = serde_yaml::from_str(content)
            .map_err(|e| AssessorError::malformed_prompt(path, e.to_string()))?;

        let system_message = file
            .messages
            .into_iter()
            .find(|m| m.role.eq_ignore_ascii_case("system"))
            .map(|m| m.content)
            .ok_or_else(|| AssessorError::malformed_prompt(path, "no system message"))?;

        Ok(Self {
            system_message,
            model: file.model.filter(|m| !m.trim().is_empty()),
            max_tokens: file.model_parameters.and_then(|p| p.max_tokens),
        })
    }
}

/// Short name of a prompt file used to namespace its labels:
/// `prompts/bug-review.prompt.yml` → `bug-review`, `triage.prompt` → `triage`.
pub fn prompt_base_name(prompt: &str) -> String {
    let file_name = Path::new(prompt)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(prompt);

    let stem = file_name
        .strip_suffix(".yml")
        .or_else(|| file_name.strip_suffix(".yaml"))
        .unwrap_or(file_name);
    let stem = stem.strip_suffix(".prompt").unwrap_or(stem);

    if stem.is_empty() {
        file_name.to_string()
    } else {
        stem.to_string()
    }
}

/// Where a prompt file lives on disk.
pub fn prompt_path(prompt: &str, prompts_dir: &Path) -> PathBuf {
    prompts_dir.join(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BUG_PROMPT: &str = r#"
messages:
  - role: system
    content: |
      You are a bug triage assistant.
      End with a line like ### Assessment: <level>
  - role: user
    content: "{{input}}"
model: openai/gpt-4o-mini
modelParameters:
  max_tokens: 200
"#;

    #[test]
    fn test_load_prompt_options() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bug-review.prompt.yml"), BUG_PROMPT).unwrap();

        let options = PromptOptions::load("bug-review.prompt.yml", dir.path()).unwrap();
        assert!(options.system_message.starts_with("You are a bug triage assistant."));
        assert_eq!(options.model.as_deref(), Some("openai/gpt-4o-mini"));
        assert_eq!(options.max_tokens, Some(200));
    }

    #[test]
    fn test_load_missing_prompt() {
        let dir = tempdir().unwrap();
        let err = PromptOptions::load("missing.prompt.yml", dir.path()).unwrap_err();
        assert!(matches!(err, AssessorError::PromptNotFound { .. }));
    }

    #[test]
    fn test_parse_without_defaults() {
        let options = PromptOptions::parse(
            "messages:\n  - role: system\n    content: Be brief\n",
            Path::new("brief.prompt.yml"),
        )
        .unwrap();
        assert_eq!(options.system_message, "Be brief");
        assert_eq!(options.model, None);
        assert_eq!(options.max_tokens, None);
    }

    #[test]
    fn test_parse_without_system_message() {
        let err = PromptOptions::parse(
            "messages:\n  - role: user\n    content: hi\nmodel: gpt-4o\n",
            Path::new("user-only.prompt.yml"),
        )
        .unwrap_err();
        assert!(matches!(err, AssessorError::PromptMalformed { .. }));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = PromptOptions::parse("messages: [unclosed", Path::new("x.prompt.yml")).unwrap_err();
        assert!(matches!(err, AssessorError::PromptMalformed { .. }));
    }

    #[test]
    fn test_prompt_base_name() {
        assert_eq!(prompt_base_name("triage.prompt"), "triage");
        assert_eq!(prompt_base_name("bug-review.prompt.yml"), "bug-review");
        assert_eq!(prompt_base_name("nested/dir/spam.prompt.yaml"), "spam");
        assert_eq!(prompt_base_name("plain.yml"), "plain");
        assert_eq!(prompt_base_name("noext"), "noext");
        assert_eq!(prompt_base_name(".prompt.yml"), ".prompt.yml");
    }

    #[test]
    fn test_prompt_path() {
        assert_eq!(
            prompt_path("a.prompt.yml", Path::new(".github/prompts")),
            PathBuf::from(".github/prompts/a.prompt.yml")
        );
    }
}
