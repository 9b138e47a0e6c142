use regex::Regex;

use crate::prompt::prompt_base_name;

const LABEL_PREFIX: &str = "ai";
const NO_ASSESSMENT: &str = "no-assessment-found";
const UNABLE_TO_PROCESS: &str = "unable-to-process";

fn namespaced(prompt: &str, value: &str) -> String {
    format!("{}:{}:{}", LABEL_PREFIX, prompt_base_name(prompt), value)
}

/// Label for a prompt whose response carried no recognizable assessment.
pub fn no_assessment_label(prompt: &str) -> String {
    namespaced(prompt, NO_ASSESSMENT)
}

/// Label for a prompt the model produced no response for.
pub fn unable_to_process_label(prompt: &str) -> String {
    namespaced(prompt, UNABLE_TO_PROCESS)
}

/// Derives the outcome label for one response.
///
/// The first capture group of `regex` (or the whole match when the pattern has
/// no groups) is normalized to lowercase with whitespace runs collapsed to `-`.
/// Never fails: a missing or blank match yields [`no_assessment_label`].
pub fn assessment_label(prompt: &str, response: &str, regex: &Regex) -> String {
    regex
        .captures(response)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(0)))
        .map(|m| normalize_assessment(m.as_str()))
        .filter(|value| !value.is_empty())
        .map(|value| namespaced(prompt, &value))
        .unwrap_or_else(|| no_assessment_label(prompt))
}

fn normalize_assessment(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::compile_regex;

    fn default_regex() -> Regex {
        compile_regex(r"^###.*[aA]ssessment:\s*(.+)$", Some("m")).unwrap()
    }

    #[test]
    fn test_label_from_capture() {
        let response = "Looks serious.\n\n### Assessment: High\n\nDetails follow.";
        assert_eq!(
            assessment_label("triage.prompt", response, &default_regex()),
            "ai:triage:high"
        );
    }

    #[test]
    fn test_label_normalizes_whitespace_and_case() {
        let response = "### AI Assessment:   Ready  For Review  ";
        assert_eq!(
            assessment_label("bug-review.prompt.yml", response, &default_regex()),
            "ai:bug-review:ready-for-review"
        );
    }

    #[test]
    fn test_first_match_wins() {
        let response = "### Assessment: low\n### Assessment: high";
        assert_eq!(
            assessment_label("triage.prompt", response, &default_regex()),
            "ai:triage:low"
        );
    }

    #[test]
    fn test_whole_match_without_groups() {
        let regex = compile_regex(r"(?:spam|ham)", Some("i")).unwrap();
        assert_eq!(
            assessment_label("spam.prompt.yml", "Verdict: SPAM", &regex),
            "ai:spam:spam"
        );
    }

    #[test]
    fn test_fallback_when_no_match() {
        assert_eq!(
            assessment_label("triage.prompt", "I cannot tell.", &default_regex()),
            "ai:triage:no-assessment-found"
        );
    }

    #[test]
    fn test_fallback_for_empty_response() {
        let label = assessment_label("triage.prompt", "", &default_regex());
        assert_eq!(label, no_assessment_label("triage.prompt"));
    }

    #[test]
    fn test_fallback_for_blank_capture() {
        let regex = compile_regex(r"Assessment:(\s*)$", None).unwrap();
        assert_eq!(
            assessment_label("triage.prompt", "Assessment:   ", &regex),
            "ai:triage:no-assessment-found"
        );
    }

    #[test]
    fn test_label_is_total_over_odd_inputs() {
        let regex = default_regex();
        for response in ["", "\n\n", "###", "### Assessment:", "\u{0}\u{fffd}", "### Assessment: ✅"] {
            let label = assessment_label("x.prompt.yml", response, &regex);
            assert!(label.starts_with("ai:x:"));
            assert!(label.len() > "ai:x:".len());
        }
    }

    #[test]
    fn test_unable_to_process_label() {
        assert_eq!(
            unable_to_process_label("triage.prompt"),
            "ai:triage:unable-to-process"
        );
        assert_eq!(
            unable_to_process_label("prompts/bug-review.prompt.yml"),
            "ai:bug-review:unable-to-process"
        );
    }
}
