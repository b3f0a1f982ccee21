pub mod http;

pub use http::HttpSuggester;

use anyhow::{bail, Result};
use std::fmt;
use std::time::Duration;

/// Something that can recommend a prioritization model from feature descriptions.
///
/// Advisory only: nothing in scoring depends on an implementation being present.
#[allow(async_fn_in_trait)]
pub trait ModelSuggester {
    async fn suggest(&self, descriptions: &[String]) -> Result<String>;
}

/// Stand-in used when no suggestion service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuggester;

impl ModelSuggester for NoSuggester {
    async fn suggest(&self, _descriptions: &[String]) -> Result<String> {
        bail!("No suggestion service configured. Add a `suggest` section to the config file.")
    }
}

/// Result of a best-effort suggestion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionOutcome {
    Suggested(String),
    /// The service failed, timed out or is absent; carries a user-facing reason
    Unavailable(String),
}

impl fmt::Display for SuggestionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionOutcome::Suggested(text) => write!(f, "Suggested prioritization model: {}", text),
            SuggestionOutcome::Unavailable(reason) => {
                write!(f, "Model suggestion unavailable ({}). Pick a model manually.", reason)
            }
        }
    }
}

/// Prompt text sent to the text-generation service.
pub fn build_prompt(descriptions: &[String]) -> String {
    format!(
        "Suggest the best prioritization model for the following features:\n{}",
        descriptions.join("\n")
    )
}

/// Ask `suggester` for a model, never failing.
///
/// Errors and timeouts are logged and turned into `Unavailable` so the caller
/// can carry on with manual model selection.
pub async fn suggest_best_effort<S: ModelSuggester>(
    suggester: &S,
    descriptions: &[String],
    timeout: Duration,
) -> SuggestionOutcome {
    if descriptions.iter().all(|d| d.trim().is_empty()) {
        return SuggestionOutcome::Unavailable("no feature descriptions given".to_string());
    }

    match tokio::time::timeout(timeout, suggester.suggest(descriptions)).await {
        Ok(Ok(text)) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                SuggestionOutcome::Unavailable("empty response".to_string())
            } else {
                tracing::debug!("Suggestion received ({} chars)", text.len());
                SuggestionOutcome::Suggested(text)
            }
        }
        Ok(Err(e)) => {
            tracing::warn!("Suggestion request failed: {:#}", e);
            SuggestionOutcome::Unavailable(e.to_string())
        }
        Err(_elapsed) => {
            tracing::warn!("Suggestion request timed out after {:?}", timeout);
            SuggestionOutcome::Unavailable(format!(
                "timed out after {}",
                humantime::format_duration(timeout)
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSuggester(&'static str);

    impl ModelSuggester for StaticSuggester {
        async fn suggest(&self, _descriptions: &[String]) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct SlowSuggester;

    impl ModelSuggester for SlowSuggester {
        async fn suggest(&self, _descriptions: &[String]) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("RICE".to_string())
        }
    }

    fn descs() -> Vec<String> {
        vec!["Checkout revamp".to_string(), "Dark mode".to_string()]
    }

    #[test]
    fn test_build_prompt() {
        assert_eq!(
            build_prompt(&descs()),
            "Suggest the best prioritization model for the following features:\nCheckout revamp\nDark mode"
        );
    }

    #[tokio::test]
    async fn test_suggestion_passed_through() {
        let outcome = suggest_best_effort(&StaticSuggester("  Use RICE \n"), &descs(), Duration::from_secs(1)).await;
        assert_eq!(outcome, SuggestionOutcome::Suggested("Use RICE".to_string()));
    }

    #[tokio::test]
    async fn test_no_suggester_is_informational() {
        let outcome = suggest_best_effort(&NoSuggester, &descs(), Duration::from_secs(1)).await;
        match outcome {
            SuggestionOutcome::Unavailable(reason) => assert!(reason.contains("No suggestion service")),
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_informational() {
        let outcome = suggest_best_effort(&SlowSuggester, &descs(), Duration::from_millis(50)).await;
        assert_eq!(outcome, SuggestionOutcome::Unavailable("timed out after 50ms".to_string()));
    }

    #[tokio::test]
    async fn test_blank_descriptions_skip_request() {
        let outcome = suggest_best_effort(
            &StaticSuggester("RICE"),
            &["".to_string(), "  ".to_string()],
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(outcome, SuggestionOutcome::Unavailable(_)));
    }

    #[test]
    fn test_outcome_display() {
        let ok = SuggestionOutcome::Suggested("ICE".to_string());
        assert_eq!(ok.to_string(), "Suggested prioritization model: ICE");
        let failed = SuggestionOutcome::Unavailable("timed out after 10s".to_string());
        assert!(failed.to_string().contains("Pick a model manually"));
    }
}
