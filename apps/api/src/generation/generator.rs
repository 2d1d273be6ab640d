//! Content Generator — prompt construction, the completion call, and the
//! response contract.
//!
//! Flow: build_prompt → CompletionService::complete (bounded by timeout,
//!       optionally cancelled) → parse_generated_content.
//!
//! The parsed content is returned as the model wrote it. The 280-character
//! budget is stated in the prompt only; over-budget posts are logged, not cut.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::generation::prompts::{
    KEYWORDS_CLAUSE_TEMPLATE, MICROBLOG_PROMPT_TEMPLATE, MICROBLOG_SYSTEM,
};
use crate::generation::validator::GenerationRequest;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{strip_json_fences, CompletionService, LlmError};
use crate::models::content::{GeneratedContent, MAIN_CONTENT_BUDGET};

/// How much of a rejected reply is kept for diagnostics.
const RAW_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("completion service call failed: {0}")]
    Transport(#[from] LlmError),

    #[error("completion service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("generation cancelled")]
    Cancelled,

    #[error("completion service returned no content")]
    EmptyResponse,

    #[error("completion reply is not valid content JSON: {source} (reply starts: {raw:?})")]
    MalformedResponse {
        source: serde_json::Error,
        raw: String,
    },
}

/// Turns validated requests into generated content.
///
/// Built once at startup around a shared completion client; holds no
/// per-request state, so one instance serves concurrent requests.
pub struct ContentGenerator {
    llm: Arc<dyn CompletionService>,
    timeout: Duration,
}

impl ContentGenerator {
    pub fn new(llm: Arc<dyn CompletionService>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    /// Runs one generation round trip, bounded by the configured timeout.
    /// The timeout covers every retry the client makes.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedContent, GenerationError> {
        let prompt = build_prompt(request);
        debug!(
            "Prompt built: tone={}, keywords={}, chars={}",
            request.tone,
            request.keywords.len(),
            prompt.len()
        );

        let reply = tokio::time::timeout(self.timeout, self.llm.complete(MICROBLOG_SYSTEM, &prompt))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))??;

        let content = parse_generated_content(reply.as_deref())?;

        if !content.within_budget() {
            warn!(
                "Generated post is {} characters (budget {}), returning unchanged",
                content.char_count(),
                MAIN_CONTENT_BUDGET
            );
        }

        Ok(content)
    }

    /// Same as `generate`, but gives up as soon as `cancel` fires. Dropping the
    /// in-flight call aborts the outbound HTTP request.
    pub async fn generate_cancellable(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<GeneratedContent, GenerationError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GenerationError::Cancelled),
            result = self.generate(request) => result,
        }
    }
}

/// Builds the user instruction for a request. Deterministic: the same request
/// always yields the same prompt.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let keywords_clause = if request.keywords.is_empty() {
        String::new()
    } else {
        fill_template(
            KEYWORDS_CLAUSE_TEMPLATE,
            &[("keywords", request.keywords.join(", ").as_str())],
        )
    };
    let max_chars = MAIN_CONTENT_BUDGET.to_string();

    fill_template(
        MICROBLOG_PROMPT_TEMPLATE,
        &[
            ("topic", request.topic.as_str()),
            ("keywords_clause", keywords_clause.as_str()),
            ("tone", request.tone.as_str()),
            ("max_chars", max_chars.as_str()),
            ("tone_guidance", request.tone.guidance()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

/// Fills `{name}` placeholders in a single left-to-right pass, so substituted
/// values are never themselves scanned for placeholders. Unknown braces are
/// copied through untouched.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });

        match substituted {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Parses the completion reply into `GeneratedContent`.
///
/// No payload (or only whitespace) is `EmptyResponse`; anything that is not a
/// JSON object with string `mainContent` and string-array `hashtags` and
/// `insights` is `MalformedResponse`. Code fences around the JSON are tolerated.
pub fn parse_generated_content(reply: Option<&str>) -> Result<GeneratedContent, GenerationError> {
    let text = match reply.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return Err(GenerationError::EmptyResponse),
    };

    serde_json::from_str(strip_json_fences(text)).map_err(|source| {
        GenerationError::MalformedResponse {
            source,
            raw: text.chars().take(RAW_PREVIEW_CHARS).collect(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::tone::Tone;
    use crate::llm_client::testing::{StubCompletion, StubReply};

    const VALID_REPLY: &str = r#"{"mainContent":"X","hashtags":["y"],"insights":["z"]}"#;

    fn request(topic: &str, tone: Tone, keywords: &[&str]) -> GenerationRequest {
        GenerationRequest {
            topic: topic.to_string(),
            tone,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn generator(reply: StubReply) -> (Arc<StubCompletion>, ContentGenerator) {
        let stub = Arc::new(StubCompletion::new(reply));
        let generator = ContentGenerator::new(stub.clone(), Duration::from_secs(5));
        (stub, generator)
    }

    #[test]
    fn test_prompt_contains_tone_guidance_exactly_once() {
        for tone in Tone::ALL {
            let prompt = build_prompt(&request("Rust", tone, &[]));
            assert_eq!(
                prompt.matches(tone.guidance()).count(),
                1,
                "guidance for {tone} must appear once"
            );
            for other in Tone::ALL.into_iter().filter(|t| *t != tone) {
                assert!(!prompt.contains(other.guidance()));
            }
        }
    }

    #[test]
    fn test_prompt_states_budget_and_json_contract() {
        let prompt = build_prompt(&request("Rust", Tone::Casual, &[]));
        assert!(prompt.contains("under 280 characters"));
        assert!(prompt.contains("\"mainContent\""));
        assert!(prompt.contains("\"hashtags\""));
        assert!(prompt.contains("\"insights\""));
        assert!(prompt.contains("Use a casual tone of voice."));
    }

    #[test]
    fn test_prompt_without_keywords_has_no_keyword_clause() {
        let prompt = build_prompt(&request("Rust", Tone::Casual, &[]));
        assert!(prompt.contains(r#"about "Rust"."#));
        assert!(!prompt.contains("incorporating these keywords"));
    }

    #[test]
    fn test_prompt_mentions_keywords_and_technical_clause() {
        let prompt = build_prompt(&request(
            "AI trends",
            Tone::Technical,
            &["automation", "future"],
        ));
        assert!(prompt.contains(
            r#"about "AI trends" incorporating these keywords: automation, future."#
        ));
        assert!(prompt.contains("Include specific data or statistics when possible"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let req = request("Edge AI", Tone::Motivational, &["latency"]);
        assert_eq!(build_prompt(&req), build_prompt(&req));
    }

    #[test]
    fn test_user_text_is_not_treated_as_placeholder() {
        let prompt = build_prompt(&request("{tone} {keywords_clause}", Tone::Technical, &["{topic}"]));
        assert!(prompt.contains(r#"about "{tone} {keywords_clause}" incorporating these keywords: {topic}."#));
    }

    #[test]
    fn test_fill_template_leaves_unknown_braces() {
        assert_eq!(fill_template("{a} {b} {", &[("a", "1")]), "1 {b} {");
    }

    #[test]
    fn test_parse_valid_reply_unmodified() {
        let content = parse_generated_content(Some(VALID_REPLY)).unwrap();
        assert_eq!(
            content,
            GeneratedContent {
                main_content: "X".to_string(),
                hashtags: vec!["y".to_string()],
                insights: vec!["z".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_accepts_fenced_json() {
        let fenced = format!("```json\n{VALID_REPLY}\n```");
        assert!(parse_generated_content(Some(&fenced)).is_ok());
    }

    #[test]
    fn test_parse_accepts_empty_sequences() {
        let content =
            parse_generated_content(Some(r#"{"mainContent":"hi","hashtags":[],"insights":[]}"#))
                .unwrap();
        assert!(content.hashtags.is_empty());
        assert!(content.insights.is_empty());
    }

    #[test]
    fn test_parse_empty_reply() {
        assert!(matches!(
            parse_generated_content(None),
            Err(GenerationError::EmptyResponse)
        ));
        assert!(matches!(
            parse_generated_content(Some("  \n")),
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_non_json_is_malformed() {
        let err = parse_generated_content(Some("Here is your post: AI is great!")).unwrap_err();
        match err {
            GenerationError::MalformedResponse { raw, .. } => {
                assert_eq!(raw, "Here is your post: AI is great!");
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_missing_or_null_fields_are_malformed() {
        for reply in [
            r#"{"mainContent":"X","hashtags":["y"]}"#,
            r#"{"mainContent":"X","hashtags":null,"insights":["z"]}"#,
            r#"{"mainContent":null,"hashtags":[],"insights":[]}"#,
            r##"{"mainContent":"X","hashtags":"#y","insights":[]}"##,
            r#"["X","y","z"]"#,
        ] {
            assert!(
                matches!(
                    parse_generated_content(Some(reply)),
                    Err(GenerationError::MalformedResponse { .. })
                ),
                "reply should be malformed: {reply}"
            );
        }
    }

    #[test]
    fn test_over_budget_content_is_not_truncated() {
        let long = "a".repeat(400);
        let reply = format!(r#"{{"mainContent":"{long}","hashtags":[],"insights":[]}}"#);
        let content = parse_generated_content(Some(&reply)).unwrap();
        assert_eq!(content.main_content.len(), 400);
    }

    #[tokio::test]
    async fn test_generate_success() {
        let (stub, generator) = generator(StubReply::Text(VALID_REPLY));
        let content = generator
            .generate(&request("AI trends", Tone::Technical, &["automation", "future"]))
            .await
            .unwrap();
        assert_eq!(content.main_content, "X");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_generate_surfaces_transport_failure() {
        let (stub, generator) = generator(StubReply::Status(503));
        let err = generator
            .generate(&request("Rust", Tone::Casual, &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Transport(LlmError::Api { status: 503, .. })));
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_generate_empty_reply() {
        let (_, generator) = generator(StubReply::Empty);
        let err = generator
            .generate(&request("Rust", Tone::Casual, &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_times_out() {
        let (_, generator) = generator(StubReply::Hang);
        let err = generator
            .generate(&request("Rust", Tone::Casual, &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Timeout(d) if d == Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_generate_cancellable_stops_on_cancel() {
        let stub = Arc::new(StubCompletion::new(StubReply::Hang));
        let generator = ContentGenerator::new(stub, Duration::from_secs(3600));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = generator
            .generate_cancellable(&request("Rust", Tone::Casual, &[]), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Cancelled));
    }

    #[tokio::test]
    async fn test_generate_cancellable_completes_when_not_cancelled() {
        let (_, generator) = generator(StubReply::Text(VALID_REPLY));
        let cancel = CancellationToken::new();
        let content = generator
            .generate_cancellable(&request("Rust", Tone::Casual, &[]), &cancel)
            .await
            .unwrap();
        assert_eq!(content.hashtags, vec!["y"]);
    }
}
