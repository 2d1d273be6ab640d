//! Input validation — turns raw submitted fields into a `GenerationRequest`.
//!
//! Pure: no I/O, no logging. Nothing reaches the completion service unless
//! this passes.

use serde::Serialize;
use thiserror::Error;

use crate::generation::tone::{Tone, UnknownTone};

pub const MAX_TOPIC_CHARS: usize = 100;
pub const MAX_KEYWORDS_CHARS: usize = 200;
pub const MAX_KEYWORDS: usize = 5;

/// A well-formed generation request. Built per submission, consumed once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub topic: String,
    pub tone: Tone,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Topic is required. Please enter a topic for your microblog.")]
    TopicRequired,

    #[error("Topic must be at most {} characters.", MAX_TOPIC_CHARS)]
    TopicTooLong,

    #[error("Unknown tone '{0}'. Choose one of: technical, casual, motivational.")]
    UnknownTone(String),

    #[error("Keywords must be at most {} characters.", MAX_KEYWORDS_CHARS)]
    KeywordsTooLong,

    #[error("Use at most {} comma-separated keywords.", MAX_KEYWORDS)]
    TooManyKeywords,
}

impl ValidationError {
    /// The submitted field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::TopicRequired | ValidationError::TopicTooLong => "topic",
            ValidationError::UnknownTone(_) => "tone",
            ValidationError::KeywordsTooLong | ValidationError::TooManyKeywords => "keywords",
        }
    }
}

impl From<UnknownTone> for ValidationError {
    fn from(e: UnknownTone) -> Self {
        ValidationError::UnknownTone(e.0)
    }
}

/// Validates raw form fields.
///
/// - `topic`: required, trimmed, at most `MAX_TOPIC_CHARS` characters.
/// - `tone`: absent or blank means `casual`; anything else must name a known tone.
/// - `keywords`: optional, at most `MAX_KEYWORDS_CHARS` characters and `MAX_KEYWORDS` entries.
pub fn validate_submission(
    topic: Option<&str>,
    tone: Option<&str>,
    keywords: Option<&str>,
) -> Result<GenerationRequest, ValidationError> {
    let topic = topic.map(str::trim).unwrap_or_default();
    if topic.is_empty() {
        return Err(ValidationError::TopicRequired);
    }
    if topic.chars().count() > MAX_TOPIC_CHARS {
        return Err(ValidationError::TopicTooLong);
    }

    let tone = match tone.map(str::trim).filter(|t| !t.is_empty()) {
        Some(raw) => raw.parse::<Tone>()?,
        None => Tone::default(),
    };

    let raw_keywords = keywords.map(str::trim).unwrap_or_default();
    if raw_keywords.chars().count() > MAX_KEYWORDS_CHARS {
        return Err(ValidationError::KeywordsTooLong);
    }
    let keywords = split_keywords(raw_keywords);
    if keywords.len() > MAX_KEYWORDS {
        return Err(ValidationError::TooManyKeywords);
    }

    Ok(GenerationRequest {
        topic: topic.to_string(),
        tone,
        keywords,
    })
}

/// Splits a comma-separated keyword list, trimming each entry and dropping empties.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
