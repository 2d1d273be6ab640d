//! Tone of voice — the closed set of stylistic directives a post can be written in.
//!
//! Each tone carries exactly one style-guidance clause that is spliced into the
//! generation prompt.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Technical,
    #[default]
    Casual,
    Motivational,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Technical, Tone::Casual, Tone::Motivational];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Technical => "technical",
            Tone::Casual => "casual",
            Tone::Motivational => "motivational",
        }
    }

    /// Tone-specific style guidance for the prompt's guideline list.
    pub fn guidance(&self) -> &'static str {
        match self {
            Tone::Technical => "Include specific data or statistics when possible",
            Tone::Casual => "Use conversational language and relatable examples",
            Tone::Motivational => "Include action-oriented and inspiring messages",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a tone string is not one of the known tones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTone(pub String);

impl FromStr for Tone {
    type Err = UnknownTone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownTone(trimmed.to_string()))
    }
}
