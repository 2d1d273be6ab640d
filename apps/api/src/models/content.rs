use serde::{Deserialize, Serialize};

/// Soft length budget for `main_content`, stated in the prompt.
/// Advisory only: the model's text is never truncated to fit.
pub const MAIN_CONTENT_BUDGET: usize = 280;

/// A generated microblog post as returned by the completion service.
///
/// Field names follow the JSON contract the prompt asks for (`mainContent`,
/// `hashtags`, `insights`). All three must be present and non-null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub main_content: String,
    pub hashtags: Vec<String>,
    pub insights: Vec<String>,
}

impl GeneratedContent {
    pub fn char_count(&self) -> usize {
        self.main_content.chars().count()
    }

    pub fn within_budget(&self) -> bool {
        self.char_count() <= MAIN_CONTENT_BUDGET
    }
}
