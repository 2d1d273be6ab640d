// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System framing for microblog generation. Constant across requests.
pub const MICROBLOG_SYSTEM: &str = "You are a professional content creator specializing in \
    creating engaging, platform-optimized microblog posts.";

/// Microblog prompt template.
/// Replace: {topic}, {keywords_clause}, {tone}, {max_chars}, {tone_guidance}, {json_only}
pub const MICROBLOG_PROMPT_TEMPLATE: &str = r#"Create a microblog post about "{topic}"{keywords_clause}.

Use a {tone} tone of voice.

Guidelines:
- Keep the main content under {max_chars} characters.
- Include relevant hashtags
- Provide key insights about the topic
- {tone_guidance}

Format the response as a JSON object with exactly these three fields:
{
  "mainContent": "the microblog post text",
  "hashtags": ["array", "of", "relevant", "hashtags"],
  "insights": ["array", "of", "key", "insights"]
}

{json_only}"#;

/// Keyword clause appended to the opening sentence. Replace: {keywords}
pub const KEYWORDS_CLAUSE_TEMPLATE: &str = " incorporating these keywords: {keywords}";
