// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Closing instruction appended to prompts that expect a bare JSON reply.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with the JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
