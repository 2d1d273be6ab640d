// Microblog generation: input validation, tone guidance, prompt building,
// the completion call, and the response contract.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod generator;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod tone;
pub mod validator;
