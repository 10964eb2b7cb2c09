//! Prompt file helpers.

/// Prompt template for Error Hunt passage generation (`MiniJinja`).
pub const PASSAGE_PROMPT_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/passage_prompt.md"
));
