//! Passage prompt rendering.

use anyhow::{Context, Result};
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

use crate::prompts::PASSAGE_PROMPT_TEMPLATE;

use super::GenerationRequest;

#[derive(Serialize)]
struct PromptVars<'a> {
    topic: &'a str,
    difficulty: &'a str,
    passage_length: u32,
    weaknesses: &'a [String],
}

/// Renders the generation prompt for a request.
///
/// States topic, difficulty, and target length verbatim, lists every
/// weakness category as a bullet, and instructs the model to keep the
/// errors subtle without revealing their locations.
///
/// # Errors
/// Returns an error if the template fails to render.
pub fn build_prompt(request: &GenerationRequest) -> Result<String> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_template("passage_prompt", PASSAGE_PROMPT_TEMPLATE)
        .context("add passage prompt template")?;

    let vars = PromptVars {
        topic: request.topic.trim(),
        difficulty: request.difficulty.id(),
        passage_length: request.passage_length,
        weaknesses: &request.weaknesses,
    };

    let output = env
        .get_template("passage_prompt")
        .context("get passage prompt template")?
        .render(&vars)
        .context("render passage prompt")?;

    Ok(output.trim().to_string())
}
