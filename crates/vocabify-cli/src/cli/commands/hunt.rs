//! Hunt command handler.

use std::io::{self, BufRead};

use anyhow::{Context, Result, anyhow, bail};
use vocabify_core::config::Config;
use vocabify_core::hunt::selection::{TokenStyle, token_style};
use vocabify_core::hunt::session::{ActivePassage, HuntSession};
use vocabify_core::hunt::{Difficulty, GenerationRequest, WeaknessProfile};
use vocabify_core::providers::{GeminiClient, GeminiConfig};

const HIGHLIGHT: &str = "\x1b[7m";
const RESET: &str = "\x1b[0m";

pub struct HuntRunOptions<'a> {
    pub config: &'a Config,
    pub topic: &'a str,
    pub difficulty: &'a str,
    pub length: u32,
    pub weaknesses: &'a [String],
    pub model_override: Option<&'a str>,
    pub interactive: bool,
}

pub async fn run(options: HuntRunOptions<'_>) -> Result<()> {
    let difficulty: Difficulty = options
        .difficulty
        .parse()
        .map_err(|message: String| anyhow!(message))?;

    let request = GenerationRequest {
        topic: options.topic.to_string(),
        difficulty,
        passage_length: options.length,
        weaknesses: resolve_weaknesses(options.weaknesses, &options.config.profile.weaknesses),
    };

    let gemini = GeminiConfig::from_env(options.config, options.model_override)
        .context("configure Gemini provider")?;
    let client = GeminiClient::new(gemini);

    let mut session = HuntSession::new();
    let submission = session.begin_submission();

    let result = match client.generate_passage(&request).await {
        Ok(result) => result,
        Err(err) => {
            tracing::debug!(error = %err, "passage generation failed");
            bail!("{}", err.user_message());
        }
    };

    session.apply_result(submission, result);
    let active = session
        .active_mut()
        .context("no passage applied after generation")?;

    if !active.result.suggested_errors.is_empty() {
        println!(
            "Look out for these types of errors: {}.",
            active.result.suggested_errors.join(", ")
        );
        println!();
    }

    if options.interactive {
        run_interactive(active)
    } else {
        println!("{}", active.result.passage);
        Ok(())
    }
}

/// Weakness resolution order: flags > config profile > placeholder set.
fn resolve_weaknesses(flags: &[String], profile: &[String]) -> Vec<String> {
    if !flags.is_empty() {
        return flags.to_vec();
    }
    if !profile.is_empty() {
        return profile.to_vec();
    }
    WeaknessProfile::default().weaknesses
}

/// Stdin loop: toggle suspected words by number until the user is done.
fn run_interactive(active: &mut ActivePassage) -> Result<()> {
    println!("{}", render(active));
    println!();
    println!("Enter a word number to toggle it, 'words' to list them, 'check' for feedback, 'done' to finish.");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("read input")?;
        let input = line.trim();

        match input {
            "" => {}
            "done" | "quit" | "exit" => break,
            "check" => println!("Feedback not implemented yet."),
            "words" => println!("{}", numbered_words(active)),
            _ => match input.parse::<usize>() {
                Ok(number) => {
                    if let Some(index) = token_index_for_word(active, number) {
                        active.toggle(index);
                        println!("{}", render(active));
                    } else {
                        println!("No word #{number}.");
                    }
                }
                Err(_) => println!("Unrecognized input '{input}'."),
            },
        }
    }

    Ok(())
}

/// Renders the passage with selected words highlighted.
///
/// Purely a function of token kind and selection state.
fn render(active: &ActivePassage) -> String {
    let mut out = String::new();
    for token in &active.tokens {
        match token_style(token, &active.selection) {
            TokenStyle::Separator | TokenStyle::Word { selected: false } => {
                out.push_str(&token.text);
            }
            TokenStyle::Word { selected: true } => {
                out.push_str(HIGHLIGHT);
                out.push_str(&token.text);
                out.push_str(RESET);
            }
        }
    }
    out
}

/// Maps a 1-based word number (counting word tokens only) to its token index.
fn token_index_for_word(active: &ActivePassage, number: usize) -> Option<usize> {
    active
        .tokens
        .iter()
        .filter(|token| token.is_word())
        .nth(number.checked_sub(1)?)
        .map(|token| token.index)
}

fn numbered_words(active: &ActivePassage) -> String {
    active
        .tokens
        .iter()
        .filter(|token| token.is_word())
        .enumerate()
        .map(|(i, token)| format!("{}:{}", i + 1, token.text))
        .collect::<Vec<_>>()
        .join(" ")
}
