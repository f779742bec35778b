// ⌨️ Interactive Prompts
// Ask-until-valid loops with the actual input source injected, so every
// loop is testable with a scripted source instead of a live terminal.
// Invalid answers are rejected and re-asked, never defaulted.

use crate::rules::{Participant, SplitDecider, CATALOG};
use crate::store::SupermarketRegistry;
use anyhow::{anyhow, Context, Result};
use std::collections::VecDeque;
use std::io::{self, Write};

/// Source of answers for interactive questions.
pub trait InputSource {
    /// Show the prompt and return one line of input, trimmed.
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// The real thing: prompt on stdout, read from stdin.
pub struct Stdin;

impl InputSource for Stdin {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut buffer = String::new();
        io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer.trim().to_string())
    }
}

/// Canned answers, consumed front to back. Handy for tests and for driving
/// the tool non-interactively.
pub struct Scripted {
    answers: VecDeque<String>,
}

impl Scripted {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scripted {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputSource for Scripted {
    fn read_line(&mut self, _prompt: &str) -> Result<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow!("scripted input exhausted"))
    }
}

// ============================================================================
// ASK-UNTIL-VALID LOOPS
// ============================================================================

/// Present the rule catalog for an unknown product and loop until the
/// answer is a valid catalog key.
pub fn ask_split(source: &mut dyn InputSource, product: &str) -> Result<String> {
    println!("\nNo split rule on file for '{product}':");
    for rule in CATALOG {
        println!("{}: {}", rule.id, rule.label);
    }

    loop {
        let choice = source.read_line("Pick an option: ")?;
        let choice = choice.trim();
        if crate::rules::rule(choice).is_some() {
            return Ok(choice.to_string());
        }
    }
}

/// Ask who paid, looping until the answer is one of the fixed roster.
pub fn ask_payer(source: &mut dyn InputSource) -> Result<Participant> {
    loop {
        let answer = source.read_line("Who paid? (A/M/S): ")?;
        if let Some(payer) = Participant::parse(&answer) {
            return Ok(payer);
        }
    }
}

/// List known supermarkets and let the user pick one by id, or register a
/// new one. An unknown id falls through to new-name entry, which loops
/// until a non-empty name is given.
pub fn ask_supermarket(
    source: &mut dyn InputSource,
    registry: &mut SupermarketRegistry,
) -> Result<String> {
    println!("\nSupermarkets:");
    for record in registry.list() {
        println!("{}: {}", record.id, record.name);
    }

    let choice = source.read_line("Select an id, or ENTER for a new one: ")?;
    let choice = choice.trim();
    if !choice.is_empty() {
        if let Ok(id) = choice.parse::<u32>() {
            if let Some(name) = registry.resolve(id) {
                return Ok(name.to_string());
            }
        }
    }

    loop {
        let name = source.read_line("New supermarket name: ")?;
        let name = name.trim();
        if !name.is_empty() {
            registry.create(name)?;
            return Ok(name.to_string());
        }
    }
}

/// Any input source doubles as the resolver's decision source: unknown
/// products go through the interactive catalog prompt.
impl<S: InputSource> SplitDecider for S {
    fn choose_split(&mut self, product: &str) -> Result<String> {
        ask_split(self, product)
    }
}

// ============================================================================
// TESTS
// ============================================================================
