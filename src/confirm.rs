//! Yes/no decision points asked before destructive actions.
use std::io::{self, BufRead, Write};

use log::warn;

/// Answers a yes/no question before a destructive action runs.
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Accepts every request, used for `--force`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirmation for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Asks on the terminal and waits for `y`/`yes`; anything else declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn ask(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
        write!(output, "{} [y/N]: ", prompt)?;
        output.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

impl Confirmation for TerminalPrompt {
    fn confirm(&self, prompt: &str) -> bool {
        let stdin = io::stdin();
        match Self::ask(prompt, &mut stdin.lock(), &mut io::stdout()) {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Could not read confirmation, treating as no: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}
