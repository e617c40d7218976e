//! Operator input, behind a trait so the pipeline can run without a terminal.

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Password};
use zeroize::Zeroizing;

pub trait Prompter {
    /// Non-echoing input. May return an empty string.
    fn secret(&mut self, prompt: &str) -> Result<Zeroizing<String>>;

    /// Free text; blank input returns `default`.
    fn text(&mut self, prompt: &str, default: &str) -> Result<String>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

/// Interactive terminal prompts.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn secret(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        Ok(Zeroizing::new(
            Password::new()
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()
                .context("read secret from prompt")?,
        ))
    }

    fn text(&mut self, prompt: &str, default: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()
            .context("read input from prompt")
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .context("read confirmation from prompt")
    }
}

#[cfg(test)]
pub mod scripted {
    //! Canned answers for pipeline tests.

    use super::*;
    use anyhow::bail;
    use std::collections::VecDeque;

    #[derive(Debug, Clone)]
    pub enum Answer {
        Secret(String),
        Text(String),
        Confirm(bool),
    }

    #[derive(Debug, Default)]
    pub struct ScriptedPrompter {
        answers: VecDeque<Answer>,
        pub asked: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: answers.into(),
                asked: Vec::new(),
            }
        }

        pub fn remaining(&self) -> usize {
            self.answers.len()
        }

        fn next(&mut self, prompt: &str) -> Result<Answer> {
            self.asked.push(prompt.to_string());
            match self.answers.pop_front() {
                Some(answer) => Ok(answer),
                None => bail!("no scripted answer for prompt '{}'", prompt),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn secret(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
            match self.next(prompt)? {
                Answer::Secret(s) => Ok(Zeroizing::new(s)),
                other => bail!("expected secret for '{}', scripted {:?}", prompt, other),
            }
        }

        fn text(&mut self, prompt: &str, default: &str) -> Result<String> {
            match self.next(prompt)? {
                Answer::Text(s) if s.is_empty() => Ok(default.to_string()),
                Answer::Text(s) => Ok(s),
                other => bail!("expected text for '{}', scripted {:?}", prompt, other),
            }
        }

        fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool> {
            match self.next(prompt)? {
                Answer::Confirm(b) => Ok(b),
                other => bail!("expected confirm for '{}', scripted {:?}", prompt, other),
            }
        }
    }
}
