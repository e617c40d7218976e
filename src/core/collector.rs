//! Token and log directive capture.

use crate::core::prompt::Prompter;
use crate::models::credential::{Credential, LogDirective, TokenShape};
use anyhow::{bail, Result};
use zeroize::Zeroizing;

pub const TOKEN_PROMPT: &str = "Discord bot token";
pub const OVERRIDE_PROMPT: &str = "Token does not look like a bot token. Use it anyway?";
pub const LOG_PROMPT: &str = "Log level (RUST_LOG)";

#[derive(Debug)]
pub struct CollectedInput {
    pub credential: Credential,
    pub log: LogDirective,
}

pub fn collect<P: Prompter + ?Sized>(prompter: &mut P, default_log: &str) -> Result<CollectedInput> {
    let raw = prompter.secret(TOKEN_PROMPT)?;
    let credential = Credential::new(Zeroizing::new(raw.trim().to_string()));
    drop(raw);

    if credential.is_empty() {
        bail!("bot token cannot be empty");
    }

    match credential.shape() {
        TokenShape::WellFormed => println!("Token format looks valid"),
        TokenShape::Malformed => {
            eprintln!(
                "warning: token is not three dot-separated segments of 24/6/27 characters from [A-Za-z0-9._-]"
            );
            if !prompter.confirm(OVERRIDE_PROMPT, false)? {
                bail!("token rejected: format not confirmed");
            }
        }
    }

    let input = prompter.text(LOG_PROMPT, default_log)?;
    let log = LogDirective::resolve(&input, default_log);
    println!("Log directive: {}", log);

    Ok(CollectedInput { credential, log })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use crate::core::prompt::scripted::{Answer, ScriptedPrompter};

    const GOOD: &str = "AAAAAAAAAAAAAAAAAAAAAAAA.BBBBBB.CCCCCCCCCCCCCCCCCCCCCCCCCCC";

    #[test]
    fn test_well_formed_needs_no_override() {
        let mut p = ScriptedPrompter::new(vec![
            Answer::Secret(GOOD.into()),
            Answer::Text(String::new()),
        ]);
        let input = collect(&mut p, constants::DEFAULT_LOG_DIRECTIVE).unwrap();
        assert_eq!(input.credential.expose(), GOOD);
        assert_eq!(input.log.as_str(), constants::DEFAULT_LOG_DIRECTIVE);
        assert!(!p.asked.iter().any(|q| q == OVERRIDE_PROMPT));
    }

    #[test]
    fn test_empty_token_is_fatal_without_prompting() {
        let mut p = ScriptedPrompter::new(vec![
            Answer::Secret("   ".into()),
            Answer::Confirm(true),
        ]);
        let err = collect(&mut p, constants::DEFAULT_LOG_DIRECTIVE).unwrap_err();
        assert!(err.to_string().contains("empty"));
        assert_eq!(p.asked, vec![TOKEN_PROMPT.to_string()]);
    }

    #[test]
    fn test_malformed_declined() {
        let mut p = ScriptedPrompter::new(vec![
            Answer::Secret("short.token".into()),
            Answer::Confirm(false),
        ]);
        assert!(collect(&mut p, constants::DEFAULT_LOG_DIRECTIVE).is_err());
        assert!(p.asked.iter().any(|q| q == OVERRIDE_PROMPT));
        assert!(!p.asked.iter().any(|q| q == LOG_PROMPT));
    }

    #[test]
    fn test_malformed_accepted() {
        let mut p = ScriptedPrompter::new(vec![
            Answer::Secret("short.token".into()),
            Answer::Confirm(true),
            Answer::Text("debug".into()),
        ]);
        let input = collect(&mut p, constants::DEFAULT_LOG_DIRECTIVE).unwrap();
        assert_eq!(input.credential.expose(), "short.token");
        assert_eq!(input.log.as_str(), "debug");
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let mut p = ScriptedPrompter::new(vec![
            Answer::Secret(format!("  {}\n", GOOD)),
            Answer::Text(String::new()),
        ]);
        let input = collect(&mut p, constants::DEFAULT_LOG_DIRECTIVE).unwrap();
        assert_eq!(input.credential.expose(), GOOD);
        assert_eq!(p.remaining(), 0);
    }
}
