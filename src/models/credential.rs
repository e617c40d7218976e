//! Bot token and log directive captured during an install run.

use crate::constants;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use zeroize::Zeroizing;

/// Shape verdict for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape {
    WellFormed,
    Malformed,
}

/// Discord bot token. Zeroed on drop, never printed.
pub struct Credential(Zeroizing<String>);

impl Credential {
    pub fn new(raw: Zeroizing<String>) -> Self {
        Self(raw)
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn shape(&self) -> TokenShape {
        token_shape(&self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let [a, b, c] = constants::TOKEN_SEGMENT_LENGTHS;
        let seg = "[A-Za-z0-9._-]";
        Regex::new(&format!(r"^{seg}{{{a}}}\.{seg}{{{b}}}\.{seg}{{{c}}}$"))
            .expect("token pattern is valid")
    })
}

/// Classify a raw token against the three-segment bot token layout.
pub fn token_shape(raw: &str) -> TokenShape {
    if token_pattern().is_match(raw) {
        TokenShape::WellFormed
    } else {
        TokenShape::Malformed
    }
}

/// Tracing `EnvFilter` directive handed to the daemon as `RUST_LOG`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirective(String);

impl LogDirective {
    /// Blank input falls back to `default`.
    pub fn resolve(input: &str, default: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            Self(default.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
