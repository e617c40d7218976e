//! Optional journald forwarding via systemd-cat.
//!
//! Best-effort: failure to forward must not change the install result.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::process::{Command, Stdio};

/// Journal record of one install run. Never carries the token.
#[derive(Debug, Clone, Serialize)]
pub struct InstallEvent {
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub actor: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<bool>,
}

impl InstallEvent {
    pub fn completed(service: &str, started: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            service: service.to_string(),
            actor: detect_actor(),
            outcome: "completed",
            step: None,
            started: Some(started),
        }
    }

    pub fn aborted(service: &str, step: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            service: service.to_string(),
            actor: detect_actor(),
            outcome: "aborted",
            step,
            started: None,
        }
    }
}

fn detect_actor() -> String {
    std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
}

pub fn systemd_cat_available() -> bool {
    Command::new("systemd-cat")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn forward_event(tag: &str, event: &InstallEvent) {
    match serde_json::to_string(event) {
        Ok(line) => forward_line(tag, &line),
        Err(e) => tracing::debug!(error = %e, "cannot serialize install event"),
    }
}

/// Forward a single log line to journald using `systemd-cat`.
pub fn forward_line(tag: &str, line: &str) {
    if !systemd_cat_available() {
        return;
    }

    let mut child = match Command::new("systemd-cat")
        .arg("-t")
        .arg(tag)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "systemd-cat spawn failed");
            return;
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(line.as_bytes());
        let _ = stdin.write_all(b"\n");
    }

    let _ = child.wait();
}
