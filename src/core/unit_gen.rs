//! systemd unit file generator (pure function of the desired state).
//!
//! The installer copies the shipped template verbatim; this generator is what
//! produced that template and what `render unit` prints for custom configs.

use crate::models::system_state::SystemState;

pub fn render_unit(state: &SystemState) -> String {
    let mut out = String::new();
    out.push_str("[Unit]\n");
    out.push_str(&format!("Description={}\n", state.description));
    out.push_str("After=network-online.target\n");
    out.push_str("Wants=network-online.target\n");
    out.push('\n');

    out.push_str("[Service]\n");
    out.push_str("Type=simple\n");
    out.push_str(&format!("User={}\n", state.user));
    out.push_str(&format!("Group={}\n", state.group));
    out.push_str(&format!("WorkingDirectory={}\n", state.data_dir.display()));
    out.push_str(&format!("EnvironmentFile={}\n", state.env_file.display()));
    for (key, value) in &state.environment {
        out.push_str(&format!("Environment={}\n", quote_assignment(key, value)));
    }
    out.push_str(&format!("ExecStart={}\n", state.installed_binary.display()));
    out.push_str("Restart=on-failure\n");
    out.push_str("RestartSec=10\n");
    let log_file = state.log_dir.join(format!("{}.log", state.service));
    out.push_str(&format!("StandardOutput=append:{}\n", log_file.display()));
    out.push_str(&format!("StandardError=append:{}\n", log_file.display()));

    out.push_str("NoNewPrivileges=yes\n");
    out.push_str("ProtectSystem=strict\n");
    out.push_str("ProtectHome=yes\n");
    out.push_str("PrivateTmp=yes\n");
    out.push_str("ProtectKernelTunables=yes\n");
    out.push_str("ProtectKernelModules=yes\n");
    out.push_str("ProtectControlGroups=yes\n");
    out.push_str(&format!(
        "ReadWritePaths={} {}\n",
        state.data_dir.display(),
        state.log_dir.display()
    ));
    out.push('\n');

    out.push_str("[Install]\n");
    out.push_str("WantedBy=multi-user.target\n");
    out
}

/// `KEY=value`, double-quoted when systemd would otherwise split it.
fn quote_assignment(key: &str, value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || c == '"' || c == '\\' || c == '\'');
    if needs_quotes {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{}={}\"", key, escaped)
    } else {
        format!("{}={}", key, value)
    }
}
