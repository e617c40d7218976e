//! NixOS module generator: the declarative route to the same end state.
//!
//! Options: `enable`, `package`, `user`, `group`, `extraEnvironment` (plus
//! `environmentFile` for the token). The module provisions the account and
//! group and a `systemd.services.<name>` entry; NixOS reconciles it.

use crate::constants;
use crate::models::system_state::SystemState;
use std::collections::BTreeMap;

pub fn render_module(state: &SystemState, default_log: &str) -> String {
    let name = &state.service;
    let mut env: BTreeMap<String, String> = state.environment.clone();
    env.insert(constants::LOG_KEY.to_string(), default_log.to_string());

    let mut out = String::new();
    out.push_str("{ config, lib, pkgs, ... }:\n\n");
    out.push_str("let\n");
    out.push_str(&format!("  cfg = config.services.{};\n", name));
    out.push_str("in\n{\n");

    out.push_str(&format!("  options.services.{} = {{\n", name));
    out.push_str(&format!(
        "    enable = lib.mkEnableOption {};\n\n",
        nix_string(&state.description)
    ));
    out.push_str("    package = lib.mkOption {\n");
    out.push_str("      type = lib.types.package;\n");
    out.push_str(&format!(
        "      description = {};\n",
        nix_string(&format!("Package providing bin/{}.", name))
    ));
    out.push_str("    };\n\n");
    out.push_str("    user = lib.mkOption {\n");
    out.push_str("      type = lib.types.str;\n");
    out.push_str(&format!("      default = {};\n", nix_string(&state.user)));
    out.push_str("      description = \"Account the service runs as.\";\n");
    out.push_str("    };\n\n");
    out.push_str("    group = lib.mkOption {\n");
    out.push_str("      type = lib.types.str;\n");
    out.push_str(&format!("      default = {};\n", nix_string(&state.group)));
    out.push_str("      description = \"Primary group of the service account.\";\n");
    out.push_str("    };\n\n");
    out.push_str("    environmentFile = lib.mkOption {\n");
    out.push_str("      type = lib.types.path;\n");
    out.push_str(&format!(
        "      default = {};\n",
        nix_string(&state.env_file.display().to_string())
    ));
    out.push_str(&format!(
        "      description = \"File providing {}=...; kept out of the Nix store.\";\n",
        constants::TOKEN_KEY
    ));
    out.push_str("    };\n\n");
    out.push_str("    extraEnvironment = lib.mkOption {\n");
    out.push_str("      type = lib.types.attrsOf lib.types.str;\n");
    out.push_str("      default = { };\n");
    out.push_str("      description = \"Additional environment variables for the service.\";\n");
    out.push_str("    };\n");
    out.push_str("  };\n\n");

    out.push_str("  config = lib.mkIf cfg.enable {\n");
    out.push_str("    users.users.${cfg.user} = {\n");
    out.push_str("      isSystemUser = true;\n");
    out.push_str("      group = cfg.group;\n");
    out.push_str(&format!(
        "      home = {};\n",
        nix_string(&state.home.display().to_string())
    ));
    out.push_str("      createHome = true;\n");
    out.push_str("    };\n");
    out.push_str("    users.groups.${cfg.group} = { };\n\n");

    out.push_str(&format!("    systemd.services.{} = {{\n", name));
    out.push_str(&format!(
        "      description = {};\n",
        nix_string(&state.description)
    ));
    out.push_str("      after = [ \"network-online.target\" ];\n");
    out.push_str("      wants = [ \"network-online.target\" ];\n");
    out.push_str("      wantedBy = [ \"multi-user.target\" ];\n");
    out.push_str("      environment = {\n");
    for (key, value) in &env {
        out.push_str(&format!("        {} = {};\n", key, nix_string(value)));
    }
    out.push_str("      } // cfg.extraEnvironment;\n");
    out.push_str("      serviceConfig = {\n");
    out.push_str(&format!(
        "        ExecStart = \"${{cfg.package}}/bin/{}\";\n",
        name
    ));
    out.push_str("        User = cfg.user;\n");
    out.push_str("        Group = cfg.group;\n");
    out.push_str("        EnvironmentFile = cfg.environmentFile;\n");
    out.push_str(&format!("        StateDirectory = {};\n", nix_string(name)));
    out.push_str(&format!("        LogsDirectory = {};\n", nix_string(name)));
    out.push_str(&format!(
        "        WorkingDirectory = {};\n",
        nix_string(&state.data_dir.display().to_string())
    ));
    out.push_str("        Restart = \"on-failure\";\n");
    out.push_str("        RestartSec = 10;\n");
    out.push_str("        NoNewPrivileges = true;\n");
    out.push_str("        ProtectSystem = \"strict\";\n");
    out.push_str("        ProtectHome = true;\n");
    out.push_str("        PrivateTmp = true;\n");
    out.push_str("      };\n");
    out.push_str("    };\n");
    out.push_str("  };\n");
    out.push_str("}\n");
    out
}

/// Double-quoted Nix string literal.
fn nix_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("${", "\\${");
    format!("\"{}\"", escaped)
}
