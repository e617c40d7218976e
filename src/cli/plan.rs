//! Dry-run preview of an install run.

use crate::cli::CliContext;
use crate::core::action::{Action, SystemctlVerb};
use crate::core::host::{Host, SystemHost};
use crate::core::paths::InstallPaths;
use crate::core::pipeline::Step;
use crate::core::preflight::{self, CheckResult};
use crate::core::{account, filesystem, secret_store, unit};
use crate::models::system_state::SystemState;
use anyhow::{bail, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, Table};
use serde::Serialize;
use std::path::PathBuf;

/// Stand-in for the 0600 tempfile the real run stages the secret in.
const STAGED_PLACEHOLDER: &str = "<staged environment file>";

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Output format (text|json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Serialize)]
pub struct PlannedAction {
    pub step: Step,
    pub command: String,
    #[serde(flatten)]
    pub action: Action,
    /// Only run when the operator confirms at the end of the install.
    pub optional: bool,
}

#[derive(Debug, Serialize)]
pub struct InstallPlan {
    pub service: String,
    pub checks: Vec<CheckResult>,
    pub actions: Vec<PlannedAction>,
}

impl InstallPlan {
    pub fn ready(&self) -> bool {
        self.checks.iter().all(|c| c.ok)
    }
}

pub fn run(ctx: &CliContext, args: PlanArgs) -> Result<()> {
    if args.format != "text" && args.format != "json" {
        bail!("unsupported format '{}': use text or json", args.format);
    }

    let host = SystemHost;
    let plan = build(&host, &ctx.state, &ctx.paths)?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("Plan: install {} from {}", plan.service, ctx.paths.root.display());
    for check in &plan.checks {
        let tag = if check.ok { "PASS" } else { "FAIL" };
        println!("  [{}] {}: {}", tag, check.name, check.detail);
    }
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Step").add_attribute(Attribute::Bold),
        Cell::new("Action").add_attribute(Attribute::Bold),
        Cell::new("Command").add_attribute(Attribute::Bold),
    ]);
    for entry in &plan.actions {
        let action = if entry.optional {
            Cell::new(format!("{} (if confirmed)", entry.action.describe())).fg(Color::Yellow)
        } else {
            Cell::new(entry.action.describe())
        };
        table.add_row(vec![
            Cell::new(entry.step.as_str()),
            action,
            Cell::new(&entry.command),
        ]);
    }
    println!("{table}");

    if !plan.ready() {
        println!("\nPreflight would fail; the install stops before any of the above.");
    }
    println!("\nNo changes made (dry-run).");
    Ok(())
}

/// Only read-only checks; nothing on the host is changed.
pub fn build<H: Host + ?Sized>(
    host: &H,
    state: &SystemState,
    paths: &InstallPaths,
) -> Result<InstallPlan> {
    let checks = preflight::checks(host, paths);

    let mut actions = Vec::new();
    let mut push = |step: Step, list: Vec<Action>, optional: bool| {
        for action in list {
            actions.push(PlannedAction {
                step,
                command: action.command().to_string(),
                action,
                optional,
            });
        }
    };

    let account_obs = account::observe(host, state)?;
    push(
        Step::ProvisionAccount,
        account::plan(state, account_obs),
        false,
    );

    let fs_obs = filesystem::observe(host, &paths.legacy_state);
    push(
        Step::ProvisionFilesystem,
        filesystem::plan(state, &paths.legacy_state, fs_obs),
        false,
    );

    push(
        Step::WriteSecretStore,
        secret_store::plan(state, &PathBuf::from(STAGED_PLACEHOLDER)),
        false,
    );

    push(Step::InstallUnit, unit::plan(state, paths), false);

    push(
        Step::Activate,
        vec![Action::Systemctl {
            verb: SystemctlVerb::Start,
            unit: Some(state.unit_name.clone()),
        }],
        true,
    );

    Ok(InstallPlan {
        service: state.service.clone(),
        checks,
        actions,
    })
}
