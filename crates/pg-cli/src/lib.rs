//! Operator commands for plaything configuration trees
//!
//! The `pg` binary wraps these so that the same reports can be produced from
//! tests without a process boundary.

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use pg_core::{AssetCheck, Core, CoreOptions, HostEnvironment, PingOutcome};
use serde_json::json;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Command-line definition
#[must_use]
pub fn build_cli() -> Command {
    let plaything = Arg::new("plaything")
        .required(true)
        .help("Plaything name (its directory under the config base)");
    let config_base = Arg::new("config-base")
        .long("config-base")
        .value_parser(clap::value_parser!(PathBuf))
        .global(true)
        .help("Configuration base path (default: /Config when hosted, ../Config otherwise)");

    Command::new("pg")
        .version(pg_core::VERSION)
        .about("Inspect plaything configuration")
        .arg_required_else_help(true)
        .arg(config_base)
        .subcommand(
            Command::new("list")
                .about("List specifications")
                .arg(plaything.clone())
                .arg(
                    Arg::new("include-disabled")
                        .long("include-disabled")
                        .action(ArgAction::SetTrue)
                        .help("Include specifications that are not enabled"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Check asset maps of every specification")
                .arg(plaything.clone())
                .arg(
                    Arg::new("required")
                        .long("required")
                        .value_delimiter(',')
                        .help("Asset keys every specification must map"),
                )
                .arg(
                    Arg::new("optional")
                        .long("optional")
                        .value_delimiter(',')
                        .help("Asset keys whose files must exist when mapped"),
                ),
        )
        .subcommand(
            Command::new("ping")
                .about("Send the keep-warm ping")
                .arg(plaything)
                .arg(
                    Arg::new("past-due")
                        .long("past-due")
                        .action(ArgAction::SetTrue)
                        .help("Report the timer as past due"),
                ),
        )
}

fn open_core(args: &ArgMatches, plaything: &str, env: HostEnvironment) -> anyhow::Result<Core> {
    let mut options = CoreOptions::new().with_environment(env);
    if let Some(base) = args.get_one::<PathBuf>("config-base") {
        options = options.with_config_base(base);
    }
    Core::with_options(plaything, options).with_context(|| format!("cannot initialise plaything {plaything}"))
}

/// Specification listing, one line each or as a JSON array
#[must_use]
pub fn list_report(core: &Core, include_disabled: bool, as_json: bool) -> String {
    let specs = core.get_specifications(include_disabled, &AssetCheck::default(), &[]);
    if as_json {
        let rows: Vec<_> = specs
            .iter()
            .map(|s| {
                json!({
                    "id": s.specification_id(),
                    "enabled": s.enabled(),
                    "title": s.title(),
                    "lang": s.lang(),
                })
            })
            .collect();
        return serde_json::Value::Array(rows).to_string();
    }

    let mut out = String::new();
    for s in &specs {
        let mark = if s.enabled() { "+" } else { "-" };
        let _ = writeln!(out, "{mark} {:<24} {}", s.specification_id(), s.title());
    }
    out
}

/// Asset problems for every specification (disabled ones included)
#[must_use]
pub fn check_report(core: &Core, required: &[String], optional: &[&str]) -> (String, usize) {
    let mut out = String::new();
    let mut total = 0;
    for id in core.specification_ids() {
        let Ok(mut spec) = core.get_specification(id, false) else {
            continue;
        };
        let required: Vec<&str> = required.iter().map(String::as_str).collect();
        let problems = spec.check_assets(&required, optional, false);
        if problems.is_empty() {
            let _ = writeln!(out, "{id}: ok");
            continue;
        }
        total += problems.len();
        for (key, problem) in &problems {
            let _ = writeln!(out, "{id}: {key} - {problem}");
        }
    }
    (out, total)
}

/// Execute parsed arguments; returns the process exit code
///
/// # Errors
/// Returns error if the plaything cannot be initialised or the ping fails.
pub fn run(matches: &ArgMatches, env: HostEnvironment) -> anyhow::Result<i32> {
    match matches.subcommand() {
        Some(("list", args)) => {
            let plaything = plaything_arg(args)?;
            let core = open_core(args, plaything, env)?;
            print!("{}", list_report(&core, args.get_flag("include-disabled"), args.get_flag("json")));
            Ok(0)
        }
        Some(("check", args)) => {
            let plaything = plaything_arg(args)?;
            let core = open_core(args, plaything, env)?;
            let required: Vec<String> = args
                .get_many::<String>("required")
                .map(|v| v.cloned().collect())
                .unwrap_or_default();
            let optional: Vec<&str> = args
                .get_many::<String>("optional")
                .map(|v| v.map(String::as_str).collect())
                .unwrap_or_default();
            let (report, problems) = check_report(&core, &required, &optional);
            print!("{report}");
            if problems > 0 {
                tracing::warn!("Asset check for {} found {} problem(s).", plaything, problems);
            } else {
                tracing::info!("Asset check for {} passed.", plaything);
            }
            Ok(i32::from(problems > 0))
        }
        Some(("ping", args)) => {
            let plaything = plaything_arg(args)?;
            let core = open_core(args, plaything, env)?;
            match pg_core::ping(&core, args.get_flag("past-due"))? {
                PingOutcome::Disabled => println!("keep_warm is off for {plaything}"),
                PingOutcome::Answered { url, status, .. } => {
                    tracing::info!("Ping {} answered with HTTP {}", url, status);
                    println!("{url} => HTTP {status}");
                }
            }
            Ok(0)
        }
        _ => Ok(2),
    }
}

fn plaything_arg(args: &ArgMatches) -> anyhow::Result<&str> {
    args.get_one::<String>("plaything")
        .map(String::as_str)
        .context("plaything name is required")
}
