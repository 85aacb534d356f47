//! `docgen` command-line driver
//!
//! Every command works on JSON files: `init` writes a session snapshot, the
//! other commands read one and, when they change it, write it back in place.
//! Results go to stdout (or `--out`), diagnostics and logs to stderr.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use docgen_core::{DocgenConfig, InMemorySessionStore, SessionService, SessionSnapshot};
use docgen_paper::{Diagnostic, PaperContent};
use docgen_trace::CodeMapping;
use docgen_verify::TestResult;
use docgen_workflow::StatusUpdate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Service = SessionService<InMemorySessionStore>;

fn file_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

fn snapshot_arg() -> Arg {
    file_arg("snapshot", "Session snapshot JSON file")
}

fn cli() -> Command {
    Command::new("docgen")
        .version(docgen_core::VERSION)
        .about("Paper-to-code bridge: concept graphs, specifications, traceability and planning")
        .subcommand_required(true)
        .arg(
            Arg::new("out")
                .long("out")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Write the result to a file instead of stdout"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("init")
                .about("Build a session snapshot from a paper")
                .arg(file_arg("paper", "Paper content JSON file"))
                .arg(
                    Arg::new("session-id")
                        .long("session-id")
                        .help("Session id (random UUID if omitted)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file"),
                ),
        )
        .subcommand(
            Command::new("map")
                .about("Upsert code mappings into the traceability matrix")
                .arg(snapshot_arg())
                .arg(file_arg("mappings", "Code mappings JSON array")),
        )
        .subcommand(
            Command::new("progress")
                .about("Apply component status updates")
                .arg(snapshot_arg())
                .arg(file_arg("updates", "Status updates JSON array")),
        )
        .subcommand(
            Command::new("verify")
                .about("Report test results against the specifications")
                .arg(snapshot_arg())
                .arg(file_arg("results", "Test results JSON array"))
                .arg(
                    Arg::new("text")
                        .long("text")
                        .action(ArgAction::SetTrue)
                        .help("Print a plain-text report instead of JSON"),
                ),
        )
        .subcommand(
            Command::new("visualize")
                .about("Emit the traceability graph document")
                .arg(snapshot_arg()),
        )
        .subcommand(
            Command::new("status")
                .about("Summarize session progress and coverage")
                .arg(snapshot_arg()),
        )
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn path<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a Path> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .with_context(|| format!("missing --{name}"))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("decoding {}", path.display()))
}

fn emit(text: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, text).with_context(|| format!("writing {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn emit_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    emit(&serde_json::to_string_pretty(value)?, out)
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}

/// Load the snapshot file, run `op`, and write the snapshot back when `persist` is set
fn with_session(
    args: &ArgMatches,
    persist: bool,
    op: impl FnOnce(&Service, &str) -> Result<ExitCode>,
) -> Result<ExitCode> {
    let snapshot_path = path(args, "snapshot")?;
    let text = std::fs::read_to_string(snapshot_path)
        .with_context(|| format!("reading {}", snapshot_path.display()))?;
    let snapshot = SessionSnapshot::from_json(&text)?;
    let session_id = snapshot.session_id.clone();
    let service = SessionService::new(InMemorySessionStore::with_snapshot(snapshot), DocgenConfig::default());

    let code = op(&service, &session_id)?;
    if persist {
        let updated = service.load(&session_id)?;
        std::fs::write(snapshot_path, updated.to_json()?)
            .with_context(|| format!("writing {}", snapshot_path.display()))?;
    }
    Ok(code)
}

fn run_init(args: &ArgMatches, out: Option<&Path>) -> Result<ExitCode> {
    let paper = PaperContent::from_json(
        &std::fs::read_to_string(path(args, "paper")?).context("reading paper")?,
    )?;
    let config = match args.get_one::<PathBuf>("config") {
        Some(config_path) => DocgenConfig::load(config_path)?,
        None => DocgenConfig::default(),
    };
    let session_id = args
        .get_one::<String>("session-id")
        .cloned()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let service = SessionService::new(InMemorySessionStore::new(), config);
    let outcome = service.initialize(&session_id, paper)?;
    print_diagnostics(&outcome.diagnostics);
    emit(&outcome.value.to_json()?, out)?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let matches = cli().get_matches();
    // Global args are propagated down to the subcommand's matches
    let sub = matches.subcommand().map(|(_, args)| args).unwrap_or(&matches);
    init_tracing(sub.get_flag("log-json"));
    let out = sub.get_one::<PathBuf>("out").cloned();
    let out = out.as_deref();

    match matches.subcommand() {
        Some(("init", args)) => run_init(args, out),
        Some(("map", args)) => {
            let mappings: Vec<CodeMapping> = read_json(path(args, "mappings")?)?;
            with_session(args, true, |service, id| {
                let outcome = service.map_code(id, &mappings)?;
                print_diagnostics(&outcome.diagnostics);
                emit_json(&outcome.value, out)?;
                Ok(ExitCode::SUCCESS)
            })
        }
        Some(("progress", args)) => {
            let updates: Vec<StatusUpdate> = read_json(path(args, "updates")?)?;
            with_session(args, true, |service, id| {
                let outcome = service.update_progress(id, &updates)?;
                print_diagnostics(&outcome.diagnostics);
                emit_json(&outcome.value, out)?;
                Ok(ExitCode::SUCCESS)
            })
        }
        Some(("verify", args)) => {
            let results: Vec<TestResult> = read_json(path(args, "results")?)?;
            let text = args.get_flag("text");
            with_session(args, true, |service, id| {
                let report = service.verify(id, &results)?;
                print_diagnostics(&report.diagnostics);
                if text {
                    emit(&report.generate_text(), out)?;
                } else {
                    emit_json(&report, out)?;
                }
                Ok(if report.all_passed() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                })
            })
        }
        Some(("visualize", args)) => with_session(args, false, |service, id| {
            emit_json(&service.visualize(id)?, out)?;
            Ok(ExitCode::SUCCESS)
        }),
        Some(("status", args)) => with_session(args, false, |service, id| {
            emit_json(&service.status(id)?, out)?;
            Ok(ExitCode::SUCCESS)
        }),
        _ => {
            cli().print_help()?;
            Ok(ExitCode::FAILURE)
        }
    }
}
