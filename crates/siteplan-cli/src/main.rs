//! siteplan CLI - Gantt layout for construction schedules
//!
//! Reads a JSON task snapshot, computes the layout and prints it as JSON, or
//! checks the snapshot and reports the issues the layout would absorb.

mod report;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use siteplan_core::{LayoutConfig, TaskNode};
use siteplan_layout::{GanttView, ViewCommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::report::{ExitCode, Report, ReportPolicy};

#[derive(Parser)]
#[command(name = "siteplan")]
#[command(author, version, about = "Gantt layout engine for project schedules", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the Gantt layout of a task snapshot
    Layout {
        /// Task snapshot (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Layout configuration (TOML)
        #[arg(short, long, env = "SITEPLAN_CONFIG")]
        config: Option<PathBuf>,

        /// Expand every task, ignoring the records' own flags
        #[arg(long, conflicts_with = "collapse_all")]
        expand_all: bool,

        /// Collapse every task, ignoring the records' own flags
        #[arg(long)]
        collapse_all: bool,

        /// Flip a task between expanded and collapsed (repeatable)
        #[arg(long, value_name = "ID")]
        toggle: Vec<String>,

        /// Date anchoring the window when no task has dates (default: today)
        #[arg(long, value_name = "YYYY-MM-DD")]
        today: Option<NaiveDate>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report malformed links, orphans, cycles and other record issues
    Check {
        /// Task snapshot (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Show only errors
        #[arg(short, long)]
        quiet: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// A snapshot is either a bare array of tasks or an object with a `tasks` key
#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    Tasks(Vec<TaskNode>),
    Document { tasks: Vec<TaskNode> },
}

impl Snapshot {
    fn into_tasks(self) -> Vec<TaskNode> {
        match self {
            Snapshot::Tasks(tasks) | Snapshot::Document { tasks } => tasks,
        }
    }
}

fn main() -> Result<process::ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match cli.command {
        Commands::Layout {
            file,
            config,
            expand_all,
            collapse_all,
            toggle,
            today,
            output,
        } => {
            let tasks = load_snapshot(&file)?;
            let config = match config {
                Some(path) => LayoutConfig::from_path(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => LayoutConfig::default(),
            };

            let mut view = GanttView::new(config);
            view.apply(ViewCommand::Load(tasks));
            if expand_all {
                view.apply(ViewCommand::ExpandAll);
            }
            if collapse_all {
                view.apply(ViewCommand::CollapseAll);
            }
            for id in toggle {
                view.apply(ViewCommand::Toggle(id));
            }

            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let layout = view.refresh_as_of(today);
            info!(
                rows = layout.rows.len(),
                links = layout.links.len(),
                notices = layout.notices.len(),
                "layout ready"
            );
            for notice in &layout.notices {
                debug!(notice = %notice, "absorbed");
            }

            let json = serde_json::to_string_pretty(layout).context("serializing layout")?;
            write_output(output.as_deref(), &json)?;
            ExitCode::Success
        }
        Commands::Check {
            file,
            strict,
            quiet,
            format,
        } => {
            let tasks = load_snapshot(&file)?;
            let mut view = GanttView::new(LayoutConfig::default());
            view.apply(ViewCommand::Load(tasks));
            view.apply(ViewCommand::ExpandAll);
            let layout = view.refresh_as_of(chrono::Local::now().date_naive());

            let report = Report::new(&layout.notices, ReportPolicy { strict, quiet });
            match format {
                Format::Text => report
                    .write_text(io::stdout().lock())
                    .context("writing report")?,
                Format::Json => {
                    let json = serde_json::to_string_pretty(&report.to_json())
                        .context("serializing report")?;
                    println!("{json}");
                }
            }
            report.exit_code()
        }
    };

    Ok(code.into())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn load_snapshot(path: &Path) -> Result<Vec<TaskNode>> {
    let source =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&source)
        .with_context(|| format!("parsing task snapshot {}", path.display()))?;
    let tasks = snapshot.into_tasks();
    debug!(path = %path.display(), tasks = tasks.len(), "snapshot loaded");
    Ok(tasks)
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, format!("{contents}\n"))
            .with_context(|| format!("writing {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{contents}").context("writing layout")
        }
    }
}
