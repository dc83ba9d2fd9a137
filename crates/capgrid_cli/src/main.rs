//! Command-line front end for the capability grid.
//!
//! # Responsibility
//! - Turn one invocation into one grid event against the persisted store.
//! - Keep output deterministic for scripting.

mod render;

use anyhow::{anyhow, Context, Result};
use capgrid_core::db::open_db;
use capgrid_core::model::id::is_color_token;
use capgrid_core::{
    default_log_level, init_logging, GridCollection, GridConfig, GridService,
    HttpSummaryGenerator, ImportPolicy, SnapshotStore, SqliteSnapshotStore, SummaryJob,
    FALLBACK_SUMMARY,
};
use clap::{Parser, Subcommand};
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const SUMMARY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Command-line arguments for capgrid.
#[derive(Parser, Debug)]
#[command(name = "capgrid")]
#[command(about = "Maintain a capability comparison matrix")]
#[command(version)]
struct Args {
    /// TOML configuration file (optional)
    #[arg(long, default_value = "capgrid.toml", env = "CAPGRID_CONFIG")]
    config: PathBuf,

    /// SQLite snapshot database, overrides the config file
    #[arg(long, env = "CAPGRID_DB")]
    db: Option<PathBuf>,

    /// Log directory, overrides the config file
    #[arg(long, env = "CAPGRID_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the matrix with totals and the current leader
    Show,
    /// Append a dimension (row)
    AddDimension { name: String },
    /// Append a subject (column)
    AddSubject { name: String },
    /// Rename a dimension by id
    RenameDimension { id: String, name: String },
    /// Change a subject's name and/or color
    UpdateSubject {
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// Color as #rrggbb
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a dimension by id
    DeleteDimension { id: String },
    /// Delete a subject by id
    DeleteSubject { id: String },
    /// Move a dimension from one position to another (0-based)
    MoveDimension { from: usize, to: usize },
    /// Move a subject from one position to another (0-based)
    MoveSubject { from: usize, to: usize },
    /// Set one score (clamped to 0..=10)
    SetScore {
        subject: String,
        dimension: String,
        value: String,
    },
    /// Set one description; an empty text clears it
    SetDescription {
        subject: String,
        dimension: String,
        text: String,
    },
    /// Write the matrix as CSV
    Export {
        /// Output file; defaults to a dated name in the export directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Read a CSV file into the matrix
    Import {
        file: PathBuf,
        /// Keep entities missing from the file instead of dropping them
        #[arg(long)]
        merge: bool,
    },
    /// Print the subject with the highest total
    Leader,
    /// Ask the configured model for a written comparison
    Summary,
    /// Discard everything and restore the built-in matrix
    Reset,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = GridConfig::load(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;
    if let Some(db) = args.db {
        config.db_path = db;
    }
    if let Some(log_dir) = args.log_dir {
        config.log_dir = Some(log_dir);
    }

    let log_dir = absolutize(&config.effective_log_dir())?;
    let level = config
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    if let Err(err) = init_logging(&level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("opening database {}", config.db_path.display()))?;
    let mut service = GridService::load(SqliteSnapshotStore::new(&conn));

    run(&mut service, &config, args.command)
}

fn run<S: SnapshotStore>(
    service: &mut GridService<S>,
    config: &GridConfig,
    command: Command,
) -> Result<()> {
    match command {
        Command::Show => print!("{}", render::matrix(service)),
        Command::AddDimension { name } => match service.add_dimension(&name) {
            Some(dimension) => println!("added dimension {}", dimension.id),
            None => println!("nothing added: name is blank"),
        },
        Command::AddSubject { name } => match service.add_subject(&name) {
            Some(subject) => println!("added subject {} ({})", subject.id, subject.color),
            None => println!("nothing added: name is blank"),
        },
        Command::RenameDimension { id, name } => {
            report(service.rename_dimension(&id, &name), "dimension renamed")
        }
        Command::UpdateSubject { id, name, color } => {
            let current = service
                .store()
                .subject(&id)
                .ok_or_else(|| anyhow!("unknown subject {id}"))?
                .clone();
            let color = match color {
                Some(color) if is_color_token(&color) => color,
                Some(color) => {
                    println!("ignoring color `{color}`: expected #rrggbb");
                    current.color.clone()
                }
                None => current.color.clone(),
            };
            let name = name.unwrap_or(current.name);
            report(
                service.update_subject_details(&id, &name, color),
                "subject updated",
            )
        }
        Command::DeleteDimension { id } => {
            report(service.delete_dimension(&id), "dimension deleted")
        }
        Command::DeleteSubject { id } => report(service.delete_subject(&id), "subject deleted"),
        Command::MoveDimension { from, to } => {
            let order = service.reorder(GridCollection::Dimensions, from, to);
            println!("{}", order.join(" "));
        }
        Command::MoveSubject { from, to } => {
            let order = service.reorder(GridCollection::Subjects, from, to);
            println!("{}", order.join(" "));
        }
        Command::SetScore {
            subject,
            dimension,
            value,
        } => {
            let changed = service.set_score_text(&subject, &dimension, &value);
            report(changed, "score set");
            if changed {
                println!("{}", service.store().get_score(&subject, &dimension));
            }
        }
        Command::SetDescription {
            subject,
            dimension,
            text,
        } => report(
            service.set_description(&subject, &dimension, &text),
            "description set",
        ),
        Command::Export { out } => {
            let path = out.unwrap_or_else(|| {
                let today = chrono::Local::now().date_naive();
                config.export_dir.join(service.export_file_name(today))
            });
            std::fs::write(&path, service.export_csv())
                .with_context(|| format!("writing {}", path.display()))?;
            println!("exported {}", path.display());
        }
        Command::Import { file, merge } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let policy = if merge {
                ImportPolicy::Merge
            } else {
                ImportPolicy::Replace
            };
            let imported = service
                .import_csv(&text, policy)
                .map_err(|err| anyhow!("import failed, matrix left unchanged: {err}"))?;
            println!(
                "imported {} dimension(s), {} subject(s); {} reused, {} new",
                imported.dimensions, imported.subjects, imported.reused, imported.minted
            );
        }
        Command::Leader => match service.leader() {
            Some(subject) => {
                let total = subject.total_score(service.store().dimensions());
                println!("{} ({total})", subject.name);
            }
            None => println!("no subjects"),
        },
        Command::Summary => {
            let text = match HttpSummaryGenerator::from_config(&config.summary) {
                Ok(generator) => {
                    let mut job = SummaryJob::spawn(Arc::new(generator), service.summary_request());
                    eprint!("generating summary");
                    let text = loop {
                        if let Some(text) = job.try_result() {
                            break text.to_string();
                        }
                        eprint!(".");
                        thread::sleep(SUMMARY_POLL_INTERVAL);
                    };
                    eprintln!();
                    text
                }
                Err(err) => {
                    warn!("event=summary_generate module=cli status=fallback error={err}");
                    FALLBACK_SUMMARY.to_string()
                }
            };
            println!("{text}");
        }
        Command::Reset => {
            service.reset();
            println!("matrix reset to defaults");
        }
    }
    Ok(())
}

fn report(changed: bool, message: &str) {
    if changed {
        println!("{message}");
    } else {
        println!("no change");
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("resolving current directory")?;
    Ok(cwd.join(path))
}
