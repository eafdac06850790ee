//! Command-line entry point for the memorial core.
//!
//! # Responsibility
//! - Resolve configuration (database path, log settings, today's date).
//! - Dispatch subcommands to `MemorialService` and print results.

mod config;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use log::error;
use memorial_core::db::open_db;
use memorial_core::{
    default_log_level, init_logging, AnniversarySort, AnniversaryView, FamilyView,
    MemorialRecord, MemorialService, RelationLabel, SqliteFamilyEdgeRepository,
    SqliteMemorialRepository,
};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "memorial", version, about = "Memorial anniversaries and family links")]
struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, env = config::DB_PATH_ENV)]
    db: Option<String>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core health and version.
    Ping,
    /// Create a memorial and print its id.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        death_date: Option<String>,
        #[arg(long)]
        birth_date: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
        /// Reuse an existing backend id instead of generating one.
        #[arg(long)]
        id: Option<String>,
    },
    /// Record that TARGET is RELATION of SOURCE.
    Link {
        #[arg(long)]
        source: String,
        #[arg(long)]
        target: String,
        /// parent|child|spouse|sibling|other (Korean labels accepted).
        #[arg(long)]
        relation: RelationLabel,
    },
    /// List anniversaries.
    Anniversaries {
        #[arg(long, default_value = "closest")]
        sort: AnniversarySort,
        /// Only anniversaries within this many days (always closest-first).
        #[arg(long)]
        within: Option<u32>,
        /// Override today's date (YYYY-MM-DD).
        #[arg(long)]
        today: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show the family of one memorial.
    Family {
        #[arg(long)]
        id: String,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("memorial: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("memorial: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Command::Ping = cli.command {
        println!("memorial_core ping={}", memorial_core::ping());
        println!("memorial_core version={}", memorial_core::core_version());
        return Ok(());
    }

    let db_path = config::resolve_db_path(cli.db.as_deref());
    let conn = open_db(&db_path).map_err(|err| format!("database open failed: {err}"))?;
    let service = MemorialService::new(
        SqliteMemorialRepository::new(&conn),
        SqliteFamilyEdgeRepository::new(&conn),
    );

    match cli.command {
        Command::Ping => Ok(()),
        Command::Add {
            name,
            death_date,
            birth_date,
            image_url,
            id,
        } => {
            let mut record = match id {
                Some(id) => MemorialRecord::with_id(id, name),
                None => MemorialRecord::new(name),
            };
            record.death_date = death_date;
            record.birth_date = birth_date;
            record.image_url = image_url;
            let id = service
                .create_memorial(&record)
                .map_err(|err| err.to_string())?;
            println!("{id}");
            Ok(())
        }
        Command::Link {
            source,
            target,
            relation,
        } => {
            let created = service
                .link_family(&source, &target, relation)
                .map_err(|err| err.to_string())?;
            println!(
                "{} {source} -> {target} ({})",
                if created { "linked" } else { "unchanged" },
                relation.as_str()
            );
            Ok(())
        }
        Command::Anniversaries {
            sort,
            within,
            today,
            json,
        } => {
            let today = config::resolve_today(today.as_deref())?;
            let views = match within {
                Some(days) => service.anniversaries_within(today, days),
                None => service.upcoming_anniversaries(today, sort),
            }
            .map_err(|err| err.to_string())?;
            if json {
                print_json(&views)
            } else {
                views.iter().for_each(print_anniversary);
                Ok(())
            }
        }
        Command::Family { id, json } => {
            let view = service.family_of(&id).map_err(|err| err.to_string())?;
            if json {
                print_json(&view)
            } else {
                print_family(&view);
                Ok(())
            }
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|err| err.to_string())?;
    println!("{text}");
    Ok(())
}

fn print_anniversary(view: &AnniversaryView) {
    let countdown = match view.days_until {
        0 => "today".to_string(),
        days => format!("D-{days}"),
    };
    println!(
        "{}  {:>6}  #{:<3} {} [{}] ({})",
        view.next_anniversary,
        countdown,
        view.anniversary_ordinal,
        view.record.deceased_name,
        lifespan(&view.record),
        view.record.id
    );
}

fn print_family(view: &FamilyView) {
    if view.is_empty() {
        println!("no family links");
        return;
    }
    for (role, entries) in view.groups() {
        println!("{}:", role.as_str());
        for entry in entries {
            println!(
                "  {} [{}] ({})",
                entry.record.deceased_name,
                lifespan(&entry.record),
                entry.record.id
            );
        }
    }
}

/// `1941-2019`, with `?` for a missing or unreadable year.
fn lifespan(record: &MemorialRecord) -> String {
    let year = |date: Option<chrono::NaiveDate>| {
        date.map_or_else(|| "?".to_string(), |date| date.year().to_string())
    };
    format!(
        "{}-{}",
        year(record.parsed_birth_date()),
        year(record.parsed_death_date())
    )
}
