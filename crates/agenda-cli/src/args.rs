use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{PlanCommands, RecentArgs, SubmitArgs, VisitCommands};

/// Plan, record and submit a day of client visits
///
/// The agenda is the ordered list of visits for one day. Generate it from a
/// selection of clients, reorder or trim it, record each visit as it
/// happens, then submit the whole day to the visit service.
#[derive(Parser)]
#[command(version, about, name = "agenda")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/visit-agenda/agenda.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Language of status messages, e.g. `en` or `es-CL`
    #[arg(long, global = true, default_value = "en")]
    pub language: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
///
/// Without a command the current agenda is shown.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage the day's plan
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Record what happened at a visit
    #[command(alias = "v")]
    Visit {
        #[command(subcommand)]
        command: VisitCommands,
    },
    /// Submit every planned visit to the visit service
    Submit(SubmitArgs),
    /// List visits recently recorded by the visit service
    Recent(RecentArgs),
}
