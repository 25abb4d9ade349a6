//! Visit agenda CLI application
//!
//! Command-line interface for planning, recording and submitting a day of
//! client visits.

mod args;
mod cli;
mod renderer;

use agenda_core::{catalog_for_language, AgendaBuilder};
use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        language,
        command,
    } = Args::parse();

    let agenda = AgendaBuilder::new()
        .with_database_path(database_file)
        .build()
        .context("Failed to open the agenda")?;

    let mut cli = Cli::new(
        agenda,
        TerminalRenderer::new(!no_color),
        catalog_for_language(&language),
    );

    info!("Visit agenda started");

    match command {
        Some(Plan { command }) => cli.handle_plan_command(command),
        Some(Visit { command }) => cli.handle_visit_command(command).await,
        Some(Submit(args)) => cli.submit(args).await,
        Some(Recent(args)) => cli.recent(args).await,
        None => {
            cli.show_plan();
            Ok(())
        }
    }
}
