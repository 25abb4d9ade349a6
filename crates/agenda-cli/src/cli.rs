//! Command definitions and handlers.
//!
//! Arguments are declared with clap's derive API and converted into core
//! calls by [`Cli`]. Visits are addressed by their 1-based sequence number as
//! shown in `agenda plan show`.

use std::{path::PathBuf, sync::Arc, time::Duration};

use agenda_core::{
    Agenda, AgendaList, AttachmentKind, AuthorizationStatus, ClientCatalog, Coordinate,
    FixedLocationProvider, GatewayConfig, MessageCatalog, RecentVisits, SubmissionCoordinator,
    VisitSession, VisitTag,
};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand};
use jiff::{civil::Date, Zoned};
use log::debug;
use uuid::Uuid;

use crate::renderer::TerminalRenderer;

/// Generate a new plan, replacing the current one
///
/// Visits are planned one hour apart starting at 09:00, in the order the
/// client ids are given. Anything recorded on the previous plan is lost.
#[derive(Args)]
pub struct GeneratePlanArgs {
    /// JSON file with the client catalog. Defaults to a built-in sample
    #[arg(long)]
    pub clients: Option<PathBuf>,
    /// Client ids to visit, comma-separated, in visiting order
    #[arg(long, value_delimiter = ',', required = true)]
    pub ids: Vec<i64>,
    /// Day of the visits (YYYY-MM-DD). Defaults to today
    #[arg(long)]
    pub date: Option<Date>,
}

/// Move visits to another position
///
/// The moved visits keep their relative order and are placed before the
/// visit currently at `--to`. Use one past the last sequence to move them to
/// the end.
#[derive(Args)]
pub struct MoveVisitsArgs {
    /// Sequences of the visits to move, comma-separated
    #[arg(long, value_delimiter = ',', required = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub from: Vec<u32>,
    /// Sequence to move the visits in front of
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub to: u32,
}

/// Remove visits from the plan
#[derive(Args)]
pub struct DeleteVisitsArgs {
    /// Sequences of the visits to remove
    #[arg(required = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub sequences: Vec<u32>,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Generate a new plan, replacing the current one
    #[command(alias = "g")]
    Generate(GeneratePlanArgs),
    /// Show the current plan
    #[command(aliases = ["s", "ls"])]
    Show,
    /// Move visits to another position
    #[command(alias = "mv")]
    Move(MoveVisitsArgs),
    /// Remove visits from the plan
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteVisitsArgs),
}

/// Mark a visit as completed
///
/// The position is recorded when `--latitude` and `--longitude` are given.
/// `--deny` completes it as if location permission had been refused.
#[derive(Args)]
pub struct CompleteVisitArgs {
    /// Sequence of the visit
    pub sequence: u32,
    #[arg(long, requires = "longitude", allow_negative_numbers = true)]
    pub latitude: Option<f64>,
    #[arg(long, requires = "latitude", allow_negative_numbers = true)]
    pub longitude: Option<f64>,
    /// Complete without location, as when permission is refused
    #[arg(long, conflicts_with_all = ["latitude", "longitude"])]
    pub deny: bool,
    /// Give up waiting for a position after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl CompleteVisitArgs {
    fn location_provider(&self) -> FixedLocationProvider {
        match (self.latitude, self.longitude) {
            _ if self.deny => FixedLocationProvider::denied(),
            (Some(latitude), Some(longitude)) => {
                FixedLocationProvider::authorized(Coordinate::new(latitude, longitude))
            }
            _ => FixedLocationProvider::new(AuthorizationStatus::AuthorizedWhenInUse, None),
        }
    }
}

#[derive(Subcommand)]
pub enum VisitCommands {
    /// Show everything recorded on a visit
    #[command(alias = "s")]
    Show {
        sequence: u32,
    },
    /// Select or unselect a tag (installation, training, support, sales, other)
    #[command(alias = "t")]
    Tag {
        sequence: u32,
        tag: VisitTag,
    },
    /// Attach a photo or video placeholder
    #[command(alias = "a")]
    Attach {
        sequence: u32,
        kind: AttachmentKind,
    },
    /// Remove an attachment
    Detach {
        sequence: u32,
        attachment_id: Uuid,
    },
    /// Replace the visit's notes
    #[command(alias = "n")]
    Notes {
        sequence: u32,
        text: String,
    },
    /// Mark the visit as completed
    #[command(alias = "c")]
    Complete(CompleteVisitArgs),
}

/// Connection to the visit service
#[derive(Args)]
pub struct GatewayArgs {
    /// Visit collection endpoint, e.g. https://host/visits
    #[arg(long)]
    pub base_url: String,
    /// Bearer token for the visit service
    #[arg(long)]
    pub token: Option<String>,
    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl GatewayArgs {
    fn config(&self, commercial_id: i64) -> GatewayConfig {
        let mut config = GatewayConfig::new(self.base_url.clone(), commercial_id);
        if let Some(token) = &self.token {
            config = config.with_auth_token(token.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

/// Submit every planned visit to the visit service
#[derive(Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub gateway: GatewayArgs,
    /// Identifier of the commercial submitting the visits
    #[arg(long)]
    pub commercial_id: i64,
}

/// List visits recently recorded by the visit service
#[derive(Args)]
pub struct RecentArgs {
    #[command(flatten)]
    pub gateway: GatewayArgs,
    /// Maximum number of visits to list
    #[arg(long, default_value_t = 10)]
    pub limit: u32,
}

/// Runs commands against an open agenda.
pub struct Cli {
    agenda: Agenda,
    renderer: TerminalRenderer,
    messages: Arc<dyn MessageCatalog>,
}

impl Cli {
    pub fn new(
        agenda: Agenda,
        renderer: TerminalRenderer,
        messages: Arc<dyn MessageCatalog>,
    ) -> Self {
        Self {
            agenda,
            renderer,
            messages,
        }
    }

    pub fn show_plan(&self) {
        self.renderer
            .render(&AgendaList(self.agenda.visits()).to_string());
    }

    pub fn handle_plan_command(&mut self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Generate(args) => self.generate_plan(args)?,
            PlanCommands::Show => {}
            PlanCommands::Move(args) => {
                let from: Vec<usize> = args.from.iter().map(|&s| offset(s)).collect();
                self.agenda
                    .move_visits(&from, offset(args.to))
                    .context("Failed to move visits")?;
            }
            PlanCommands::Delete(args) => {
                let offsets: Vec<usize> = args.sequences.iter().map(|&s| offset(s)).collect();
                self.agenda
                    .delete_visits(&offsets)
                    .context("Failed to delete visits")?;
            }
        }
        self.show_plan();
        Ok(())
    }

    fn generate_plan(&mut self, args: GeneratePlanArgs) -> Result<()> {
        let catalog = match &args.clients {
            Some(path) => ClientCatalog::from_json_file(path)
                .with_context(|| format!("Failed to load clients from {}", path.display()))?,
            None => ClientCatalog::sample(),
        };
        let clients = catalog.select(&args.ids)?;
        let date = args.date.unwrap_or_else(|| Zoned::now().date());
        debug!("Generating plan for {date} with {} clients", clients.len());

        self.agenda
            .replace_plan(&clients, date)
            .map_err(|e| anyhow!("{}", self.messages.describe(&e)))
            .context("Failed to generate plan")?;
        Ok(())
    }

    pub async fn handle_visit_command(&mut self, command: VisitCommands) -> Result<()> {
        match command {
            VisitCommands::Show { sequence } => {
                let session = self.open(sequence)?;
                self.renderer.render(&session.visit().to_string());
            }
            VisitCommands::Tag { sequence, tag } => {
                let mut session = self.open(sequence)?;
                let selected = session.toggle_tag(tag);
                self.agenda.commit_session(session)?;
                let verb = if selected { "selected" } else { "unselected" };
                self.renderer
                    .notice(format!("Tag **{}** {verb} on visit {sequence}", tag.label()));
            }
            VisitCommands::Attach { sequence, kind } => {
                let mut session = self.open(sequence)?;
                let attachment = session.add_attachment(kind);
                let message = format!(
                    "Attached `{}` to visit {sequence} as `{}`",
                    attachment.file_name, attachment.id
                );
                self.agenda.commit_session(session)?;
                self.renderer.notice(message);
            }
            VisitCommands::Detach {
                sequence,
                attachment_id,
            } => {
                let mut session = self.open(sequence)?;
                let Some(file_name) = session
                    .visit()
                    .attachment(attachment_id)
                    .map(|a| a.file_name.clone())
                else {
                    bail!("Visit {sequence} has no attachment {attachment_id}");
                };
                session.remove_attachment(attachment_id);
                self.agenda.commit_session(session)?;
                self.renderer.notice(format!(
                    "Removed `{file_name}` from visit {sequence}"
                ));
            }
            VisitCommands::Notes { sequence, text } => {
                let mut session = self.open(sequence)?;
                session.set_notes(text);
                self.agenda.commit_session(session)?;
                self.renderer
                    .notice(format!("Notes saved on visit {sequence}"));
            }
            VisitCommands::Complete(args) => self.complete_visit(args).await?,
        }
        Ok(())
    }

    async fn complete_visit(&mut self, args: CompleteVisitArgs) -> Result<()> {
        let mut session = self.open(args.sequence)?;
        if let Some(secs) = args.timeout_secs {
            session = session.with_capture_timeout(Duration::from_secs(secs));
        }

        let provider = args.location_provider();
        let outcome = session.mark_completed(&provider).await;
        let show_error = session.show_location_error();
        self.agenda.commit_session(session)?;

        self.renderer.notice(&outcome);
        if show_error {
            self.renderer
                .notice(format!("*{}*", self.messages.location_not_recorded()));
        }
        Ok(())
    }

    pub async fn submit(&mut self, args: SubmitArgs) -> Result<()> {
        let config = args.gateway.config(args.commercial_id);
        let mut coordinator = SubmissionCoordinator::from_config(&config)
            .map_err(|e| anyhow!("{}", self.messages.describe(&e)))?
            .with_messages(self.messages.clone());

        let report = coordinator
            .submit_agenda(self.agenda.visits())
            .await
            .map_err(|e| anyhow!("{}", self.messages.describe(&e)))?;
        self.renderer.render(&report.to_string());

        match coordinator.error_message() {
            Some(message) => Err(anyhow!("Submission failed: {message}")),
            None => Ok(()),
        }
    }

    pub async fn recent(&mut self, args: RecentArgs) -> Result<()> {
        let config = args.gateway.config(0);
        let mut coordinator = SubmissionCoordinator::from_config(&config)
            .map_err(|e| anyhow!("{}", self.messages.describe(&e)))?
            .with_messages(self.messages.clone());

        let visits = coordinator
            .refresh_recent_visits(args.limit)
            .await
            .context("Failed to fetch recent visits")?;
        self.renderer.render(&RecentVisits(&visits).to_string());
        Ok(())
    }

    fn open(&self, sequence: u32) -> Result<VisitSession> {
        let visit = self
            .agenda
            .get_by_sequence(sequence)
            .ok_or_else(|| anyhow!("No visit with sequence {sequence}"))?;
        Ok(self.agenda.open_session(visit.id)?)
    }
}

/// Zero-based position of a 1-based sequence number.
fn offset(sequence: u32) -> usize {
    sequence.saturating_sub(1) as usize
}
