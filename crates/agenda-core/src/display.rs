//! Display formatting for agenda output.
//!
//! Domain models implement [`std::fmt::Display`] directly; collections are
//! formatted through small newtype wrappers. All output is markdown so the
//! CLI can render it richly or print it as plain text.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

use crate::{
    lifecycle::CompletionOutcome,
    models::{Visit, VisitPayload},
    submission::{SubmissionReport, SubmissionStatus},
};

/// A `Timestamp` shown in the system time zone as `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

impl fmt::Display for Visit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_completed { "✓" } else { "○" };
        writeln!(
            f,
            "## {}. {} {} at {}",
            self.sequence,
            mark,
            self.client.name,
            self.planned_hour_text()
        )?;
        writeln!(f)?;
        writeln!(f, "- **Id**: {}", self.id)?;
        writeln!(f, "- **Client**: {} ({})", self.client.id, self.client.address)?;
        let premises = self.client.coordinate();
        writeln!(
            f,
            "- **Premises**: {:.5}, {:.5}",
            premises.latitude, premises.longitude
        )?;
        writeln!(f, "- **Date**: {}", self.scheduled_date)?;

        if !self.selected_tags.is_empty() {
            let tags: Vec<&str> = self.selected_tags.iter().map(|t| t.label()).collect();
            writeln!(f, "- **Tags**: {}", tags.join(", "))?;
        }
        if let Some(completed_at) = &self.completion_timestamp {
            writeln!(f, "- **Completed**: {}", LocalDateTime(completed_at))?;
        }
        if let Some(coordinate) = self.current_coordinate() {
            writeln!(
                f,
                "- **Location**: {:.5}, {:.5}",
                coordinate.latitude, coordinate.longitude
            )?;
        }
        if !self.notes.is_empty() {
            writeln!(f, "\n### Notes\n\n{}", self.notes)?;
        }
        if !self.attachments.is_empty() {
            writeln!(f, "\n### Attachments\n")?;
            for attachment in &self.attachments {
                writeln!(
                    f,
                    "- {} `{}` ({})",
                    attachment.kind.as_str(),
                    attachment.file_name,
                    attachment.id
                )?;
            }
        }
        Ok(())
    }
}

/// Compact one-line-per-visit listing of an agenda.
pub struct AgendaList<'a>(pub &'a [Visit]);

impl fmt::Display for AgendaList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.0.first() else {
            return writeln!(f, "No visits planned.");
        };
        let completed = self.0.iter().filter(|v| v.is_completed).count();
        writeln!(
            f,
            "# Agenda for {} ({}/{} completed)\n",
            first.scheduled_date,
            completed,
            self.0.len()
        )?;
        for visit in self.0 {
            let mark = if visit.is_completed { "✓" } else { "○" };
            writeln!(
                f,
                "{}. {} **{}** {} ({})",
                visit.sequence,
                mark,
                visit.planned_hour_text(),
                visit.client.name,
                visit.client.address
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for VisitPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clients: Vec<String> = self.client_ids.iter().map(i64::to_string).collect();
        write!(
            f,
            "visit {} by commercial {} on {} for client(s) {}",
            self.visit_id,
            self.commercial_id,
            self.date,
            clients.join(", ")
        )
    }
}

/// Listing of visits fetched from the remote service.
pub struct RecentVisits<'a>(pub &'a [VisitPayload]);

impl fmt::Display for RecentVisits<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No recent visits.");
        }
        writeln!(f, "# Recent visits\n")?;
        for payload in self.0 {
            writeln!(f, "- {payload}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SubmissionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heading = if self.is_success() {
            "All visits submitted"
        } else {
            "Submission stopped"
        };
        writeln!(
            f,
            "# {heading} ({}/{})\n",
            self.submitted_count(),
            self.items.len()
        )?;
        for item in &self.items {
            match &item.status {
                SubmissionStatus::Submitted => writeln!(
                    f,
                    "{}. ✓ submitted as visit {}",
                    item.sequence, item.payload.visit_id
                )?,
                SubmissionStatus::Failed(message) => {
                    writeln!(f, "{}. ✗ failed: {message}", item.sequence)?
                }
                SubmissionStatus::NotAttempted => {
                    writeln!(f, "{}. ○ not sent", item.sequence)?
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for CompletionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionOutcome::Located(c) => write!(
                f,
                "Visit completed at {:.5}, {:.5}",
                c.latitude, c.longitude
            ),
            CompletionOutcome::WithoutLocation(reason) => {
                write!(f, "Visit completed without location ({reason:?})")
            }
            CompletionOutcome::AlreadyCompleted => write!(f, "Visit was already completed"),
            CompletionOutcome::Cancelled => write!(f, "Completion cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::{
        lifecycle::LocationFailure,
        models::{Client, Coordinate, VisitTag},
        submission::VisitSubmission,
    };

    fn sample_visit(sequence: u32, name: &str) -> Visit {
        let day = date(2025, 1, 2);
        let planned = day
            .at(8 + sequence as i8, 0, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap();
        Visit::new(
            sequence,
            Client {
                id: i64::from(sequence),
                name: name.to_string(),
                address: "Av. Libertad 123".to_string(),
                latitude: -33.4569,
                longitude: -70.6483,
            },
            day,
            planned,
        )
    }

    #[test]
    fn test_empty_agenda_list() {
        assert_eq!(AgendaList(&[]).to_string(), "No visits planned.\n");
    }

    #[test]
    fn test_agenda_list_shows_order_and_hours() {
        let mut visits = vec![sample_visit(1, "Clinica Andes"), sample_visit(2, "Hospital Central")];
        visits[1].is_completed = true;

        let output = AgendaList(&visits).to_string();

        assert!(output.contains("# Agenda for 2025-01-02 (1/2 completed)"));
        assert!(output.contains("1. ○ **09:00** Clinica Andes"));
        assert!(output.contains("2. ✓ **10:00** Hospital Central"));
    }

    #[test]
    fn test_visit_display_includes_details() {
        let mut visit = sample_visit(1, "Clinica Andes");
        visit.selected_tags.insert(VisitTag::Sales);
        visit.notes = "Bring the catalog".to_string();

        let output = visit.to_string();

        assert!(output.starts_with("## 1. ○ Clinica Andes at 09:00"));
        assert!(output.contains("- **Tags**: Sales"));
        assert!(output.contains("- **Premises**: -33.45690, -70.64830"));
        assert!(output.contains("### Notes\n\nBring the catalog"));
        assert!(!output.contains("Location"));
    }

    #[test]
    fn test_submission_report_display() {
        let visit = sample_visit(1, "Clinica Andes");
        let payload = crate::submission::build_payload(&visit, 7);
        let report = SubmissionReport {
            items: vec![
                VisitSubmission {
                    visit_id: visit.id,
                    sequence: 1,
                    payload: payload.clone(),
                    status: SubmissionStatus::Submitted,
                },
                VisitSubmission {
                    visit_id: visit.id,
                    sequence: 2,
                    payload: payload.clone(),
                    status: SubmissionStatus::Failed("Bad gateway".to_string()),
                },
                VisitSubmission {
                    visit_id: visit.id,
                    sequence: 3,
                    payload,
                    status: SubmissionStatus::NotAttempted,
                },
            ],
        };

        let output = report.to_string();

        assert!(output.contains("# Submission stopped (1/3)"));
        assert!(output.contains("2. ✗ failed: Bad gateway"));
        assert!(output.contains("3. ○ not sent"));
    }

    #[test]
    fn test_outcome_display() {
        let located = CompletionOutcome::Located(Coordinate::new(1.0, 2.0));
        assert_eq!(located.to_string(), "Visit completed at 1.00000, 2.00000");
        let denied = CompletionOutcome::WithoutLocation(LocationFailure::Denied);
        assert_eq!(denied.to_string(), "Visit completed without location (Denied)");
    }

    #[test]
    fn test_recent_visits_display() {
        let payloads = vec![VisitPayload {
            visit_id: 1000,
            commercial_id: 7,
            date: "2025-01-02T09:00:00Z".to_string(),
            client_ids: vec![10, 20],
        }];

        let output = RecentVisits(&payloads).to_string();

        assert!(output
            .contains("- visit 1000 by commercial 7 on 2025-01-02T09:00:00Z for client(s) 10, 20"));
    }
}
