mod common;

use std::sync::{Arc, Mutex};

use agenda_core::{
    AgendaError, AttachmentKind, ClientCatalog, CompletionOutcome, Coordinate,
    FixedLocationProvider, LocationFailure, RemoteVisitGateway, Result, SubmissionCoordinator,
    SubmissionStatus, VisitPayload, VisitTag,
};
use async_trait::async_trait;
use common::{create_test_environment, open_agenda};
use jiff::civil::date;

/// Gateway that accepts everything up to `reject_after` submissions.
#[derive(Default)]
struct RecordingGateway {
    reject_after: Option<usize>,
    received: Mutex<Vec<VisitPayload>>,
}

#[async_trait]
impl RemoteVisitGateway for RecordingGateway {
    async fn submit_visit(&self, payload: &VisitPayload) -> Result<()> {
        let mut received = self.received.lock().unwrap();
        if self.reject_after == Some(received.len()) {
            return Err(AgendaError::ServerError {
                status: 503,
                message: "Service unavailable".to_string(),
            });
        }
        received.push(payload.clone());
        Ok(())
    }

    async fn fetch_recent_visits(&self, limit: u32) -> Result<Vec<VisitPayload>> {
        let received = self.received.lock().unwrap();
        Ok(received.iter().take(limit as usize).cloned().collect())
    }
}

#[tokio::test]
#[allow(clippy::too_many_lines)]
async fn test_complete_day_workflow() {
    let (_temp_dir, db_path) = create_test_environment();
    let catalog = ClientCatalog::sample();

    // Plan three visits
    let mut agenda = open_agenda(&db_path);
    let clients = catalog.select(&[10, 20, 30]).expect("Failed to select");
    agenda
        .replace_plan(&clients, date(2025, 1, 2))
        .expect("Failed to generate plan");

    // Put the last visit first
    agenda.move_visits(&[2], 0).expect("Failed to move");
    let order: Vec<i64> = agenda.visits().iter().map(|v| v.client.id).collect();
    assert_eq!(order, vec![30, 10, 20]);
    let sequences: Vec<u32> = agenda.visits().iter().map(|v| v.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3]);

    // Record the first visit
    let first_id = agenda.visits()[0].id;
    let mut session = agenda.open_session(first_id).expect("Failed to open session");
    session.toggle_tag(VisitTag::Sales);
    session.add_attachment(AttachmentKind::Photo);
    session.set_notes("Left samples at reception");
    let gps = FixedLocationProvider::authorized(Coordinate::new(19.4326, -99.1332));
    let outcome = session.mark_completed(&gps).await;
    assert_eq!(
        outcome,
        CompletionOutcome::Located(Coordinate::new(19.4326, -99.1332))
    );
    agenda.commit_session(session).expect("Failed to commit");

    // Everything survives a restart
    drop(agenda);
    let agenda = open_agenda(&db_path);
    assert_eq!(agenda.len(), 3);
    let first = &agenda.visits()[0];
    assert_eq!(first.client.id, 30);
    assert!(first.is_completed);
    assert!(first.completion_timestamp.is_some());
    assert_eq!(first.notes, "Left samples at reception");
    assert!(first.selected_tags.contains(&VisitTag::Sales));
    assert_eq!(first.attachments.len(), 1);
    assert_eq!(first.attachments[0].file_name, "evidence_photo.jpg");
    let latitude = first.current_latitude.expect("location was captured");
    assert!((latitude - 19.4326).abs() < 1e-9);
    assert!(!agenda.visits()[1].is_completed);

    // Submit the day in order
    let gateway = Arc::new(RecordingGateway::default());
    let mut coordinator = SubmissionCoordinator::new(gateway.clone(), 7);
    let report = coordinator
        .submit_agenda(agenda.visits())
        .await
        .expect("Failed to submit");
    assert!(report.is_success());
    assert_eq!(
        coordinator.success_message(),
        Some("All visits submitted successfully")
    );

    let received = gateway.received.lock().unwrap().clone();
    let sent_clients: Vec<i64> = received.iter().map(|p| p.client_ids[0]).collect();
    assert_eq!(sent_clients, vec![30, 10, 20]);
    assert!(received.iter().all(|p| p.commercial_id == 7));
    assert_eq!(received[0].date, "2025-01-02T09:00:00Z");
    assert_eq!(received[2].date, "2025-01-02T11:00:00Z");
}

#[tokio::test]
async fn test_denied_location_still_completes_and_persists() {
    let (_temp_dir, db_path) = create_test_environment();
    let mut agenda = open_agenda(&db_path);
    let clients = ClientCatalog::sample().select(&[10]).unwrap();
    agenda.replace_plan(&clients, date(2025, 1, 2)).unwrap();

    let mut session = agenda.open_session(agenda.visits()[0].id).unwrap();
    let outcome = session
        .mark_completed(&FixedLocationProvider::denied())
        .await;
    assert_eq!(
        outcome,
        CompletionOutcome::WithoutLocation(LocationFailure::Denied)
    );
    assert!(session.show_location_error());
    agenda.commit_session(session).unwrap();

    drop(agenda);
    let agenda = open_agenda(&db_path);
    let visit = &agenda.visits()[0];
    assert!(visit.is_completed);
    assert!(visit.current_coordinate().is_none());
}

#[tokio::test]
async fn test_partial_submission_leaves_plan_untouched() {
    let (_temp_dir, db_path) = create_test_environment();
    let mut agenda = open_agenda(&db_path);
    let clients = ClientCatalog::sample().select(&[10, 20, 30]).unwrap();
    agenda.replace_plan(&clients, date(2025, 1, 2)).unwrap();
    let before = agenda.visits().to_vec();

    let gateway = Arc::new(RecordingGateway {
        reject_after: Some(1),
        ..RecordingGateway::default()
    });
    let mut coordinator = SubmissionCoordinator::new(gateway.clone(), 7);
    let report = coordinator.submit_agenda(agenda.visits()).await.unwrap();

    let statuses: Vec<&SubmissionStatus> = report.items.iter().map(|i| &i.status).collect();
    assert_eq!(
        statuses,
        vec![
            &SubmissionStatus::Submitted,
            &SubmissionStatus::Failed("Service unavailable".to_string()),
            &SubmissionStatus::NotAttempted,
        ]
    );
    assert_eq!(coordinator.error_message(), Some("Service unavailable"));
    assert_eq!(gateway.received.lock().unwrap().len(), 1);
    assert_eq!(agenda.visits(), before.as_slice());

    // Retrying re-sends the visit that was already accepted
    let retry = Arc::new(RecordingGateway::default());
    let mut coordinator = SubmissionCoordinator::new(retry.clone(), 7);
    coordinator.submit_agenda(agenda.visits()).await.unwrap();
    let first_run = gateway.received.lock().unwrap()[0].visit_id;
    assert_eq!(retry.received.lock().unwrap()[0].visit_id, first_run);
}

#[test]
fn test_regenerating_discards_recorded_work() {
    let (_temp_dir, db_path) = create_test_environment();
    let mut agenda = open_agenda(&db_path);
    let catalog = ClientCatalog::sample();
    agenda
        .replace_plan(&catalog.select(&[10, 20]).unwrap(), date(2025, 1, 2))
        .unwrap();

    let mut visit = agenda.visits()[0].clone();
    visit.notes = "Important".to_string();
    agenda.update_visit(visit).unwrap();

    agenda
        .replace_plan(&catalog.select(&[40]).unwrap(), date(2025, 1, 3))
        .unwrap();

    drop(agenda);
    let agenda = open_agenda(&db_path);
    assert_eq!(agenda.len(), 1);
    assert_eq!(agenda.visits()[0].client.id, 40);
    assert!(agenda.visits()[0].notes.is_empty());
    assert_eq!(agenda.visits()[0].scheduled_date, date(2025, 1, 3));
}

#[test]
fn test_deleting_everything_persists_empty_plan() {
    let (_temp_dir, db_path) = create_test_environment();
    let mut agenda = open_agenda(&db_path);
    agenda
        .replace_plan(&ClientCatalog::sample().select(&[10, 20]).unwrap(), date(2025, 1, 2))
        .unwrap();

    agenda.delete_visits(&[0, 1]).unwrap();
    assert!(agenda.is_empty());

    drop(agenda);
    assert!(open_agenda(&db_path).is_empty());
}
