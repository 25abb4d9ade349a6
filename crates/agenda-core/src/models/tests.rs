use jiff::{civil::date, tz::TimeZone, Timestamp};

use crate::models::{AttachmentKind, Client, Visit, VisitAttachment, VisitPayload, VisitTag};

fn create_test_client(id: i64) -> Client {
    Client {
        id,
        name: format!("Client {id}"),
        address: "123 Main St".to_string(),
        latitude: 40.7128,
        longitude: -74.0060,
    }
}

fn create_test_visit() -> Visit {
    let day = date(2025, 1, 2);
    let planned = day.at(10, 0, 0, 0).to_zoned(TimeZone::UTC).unwrap();
    Visit::new(2, create_test_client(20), day, planned)
}

#[test]
fn test_new_visit_starts_planned() {
    let visit = create_test_visit();
    assert_eq!(visit.sequence, 2);
    assert!(!visit.is_completed);
    assert!(visit.notes.is_empty());
    assert!(visit.selected_tags.is_empty());
    assert!(visit.attachments.is_empty());
    assert!(visit.current_coordinate().is_none());
    assert!(visit.completion_timestamp.is_none());
}

#[test]
fn test_planned_hour_text() {
    let visit = create_test_visit();
    assert_eq!(visit.planned_hour_text(), "10:00");
}

#[test]
fn test_visit_json_survives_persistence_format() {
    let mut visit = create_test_visit();
    visit.selected_tags.insert(VisitTag::Training);
    visit.attachments.push(VisitAttachment::new(AttachmentKind::Video));
    visit.notes = "Demo of the new pump".to_string();

    let json = serde_json::to_string(&visit).unwrap();
    assert!(json.contains("\"training\""));
    assert!(json.contains("\"video\""));
    assert!(!json.contains("current_latitude"));

    let decoded: Visit = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, visit);
}

#[test]
fn test_attachment_placeholder_names() {
    let photo = VisitAttachment::new(AttachmentKind::Photo);
    let video = VisitAttachment::new(AttachmentKind::Video);
    assert_eq!(photo.file_name, "evidence_photo.jpg");
    assert_eq!(video.file_name, "evidence_video.mov");
    assert_ne!(photo.id, video.id);
}

#[test]
fn test_tag_parsing() {
    assert_eq!("Sales".parse::<VisitTag>(), Ok(VisitTag::Sales));
    assert_eq!("installation".parse::<VisitTag>(), Ok(VisitTag::Installation));
    assert!("repair".parse::<VisitTag>().is_err());
    assert_eq!(VisitTag::ALL.len(), 5);
    for tag in VisitTag::ALL {
        assert_eq!(tag.as_str().parse::<VisitTag>(), Ok(tag));
    }
}

#[test]
fn test_attachment_kind_parsing() {
    assert_eq!("PHOTO".parse::<AttachmentKind>(), Ok(AttachmentKind::Photo));
    assert_eq!("video".parse::<AttachmentKind>(), Ok(AttachmentKind::Video));
    assert!("audio".parse::<AttachmentKind>().is_err());
}

#[test]
fn test_payload_uses_backend_field_names() {
    let at = Timestamp::from_second(1735808400).unwrap(); // 2025-01-02 09:00:00 UTC
    let payload = VisitPayload::new(4242, 7, at, vec![10]);
    assert_eq!(payload.date, "2025-01-02T09:00:00Z");

    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value["visit_id"], 4242);
    assert_eq!(value["commercial_id"], 7);
    assert_eq!(value["date"], "2025-01-02T09:00:00Z");
    assert_eq!(value["client_ids"], serde_json::json!([10]));
}
