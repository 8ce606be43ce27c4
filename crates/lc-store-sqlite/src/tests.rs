//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use lc_core::{
  calendar::Period,
  entry::{Action, Entry, EntryType, NewEntry},
  record::{RecordId, Snapshot},
  repository,
  roster::{NewStudent, NewZone, Student, StudentPatch, Zone, ZonePatch},
  store::RecordStore,
};
use uuid::Uuid;

use crate::{IdScheme, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn payload(student: &str, entry_type: EntryType, zone: Option<&str>) -> NewEntry {
  NewEntry::new(
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    Period::new(5).unwrap(),
    student.into(),
    entry_type,
    zone.map(RecordId::from),
    false,
    Action::SelfDirected,
    String::new(),
  )
}

// ─── Students & zones ────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_store_lists_nothing() {
  let s = store().await;
  assert!(s.list::<Student>().await.unwrap().is_empty());
  assert!(s.list::<Zone>().await.unwrap().is_empty());
  assert!(s.list::<Entry>().await.unwrap().is_empty());
}

#[tokio::test]
async fn students_are_listed_by_name() {
  let s = store().await;
  for name in ["maya", "Avery", "Jordan"] {
    s.create::<Student>(NewStudent { name: name.into() }, 0)
      .await
      .unwrap();
  }

  let names: Vec<_> = s
    .list::<Student>()
    .await
    .unwrap()
    .into_iter()
    .map(|st| st.name)
    .collect();
  assert_eq!(names, ["Avery", "Jordan", "maya"]);
}

#[tokio::test]
async fn update_changes_only_patched_fields() {
  let s = store().await;
  let zone = s
    .create::<Zone>(NewZone { name: "Quiet Room".into(), category: "Focus".into() }, 0)
    .await
    .unwrap();

  let updated = s
    .update::<Zone>(zone.id.clone(), ZonePatch { name: Some("Library".into()), category: None })
    .await
    .unwrap()
    .expect("zone exists");
  assert_eq!(updated.name, "Library");
  assert_eq!(updated.category, "Focus");

  assert_eq!(s.list::<Zone>().await.unwrap(), [updated]);
}

#[tokio::test]
async fn update_missing_record_returns_none() {
  let s = store().await;
  let result = s
    .update::<Student>("nope".into(), StudentPatch { name: Some("x".into()) })
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn delete_does_not_cascade_to_entries() {
  let s = store().await;
  let student = s
    .create::<Student>(NewStudent { name: "Avery".into() }, 0)
    .await
    .unwrap();
  s.create::<Entry>(payload(student.id.as_str(), EntryType::Absent, None), 0)
    .await
    .unwrap();

  assert!(s.delete::<Student>(student.id.clone()).await.unwrap());
  assert!(!s.delete::<Student>(student.id.clone()).await.unwrap());

  let entries = s.list::<Entry>().await.unwrap();
  assert_eq!(entries.len(), 1);
  assert_eq!(entries[0].student_id, student.id);
}

// ─── Entries ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn entry_ids_are_clock_based() {
  let s = store().await;
  let entry = s
    .create::<Entry>(payload("s1", EntryType::Class, Some("z1")), 4)
    .await
    .unwrap();

  let expected = format!("{}-4", entry.created_at.timestamp_millis());
  assert_eq!(entry.id.as_str(), expected);
  assert_eq!(entry.day, "Monday");
  assert_eq!(entry.date, "2024-01-15");
}

#[tokio::test]
async fn uuid_scheme_assigns_uuids() {
  let s = store().await.with_id_scheme(IdScheme::Uuid);
  let student = s
    .create::<Student>(NewStudent { name: "Avery".into() }, 0)
    .await
    .unwrap();
  assert!(Uuid::parse_str(student.id.as_str()).is_ok());
}

#[tokio::test]
async fn created_at_never_goes_backwards() {
  let s = store().await;
  let mut last = None;
  for i in 0..20 {
    let entry = s
      .create::<Entry>(payload("s1", EntryType::Enrichment, None), i)
      .await
      .unwrap();
    if let Some(prev) = last {
      assert!(entry.created_at > prev);
    }
    last = Some(entry.created_at);
  }
}

#[tokio::test]
async fn concurrent_batch_loses_no_writes() {
  let s = store().await;
  let payloads: Vec<_> = (0..12)
    .map(|i| payload(&format!("s{i}"), EntryType::Class, Some("z1")))
    .collect();

  let saved = repository::append_entries(&s, payloads).await.unwrap();
  assert_eq!(saved, 12);

  let entries = s.list::<Entry>().await.unwrap();
  assert_eq!(entries.len(), 12);
  let mut ids: Vec<_> = entries.iter().map(|e| e.id.clone()).collect();
  ids.sort();
  ids.dedup();
  assert_eq!(ids.len(), 12);
}

#[tokio::test]
async fn entries_keep_type_rules_on_create() {
  let s = store().await;
  let mut absent = payload("s1", EntryType::Absent, Some("z1"));
  absent.notes = "should go".into();
  absent.action = Action::Conduct3;
  let entry = s.create::<Entry>(absent, 0).await.unwrap();
  assert_eq!(entry.zone_id, None);
  assert!(entry.notes.is_empty());
  assert_eq!(entry.action, Action::SelfDirected);
}

// ─── Snapshots & namespaces ──────────────────────────────────────────────────

#[tokio::test]
async fn replace_all_is_a_full_replace() {
  let s = store().await;
  s.create::<Student>(NewStudent { name: "Old".into() }, 0)
    .await
    .unwrap();
  s.create::<Entry>(payload("s-old", EntryType::Absent, None), 0)
    .await
    .unwrap();

  let snapshot = Snapshot {
    entries:  Vec::new(),
    students: vec![Student { id: "s1".into(), name: "Avery".into() }],
    zones:    vec![Zone { id: "z1".into(), name: "Quiet Room".into(), category: String::new() }],
  };
  s.replace_all(snapshot.clone()).await.unwrap();

  let loaded = repository::load_collections(&s).await.unwrap();
  assert_eq!(loaded, snapshot);
}

#[tokio::test]
async fn namespaces_are_isolated() {
  let local = store().await;
  let account = local.with_namespace("room-12");
  assert_eq!(account.namespace(), "room-12");

  account
    .create::<Student>(NewStudent { name: "Avery".into() }, 0)
    .await
    .unwrap();

  assert!(local.list::<Student>().await.unwrap().is_empty());
  assert_eq!(account.list::<Student>().await.unwrap().len(), 1);
}

#[tokio::test]
async fn data_survives_reopening_the_file() {
  let path = std::env::temp_dir().join(format!("lc-store-{}.db", Uuid::new_v4()));

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.create::<Student>(NewStudent { name: "Avery".into() }, 0)
      .await
      .unwrap();
  }

  let reopened = SqliteStore::open(&path).await.unwrap();
  let students = reopened.list::<Student>().await.unwrap();
  assert_eq!(students.len(), 1);
  assert_eq!(students[0].name, "Avery");

  drop(reopened);
  let _ = std::fs::remove_file(&path);
}
