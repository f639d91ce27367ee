mod common;

use chrono::{Timelike, Utc};
use insights_store::{NewRawEvent, TypeUnit};

use common::{count_rows, create_owned_workflow, create_team_project, test_store};

#[test]
fn test_every_type_survives_storage() {
    let store = test_store();
    let project = create_team_project(&store, "Operations");
    let workflow = create_owned_workflow(&store, "Nightly export", &project);

    for unit in TypeUnit::ALL {
        let recorded = store
            .record_raw_event(&workflow, NewRawEvent::new(unit, 1))
            .unwrap();
        assert_eq!(recorded.type_unit, unit);
    }

    let metadata = store.find_metadata(&workflow.id).unwrap().unwrap();
    let stored: Vec<TypeUnit> = store
        .raw_events(metadata.meta_id)
        .unwrap()
        .into_iter()
        .map(|e| e.type_unit)
        .collect();
    assert_eq!(stored, TypeUnit::ALL.to_vec());
}

#[test]
fn test_timestamp_is_stored_as_epoch_seconds() {
    let store = test_store();
    let project = create_team_project(&store, "Operations");
    let workflow = create_owned_workflow(&store, "Nightly export", &project);
    let now = Utc::now().with_nanosecond(0).unwrap();

    store
        .record_raw_event(&workflow, NewRawEvent::new(TypeUnit::Success, 1).at(now))
        .unwrap();

    let (timestamp, kind): (i64, String) = store
        .connection()
        .query_row(
            "SELECT timestamp, typeof(timestamp) FROM insights_raw",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(count_rows(&store, "insights_raw"), 1);
    assert_eq!(kind, "integer");
    assert_eq!(timestamp, now.timestamp());
}

#[test]
fn test_explicit_timestamp_loses_milliseconds() {
    let store = test_store();
    let project = create_team_project(&store, "Operations");
    let workflow = create_owned_workflow(&store, "Nightly export", &project);
    let ts = insights_store::timestamp::parse_rfc3339("2025-02-03T04:05:06.789Z").unwrap();

    let recorded = store
        .record_raw_event(&workflow, NewRawEvent::new(TypeUnit::RuntimeMs, 250).at(ts))
        .unwrap();
    assert_eq!(recorded.timestamp(), ts.with_nanosecond(0).unwrap());

    let stored = store.raw_events(recorded.meta_id).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].timestamp(), ts.with_nanosecond(0).unwrap());
    assert_eq!(stored[0], recorded);
}

#[test]
fn test_timestamp_defaults_to_now() {
    let store = test_store();
    let project = create_team_project(&store, "Operations");
    let workflow = create_owned_workflow(&store, "Nightly export", &project);

    let now = Utc::now().with_nanosecond(0).unwrap();
    store
        .record_raw_event(&workflow, NewRawEvent::new(TypeUnit::Success, 1))
        .unwrap();

    let timestamp: i64 = store
        .connection()
        .query_row("SELECT timestamp FROM insights_raw", [], |row| row.get(0))
        .unwrap();
    assert!((timestamp - now.timestamp()).abs() <= 1);
}

#[test]
fn test_batch_shares_one_metadata_row() {
    let store = test_store();
    let project = create_team_project(&store, "Operations");
    let workflow = create_owned_workflow(&store, "Nightly export", &project);

    let batch: Vec<NewRawEvent> = (0..5)
        .map(|i| NewRawEvent::new(TypeUnit::RuntimeMs, 100 * i))
        .collect();
    let recorded = store.record_raw_events(&workflow, &batch).unwrap();

    assert_eq!(recorded.len(), 5);
    assert_eq!(count_rows(&store, "insights_raw"), 5);
    assert_eq!(count_rows(&store, "insights_metadata"), 1);

    let meta_id = recorded[0].meta_id;
    assert!(recorded.iter().all(|e| e.meta_id == meta_id));
    assert_eq!(store.raw_events(meta_id).unwrap().len(), 5);
}

#[test]
fn test_empty_batch_inserts_nothing() {
    let store = test_store();
    let workflow = common::create_workflow(&store, "Idle");

    let recorded = store.record_raw_events(&workflow, &[]).unwrap();

    assert!(recorded.is_empty());
    assert_eq!(count_rows(&store, "insights_raw"), 0);
}

#[test]
fn test_raw_events_since_filters_by_time() {
    let store = test_store();
    let workflow = common::create_workflow(&store, "Nightly export");
    let parse = insights_store::timestamp::parse_rfc3339;

    store
        .record_raw_events(
            &workflow,
            &[
                NewRawEvent::new(TypeUnit::Success, 1).at(parse("2025-01-01T00:00:00Z").unwrap()),
                NewRawEvent::new(TypeUnit::Success, 1).at(parse("2025-01-02T00:00:00Z").unwrap()),
                NewRawEvent::new(TypeUnit::Failure, 1).at(parse("2025-01-03T00:00:00Z").unwrap()),
            ],
        )
        .unwrap();

    let recent = store
        .raw_events_since(parse("2025-01-02T00:00:00Z").unwrap())
        .unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[1].type_unit, TypeUnit::Failure);
}
