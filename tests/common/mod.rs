//! Shared fixtures for integration tests
#![allow(dead_code)]

use insights_store::store::OWNER_ROLE;
use insights_store::{InsightsStore, ProjectRef, WorkflowRef};
use uuid::Uuid;

pub fn test_store() -> InsightsStore {
    InsightsStore::open_in_memory().unwrap()
}

pub fn create_team_project(store: &InsightsStore, name: &str) -> ProjectRef {
    store
        .create_project(&Uuid::new_v4().to_string(), name, "team")
        .unwrap()
}

pub fn create_workflow(store: &InsightsStore, name: &str) -> WorkflowRef {
    store
        .create_workflow(&Uuid::new_v4().to_string(), name)
        .unwrap()
}

/// Workflow owned by `project`
pub fn create_owned_workflow(
    store: &InsightsStore,
    name: &str,
    project: &ProjectRef,
) -> WorkflowRef {
    let workflow = create_workflow(store, name);
    store
        .share_workflow(&workflow.id, &project.id, OWNER_ROLE)
        .unwrap();
    workflow
}

pub fn count_rows(store: &InsightsStore, table: &str) -> i64 {
    store
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}
