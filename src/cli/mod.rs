//! Command implementations for the `insights` binary

pub mod compact;
pub mod list;
pub mod metadata;
pub mod project;
pub mod record;
pub mod summary;
pub mod workflow;

use anyhow::{anyhow, Result};

use crate::insights::{WorkflowDirectory, WorkflowRef};
use crate::store::InsightsStore;

/// Resolve a workflow id to its current id and name
fn find_workflow(store: &InsightsStore, workflow_id: &str) -> Result<WorkflowRef> {
    store
        .workflow(workflow_id)?
        .ok_or_else(|| anyhow!("Workflow not found: {}", workflow_id))
}
