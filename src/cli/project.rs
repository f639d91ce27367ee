use anyhow::Result;
use uuid::Uuid;

use crate::store::InsightsStore;

pub fn create(store: &InsightsStore, name: String, project_type: String) -> Result<()> {
    let id = Uuid::new_v4().to_string();
    store.create_project(&id, &name, &project_type)?;
    println!("Project '{}' created with ID: {}", name, id);
    Ok(())
}

pub fn share(
    store: &InsightsStore,
    workflow_id: String,
    project_id: String,
    role: String,
) -> Result<()> {
    let workflow = super::find_workflow(store, &workflow_id)?;
    store.share_workflow(&workflow.id, &project_id, &role)?;
    println!(
        "Shared workflow '{}' with project {} as {}",
        workflow.name, project_id, role
    );
    Ok(())
}
