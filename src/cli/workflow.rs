use anyhow::Result;
use uuid::Uuid;

use crate::store::InsightsStore;

pub fn create(store: &InsightsStore, name: String, id: Option<String>) -> Result<()> {
    let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
    store.create_workflow(&id, &name)?;
    println!("Workflow '{}' created with ID: {}", name, id);
    Ok(())
}

pub fn rename(store: &InsightsStore, id: String, name: String) -> Result<()> {
    store.rename_workflow(&id, &name)?;
    println!("Workflow '{}' renamed to '{}'", id, name);
    Ok(())
}
