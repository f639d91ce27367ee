use anyhow::Result;

use crate::store::InsightsStore;

pub fn run(store: &InsightsStore, workflow_id: &str) -> Result<()> {
    let workflow = super::find_workflow(store, workflow_id)?;
    let metadata = store.get_or_create_metadata(&workflow)?;

    println!("Meta ID:   {}", metadata.meta_id);
    println!("Workflow:  {} ({})", metadata.workflow_name, metadata.workflow_id);
    match (&metadata.project_id, &metadata.project_name) {
        (Some(id), Some(name)) => println!("Project:   {} ({})", name, id),
        _ => println!("Project:   -"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::OWNER_ROLE;

    #[test]
    fn test_creates_metadata_once() {
        let store = InsightsStore::open_in_memory().unwrap();
        store.create_workflow("wf-1", "Lead scoring").unwrap();
        store.create_project("p-1", "Marketing", "team").unwrap();
        store.share_workflow("wf-1", "p-1", OWNER_ROLE).unwrap();

        run(&store, "wf-1").unwrap();
        let created = store.find_metadata("wf-1").unwrap().unwrap();
        assert_eq!(created.workflow_name, "Lead scoring");
        assert_eq!(created.project_id.as_deref(), Some("p-1"));
        assert_eq!(created.project_name.as_deref(), Some("Marketing"));

        run(&store, "wf-1").unwrap();
        assert_eq!(store.list_metadata().unwrap(), vec![created]);
    }
}
