//! List command implementation

use anyhow::Result;

use crate::store::InsightsStore;

pub fn raw(store: &InsightsStore, workflow_id: &str, json: bool) -> Result<()> {
    let Some(metadata) = store.find_metadata(workflow_id)? else {
        println!("No insights recorded for workflow {}", workflow_id);
        return Ok(());
    };

    let events = store.raw_events(metadata.meta_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("No raw events for '{}'.", metadata.workflow_name);
        return Ok(());
    }

    println!("{:<8} {:<26} {:<16} {}", "ID", "Timestamp", "Type", "Value");
    println!("{}", "-".repeat(60));

    for event in events {
        println!(
            "{:<8} {:<26} {:<16} {}",
            event.id,
            event.timestamp().to_rfc3339(),
            event.type_unit,
            event.value,
        );
    }

    Ok(())
}

pub fn periods(store: &InsightsStore, workflow_id: &str, json: bool) -> Result<()> {
    let Some(metadata) = store.find_metadata(workflow_id)? else {
        println!("No insights recorded for workflow {}", workflow_id);
        return Ok(());
    };

    let events = store.compacted_events(metadata.meta_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("No compacted events for '{}'.", metadata.workflow_name);
        return Ok(());
    }

    println!(
        "{:<8} {:<26} {:<6} {:<16} {}",
        "ID", "Period start", "Unit", "Type", "Value"
    );
    println!("{}", "-".repeat(70));

    for event in events {
        println!(
            "{:<8} {:<26} {:<6} {:<16} {}",
            event.id,
            event.period_start.to_rfc3339(),
            event.period_unit,
            event.type_unit,
            event.value,
        );
    }

    Ok(())
}
