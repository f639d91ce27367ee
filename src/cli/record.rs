//! Record command implementation

use anyhow::Result;

use crate::insights::{NewRawEvent, TypeUnit};
use crate::store::InsightsStore;
use crate::timestamp;

pub fn run(
    store: &InsightsStore,
    workflow_id: &str,
    type_unit: &str,
    value: i64,
    at: Option<&str>,
) -> Result<()> {
    let workflow = super::find_workflow(store, workflow_id)?;
    let type_unit: TypeUnit = type_unit.parse()?;

    let mut event = NewRawEvent::new(type_unit, value);
    if let Some(at) = at {
        event = event.at(timestamp::parse_rfc3339(at)?);
    }

    let recorded = store.record_raw_event(&workflow, event)?;
    println!(
        "Recorded {} = {} for '{}' at {}",
        recorded.type_unit,
        recorded.value,
        workflow.name,
        recorded.timestamp().to_rfc3339(),
    );
    Ok(())
}
