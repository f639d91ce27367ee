//! Compact command implementation

use anyhow::Result;

use crate::insights::{NewCompactedEvent, PeriodUnit, TypeUnit};
use crate::store::InsightsStore;
use crate::timestamp;

/// Record a compacted event. `period` falls back to `default_period`
/// (the configured `defaults.period_unit`) when omitted.
pub fn run(
    store: &InsightsStore,
    workflow_id: &str,
    type_unit: &str,
    value: i64,
    period_start: &str,
    period: Option<&str>,
    default_period: PeriodUnit,
) -> Result<()> {
    let workflow = super::find_workflow(store, workflow_id)?;
    let period_unit = match period {
        Some(p) => p.parse::<PeriodUnit>()?,
        None => default_period,
    };

    let event = store.record_compacted_event(
        &workflow,
        NewCompactedEvent {
            type_unit: type_unit.parse::<TypeUnit>()?,
            value,
            period_unit,
            period_start: timestamp::parse_rfc3339(period_start)?,
        },
    )?;

    println!(
        "Recorded {} = {} for '{}' in {} starting {}",
        event.type_unit,
        event.value,
        workflow.name,
        event.period_unit,
        event.period_start.to_rfc3339(),
    );
    Ok(())
}
