pub mod cli;
pub mod config;
pub mod insights;
pub mod store;
pub mod telemetry;
pub mod timestamp;

pub use config::Config;
pub use insights::{
    CompactedInsightEvent, InsightsError, InsightsMetadata, InsightsSummary, NewCompactedEvent,
    NewRawEvent, PeriodUnit, ProjectRef, RawInsightEvent, TypeUnit, WorkflowDirectory, WorkflowRef,
};
pub use store::{InsightsStore, InsightsTable};
