//! Insight entities and the workflow directory seam
//!
//! Three records make up the insights data model:
//! - `InsightsMetadata`: one row per workflow, with workflow and project names
//!   snapshotted at creation time
//! - `RawInsightEvent`: one row per observed event
//! - `CompactedInsightEvent`: one row per (metadata, type, period) bucket
//!
//! Both event kinds reference exactly one metadata row.

mod units;

pub use units::{PeriodUnit, TypeUnit};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timestamp;

/// Errors raised while decoding insight values
#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("unknown insight type: {0}")]
    UnknownType(String),
    #[error("unknown insight type code: {0}")]
    UnknownTypeCode(i64),
    #[error("unknown period unit: {0}")]
    UnknownPeriod(String),
    #[error("unknown period unit code: {0}")]
    UnknownPeriodCode(i64),
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("epoch seconds out of range: {0}")]
    TimestampOutOfRange(i64),
}

/// Workflow identity as seen by the insights layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRef {
    pub id: String,
    pub name: String,
}

impl WorkflowRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Project identity as seen by the insights layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
}

/// Lookup of workflows and their owning projects
pub trait WorkflowDirectory {
    /// Current id and name of a workflow
    fn workflow(&self, workflow_id: &str) -> Result<Option<WorkflowRef>>;

    /// Project holding the owner share of a workflow, if any
    fn owner_project(&self, workflow_id: &str) -> Result<Option<ProjectRef>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsMetadata {
    pub meta_id: i64,
    pub workflow_id: String,
    pub workflow_name: String,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
}

/// A single recorded occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInsightEvent {
    pub id: i64,
    pub meta_id: i64,
    #[serde(rename = "type")]
    pub type_unit: TypeUnit,
    pub value: i64,
    timestamp: DateTime<Utc>,
}

impl RawInsightEvent {
    pub fn new(
        id: i64,
        meta_id: i64,
        type_unit: TypeUnit,
        value: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            meta_id,
            type_unit,
            value,
            timestamp: timestamp::truncate_to_second(timestamp),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Sub-second precision is discarded on assignment
    pub fn set_timestamp(&mut self, ts: DateTime<Utc>) {
        self.timestamp = timestamp::truncate_to_second(ts);
    }
}

/// A pre-aggregated rollup over one period bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactedInsightEvent {
    pub id: i64,
    pub meta_id: i64,
    #[serde(rename = "type")]
    pub type_unit: TypeUnit,
    pub value: i64,
    pub period_unit: PeriodUnit,
    pub period_start: DateTime<Utc>,
}

/// Parameters for recording a raw event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRawEvent {
    pub type_unit: TypeUnit,
    pub value: i64,
    /// Defaults to the time of the write when `None`
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewRawEvent {
    pub fn new(type_unit: TypeUnit, value: i64) -> Self {
        Self {
            type_unit,
            value,
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Parameters for recording a compacted event.
/// `period_start` may be any instant inside the bucket; it is aligned on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompactedEvent {
    pub type_unit: TypeUnit,
    pub value: i64,
    pub period_unit: PeriodUnit,
    pub period_start: DateTime<Utc>,
}

/// Totals over raw and compacted events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightsSummary {
    pub succeeded: i64,
    pub failed: i64,
    pub runtime_ms: i64,
    pub time_saved_min: i64,
}

impl InsightsSummary {
    pub fn add(&mut self, type_unit: TypeUnit, value: i64) {
        match type_unit {
            TypeUnit::Success => self.succeeded = self.succeeded.saturating_add(value),
            TypeUnit::Failure => self.failed = self.failed.saturating_add(value),
            TypeUnit::RuntimeMs => self.runtime_ms = self.runtime_ms.saturating_add(value),
            TypeUnit::TimeSavedMin => {
                self.time_saved_min = self.time_saved_min.saturating_add(value)
            }
        }
    }

    /// Succeeded plus failed executions, clamped at `i64::MAX`
    pub fn total(&self) -> i64 {
        self.succeeded.saturating_add(self.failed)
    }

    /// Share of executions that failed, 0.0 when nothing ran
    pub fn failure_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.failed as f64 / total as f64,
        }
    }

    /// Mean runtime per execution in milliseconds, 0.0 when nothing ran
    pub fn average_runtime_ms(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.runtime_ms as f64 / total as f64,
        }
    }
}
