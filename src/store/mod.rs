//! Insights storage with SQLite
//!
//! Raw and compacted events are append-only. Metadata rows are created lazily
//! the first time an event for their workflow is recorded.

mod schema;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use tracing::{debug, info};

use crate::insights::{
    CompactedInsightEvent, InsightsMetadata, InsightsSummary, NewCompactedEvent, NewRawEvent,
    PeriodUnit, ProjectRef, RawInsightEvent, TypeUnit, WorkflowDirectory, WorkflowRef,
};
use crate::timestamp;

pub use schema::SCHEMA;

/// Role that designates the owning project of a workflow
pub const OWNER_ROLE: &str = "workflow:owner";

/// Insights tables that can be cleared with [`InsightsStore::truncate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightsTable {
    Raw,
    ByPeriod,
    Metadata,
}

impl InsightsTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightsTable::Raw => "insights_raw",
            InsightsTable::ByPeriod => "insights_by_period",
            InsightsTable::Metadata => "insights_metadata",
        }
    }
}

pub struct InsightsStore {
    conn: Connection,
}

impl InsightsStore {
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("opening database {}", path.display()))?;
        let store = Self { conn };
        store.init_schema()?;
        debug!(path = %path.display(), "opened insights store");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Direct access for raw SQL
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    // ============================================
    // WORKFLOWS & PROJECTS
    // ============================================

    pub fn create_workflow(&self, id: &str, name: &str) -> Result<WorkflowRef> {
        self.conn.execute(
            "INSERT INTO workflows (id, name) VALUES (?, ?)",
            params![id, name],
        )?;
        Ok(WorkflowRef::new(id, name))
    }

    pub fn rename_workflow(&self, id: &str, name: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE workflows SET name = ? WHERE id = ?",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(anyhow!("Workflow not found: {}", id));
        }
        Ok(())
    }

    pub fn get_workflow(&self, id: &str) -> Result<Option<WorkflowRef>> {
        let result = self.conn.query_row(
            "SELECT id, name FROM workflows WHERE id = ?",
            params![id],
            |row| Ok(WorkflowRef::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        );

        match result {
            Ok(workflow) => Ok(Some(workflow)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn create_project(&self, id: &str, name: &str, project_type: &str) -> Result<ProjectRef> {
        self.conn.execute(
            "INSERT INTO projects (id, name, type) VALUES (?, ?, ?)",
            params![id, name, project_type],
        )?;
        Ok(ProjectRef {
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    pub fn rename_project(&self, id: &str, name: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE projects SET name = ? WHERE id = ?",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(anyhow!("Project not found: {}", id));
        }
        Ok(())
    }

    /// Share a workflow with a project. Re-sharing replaces the role.
    pub fn share_workflow(&self, workflow_id: &str, project_id: &str, role: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO shared_workflows (workflow_id, project_id, role) VALUES (?, ?, ?)
             ON CONFLICT(workflow_id, project_id) DO UPDATE SET role = excluded.role",
            params![workflow_id, project_id, role],
        )?;
        Ok(())
    }

    /// Project holding the owner share of a workflow.
    /// With several owner shares the lowest project id wins.
    pub fn workflow_owner(&self, workflow_id: &str) -> Result<Option<ProjectRef>> {
        let result = self.conn.query_row(
            "SELECT p.id, p.name FROM shared_workflows sw
             JOIN projects p ON p.id = sw.project_id
             WHERE sw.workflow_id = ? AND sw.role = ?
             ORDER BY sw.project_id
             LIMIT 1",
            params![workflow_id, OWNER_ROLE],
            |row| {
                Ok(ProjectRef {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        );

        match result {
            Ok(project) => Ok(Some(project)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ============================================
    // METADATA
    // ============================================

    pub fn find_metadata(&self, workflow_id: &str) -> Result<Option<InsightsMetadata>> {
        let result = self.conn.query_row(
            "SELECT meta_id, workflow_id, workflow_name, project_id, project_name
             FROM insights_metadata WHERE workflow_id = ?",
            params![workflow_id],
            map_metadata,
        );

        match result {
            Ok(metadata) => Ok(Some(metadata)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Return the metadata row for a workflow, creating it on first use.
    ///
    /// An existing row is returned unchanged, so calling this repeatedly for
    /// the same workflow never creates duplicates. A new row snapshots the
    /// workflow name and the owning project resolved through this store.
    pub fn get_or_create_metadata(&self, workflow: &WorkflowRef) -> Result<InsightsMetadata> {
        self.get_or_create_metadata_with(workflow, self)
    }

    /// Same as [`get_or_create_metadata`](Self::get_or_create_metadata) with
    /// the owning project resolved through `directory`.
    pub fn get_or_create_metadata_with(
        &self,
        workflow: &WorkflowRef,
        directory: &dyn WorkflowDirectory,
    ) -> Result<InsightsMetadata> {
        if let Some(existing) = self.find_metadata(&workflow.id)? {
            return Ok(existing);
        }

        let owner = directory.owner_project(&workflow.id)?;

        // OR IGNORE keeps a concurrent creator's row intact
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO insights_metadata
             (workflow_id, workflow_name, project_id, project_name)
             VALUES (?, ?, ?, ?)",
            params![
                workflow.id,
                workflow.name,
                owner.as_ref().map(|p| p.id.as_str()),
                owner.as_ref().map(|p| p.name.as_str()),
            ],
        )?;

        if inserted > 0 {
            info!(
                workflow_id = %workflow.id,
                project_id = owner.as_ref().map(|p| p.id.as_str()),
                "created insights metadata"
            );
        }

        self.find_metadata(&workflow.id)?
            .ok_or_else(|| anyhow!("Metadata missing after insert for workflow {}", workflow.id))
    }

    pub fn list_metadata(&self) -> Result<Vec<InsightsMetadata>> {
        let mut stmt = self.conn.prepare(
            "SELECT meta_id, workflow_id, workflow_name, project_id, project_name
             FROM insights_metadata ORDER BY meta_id",
        )?;
        let rows = stmt.query_map([], map_metadata)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ============================================
    // RAW EVENTS
    // ============================================

    pub fn record_raw_event(
        &self,
        workflow: &WorkflowRef,
        event: NewRawEvent,
    ) -> Result<RawInsightEvent> {
        self.record_raw_events(workflow, std::slice::from_ref(&event))?
            .pop()
            .ok_or_else(|| anyhow!("No raw event recorded for workflow {}", workflow.id))
    }

    /// Record several events for one workflow in a single transaction.
    /// All rows share one metadata row.
    pub fn record_raw_events(
        &self,
        workflow: &WorkflowRef,
        events: &[NewRawEvent],
    ) -> Result<Vec<RawInsightEvent>> {
        let metadata = self.get_or_create_metadata(workflow)?;

        let tx = self.conn.unchecked_transaction()?;
        let mut recorded = Vec::with_capacity(events.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO insights_raw (meta_id, type, value, timestamp)
                 VALUES (?, ?, ?, ?)
                 RETURNING id",
            )?;

            for event in events {
                let ts = event
                    .timestamp
                    .map(timestamp::truncate_to_second)
                    .unwrap_or_else(timestamp::now_seconds);

                let id: i64 = stmt.query_row(
                    params![
                        metadata.meta_id,
                        event.type_unit,
                        event.value,
                        timestamp::to_epoch_seconds(ts),
                    ],
                    |row| row.get(0),
                )?;

                recorded.push(RawInsightEvent::new(
                    id,
                    metadata.meta_id,
                    event.type_unit,
                    event.value,
                    ts,
                ));
            }
        }
        tx.commit()?;

        debug!(
            workflow_id = %workflow.id,
            meta_id = metadata.meta_id,
            count = recorded.len(),
            "recorded raw insight events"
        );
        Ok(recorded)
    }

    pub fn raw_events(&self, meta_id: i64) -> Result<Vec<RawInsightEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, meta_id, type, value, timestamp FROM insights_raw
             WHERE meta_id = ?
             ORDER BY timestamp, id",
        )?;
        let rows = stmt.query_map(params![meta_id], map_raw_event)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Raw events at or after `since`, across all workflows
    pub fn raw_events_since(&self, since: DateTime<Utc>) -> Result<Vec<RawInsightEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, meta_id, type, value, timestamp FROM insights_raw
             WHERE timestamp >= ?
             ORDER BY timestamp, id",
        )?;
        let rows = stmt.query_map(params![timestamp::to_epoch_seconds(since)], map_raw_event)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ============================================
    // COMPACTED EVENTS
    // ============================================

    /// Record a period rollup. `period_start` is aligned to the start of its
    /// unit. A second row for the same bucket violates the unique index.
    pub fn record_compacted_event(
        &self,
        workflow: &WorkflowRef,
        event: NewCompactedEvent,
    ) -> Result<CompactedInsightEvent> {
        let metadata = self.get_or_create_metadata(workflow)?;
        let period_start = event.period_unit.start_of(event.period_start);

        let id: i64 = self.conn.query_row(
            "INSERT INTO insights_by_period (meta_id, type, value, period_unit, period_start)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
            params![
                metadata.meta_id,
                event.type_unit,
                event.value,
                event.period_unit,
                timestamp::to_epoch_seconds(period_start),
            ],
            |row| row.get(0),
        )?;

        debug!(
            workflow_id = %workflow.id,
            meta_id = metadata.meta_id,
            period_unit = %event.period_unit,
            period_start = %period_start,
            "recorded compacted insight event"
        );

        Ok(CompactedInsightEvent {
            id,
            meta_id: metadata.meta_id,
            type_unit: event.type_unit,
            value: event.value,
            period_unit: event.period_unit,
            period_start,
        })
    }

    pub fn compacted_events(&self, meta_id: i64) -> Result<Vec<CompactedInsightEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, meta_id, type, value, period_unit, period_start FROM insights_by_period
             WHERE meta_id = ?
             ORDER BY period_start, id",
        )?;

        let rows = stmt.query_map(params![meta_id], |row| {
            Ok(CompactedInsightEvent {
                id: row.get(0)?,
                meta_id: row.get(1)?,
                type_unit: row.get(2)?,
                value: row.get(3)?,
                period_unit: row.get(4)?,
                period_start: epoch_column(row, 5)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ============================================
    // QUERIES
    // ============================================

    /// Totals per type over raw events and period rollups at or after `since`
    pub fn summary(&self, since: DateTime<Utc>) -> Result<InsightsSummary> {
        let mut stmt = self.conn.prepare(
            r#"SELECT type, SUM(value) FROM (
                   SELECT type, value FROM insights_raw WHERE timestamp >= ?1
                   UNION ALL
                   SELECT type, value FROM insights_by_period WHERE period_start >= ?1
               )
               GROUP BY type"#,
        )?;

        let rows = stmt.query_map(params![timestamp::to_epoch_seconds(since)], |row| {
            Ok((row.get::<_, TypeUnit>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut summary = InsightsSummary::default();
        for row in rows {
            let (type_unit, total) = row?;
            summary.add(type_unit, total);
        }
        Ok(summary)
    }

    /// Delete every row from the given insights tables
    pub fn truncate(&self, tables: &[InsightsTable]) -> Result<()> {
        for table in tables {
            self.conn.execute(&format!("DELETE FROM {}", table.as_str()), [])?;
        }
        Ok(())
    }
}

impl WorkflowDirectory for InsightsStore {
    fn workflow(&self, workflow_id: &str) -> Result<Option<WorkflowRef>> {
        self.get_workflow(workflow_id)
    }

    fn owner_project(&self, workflow_id: &str) -> Result<Option<ProjectRef>> {
        self.workflow_owner(workflow_id)
    }
}

// ============================================
// ROW MAPPING
// ============================================

impl ToSql for TypeUnit {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for TypeUnit {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = i64::column_result(value)?;
        TypeUnit::from_code(code).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for PeriodUnit {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for PeriodUnit {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = i64::column_result(value)?;
        PeriodUnit::from_code(code).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

fn epoch_column(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx)?;
    timestamp::from_epoch_seconds(secs)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

fn map_metadata(row: &Row) -> rusqlite::Result<InsightsMetadata> {
    Ok(InsightsMetadata {
        meta_id: row.get(0)?,
        workflow_id: row.get(1)?,
        workflow_name: row.get(2)?,
        project_id: row.get(3)?,
        project_name: row.get(4)?,
    })
}

fn map_raw_event(row: &Row) -> rusqlite::Result<RawInsightEvent> {
    Ok(RawInsightEvent::new(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        epoch_column(row, 4)?,
    ))
}
