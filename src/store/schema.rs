//! SQLite schema definition
//!
//! All timestamps are INTEGER UTC epoch seconds.
//! Type codes: time_saved_min=0, runtime_ms=1, success=2, failure=3
//! Period codes: hour=0, day=1, week=2

pub const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

-- ============================================
-- WORKFLOWS & PROJECTS
-- ============================================

CREATE TABLE IF NOT EXISTS workflows (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
);

CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    type TEXT NOT NULL DEFAULT 'team',     -- 'personal', 'team'
    created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
);

-- Which projects a workflow is shared with, and in what role
CREATE TABLE IF NOT EXISTS shared_workflows (
    workflow_id TEXT NOT NULL,
    project_id TEXT NOT NULL,
    role TEXT NOT NULL,                    -- 'workflow:owner', 'workflow:editor'
    PRIMARY KEY(workflow_id, project_id),
    FOREIGN KEY(workflow_id) REFERENCES workflows(id) ON DELETE CASCADE,
    FOREIGN KEY(project_id) REFERENCES projects(id) ON DELETE CASCADE
);

-- ============================================
-- INSIGHTS
-- ============================================

-- Names are snapshots taken at creation, not live joins
CREATE TABLE IF NOT EXISTS insights_metadata (
    meta_id INTEGER PRIMARY KEY AUTOINCREMENT,
    workflow_id TEXT NOT NULL UNIQUE,
    workflow_name TEXT NOT NULL,
    project_id TEXT,
    project_name TEXT
);

CREATE TABLE IF NOT EXISTS insights_raw (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    meta_id INTEGER NOT NULL,
    type INTEGER NOT NULL CHECK (type IN (0, 1, 2, 3)),
    value INTEGER NOT NULL,
    timestamp INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
    FOREIGN KEY(meta_id) REFERENCES insights_metadata(meta_id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS insights_by_period (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    meta_id INTEGER NOT NULL,
    type INTEGER NOT NULL CHECK (type IN (0, 1, 2, 3)),
    value INTEGER NOT NULL,
    period_unit INTEGER NOT NULL CHECK (period_unit IN (0, 1, 2)),
    period_start INTEGER NOT NULL,
    FOREIGN KEY(meta_id) REFERENCES insights_metadata(meta_id) ON DELETE CASCADE
);

-- ============================================
-- INDEXES
-- ============================================

CREATE INDEX IF NOT EXISTS idx_shared_workflows_role ON shared_workflows(workflow_id, role);

CREATE INDEX IF NOT EXISTS idx_insights_raw_meta ON insights_raw(meta_id);
CREATE INDEX IF NOT EXISTS idx_insights_raw_timestamp ON insights_raw(timestamp);

CREATE UNIQUE INDEX IF NOT EXISTS idx_insights_by_period_bucket
    ON insights_by_period(period_start, type, period_unit, meta_id);
"#;
