//! Record Store
//! Mission: Persist departments, employees, and tasks in SQLite
//!
//! One connection guarded by a mutex; statements take the lock only for
//! their own duration, so concurrent requests interleave at statement
//! granularity with no cross-request transactions.

pub mod departments;
pub mod employees;
pub mod tasks;

pub use employees::NewEmployee;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::Role;

const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;

CREATE TABLE IF NOT EXISTS departments (
    id TEXT PRIMARY KEY,
    name TEXT UNIQUE NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS employees (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL,
    department_id TEXT NOT NULL,
    phone TEXT,
    address TEXT,
    position TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (department_id) REFERENCES departments(id)
);

CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    department_id TEXT NOT NULL,
    assigned_to TEXT NOT NULL,
    status TEXT NOT NULL,
    due_date TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (department_id) REFERENCES departments(id),
    FOREIGN KEY (assigned_to) REFERENCES employees(id)
);

CREATE INDEX IF NOT EXISTS idx_employees_department
    ON employees(department_id, created_at);

CREATE INDEX IF NOT EXISTS idx_tasks_assignee
    ON tasks(assigned_to, status);

CREATE INDEX IF NOT EXISTS idx_tasks_department
    ON tasks(department_id, created_at);
"#;

/// SQLite-backed record store shared across request handlers.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database and apply the schema.
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database at {}", db_path))?;

        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to apply database schema")?;

        info!("💾 Database ready at {}", db_path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to apply database schema")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Seed a default admin account (and a department to hold it) on
    /// first boot so the service is reachable before any registration.
    pub fn seed_default_admin(&self) -> Result<()> {
        let admin_count: i64 = {
            let conn = self.conn.lock();
            conn.query_row(
                "SELECT COUNT(*) FROM employees WHERE role = 'admin'",
                [],
                |row| row.get(0),
            )
            .context("Failed to check for admin accounts")?
        };

        if admin_count > 0 {
            return Ok(());
        }

        let department = match self.department_by_name("General")? {
            Some(department) => department,
            None => self.create_department("General", "Default department")?,
        };

        self.create_employee(NewEmployee {
            name: "Administrator".to_string(),
            email: "admin@crewdesk.local".to_string(),
            password: "admin123".to_string(),
            role: Role::Admin,
            department_id: department.id,
            profile: Default::default(),
        })?;

        info!("🔐 Default admin created (email: admin@crewdesk.local, password: admin123)");
        warn!("⚠️  CHANGE DEFAULT PASSWORD IN PRODUCTION!");

        Ok(())
    }

    pub(crate) fn lock(&self) -> parking_lot::MutexGuard<'_, Connection> {
        self.conn.lock()
    }
}

/// Map a stored UUID column back to a `Uuid`, surfacing corruption as a
/// column conversion error instead of panicking.
pub(crate) fn column_uuid(idx: usize, raw: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Map a stored RFC 3339 timestamp column back to `DateTime<Utc>`.
pub(crate) fn column_timestamp(idx: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_default_admin_is_idempotent() {
        let db = Database::open_in_memory().unwrap();

        db.seed_default_admin().unwrap();
        db.seed_default_admin().unwrap();

        let admin = db
            .employee_by_email("admin@crewdesk.local")
            .unwrap()
            .expect("seeded admin should exist");
        assert_eq!(admin.role, Role::Admin);

        let general = db.department_by_name("General").unwrap();
        assert!(general.is_some());
    }

    #[test]
    fn test_open_creates_schema_on_disk() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let db = Database::open(temp.path().to_str().unwrap()).unwrap();

        assert!(db.all_departments().unwrap().is_empty());
    }
}
