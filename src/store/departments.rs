//! Department persistence.
//!
//! Departments are addressed by unique name at the API boundary, so the
//! store exposes name-keyed lookup, update, and delete alongside the
//! id-keyed reads the task handlers need.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::{column_timestamp, column_uuid, Database};
use crate::models::Department;

/// Partial update for a department; `None` fields keep their value.
#[derive(Debug, Default)]
pub struct DepartmentChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

fn department_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        id: column_uuid(0, row.get(0)?)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: column_timestamp(3, row.get(3)?)?,
    })
}

impl Database {
    pub fn department_by_name(&self, name: &str) -> Result<Option<Department>> {
        let conn = self.lock();
        conn.query_row(
            "SELECT id, name, description, created_at FROM departments WHERE name = ?1",
            params![name],
            department_from_row,
        )
        .optional()
        .context("Failed to look up department by name")
    }

    pub fn department_by_id(&self, id: &Uuid) -> Result<Option<Department>> {
        let conn = self.lock();
        conn.query_row(
            "SELECT id, name, description, created_at FROM departments WHERE id = ?1",
            params![id.to_string()],
            department_from_row,
        )
        .optional()
        .context("Failed to look up department by id")
    }

    pub fn all_departments(&self) -> Result<Vec<Department>> {
        let conn = self.lock();
        let mut stmt = conn
            .prepare("SELECT id, name, description, created_at FROM departments ORDER BY name")?;

        let departments = stmt
            .query_map([], department_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list departments")?;

        Ok(departments)
    }

    pub fn create_department(&self, name: &str, description: &str) -> Result<Department> {
        let department = Department {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };

        let conn = self.lock();
        conn.execute(
            "INSERT INTO departments (id, name, description, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                department.id.to_string(),
                department.name,
                department.description,
                department.created_at.to_rfc3339(),
            ],
        )
        .context("Failed to insert department")?;

        Ok(department)
    }

    /// Apply a partial update to the department with this name.
    /// Returns the updated record, or `None` when no such department exists.
    pub fn update_department_by_name(
        &self,
        name: &str,
        changes: DepartmentChanges,
    ) -> Result<Option<Department>> {
        let Some(mut department) = self.department_by_name(name)? else {
            return Ok(None);
        };

        if let Some(new_name) = changes.name {
            department.name = new_name;
        }
        if let Some(description) = changes.description {
            department.description = description;
        }

        let conn = self.lock();
        conn.execute(
            "UPDATE departments SET name = ?1, description = ?2 WHERE id = ?3",
            params![
                department.name,
                department.description,
                department.id.to_string(),
            ],
        )
        .context("Failed to update department")?;

        Ok(Some(department))
    }

    /// Delete by name. Returns false when no row matched.
    pub fn delete_department_by_name(&self, name: &str) -> Result<bool> {
        let conn = self.lock();
        let rows = conn
            .execute("DELETE FROM departments WHERE name = ?1", params![name])
            .context("Failed to delete department")?;

        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_find_by_name() {
        let db = Database::open_in_memory().unwrap();

        let created = db.create_department("Engineering", "Builds things").unwrap();
        let found = db.department_by_name("Engineering").unwrap().unwrap();

        assert_eq!(found.id, created.id);
        assert_eq!(found.description, "Builds things");
        assert!(db.department_by_name("Marketing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let db = Database::open_in_memory().unwrap();

        db.create_department("Engineering", "").unwrap();
        assert!(db.create_department("Engineering", "again").is_err());
    }

    #[test]
    fn test_partial_update_keeps_unset_fields() {
        let db = Database::open_in_memory().unwrap();
        db.create_department("Engineering", "Builds things").unwrap();

        let updated = db
            .update_department_by_name(
                "Engineering",
                DepartmentChanges {
                    name: None,
                    description: Some("Ships things".to_string()),
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Engineering");
        assert_eq!(updated.description, "Ships things");
    }

    #[test]
    fn test_update_missing_department_returns_none() {
        let db = Database::open_in_memory().unwrap();

        let result = db
            .update_department_by_name("Ghost", DepartmentChanges::default())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_delete_by_name() {
        let db = Database::open_in_memory().unwrap();
        db.create_department("Temp", "").unwrap();

        assert!(db.delete_department_by_name("Temp").unwrap());
        assert!(!db.delete_department_by_name("Temp").unwrap());
    }
}
