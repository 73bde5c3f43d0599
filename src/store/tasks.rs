//! Task persistence and per-assignee workload counters.
//!
//! The counters back the least-loaded selector: `count_by_assignee` is
//! every task ever assigned, `count_by_assignee_and_status` narrows to a
//! status set. Task reads are scoped by department so a task id from one
//! department cannot address another department's task.

use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, OptionalExtension};
use uuid::Uuid;

use super::{column_timestamp, column_uuid, Database};
use crate::models::{Task, TaskStatus};

/// Partial update for a task; `None` fields keep their value. Status
/// transitions are unconstrained: any value may be set at any time.
#[derive(Debug, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

const TASK_COLUMNS: &str =
    "id, title, description, department_id, assigned_to, status, due_date, created_at";

fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let status_str: String = row.get(5)?;
    Ok(Task {
        id: column_uuid(0, row.get(0)?)?,
        title: row.get(1)?,
        description: row.get(2)?,
        department_id: column_uuid(3, row.get(3)?)?,
        assigned_to: column_uuid(4, row.get(4)?)?,
        status: TaskStatus::from_str(&status_str).unwrap_or(TaskStatus::Pending),
        due_date: column_timestamp(6, row.get(6)?)?,
        created_at: column_timestamp(7, row.get(7)?)?,
    })
}

impl Database {
    /// Count every task ever assigned to this employee, in any status.
    pub fn count_tasks_by_assignee(&self, employee_id: &Uuid) -> Result<i64> {
        let conn = self.lock();
        conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE assigned_to = ?1",
            params![employee_id.to_string()],
            |row| row.get(0),
        )
        .context("Failed to count tasks by assignee")
    }

    /// Count tasks assigned to this employee with one of the given statuses.
    pub fn count_tasks_by_assignee_and_status(
        &self,
        employee_id: &Uuid,
        statuses: &[TaskStatus],
    ) -> Result<i64> {
        if statuses.is_empty() {
            return Ok(0);
        }

        let placeholders = (2..=statuses.len() + 1)
            .map(|n| format!("?{n}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT COUNT(*) FROM tasks WHERE assigned_to = ?1 AND status IN ({placeholders})"
        );

        let mut values = vec![employee_id.to_string()];
        values.extend(statuses.iter().map(|s| s.as_str().to_string()));

        let conn = self.lock();
        conn.query_row(&sql, params_from_iter(values), |row| row.get(0))
            .context("Failed to count tasks by assignee and status")
    }

    pub fn tasks_by_department(&self, department_id: &Uuid) -> Result<Vec<Task>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE department_id = ?1 ORDER BY created_at, id"
        ))?;

        let tasks = stmt
            .query_map(params![department_id.to_string()], task_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list department tasks")?;

        Ok(tasks)
    }

    pub fn task_by_id(&self, id: &Uuid, department_id: &Uuid) -> Result<Option<Task>> {
        let conn = self.lock();
        conn.query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND department_id = ?2"),
            params![id.to_string(), department_id.to_string()],
            task_from_row,
        )
        .optional()
        .context("Failed to look up task")
    }

    pub fn create_task(&self, task: &Task) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            &format!(
                "INSERT INTO tasks ({TASK_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
            ),
            params![
                task.id.to_string(),
                task.title,
                task.description,
                task.department_id.to_string(),
                task.assigned_to.to_string(),
                task.status.as_str(),
                task.due_date.to_rfc3339(),
                task.created_at.to_rfc3339(),
            ],
        )
        .context("Failed to insert task")?;

        Ok(())
    }

    /// Apply a partial update to an already-loaded task and persist it.
    /// The department/assignee invariant is not re-validated here; it is
    /// enforced at creation only.
    pub fn update_task(&self, task: &Task, changes: TaskChanges) -> Result<Task> {
        let mut updated = task.clone();

        if let Some(title) = changes.title {
            updated.title = title;
        }
        if let Some(description) = changes.description {
            updated.description = description;
        }
        if let Some(status) = changes.status {
            updated.status = status;
        }
        if let Some(assigned_to) = changes.assigned_to {
            updated.assigned_to = assigned_to;
        }
        if let Some(due_date) = changes.due_date {
            updated.due_date = due_date;
        }

        let conn = self.lock();
        conn.execute(
            "UPDATE tasks
             SET title = ?1, description = ?2, status = ?3, assigned_to = ?4, due_date = ?5
             WHERE id = ?6",
            params![
                updated.title,
                updated.description,
                updated.status.as_str(),
                updated.assigned_to.to_string(),
                updated.due_date.to_rfc3339(),
                updated.id.to_string(),
            ],
        )
        .context("Failed to update task")?;

        Ok(updated)
    }

    pub fn delete_task_by_id(&self, id: &Uuid, department_id: &Uuid) -> Result<bool> {
        let conn = self.lock();
        let rows = conn
            .execute(
                "DELETE FROM tasks WHERE id = ?1 AND department_id = ?2",
                params![id.to_string(), department_id.to_string()],
            )
            .context("Failed to delete task")?;

        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeProfile, Role};
    use crate::store::NewEmployee;

    fn seeded_db() -> (Database, Uuid, Uuid) {
        let db = Database::open_in_memory().unwrap();
        let department = db.create_department("Engineering", "").unwrap();
        let employee = db
            .create_employee(NewEmployee {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password: "hunter2hunter2".to_string(),
                role: Role::Employee,
                department_id: department.id,
                profile: EmployeeProfile::default(),
            })
            .unwrap();
        (db, department.id, employee.id)
    }

    fn insert_task(db: &Database, dept: Uuid, assignee: Uuid, status: TaskStatus) -> Task {
        let mut task = Task::new("t".to_string(), String::new(), dept, assignee, None);
        task.status = status;
        db.create_task(&task).unwrap();
        task
    }

    #[test]
    fn test_counters_split_total_and_open() {
        let (db, dept, emp) = seeded_db();

        insert_task(&db, dept, emp, TaskStatus::Pending);
        insert_task(&db, dept, emp, TaskStatus::InProgress);
        insert_task(&db, dept, emp, TaskStatus::Completed);

        assert_eq!(db.count_tasks_by_assignee(&emp).unwrap(), 3);
        assert_eq!(
            db.count_tasks_by_assignee_and_status(&emp, &TaskStatus::OPEN)
                .unwrap(),
            2
        );
        assert_eq!(
            db.count_tasks_by_assignee_and_status(&emp, &[TaskStatus::Completed])
                .unwrap(),
            1
        );
        assert_eq!(db.count_tasks_by_assignee_and_status(&emp, &[]).unwrap(), 0);
    }

    #[test]
    fn test_task_lookup_is_department_scoped() {
        let (db, dept, emp) = seeded_db();
        let other = db.create_department("Marketing", "").unwrap();

        let task = insert_task(&db, dept, emp, TaskStatus::Pending);

        assert!(db.task_by_id(&task.id, &dept).unwrap().is_some());
        assert!(db.task_by_id(&task.id, &other.id).unwrap().is_none());
        assert!(!db.delete_task_by_id(&task.id, &other.id).unwrap());
        assert!(db.delete_task_by_id(&task.id, &dept).unwrap());
    }

    #[test]
    fn test_update_applies_only_given_fields() {
        let (db, dept, emp) = seeded_db();
        let task = insert_task(&db, dept, emp, TaskStatus::Pending);

        let updated = db
            .update_task(
                &task,
                TaskChanges {
                    status: Some(TaskStatus::Completed),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.title, task.title);

        let reloaded = db.task_by_id(&task.id, &dept).unwrap().unwrap();
        assert_eq!(reloaded.status, TaskStatus::Completed);
    }

    #[test]
    fn test_status_can_move_backwards() {
        // No state machine: completed -> pending is allowed.
        let (db, dept, emp) = seeded_db();
        let task = insert_task(&db, dept, emp, TaskStatus::Completed);

        let updated = db
            .update_task(
                &task,
                TaskChanges {
                    status: Some(TaskStatus::Pending),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.status, TaskStatus::Pending);
    }
}
