//! Least-loaded assignee selection.
//!
//! Recomputed fully on every task creation: O(employees × tasks) against
//! the store, which is fine for a single department's roster. Nothing
//! serializes concurrent creations, so two racing requests can read the
//! same snapshot and land on the same employee.

use anyhow::Result;
use uuid::Uuid;

use crate::models::{Employee, TaskStatus};
use crate::store::Database;

/// Workload snapshot for one candidate.
#[derive(Debug)]
pub struct EmployeeLoad {
    pub employee: Employee,
    pub total_tasks: i64,
    pub pending_tasks: i64,
}

/// Choose who receives the next task in a department.
///
/// Minimizes total task count, then open (pending/in-progress) task
/// count. Remaining ties keep the earliest candidate in roster order,
/// a stability guarantee rather than randomness. Returns `Ok(None)` for
/// an empty roster; the caller must treat that as an assignment failure
/// and create no task.
pub fn select_assignee(db: &Database, department_id: &Uuid) -> Result<Option<Employee>> {
    let roster = db.employees_by_department(department_id)?;
    if roster.is_empty() {
        return Ok(None);
    }

    let mut loads = Vec::with_capacity(roster.len());
    for employee in roster {
        let total_tasks = db.count_tasks_by_assignee(&employee.id)?;
        let pending_tasks = db.count_tasks_by_assignee_and_status(&employee.id, &TaskStatus::OPEN)?;
        loads.push(EmployeeLoad {
            employee,
            total_tasks,
            pending_tasks,
        });
    }

    // min_by_key keeps the first of equal minimums, which is exactly the
    // tie-break we want. Falling back to index 0 cannot trigger with a
    // non-empty roster; first-in-roster is the policy if it ever did.
    let best = loads
        .iter()
        .enumerate()
        .min_by_key(|(_, load)| (load.total_tasks, load.pending_tasks))
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    Ok(Some(loads.swap_remove(best).employee))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeProfile, Role, Task};
    use crate::store::NewEmployee;

    fn seeded_db() -> (Database, Uuid) {
        let db = Database::open_in_memory().unwrap();
        let department = db.create_department("Engineering", "").unwrap();
        (db, department.id)
    }

    fn add_employee(db: &Database, dept: Uuid, email: &str) -> Employee {
        db.create_employee(NewEmployee {
            name: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            password: "hunter2hunter2".to_string(),
            role: Role::Employee,
            department_id: dept,
            profile: EmployeeProfile::default(),
        })
        .unwrap()
    }

    fn add_task(db: &Database, dept: Uuid, assignee: Uuid, status: TaskStatus) {
        let mut task = Task::new("t".to_string(), String::new(), dept, assignee, None);
        task.status = status;
        db.create_task(&task).unwrap();
    }

    #[test]
    fn test_empty_department_selects_nobody() {
        let (db, dept) = seeded_db();
        assert!(select_assignee(&db, &dept).unwrap().is_none());
    }

    #[test]
    fn test_single_candidate_is_selected() {
        let (db, dept) = seeded_db();
        let only = add_employee(&db, dept, "solo@example.com");

        let picked = select_assignee(&db, &dept).unwrap().unwrap();
        assert_eq!(picked.id, only.id);
    }

    #[test]
    fn test_lower_total_wins_regardless_of_pending() {
        let (db, dept) = seeded_db();
        let e1 = add_employee(&db, dept, "e1@example.com");
        let e2 = add_employee(&db, dept, "e2@example.com");

        // E1: 1 total (completed). E2: 3 total, none open.
        add_task(&db, dept, e1.id, TaskStatus::Completed);
        for _ in 0..3 {
            add_task(&db, dept, e2.id, TaskStatus::Completed);
        }

        let picked = select_assignee(&db, &dept).unwrap().unwrap();
        assert_eq!(picked.id, e1.id);
    }

    #[test]
    fn test_total_tie_broken_by_pending() {
        let (db, dept) = seeded_db();
        let e1 = add_employee(&db, dept, "e1@example.com");
        let e2 = add_employee(&db, dept, "e2@example.com");

        // Both have 2 total; E1 has 1 open, E2 has 0.
        add_task(&db, dept, e1.id, TaskStatus::Pending);
        add_task(&db, dept, e1.id, TaskStatus::Completed);
        add_task(&db, dept, e2.id, TaskStatus::Completed);
        add_task(&db, dept, e2.id, TaskStatus::Completed);

        let picked = select_assignee(&db, &dept).unwrap().unwrap();
        assert_eq!(picked.id, e2.id);
    }

    #[test]
    fn test_in_progress_counts_as_open() {
        let (db, dept) = seeded_db();
        let e1 = add_employee(&db, dept, "e1@example.com");
        let e2 = add_employee(&db, dept, "e2@example.com");

        add_task(&db, dept, e1.id, TaskStatus::InProgress);
        add_task(&db, dept, e2.id, TaskStatus::Completed);

        let picked = select_assignee(&db, &dept).unwrap().unwrap();
        assert_eq!(picked.id, e2.id);
    }

    #[test]
    fn test_full_tie_keeps_roster_order() {
        let (db, dept) = seeded_db();
        let e1 = add_employee(&db, dept, "e1@example.com");
        let _e2 = add_employee(&db, dept, "e2@example.com");
        let _e3 = add_employee(&db, dept, "e3@example.com");

        // No tasks at all: everyone ties at (0, 0); first registered wins.
        let picked = select_assignee(&db, &dept).unwrap().unwrap();
        assert_eq!(picked.id, e1.id);
    }

    #[test]
    fn test_other_departments_do_not_leak_in() {
        let (db, dept) = seeded_db();
        let other = db.create_department("Marketing", "").unwrap();
        let insider = add_employee(&db, dept, "in@example.com");
        let outsider = add_employee(&db, other.id, "out@example.com");

        // The outsider is idle but must never be picked for this department.
        add_task(&db, dept, insider.id, TaskStatus::Pending);

        let picked = select_assignee(&db, &dept).unwrap().unwrap();
        assert_eq!(picked.id, insider.id);
        assert_ne!(picked.id, outsider.id);
    }
}
