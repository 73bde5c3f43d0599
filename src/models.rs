//! HR Domain Models
//! Mission: Define department, employee, and task data structures

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Employee roles for RBAC
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin, // Full access, manages departments and employees
    #[serde(rename = "employee")]
    Employee, // Regular access to HR endpoints
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Task lifecycle status. No state machine is enforced: any status may be
/// set at any time via the update endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(TaskStatus::Pending),
            "in-progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    /// Statuses that count toward an employee's open workload.
    pub const OPEN: [TaskStatus; 2] = [TaskStatus::Pending, TaskStatus::InProgress];
}

/// Department record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Contact and position details attached to an employee
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
}

/// Employee account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub role: Role,
    pub department_id: Uuid,
    pub profile: EmployeeProfile,
    pub created_at: DateTime<Utc>,
}

/// Task record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub department_id: Uuid,
    pub assigned_to: Uuid,
    pub status: TaskStatus,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Tasks fall due one week after creation unless a due date is supplied.
pub const DEFAULT_DUE_DAYS: i64 = 7;

impl Task {
    /// Build a new pending task for an assignee in a department.
    /// `due_date` defaults to creation time + 7 days.
    pub fn new(
        title: String,
        description: String,
        department_id: Uuid,
        assigned_to: Uuid,
        due_date: Option<DateTime<Utc>>,
    ) -> Self {
        let created_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            department_id,
            assigned_to,
            status: TaskStatus::Pending,
            due_date: due_date.unwrap_or(created_at + Duration::days(DEFAULT_DUE_DAYS)),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let admin = Role::Admin;
        let json = serde_json::to_string(&admin).unwrap();
        assert_eq!(json, r#""admin""#);

        let employee: Role = serde_json::from_str(r#""employee""#).unwrap();
        assert_eq!(employee, Role::Employee);
    }

    #[test]
    fn test_role_string_conversion() {
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::from_str("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_str("employee"), Some(Role::Employee));
        assert_eq!(Role::from_str("manager"), None);
    }

    #[test]
    fn test_task_status_round_trip() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
        ] {
            assert_eq!(TaskStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::from_str("done"), None);
    }

    #[test]
    fn test_in_progress_wire_format() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, r#""in-progress""#);
    }

    #[test]
    fn test_new_task_defaults_due_date_one_week_out() {
        let task = Task::new(
            "Quarterly review".to_string(),
            String::new(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
        );

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.due_date - task.created_at, Duration::days(7));
    }

    #[test]
    fn test_new_task_keeps_explicit_due_date() {
        let due = Utc::now() + Duration::days(2);
        let task = Task::new(
            "Onboarding".to_string(),
            "Prepare workstation".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Some(due),
        );

        assert_eq!(task.due_date, due);
    }

    #[test]
    fn test_employee_never_serializes_password_hash() {
        let employee = Employee {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            role: Role::Employee,
            department_id: Uuid::new_v4(),
            profile: EmployeeProfile::default(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&employee).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
    }
}
