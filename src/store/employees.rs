//! Employee persistence.
//!
//! Passwords are hashed with bcrypt on the way in and verified with
//! `bcrypt::verify`; plaintext is never stored or compared directly.

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::{column_timestamp, column_uuid, Database};
use crate::models::{Employee, EmployeeProfile, Role};

/// Fields required to create an employee. The password arrives in
/// plaintext and is hashed before it touches the database.
#[derive(Debug)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub department_id: Uuid,
    pub profile: EmployeeProfile,
}

/// Partial update for an employee; `None` fields keep their value.
#[derive(Debug, Default)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub department_id: Option<Uuid>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
}

const EMPLOYEE_COLUMNS: &str =
    "id, name, email, password_hash, role, department_id, phone, address, position, created_at";

fn employee_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Employee> {
    let role_str: String = row.get(4)?;
    Ok(Employee {
        id: column_uuid(0, row.get(0)?)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: Role::from_str(&role_str).unwrap_or(Role::Employee),
        department_id: column_uuid(5, row.get(5)?)?,
        profile: EmployeeProfile {
            phone: row.get(6)?,
            address: row.get(7)?,
            position: row.get(8)?,
        },
        created_at: column_timestamp(9, row.get(9)?)?,
    })
}

impl Database {
    pub fn employee_by_id(&self, id: &Uuid) -> Result<Option<Employee>> {
        let conn = self.lock();
        conn.query_row(
            &format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?1"),
            params![id.to_string()],
            employee_from_row,
        )
        .optional()
        .context("Failed to look up employee by id")
    }

    pub fn employee_by_email(&self, email: &str) -> Result<Option<Employee>> {
        let conn = self.lock();
        conn.query_row(
            &format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE email = ?1"),
            params![email],
            employee_from_row,
        )
        .optional()
        .context("Failed to look up employee by email")
    }

    pub fn employee_by_name(&self, name: &str) -> Result<Option<Employee>> {
        let conn = self.lock();
        conn.query_row(
            &format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE name = ?1"),
            params![name],
            employee_from_row,
        )
        .optional()
        .context("Failed to look up employee by name")
    }

    /// Department roster in creation order. The selector depends on this
    /// ordering being stable for its tie-break behavior.
    pub fn employees_by_department(&self, department_id: &Uuid) -> Result<Vec<Employee>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees
             WHERE department_id = ?1 ORDER BY created_at, id"
        ))?;

        let employees = stmt
            .query_map(params![department_id.to_string()], employee_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list department employees")?;

        Ok(employees)
    }

    pub fn create_employee(&self, fields: NewEmployee) -> Result<Employee> {
        let password_hash = hash(&fields.password, DEFAULT_COST).context("Failed to hash password")?;

        let employee = Employee {
            id: Uuid::new_v4(),
            name: fields.name,
            email: fields.email,
            password_hash,
            role: fields.role,
            department_id: fields.department_id,
            profile: fields.profile,
            created_at: Utc::now(),
        };

        let conn = self.lock();
        conn.execute(
            &format!(
                "INSERT INTO employees ({EMPLOYEE_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            params![
                employee.id.to_string(),
                employee.name,
                employee.email,
                employee.password_hash,
                employee.role.as_str(),
                employee.department_id.to_string(),
                employee.profile.phone,
                employee.profile.address,
                employee.profile.position,
                employee.created_at.to_rfc3339(),
            ],
        )
        .context("Failed to insert employee")?;

        Ok(employee)
    }

    /// Verify an email/password pair. Unknown emails verify as false
    /// rather than erroring, so callers cannot distinguish the two.
    pub fn verify_password(&self, email: &str, password: &str) -> Result<bool> {
        match self.employee_by_email(email)? {
            Some(employee) => {
                verify(password, &employee.password_hash).context("Failed to verify password")
            }
            None => Ok(false),
        }
    }

    /// Apply a partial update to the employee with this name.
    pub fn update_employee_by_name(
        &self,
        name: &str,
        changes: EmployeeChanges,
    ) -> Result<Option<Employee>> {
        let Some(mut employee) = self.employee_by_name(name)? else {
            return Ok(None);
        };

        if let Some(new_name) = changes.name {
            employee.name = new_name;
        }
        if let Some(role) = changes.role {
            employee.role = role;
        }
        if let Some(department_id) = changes.department_id {
            employee.department_id = department_id;
        }
        if let Some(phone) = changes.phone {
            employee.profile.phone = Some(phone);
        }
        if let Some(address) = changes.address {
            employee.profile.address = Some(address);
        }
        if let Some(position) = changes.position {
            employee.profile.position = Some(position);
        }

        let conn = self.lock();
        conn.execute(
            "UPDATE employees
             SET name = ?1, role = ?2, department_id = ?3, phone = ?4, address = ?5, position = ?6
             WHERE id = ?7",
            params![
                employee.name,
                employee.role.as_str(),
                employee.department_id.to_string(),
                employee.profile.phone,
                employee.profile.address,
                employee.profile.position,
                employee.id.to_string(),
            ],
        )
        .context("Failed to update employee")?;

        Ok(Some(employee))
    }

    pub fn delete_employee_by_name(&self, name: &str) -> Result<bool> {
        let conn = self.lock();
        let rows = conn
            .execute("DELETE FROM employees WHERE name = ?1", params![name])
            .context("Failed to delete employee")?;

        Ok(rows > 0)
    }
}
