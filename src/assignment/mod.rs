//! Task Assignment
//! Mission: Pick the least-loaded employee for each new task

pub mod selector;

pub use selector::{select_assignee, EmployeeLoad};
