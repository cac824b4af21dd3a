//! Storage contracts for employees and attendance.
//!
//! Implementations must enforce the unique indexes themselves: employee code,
//! employee email, and the `(employee_id, date)` pair on attendance. Stores rely
//! on them instead of checking before writing.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::StoreResult;
use crate::model::attendance::{Attendance, AttendanceMark, MarkOutcome};
use crate::model::employee::{Employee, EmployeeQuery, NewEmployee};

pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Inserts a new employee. A duplicate code or email yields
    /// `StoreError::Conflict`.
    async fn insert(&self, employee: NewEmployee) -> StoreResult<Employee>;

    async fn find(&self, id: u64) -> StoreResult<Option<Employee>>;

    async fn list(&self, query: &EmployeeQuery) -> StoreResult<Vec<Employee>>;

    /// Removes the employee together with all of its attendance rows in one
    /// unit of work. Returns the number of attendance rows removed, or `None`
    /// when no employee had this id.
    async fn delete_cascade(&self, id: u64) -> StoreResult<Option<u64>>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Atomically inserts the record for `(employee_id, date)` or overwrites
    /// status and notes of the existing one.
    async fn upsert(&self, mark: AttendanceMark) -> StoreResult<MarkOutcome>;

    /// Records of one employee, newest date first.
    async fn list_for_employee(
        &self,
        employee_id: u64,
        date: Option<NaiveDate>,
    ) -> StoreResult<Vec<Attendance>>;
}
