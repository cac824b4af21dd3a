//! HRM Lite: employee records and daily attendance.
//!
//! `store` holds the rules (uniqueness, validation, idempotent attendance
//! marking); `repo` the storage behind them; `api`/`routes` the HTTP surface.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod repo;
pub mod routes;
pub mod store;
pub mod utils;

pub use error::{StoreError, StoreResult};

use repo::{AttendanceRepository, EmployeeRepository};
use store::{AttendanceStore, EmployeeStore, SeedAbsentAttendance, Today};

/// Both stores wired to one repository.
#[derive(Clone)]
pub struct Stores {
    pub employees: EmployeeStore,
    pub attendance: AttendanceStore,
}

impl Stores {
    pub fn build<R>(repo: Arc<R>, seed_absent_on_create: bool) -> Self
    where
        R: EmployeeRepository + AttendanceRepository + 'static,
    {
        Self::assemble(repo, seed_absent_on_create, None)
    }

    /// Same as [`Stores::build`] with a fixed notion of "today".
    pub fn build_with_clock<R>(repo: Arc<R>, seed_absent_on_create: bool, today: Today) -> Self
    where
        R: EmployeeRepository + AttendanceRepository + 'static,
    {
        Self::assemble(repo, seed_absent_on_create, Some(today))
    }

    fn assemble<R>(repo: Arc<R>, seed_absent_on_create: bool, today: Option<Today>) -> Self
    where
        R: EmployeeRepository + AttendanceRepository + 'static,
    {
        let employee_repo: Arc<dyn EmployeeRepository> = repo.clone();
        let attendance_repo: Arc<dyn AttendanceRepository> = repo;

        let mut attendance = AttendanceStore::new(employee_repo.clone(), attendance_repo);
        if let Some(today) = today {
            attendance = attendance.with_clock(today);
        }

        let mut employees = EmployeeStore::new(employee_repo);
        if seed_absent_on_create {
            employees =
                employees.with_hook(Arc::new(SeedAbsentAttendance::new(attendance.clone())));
        }

        Self {
            employees,
            attendance,
        }
    }
}
