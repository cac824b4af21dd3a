//! Business rules over the repositories.

pub mod attendance;
pub mod employee;
pub mod hooks;

pub use attendance::{AttendanceStore, Today};
pub use employee::EmployeeStore;
pub use hooks::{EmployeeCreatedHook, SeedAbsentAttendance};
