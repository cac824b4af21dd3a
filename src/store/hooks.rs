use async_trait::async_trait;

use super::attendance::AttendanceStore;
use crate::error::StoreResult;
use crate::model::attendance::{AttendanceStatus, MarkAttendance};
use crate::model::employee::Employee;

/// Callback invoked by [`EmployeeStore`](super::EmployeeStore) after a new
/// employee has been stored.
#[async_trait]
pub trait EmployeeCreatedHook: Send + Sync {
    fn name(&self) -> &'static str;

    async fn on_employee_created(&self, employee: &Employee) -> StoreResult<()>;
}

/// Seeds today's attendance as Absent for every new employee.
pub struct SeedAbsentAttendance {
    attendance: AttendanceStore,
}

impl SeedAbsentAttendance {
    pub fn new(attendance: AttendanceStore) -> Self {
        Self { attendance }
    }
}

#[async_trait]
impl EmployeeCreatedHook for SeedAbsentAttendance {
    fn name(&self) -> &'static str {
        "seed_absent_attendance"
    }

    async fn on_employee_created(&self, employee: &Employee) -> StoreResult<()> {
        self.attendance
            .mark(MarkAttendance {
                employee: employee.id,
                date: None,
                status: AttendanceStatus::Absent.to_string(),
                notes: None,
            })
            .await?;
        Ok(())
    }
}
