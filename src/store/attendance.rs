use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, instrument};

use crate::error::{StoreError, StoreResult};
use crate::model::attendance::{
    Attendance, AttendanceMark, AttendanceStatus, AttendanceView, MarkAttendance, MarkOutcome,
};
use crate::model::employee::Employee;
use crate::repo::{AttendanceRepository, EmployeeRepository};
use crate::utils::validation;

/// Source of "today" for defaulting and future-date checks.
pub type Today = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Owns attendance records; at most one per employee and date.
#[derive(Clone)]
pub struct AttendanceStore {
    employees: Arc<dyn EmployeeRepository>,
    records: Arc<dyn AttendanceRepository>,
    today: Today,
}

impl AttendanceStore {
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        records: Arc<dyn AttendanceRepository>,
    ) -> Self {
        Self {
            employees,
            records,
            today: Arc::new(local_today),
        }
    }

    pub fn with_clock(mut self, today: Today) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    /// Creates or overwrites the record for the employee and date.
    ///
    /// Marking the same day twice is not an error: the second call replaces
    /// status and notes and reports `created = false`.
    pub async fn mark(&self, input: MarkAttendance) -> StoreResult<MarkOutcome> {
        let (_, outcome) = self.mark_for(input).await?;
        Ok(outcome)
    }

    /// Same as [`mark`](Self::mark), decorated with the employee it was
    /// validated against. The flag is `created`.
    pub async fn mark_view(&self, input: MarkAttendance) -> StoreResult<(AttendanceView, bool)> {
        let (employee, outcome) = self.mark_for(input).await?;
        Ok((
            AttendanceView::new(outcome.attendance, &employee),
            outcome.created,
        ))
    }

    #[instrument(skip(self, input), fields(employee_id = input.employee))]
    async fn mark_for(&self, input: MarkAttendance) -> StoreResult<(Employee, MarkOutcome)> {
        let today = self.today();
        let date = input.date.unwrap_or(today);

        let Some(employee) = self.employees.find(input.employee).await? else {
            return Err(StoreError::validation("employee", "employee not found"));
        };

        if date > today {
            return Err(StoreError::validation(
                "date",
                "attendance date cannot be in the future",
            ));
        }

        let status = input.status.trim().parse::<AttendanceStatus>().map_err(|_| {
            StoreError::validation(
                "status",
                format!(
                    "'{}' is not a valid status, expected one of: {}",
                    input.status,
                    AttendanceStatus::allowed()
                ),
            )
        })?;

        let outcome = self
            .records
            .upsert(AttendanceMark {
                employee_id: employee.id,
                date,
                status,
                notes: validation::optional_notes(input.notes.as_deref()),
            })
            .await?;

        info!(
            %date,
            %status,
            created = outcome.created,
            attendance_id = outcome.attendance.id,
            "Attendance marked"
        );
        Ok((employee, outcome))
    }

    /// Records of one employee, newest date first, optionally for one date.
    pub async fn list_for_employee(
        &self,
        employee_id: u64,
        date: Option<NaiveDate>,
    ) -> StoreResult<Vec<Attendance>> {
        let (_, records) = self.records_of(employee_id, date).await?;
        Ok(records)
    }

    /// [`list_for_employee`](Self::list_for_employee) as views of the owning employee.
    pub async fn list_views(
        &self,
        employee_id: u64,
        date: Option<NaiveDate>,
    ) -> StoreResult<Vec<AttendanceView>> {
        let (employee, records) = self.records_of(employee_id, date).await?;
        Ok(records
            .into_iter()
            .map(|record| AttendanceView::new(record, &employee))
            .collect())
    }

    async fn records_of(
        &self,
        employee_id: u64,
        date: Option<NaiveDate>,
    ) -> StoreResult<(Employee, Vec<Attendance>)> {
        let Some(employee) = self.employees.find(employee_id).await? else {
            return Err(StoreError::NotFound(format!(
                "employee {employee_id} not found"
            )));
        };
        let records = self.records.list_for_employee(employee_id, date).await?;
        Ok((employee, records))
    }
}
