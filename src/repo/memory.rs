use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::{AttendanceRepository, EmployeeRepository};
use crate::error::{StoreError, StoreResult};
use crate::model::attendance::{Attendance, AttendanceMark, MarkOutcome};
use crate::model::employee::{Employee, EmployeeOrdering, EmployeeQuery, NewEmployee};

#[derive(Default)]
struct State {
    last_employee_id: u64,
    last_attendance_id: u64,
    employees: BTreeMap<u64, Employee>,
    attendance: BTreeMap<u64, Attendance>,
    // unique index on (employee_id, date)
    attendance_key: HashMap<(u64, NaiveDate), u64>,
}

/// Process-local repository with the same constraints as the MySQL schema.
///
/// All state sits behind one mutex, so every operation, including the
/// attendance upsert, is a single critical section.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<State>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Storage(anyhow!("in-memory store lock poisoned")))
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryRepository {
    async fn insert(&self, new: NewEmployee) -> StoreResult<Employee> {
        let mut state = self.lock()?;

        if state
            .employees
            .values()
            .any(|e| e.employee_code.eq_ignore_ascii_case(&new.employee_code))
        {
            return Err(StoreError::Conflict(format!(
                "employee with code '{}' already exists",
                new.employee_code
            )));
        }
        if state.employees.values().any(|e| e.email == new.email) {
            return Err(StoreError::Conflict(format!(
                "employee with email '{}' already exists",
                new.email
            )));
        }

        state.last_employee_id += 1;
        let now = Utc::now();
        let employee = Employee {
            id: state.last_employee_id,
            employee_code: new.employee_code,
            full_name: new.full_name,
            email: new.email,
            department: new.department,
            created_at: now,
            updated_at: now,
        };
        state.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn find(&self, id: u64) -> StoreResult<Option<Employee>> {
        Ok(self.lock()?.employees.get(&id).cloned())
    }

    async fn list(&self, query: &EmployeeQuery) -> StoreResult<Vec<Employee>> {
        let state = self.lock()?;
        let mut employees: Vec<Employee> = state
            .employees
            .values()
            .filter(|e| query.search.as_deref().is_none_or(|s| e.matches_search(s)))
            .cloned()
            .collect();

        match query.ordering {
            EmployeeOrdering::NewestFirst => {
                employees.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)))
            }
            EmployeeOrdering::OldestFirst => {
                employees.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)))
            }
            EmployeeOrdering::NameAsc => {
                employees.sort_by(|a, b| (&a.full_name, a.id).cmp(&(&b.full_name, b.id)))
            }
            EmployeeOrdering::NameDesc => {
                employees.sort_by(|a, b| (&b.full_name, b.id).cmp(&(&a.full_name, a.id)))
            }
        }
        Ok(employees)
    }

    async fn delete_cascade(&self, id: u64) -> StoreResult<Option<u64>> {
        let mut state = self.lock()?;
        if state.employees.remove(&id).is_none() {
            return Ok(None);
        }

        let owned: Vec<(u64, NaiveDate)> = state
            .attendance
            .values()
            .filter(|a| a.employee_id == id)
            .map(|a| (a.id, a.date))
            .collect();
        for (attendance_id, date) in &owned {
            state.attendance.remove(attendance_id);
            state.attendance_key.remove(&(id, *date));
        }
        Ok(Some(owned.len() as u64))
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryRepository {
    async fn upsert(&self, mark: AttendanceMark) -> StoreResult<MarkOutcome> {
        let mut state = self.lock()?;
        if !state.employees.contains_key(&mark.employee_id) {
            return Err(StoreError::validation("employee", "employee not found"));
        }

        let now = Utc::now();
        let key = (mark.employee_id, mark.date);

        if let Some(existing_id) = state.attendance_key.get(&key).copied() {
            let record = state.attendance.get_mut(&existing_id).ok_or_else(|| {
                StoreError::Storage(anyhow!("attendance index points at missing row {existing_id}"))
            })?;
            record.status = mark.status;
            record.notes = mark.notes;
            record.updated_at = now;
            return Ok(MarkOutcome {
                attendance: record.clone(),
                created: false,
            });
        }

        state.last_attendance_id += 1;
        let attendance = Attendance {
            id: state.last_attendance_id,
            employee_id: mark.employee_id,
            date: mark.date,
            status: mark.status,
            notes: mark.notes,
            created_at: now,
            updated_at: now,
        };
        state.attendance_key.insert(key, attendance.id);
        state.attendance.insert(attendance.id, attendance.clone());
        Ok(MarkOutcome {
            attendance,
            created: true,
        })
    }

    async fn list_for_employee(
        &self,
        employee_id: u64,
        date: Option<NaiveDate>,
    ) -> StoreResult<Vec<Attendance>> {
        let state = self.lock()?;
        let mut records: Vec<Attendance> = state
            .attendance
            .values()
            .filter(|a| a.employee_id == employee_id)
            .filter(|a| date.is_none_or(|d| a.date == d))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }
}
