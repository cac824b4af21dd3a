use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::hooks::EmployeeCreatedHook;
use crate::error::{StoreError, StoreResult};
use crate::model::employee::{CreateEmployee, Employee, EmployeeQuery, NewEmployee};
use crate::repo::EmployeeRepository;
use crate::utils::validation::{
    self, MAX_CODE_LEN, MAX_DEPARTMENT_LEN, MAX_NAME_LEN,
};

/// Owns employee records: validation, uniqueness and cascading deletion.
#[derive(Clone)]
pub struct EmployeeStore {
    repo: Arc<dyn EmployeeRepository>,
    hooks: Vec<Arc<dyn EmployeeCreatedHook>>,
}

impl EmployeeStore {
    pub fn new(repo: Arc<dyn EmployeeRepository>) -> Self {
        Self {
            repo,
            hooks: Vec::new(),
        }
    }

    /// Registers a callback run after every successful `create`.
    pub fn with_hook(mut self, hook: Arc<dyn EmployeeCreatedHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    #[instrument(skip(self, input), fields(employee_code = %input.employee_code))]
    pub async fn create(&self, input: CreateEmployee) -> StoreResult<Employee> {
        let new = NewEmployee {
            employee_code: validation::required_text(
                "employee_code",
                &input.employee_code,
                MAX_CODE_LEN,
            )?,
            full_name: validation::required_text("full_name", &input.full_name, MAX_NAME_LEN)?,
            email: validation::email(&input.email)?,
            department: validation::bounded_text(
                "department",
                &input.department,
                MAX_DEPARTMENT_LEN,
            )?,
        };

        let employee = self.repo.insert(new).await?;
        info!(employee_id = employee.id, "Employee created");

        // Hooks run after the insert; their failures do not undo it.
        for hook in &self.hooks {
            if let Err(e) = hook.on_employee_created(&employee).await {
                warn!(
                    error = %e,
                    hook = hook.name(),
                    employee_id = employee.id,
                    "Post-create hook failed"
                );
            }
        }

        Ok(employee)
    }

    pub async fn list(&self, query: &EmployeeQuery) -> StoreResult<Vec<Employee>> {
        let query = EmployeeQuery {
            search: query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            ordering: query.ordering,
        };
        self.repo.list(&query).await
    }

    pub async fn get(&self, id: u64) -> StoreResult<Employee> {
        self.repo
            .find(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("employee {id} not found")))
    }

    /// Deletes the employee and, by cascade, all of its attendance records.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> StoreResult<()> {
        match self.repo.delete_cascade(id).await? {
            Some(removed_attendance) => {
                info!(employee_id = id, removed_attendance, "Employee deleted");
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("employee {id} not found"))),
        }
    }
}
