use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::StoreError;
use crate::model::employee::{CreateEmployee, EmployeeOrdering, EmployeeQuery};
use crate::store::EmployeeStore;

#[derive(Debug, Deserialize, IntoParams)]
pub struct EmployeeListParams {
    /// Search by name, employee code, email or department
    pub search: Option<String>,
    /// One of `-created_at` (default), `created_at`, `full_name`, `-full_name`
    pub ordering: Option<String>,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = crate::model::employee::Employee),
        (status = 400, description = "Invalid input", body = Object, example = json!({
            "code": "VALIDATION_FAILED",
            "message": "enter a valid email address",
            "field": "email"
        })),
        (status = 409, description = "Employee code or email already exists", body = Object, example = json!({
            "code": "ALREADY_EXISTS",
            "message": "employee with code 'E1' already exists"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    store: web::Data<EmployeeStore>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder, StoreError> {
    let employee = store.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(employee))
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeListParams),
    responses(
        (status = 200, description = "All employees, newest first by default", body = [crate::model::employee::Employee]),
        (status = 400, description = "Unknown ordering")
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    store: web::Data<EmployeeStore>,
    params: web::Query<EmployeeListParams>,
) -> actix_web::Result<impl Responder, StoreError> {
    let ordering = match params.ordering.as_deref() {
        None | Some("") => EmployeeOrdering::default(),
        Some(raw) => EmployeeOrdering::parse(raw).ok_or_else(|| {
            StoreError::validation("ordering", format!("unsupported ordering '{raw}'"))
        })?,
    };

    let query = EmployeeQuery {
        search: params.search.clone(),
        ordering,
    };
    let employees = store.list(&query).await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id" = u64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = crate::model::employee::Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "code": "NOT_FOUND",
            "message": "employee 7 not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    store: web::Data<EmployeeStore>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder, StoreError> {
    let employee = store.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Delete Employee
///
/// Attendance records of the employee are deleted with it.
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id" = u64, Path, description = "Employee ID")
    ),
    responses(
        (status = 204, description = "Employee and its attendance deleted"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "code": "NOT_FOUND",
            "message": "employee 7 not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    store: web::Data<EmployeeStore>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder, StoreError> {
    store.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
