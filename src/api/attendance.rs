use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::StoreError;
use crate::model::attendance::{AttendanceView, MarkAttendance};
use crate::store::AttendanceStore;

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceListParams {
    /// Only the record for this date (YYYY-MM-DD)
    #[param(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
}

/// Mark attendance
///
/// Creates the record for the employee and date, or overwrites the status of
/// the existing one. `date` defaults to today.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance created", body = AttendanceView),
        (status = 200, description = "Existing attendance updated", body = AttendanceView),
        (status = 400, description = "Unknown employee, future date or invalid status", body = Object, example = json!({
            "code": "VALIDATION_FAILED",
            "message": "attendance date cannot be in the future",
            "field": "date"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    attendance: web::Data<AttendanceStore>,
    payload: web::Json<MarkAttendance>,
) -> actix_web::Result<impl Responder, StoreError> {
    let (view, created) = attendance.mark_view(payload.into_inner()).await?;

    if created {
        Ok(HttpResponse::Created().json(view))
    } else {
        Ok(HttpResponse::Ok().json(view))
    }
}

/// List attendance of an employee
#[utoipa::path(
    get,
    path = "/api/attendance/{employee_id}",
    params(
        ("employee_id" = u64, Path, description = "Employee ID"),
        AttendanceListParams
    ),
    responses(
        (status = 200, description = "Attendance records, newest date first", body = [AttendanceView]),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "code": "NOT_FOUND",
            "message": "employee 7 not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    attendance: web::Data<AttendanceStore>,
    path: web::Path<u64>,
    params: web::Query<AttendanceListParams>,
) -> actix_web::Result<impl Responder, StoreError> {
    let views = attendance
        .list_views(path.into_inner(), params.date)
        .await?;
    Ok(HttpResponse::Ok().json(views))
}
