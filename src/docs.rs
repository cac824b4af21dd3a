use crate::model::attendance::{AttendanceStatus, AttendanceView, MarkAttendance};
use crate::model::employee::{CreateEmployee, Employee};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Lite API",
        version = "0.1.0",
        description = r#"
## HRM Lite

Employee records and their daily attendance.

### Key Features
- **Employees**: create, list (search and ordering), view and delete.
  Deleting an employee deletes its attendance.
- **Attendance**: mark one status per employee and day
  (`Present`, `Absent` or `Leave`). Marking the same day again updates the
  existing record instead of failing.

### Errors
Every error body has the form `{"code": "...", "message": "..."}`; validation
errors also carry the offending `field`.
"#,
    ),
    paths(
        crate::api::health::health_check,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::list_attendance
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            AttendanceStatus,
            AttendanceView,
            MarkAttendance
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;
