use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;

use super::employee::Employee;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    AsRefStr, EnumIter, ToSchema,
)]
#[strum(ascii_case_insensitive)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
}

impl AttendanceStatus {
    /// Comma separated list of accepted values, for error messages.
    pub fn allowed() -> String {
        AttendanceStatus::iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = "2024-01-10", format = "date", value_type = String)]
    pub date: NaiveDate,

    pub status: AttendanceStatus,

    #[schema(example = "Worked from home", nullable = true)]
    pub notes: Option<String>,

    #[schema(example = "2024-01-10T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,

    #[schema(example = "2024-01-10T09:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

/// Row shape as stored in MySQL; `status` is a VARCHAR there.
#[derive(Debug, sqlx::FromRow)]
pub struct AttendanceRow {
    pub id: u64,
    pub employee_id: u64,
    pub date: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<AttendanceRow> for Attendance {
    type Error = strum::ParseError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        Ok(Attendance {
            id: row.id,
            employee_id: row.employee_id,
            date: row.date,
            status: row.status.parse()?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Mark-attendance payload as received from a caller. `date` defaults to
/// today; `status` is checked against [`AttendanceStatus`].
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = 1)]
    pub employee: u64,
    #[serde(default)]
    #[schema(example = "2024-01-10", format = "date", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    #[schema(example = "Present")]
    pub status: String,
    #[serde(default)]
    #[schema(example = "Client visit", nullable = true)]
    pub notes: Option<String>,
}

/// Input of an upsert after validation: date resolved, status parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceMark {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

/// Result of marking attendance. `created` is false when an existing
/// record for the same employee and date was overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkOutcome {
    pub attendance: Attendance,
    pub created: bool,
}

/// Attendance decorated with the owning employee's identity.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "employee": 1,
    "employee_code": "E1",
    "employee_name": "Ann Lee",
    "department": "Eng",
    "date": "2024-01-10",
    "status": "Present",
    "notes": null,
    "created_at": "2024-01-10T09:00:00Z",
    "updated_at": "2024-01-10T09:00:00Z"
}))]
pub struct AttendanceView {
    pub id: u64,
    pub employee: u64,
    pub employee_code: String,
    pub employee_name: String,
    pub department: String,
    #[schema(format = "date", value_type = String)]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl AttendanceView {
    pub fn new(attendance: Attendance, employee: &Employee) -> Self {
        AttendanceView {
            id: attendance.id,
            employee: attendance.employee_id,
            employee_code: employee.employee_code.clone(),
            employee_name: employee.full_name.clone(),
            department: employee.department.clone(),
            date: attendance.date,
            status: attendance.status,
            notes: attendance.notes,
            created_at: attendance.created_at,
            updated_at: attendance.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("present".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Present));
        assert_eq!("LEAVE".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Leave));
        assert!("Late".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn status_displays_canonical_name() {
        assert_eq!(AttendanceStatus::Absent.to_string(), "Absent");
        assert_eq!(AttendanceStatus::Absent.as_ref(), "Absent");
        assert_eq!(AttendanceStatus::allowed(), "Present, Absent, Leave");
    }

    #[test]
    fn row_with_unknown_status_is_rejected() {
        let now = Utc::now();
        let row = AttendanceRow {
            id: 1,
            employee_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            status: "Holiday".into(),
            notes: None,
            created_at: now,
            updated_at: now,
        };
        assert!(Attendance::try_from(row).is_err());
    }
}
