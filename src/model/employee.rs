use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "E1",
        "full_name": "Ann Lee",
        "email": "ann@x.com",
        "department": "Eng",
        "created_at": "2024-01-10T09:00:00Z",
        "updated_at": "2024-01-10T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "E1")]
    pub employee_code: String,

    #[schema(example = "Ann Lee")]
    pub full_name: String,

    #[schema(example = "ann@x.com")]
    pub email: String,

    #[schema(example = "Eng")]
    pub department: String,

    #[schema(example = "2024-01-10T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,

    #[schema(example = "2024-01-10T09:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

/// Create-employee payload as received from a caller.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "E1")]
    pub employee_code: String,
    #[schema(example = "Ann Lee")]
    pub full_name: String,
    #[schema(example = "ann@x.com", format = "email")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "Eng")]
    pub department: String,
}

/// Validated, normalized input for a new employee row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub employee_code: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
}

/// Sort order accepted by the employee listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmployeeOrdering {
    #[default]
    NewestFirst,
    OldestFirst,
    NameAsc,
    NameDesc,
}

impl EmployeeOrdering {
    /// Parses the `ordering` query value (`created_at`, `-created_at`,
    /// `full_name`, `-full_name`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "-created_at" => Some(Self::NewestFirst),
            "created_at" => Some(Self::OldestFirst),
            "full_name" => Some(Self::NameAsc),
            "-full_name" => Some(Self::NameDesc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::NewestFirst => "created_at DESC, id DESC",
            Self::OldestFirst => "created_at ASC, id ASC",
            Self::NameAsc => "full_name ASC, id ASC",
            Self::NameDesc => "full_name DESC, id DESC",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeQuery {
    /// Case-insensitive substring over name, code, email and department.
    pub search: Option<String>,
    pub ordering: EmployeeOrdering,
}

impl Employee {
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [
            &self.full_name,
            &self.employee_code,
            &self.email,
            &self.department,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}
