use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::MySqlPool;
use tracing::{debug, error};

use super::{AttendanceRepository, EmployeeRepository};
use crate::error::{StoreError, StoreResult};
use crate::model::attendance::{Attendance, AttendanceMark, AttendanceRow, MarkOutcome};
use crate::model::employee::{Employee, EmployeeQuery, NewEmployee};

const EMPLOYEE_COLUMNS: &str =
    "id, employee_code, full_name, email, department, created_at, updated_at";
const ATTENDANCE_COLUMNS: &str = "id, employee_id, date, status, notes, created_at, updated_at";

// Index names from sql/schema.sql, as they appear in MySQL duplicate-entry messages.
const EMAIL_INDEX: &str = "uq_employees_email";
const CODE_INDEX: &str = "uq_employees_employee_code";

/// Repository backed by the `employees` and `attendance` MySQL tables.
#[derive(Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_employee(&self, id: u64) -> StoreResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }
}

fn duplicate_employee(new: &NewEmployee, db_err: &dyn sqlx::error::DatabaseError) -> StoreError {
    let message = db_err.message();
    if message.contains(EMAIL_INDEX) {
        StoreError::Conflict(format!("employee with email '{}' already exists", new.email))
    } else if message.contains(CODE_INDEX) {
        StoreError::Conflict(format!(
            "employee with code '{}' already exists",
            new.employee_code
        ))
    } else {
        StoreError::Conflict("employee with this code or email already exists".to_string())
    }
}

/// Escapes LIKE wildcards so the search text matches literally. Pairs with
/// `ESCAPE '!'`, which behaves the same under any `sql_mode`.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '!' | '%' | '_') {
            escaped.push('!');
        }
        escaped.push(c);
    }
    escaped
}

fn into_attendance(row: AttendanceRow) -> StoreResult<Attendance> {
    let id = row.id;
    Attendance::try_from(row)
        .map_err(|e| StoreError::Storage(anyhow!("attendance row {id} has invalid status: {e}")))
}

#[async_trait]
impl EmployeeRepository for MySqlRepository {
    async fn insert(&self, new: NewEmployee) -> StoreResult<Employee> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (employee_code, full_name, email, department, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.employee_code)
        .bind(&new.full_name)
        .bind(&new.email)
        .bind(&new.department)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        let id = match result {
            Ok(done) => done.last_insert_id(),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(duplicate_employee(&new, &*db_err));
            }
            Err(e) => {
                error!(error = %e, employee_code = %new.employee_code, "Failed to insert employee");
                return Err(e.into());
            }
        };

        self.fetch_employee(id)
            .await?
            .ok_or_else(|| StoreError::Storage(anyhow!("employee {id} vanished after insert")))
    }

    async fn find(&self, id: u64) -> StoreResult<Option<Employee>> {
        self.fetch_employee(id).await
    }

    async fn list(&self, query: &EmployeeQuery) -> StoreResult<Vec<Employee>> {
        let where_clause = if query.search.is_some() {
            "WHERE (full_name LIKE ? ESCAPE '!' OR employee_code LIKE ? ESCAPE '!' \
             OR email LIKE ? ESCAPE '!' OR department LIKE ? ESCAPE '!')"
        } else {
            ""
        };
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees {where_clause} ORDER BY {}",
            query.ordering.as_sql()
        );
        debug!(sql = %sql, search = ?query.search, "Fetching employees");

        let mut data_query = sqlx::query_as::<_, Employee>(&sql);
        if let Some(search) = &query.search {
            let like = format!("%{}%", escape_like(search));
            for _ in 0..4 {
                data_query = data_query.bind(like.clone());
            }
        }

        Ok(data_query.fetch_all(&self.pool).await?)
    }

    async fn delete_cascade(&self, id: u64) -> StoreResult<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        // Explicit delete keeps the removed count; the FK cascade would cover it otherwise.
        let removed = sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(removed))
    }
}

#[async_trait]
impl AttendanceRepository for MySqlRepository {
    async fn upsert(&self, mark: AttendanceMark) -> StoreResult<MarkOutcome> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Affected rows: 1 for a fresh insert, 2 when the existing row changed.
        // updated_at carries microseconds, so an update always changes the row.
        let result = sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, status, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                status = VALUES(status),
                notes = VALUES(notes),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(mark.employee_id)
        .bind(mark.date)
        .bind(mark.status.as_ref())
        .bind(&mark.notes)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await;

        let affected = match result {
            Ok(done) => done.rows_affected(),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return Err(StoreError::validation("employee", "employee not found"));
            }
            Err(e) => {
                error!(error = %e, employee_id = mark.employee_id, date = %mark.date, "Attendance upsert failed");
                return Err(e.into());
            }
        };

        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE employee_id = ? AND date = ?"
        );
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(mark.employee_id)
            .bind(mark.date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(MarkOutcome {
            attendance: into_attendance(row)?,
            created: affected == 1,
        })
    }

    async fn list_for_employee(
        &self,
        employee_id: u64,
        date: Option<NaiveDate>,
    ) -> StoreResult<Vec<Attendance>> {
        let date_clause = if date.is_some() { "AND date = ?" } else { "" };
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE employee_id = ? {date_clause} ORDER BY date DESC"
        );

        let mut query = sqlx::query_as::<_, AttendanceRow>(&sql).bind(employee_id);
        if let Some(date) = date {
            query = query.bind(date);
        }

        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(into_attendance)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("a_b"), "a!_b");
        assert_eq!(escape_like("100%"), "100!%");
        assert_eq!(escape_like("hey!"), "hey!!");
        assert_eq!(escape_like(r"c:\dir"), r"c:\dir");
        assert_eq!(escape_like("Ann Lee"), "Ann Lee");
    }
}
