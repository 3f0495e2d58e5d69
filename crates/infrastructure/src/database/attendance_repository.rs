use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use domain::{
    AttendanceFilter, AttendanceId, AttendanceRecord, AttendanceRepository, DomainError,
    EmployeeId, NewAttendanceRecord,
};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::map_db_error;

const COLUMNS: &str = "id, employee_id, date, check_in, check_out, created_at";

pub struct PostgresAttendanceRepository {
    pool: PgPool,
}

impl PostgresAttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    id: i64,
    employee_id: i64,
    date: NaiveDate,
    check_in: DateTime<Utc>,
    check_out: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        AttendanceRecord {
            id: AttendanceId::new(row.id),
            employee_id: EmployeeId::new(row.employee_id),
            date: row.date,
            check_in: row.check_in,
            check_out: row.check_out,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AttendanceRepository for PostgresAttendanceRepository {
    async fn insert(&self, record: NewAttendanceRecord) -> Result<AttendanceRecord, DomainError> {
        let sql = format!(
            "INSERT INTO attendances (employee_id, date, check_in, check_out, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(record.employee_id.value())
            .bind(record.date)
            .bind(record.check_in)
            .bind(record.check_out)
            .bind(record.created_at)
            .fetch_one(&self.pool)
            .await
            .map(AttendanceRecord::from)
            .map_err(map_db_error)
    }

    async fn get_by_id(&self, id: AttendanceId) -> Result<Option<AttendanceRecord>, DomainError> {
        let sql = format!("SELECT {COLUMNS} FROM attendances WHERE id = $1");

        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(row.map(AttendanceRecord::from))
    }

    async fn find_by(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceRecord>, DomainError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM attendances WHERE TRUE"));

        if let Some(employee_id) = filter.employee_id {
            qb.push(" AND employee_id = ").push_bind(employee_id.value());
        }
        if let Some(start) = filter.start_date {
            qb.push(" AND date >= ").push_bind(start);
        }
        if let Some(end) = filter.end_date {
            qb.push(" AND date <= ").push_bind(end);
        }
        if filter.open_only {
            qb.push(" AND check_out IS NULL");
        }

        let rows = qb
            .build_query_as::<AttendanceRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }

    async fn update_by_id(
        &self,
        record: &AttendanceRecord,
    ) -> Result<Option<AttendanceRecord>, DomainError> {
        let sql = format!(
            "UPDATE attendances SET employee_id = $2, date = $3, check_in = $4, check_out = $5 \
             WHERE id = $1 RETURNING {COLUMNS}"
        );

        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(record.id.value())
            .bind(record.employee_id.value())
            .bind(record.date)
            .bind(record.check_in)
            .bind(record.check_out)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(row.map(AttendanceRecord::from))
    }

    async fn delete_by_id(&self, id: AttendanceId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM attendances WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
