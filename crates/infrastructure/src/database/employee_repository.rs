use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{DomainError, Employee, EmployeeFilter, EmployeeId, EmployeeRepository, NewEmployee};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::map_db_error;

const COLUMNS: &str = "id, name, email, rfid_tag, active, created_at, updated_at";

pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: i64,
    name: String,
    email: String,
    rfid_tag: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: EmployeeId::new(row.id),
            name: row.name,
            email: row.email,
            rfid_tag: row.rfid_tag,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn insert(&self, employee: NewEmployee) -> Result<Employee, DomainError> {
        let sql = format!(
            "INSERT INTO employees (name, email, rfid_tag, active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(&employee.name)
            .bind(&employee.email)
            .bind(&employee.rfid_tag)
            .bind(employee.active)
            .bind(employee.created_at)
            .fetch_one(&self.pool)
            .await
            .map(Employee::from)
            .map_err(map_db_error)
    }

    async fn get_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, DomainError> {
        let sql = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");

        let row = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(row.map(Employee::from))
    }

    async fn find_by(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, DomainError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM employees WHERE TRUE"));

        if let Some(tag) = &filter.rfid_tag {
            qb.push(" AND rfid_tag = ").push_bind(tag.clone());
        }
        if let Some(email) = &filter.email {
            qb.push(" AND email = ").push_bind(email.clone());
        }
        if let Some(active) = filter.active {
            qb.push(" AND active = ").push_bind(active);
        }
        qb.push(" ORDER BY id ASC");

        let rows = qb
            .build_query_as::<EmployeeRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn update_by_id(&self, employee: &Employee) -> Result<Option<Employee>, DomainError> {
        let sql = format!(
            "UPDATE employees SET name = $2, email = $3, rfid_tag = $4, active = $5, \
             updated_at = $6 WHERE id = $1 RETURNING {COLUMNS}"
        );

        let row = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(employee.id.value())
            .bind(&employee.name)
            .bind(&employee.email)
            .bind(&employee.rfid_tag)
            .bind(employee.active)
            .bind(employee.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(row.map(Employee::from))
    }

    async fn delete_by_id(&self, id: EmployeeId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
