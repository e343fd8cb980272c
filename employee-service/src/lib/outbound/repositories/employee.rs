use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;

use crate::config::DatabaseConfig;
use crate::domain::employee::errors::RepositoryError;
use crate::domain::employee::errors::UniqueField;
use crate::domain::employee::models::DirectoryFilter;
use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeId;
use crate::domain::employee::models::EmployeeNo;
use crate::domain::employee::models::Mobile;
use crate::domain::employee::models::NewEmployee;
use crate::domain::employee::models::PageRequest;
use crate::domain::employee::models::WorkStatus;
use crate::domain::employee::ports::EmployeeRepository;

const EMPLOYEE_COLUMNS: &str = "id, employee_no, name, password_hash, gender, age, email, \
     mobile, department, position, rank, work_status, salary, created_at, updated_at, deleted_at";

pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool whose connections carry the configured statement timeout.
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
        let statement_timeout = config.statement_timeout_ms.to_string();
        let options = config
            .url
            .parse::<PgConnectOptions>()?
            .options([("statement_timeout", statement_timeout.as_str())]);

        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await
    }

    async fn find_one(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Option<Employee>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM employees WHERE {} = $1 AND deleted_at IS NULL LIMIT 1",
            EMPLOYEE_COLUMNS, column
        );

        sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .map(Employee::try_from)
            .transpose()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: i64,
    employee_no: String,
    name: String,
    password_hash: String,
    gender: i16,
    age: Option<i16>,
    email: Option<String>,
    mobile: String,
    department: String,
    position: String,
    rank: Option<String>,
    work_status: i16,
    salary: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = RepositoryError;

    fn try_from(r: EmployeeRow) -> Result<Self, Self::Error> {
        let id = r.id;
        let invalid = |e: &dyn std::fmt::Display| {
            RepositoryError::InvalidRow(format!("employee {}: {}", id, e))
        };

        Ok(Employee {
            id: EmployeeId(r.id),
            employee_no: EmployeeNo::new(r.employee_no).map_err(|e| invalid(&e))?,
            name: r.name,
            password_hash: r.password_hash,
            gender: u8::try_from(r.gender).map_err(|e| invalid(&e))?,
            age: r
                .age
                .map(u8::try_from)
                .transpose()
                .map_err(|e| invalid(&e))?,
            email: r
                .email
                .map(EmailAddress::new)
                .transpose()
                .map_err(|e| invalid(&e))?,
            mobile: Mobile::new(r.mobile).map_err(|e| invalid(&e))?,
            department: r.department,
            position: r.position,
            rank: r.rank,
            work_status: WorkStatus::new(u8::try_from(r.work_status).map_err(|e| invalid(&e))?),
            salary: r.salary,
            created_at: r.created_at,
            updated_at: r.updated_at,
            deleted_at: r.deleted_at,
        })
    }
}

fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut => RepositoryError::Timeout(e.to_string()),
        sqlx::Error::Database(ref db_err) => {
            // 57014: query_canceled, raised when statement_timeout fires
            if db_err.code().as_deref() == Some("57014") {
                return RepositoryError::Timeout(e.to_string());
            }
            if db_err.is_unique_violation() {
                match db_err.constraint() {
                    Some("employees_employee_no_key") => {
                        return RepositoryError::DuplicateKey(UniqueField::EmployeeNo)
                    }
                    Some("employees_mobile_key") => {
                        return RepositoryError::DuplicateKey(UniqueField::Mobile)
                    }
                    Some("employees_email_key") => {
                        return RepositoryError::DuplicateKey(UniqueField::Email)
                    }
                    _ => {}
                }
            }
            RepositoryError::Query(e.to_string())
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &DirectoryFilter) {
    builder.push(" WHERE deleted_at IS NULL");
    if let Some(department) = &filter.department {
        builder.push(" AND department = ").push_bind(department.clone());
    }
    if let Some(work_status) = filter.work_status {
        builder
            .push(" AND work_status = ")
            .push_bind(i16::from(work_status.code()));
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn find_by_employee_no(
        &self,
        employee_no: &EmployeeNo,
    ) -> Result<Option<Employee>, RepositoryError> {
        self.find_one("employee_no", employee_no.as_str()).await
    }

    async fn find_by_mobile(&self, mobile: &Mobile) -> Result<Option<Employee>, RepositoryError> {
        self.find_one("mobile", mobile.as_str()).await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Employee>, RepositoryError> {
        self.find_one("email", email.as_str()).await
    }

    async fn find_by_login_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Employee>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM employees
            WHERE deleted_at IS NULL
              AND (employee_no = $1 OR mobile = $1 OR email = $1)
            ORDER BY CASE
                       WHEN employee_no = $1 THEN 0
                       WHEN mobile = $1 THEN 1
                       ELSE 2
                     END,
                     id
            LIMIT 1
            "#,
            EMPLOYEE_COLUMNS
        );

        sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .map(Employee::try_from)
            .transpose()
    }

    async fn insert(&self, employee: NewEmployee) -> Result<Employee, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO employees (
                employee_no, name, password_hash, gender, age, email, mobile,
                department, position, rank, work_status, salary
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        );

        let row = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(employee.employee_no.as_str())
            .bind(&employee.name)
            .bind(&employee.password_hash)
            .bind(i16::from(employee.gender))
            .bind(employee.age.map(i16::from))
            .bind(employee.email.as_ref().map(|e| e.as_str()))
            .bind(employee.mobile.as_str())
            .bind(&employee.department)
            .bind(&employee.position)
            .bind(employee.rank.as_deref())
            .bind(i16::from(employee.work_status.code()))
            .bind(employee.salary)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Employee::try_from(row)
    }

    async fn count_filtered(&self, filter: &DirectoryFilter) -> Result<i64, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM employees");
        push_filters(&mut builder, filter);

        let (total,) = builder
            .build_query_as::<(i64,)>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(total)
    }

    async fn query_page(
        &self,
        filter: &DirectoryFilter,
        page: &PageRequest,
    ) -> Result<Vec<Employee>, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM employees",
            EMPLOYEE_COLUMNS
        ));
        push_filters(&mut builder, filter);
        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = builder
            .build_query_as::<EmployeeRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(Employee::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> EmployeeRow {
        let now = Utc::now();
        EmployeeRow {
            id: 1,
            employee_no: "E001".to_string(),
            name: "Alice".to_string(),
            password_hash: "$argon2id$stored_hash".to_string(),
            gender: 0,
            age: Some(30),
            email: Some("alice@example.com".to_string()),
            mobile: "13800000000".to_string(),
            department: "Eng".to_string(),
            position: "SWE".to_string(),
            rank: None,
            work_status: 1,
            salary: Decimal::new(1_000_000, 2),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_row_into_employee() {
        let employee = Employee::try_from(row()).expect("valid row");

        assert_eq!(employee.id, EmployeeId(1));
        assert_eq!(employee.employee_no.as_str(), "E001");
        assert_eq!(employee.age, Some(30));
        assert_eq!(
            employee.email.as_ref().map(|e| e.as_str()),
            Some("alice@example.com")
        );
        assert_eq!(employee.work_status, WorkStatus::ACTIVE);
    }

    #[test]
    fn test_row_with_out_of_range_status_is_invalid() {
        let mut bad = row();
        bad.work_status = -1;

        match Employee::try_from(bad) {
            Err(RepositoryError::InvalidRow(message)) => assert!(message.contains("employee 1")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_pool_timeout_maps_to_timeout() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            RepositoryError::Timeout(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            RepositoryError::Query(_)
        ));
    }

    #[test]
    fn test_filters_render_only_present_predicates() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM employees");
        push_filters(&mut builder, &DirectoryFilter::default());
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM employees WHERE deleted_at IS NULL"
        );

        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM employees");
        push_filters(
            &mut builder,
            &DirectoryFilter::new(Some("Eng".to_string()), Some(3)),
        );
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM employees WHERE deleted_at IS NULL \
             AND department = $1 AND work_status = $2"
        );
    }
}
