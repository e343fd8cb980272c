use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::employee::models::DirectoryFilter;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeePage;
use crate::domain::employee::models::ListEmployeesQuery;
use crate::domain::employee::models::PageRequest;
use crate::inbound::http::router::AppState;

pub async fn list_employees(
    State(state): State<AppState>,
    params: Result<Query<ListEmployeesParams>, QueryRejection>,
) -> Result<ApiSuccess<ListEmployeesResponseData>, ApiError> {
    let Query(params) = params?;

    state
        .directory_service
        .list(params.into_query())
        .await
        .map_err(ApiError::from)
        .map(|page| ApiSuccess::new(StatusCode::OK, page.into()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListEmployeesParams {
    page: Option<i64>,
    page_size: Option<i64>,
    department: Option<String>,
    work_status: Option<u8>,
}

impl ListEmployeesParams {
    fn into_query(self) -> ListEmployeesQuery {
        ListEmployeesQuery {
            filter: DirectoryFilter::new(self.department, self.work_status),
            page: PageRequest::new(self.page, self.page_size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEmployeesResponseData {
    pub total: i64,
    pub list: Vec<EmployeeData>,
}

impl From<EmployeePage> for ListEmployeesResponseData {
    fn from(page: EmployeePage) -> Self {
        Self {
            total: page.total,
            list: page.employees.into_iter().map(EmployeeData::from).collect(),
        }
    }
}

/// Public view of an employee. Fields are copied one by one so the password
/// hash and soft-delete marker can never leak into a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeData {
    pub id: i64,
    pub employee_no: String,
    pub name: String,
    pub gender: u8,
    pub age: Option<u8>,
    pub email: Option<String>,
    pub mobile: String,
    pub department: String,
    pub position: String,
    pub rank: Option<String>,
    pub work_status: u8,
    #[serde(with = "rust_decimal::serde::float")]
    pub salary: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Employee> for EmployeeData {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id.0,
            employee_no: employee.employee_no.as_str().to_string(),
            name: employee.name,
            gender: employee.gender,
            age: employee.age,
            email: employee.email.map(|e| e.as_str().to_string()),
            mobile: employee.mobile.as_str().to_string(),
            department: employee.department,
            position: employee.position,
            rank: employee.rank,
            work_status: employee.work_status.code(),
            salary: employee.salary,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::employee::models::WorkStatus;
    use crate::domain::employee::service::test_support::employee;

    use super::*;

    #[test]
    fn test_params_are_normalised() {
        let params = ListEmployeesParams {
            page: Some(0),
            page_size: Some(500),
            department: Some("  ".to_string()),
            work_status: Some(0),
        };

        assert_eq!(params.into_query(), ListEmployeesQuery::default());
    }

    #[test]
    fn test_params_carry_filters() {
        let params = ListEmployeesParams {
            page: Some(2),
            page_size: Some(5),
            department: Some("Eng".to_string()),
            work_status: Some(3),
        };

        let query = params.into_query();

        assert_eq!(query.page.offset(), 5);
        assert_eq!(query.filter.department.as_deref(), Some("Eng"));
        assert_eq!(query.filter.work_status, Some(WorkStatus::ACTIVE_EQUIVALENT));
    }

    #[test]
    fn test_employee_json_omits_secrets() {
        let data = EmployeeData::from(employee(7, "E007", 1, 0));
        let json = serde_json::to_value(&data).unwrap();

        let object = json.as_object().unwrap();
        assert!(!object.contains_key("password_hash"));
        assert!(!object.contains_key("deleted_at"));
        assert_eq!(object["employee_no"], "E007");
        assert_eq!(object["work_status"], 1);
        assert!(object["salary"].is_number());
    }
}
