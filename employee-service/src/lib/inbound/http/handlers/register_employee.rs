use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::employee::errors::ValidationError;
use crate::domain::employee::models::optional_text;
use crate::domain::employee::models::required_text;
use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::EmployeeNo;
use crate::domain::employee::models::Mobile;
use crate::domain::employee::models::Password;
use crate::domain::employee::models::RegisterEmployeeCommand;
use crate::inbound::http::router::AppState;

pub async fn register_employee(
    State(state): State<AppState>,
    body: Result<Json<RegisterEmployeeRequest>, JsonRejection>,
) -> Result<ApiSuccess<RegisterEmployeeResponseData>, ApiError> {
    let Json(body) = body?;

    state
        .registration_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|()| {
            ApiSuccess::new(
                StatusCode::CREATED,
                RegisterEmployeeResponseData {
                    message: "Employee registered".to_string(),
                },
            )
        })
}

/// HTTP request body for registering an employee (raw JSON)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisterEmployeeRequest {
    employee_no: String,
    name: String,
    password: String,
    mobile: String,
    department: String,
    position: String,
    salary: Decimal,
    #[serde(default)]
    gender: Option<u8>,
    #[serde(default)]
    age: Option<u8>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    rank: Option<String>,
    #[serde(default)]
    work_status: Option<u8>,
}

impl RegisterEmployeeRequest {
    fn try_into_command(self) -> Result<RegisterEmployeeCommand, ValidationError> {
        validate_salary(&self.salary)?;

        let email = match self.email {
            Some(email) if !email.trim().is_empty() => Some(EmailAddress::new(email)?),
            _ => None,
        };

        Ok(RegisterEmployeeCommand {
            employee_no: EmployeeNo::new(self.employee_no)?,
            name: required_text("name", self.name, RegisterEmployeeCommand::NAME_MAX_LENGTH)?,
            password: Password::new(self.password)?,
            gender: self.gender.unwrap_or(0),
            age: self.age.filter(|age| *age > 0),
            email,
            mobile: Mobile::new(self.mobile)?,
            department: required_text(
                "department",
                self.department,
                RegisterEmployeeCommand::DEPARTMENT_MAX_LENGTH,
            )?,
            position: required_text(
                "position",
                self.position,
                RegisterEmployeeCommand::POSITION_MAX_LENGTH,
            )?,
            rank: optional_text("rank", self.rank, RegisterEmployeeCommand::RANK_MAX_LENGTH)?,
            work_status: self.work_status,
            salary: self.salary,
        })
    }
}

/// Salary must fit the store's NUMERIC(12,2) column.
fn validate_salary(salary: &Decimal) -> Result<(), ValidationError> {
    let reason = if salary.is_sign_negative() {
        "must not be negative"
    } else if salary.normalize().scale() > 2 {
        "at most 2 decimal places are allowed"
    } else if *salary >= Decimal::new(10_000_000_000, 0) {
        "must be less than 10000000000"
    } else {
        return Ok(());
    };

    Err(ValidationError::InvalidFormat {
        field: "salary",
        reason: reason.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterEmployeeResponseData {
    pub message: String,
}
