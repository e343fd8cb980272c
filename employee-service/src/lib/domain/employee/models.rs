use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::employee::errors::ValidationError;

/// Employee aggregate entity.
///
/// `password_hash` is an opaque PHC string. Response types copy fields out of
/// this struct explicitly and never include the hash or `deleted_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: EmployeeId,
    pub employee_no: EmployeeNo,
    pub name: String,
    pub password_hash: String,
    pub gender: u8,
    pub age: Option<u8>,
    pub email: Option<EmailAddress>,
    pub mobile: Mobile,
    pub department: String,
    pub position: String,
    pub rank: Option<String>,
    pub work_status: WorkStatus,
    pub salary: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Store-assigned surrogate identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmployeeId(pub i64);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Human-assigned employee number, compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmployeeNo(String);

impl EmployeeNo {
    const MAX_LENGTH: usize = 32;

    pub fn new(employee_no: String) -> Result<Self, ValidationError> {
        required_text("employee_no", employee_no, Self::MAX_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Mobile number: 1 to 11 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mobile(String);

impl Mobile {
    const MAX_LENGTH: usize = 11;

    pub fn new(mobile: String) -> Result<Self, ValidationError> {
        let mobile = required_text("mobile", mobile, Self::MAX_LENGTH)?;
        if !mobile.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidFormat {
                field: "mobile",
                reason: "only digits are allowed".to_string(),
            });
        }
        Ok(Self(mobile))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 64;

    pub fn new(email: String) -> Result<Self, ValidationError> {
        let email = required_text("email", email, Self::MAX_LENGTH)?;
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| ValidationError::InvalidFormat {
                field: "email",
                reason: e.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Employment state code.
///
/// Only `ACTIVE` (1) and `ACTIVE_EQUIVALENT` (3) may log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkStatus(u8);

impl WorkStatus {
    pub const ACTIVE: WorkStatus = WorkStatus(1);
    pub const ACTIVE_EQUIVALENT: WorkStatus = WorkStatus(3);

    pub fn new(code: u8) -> Self {
        Self(code)
    }

    /// Zero and absent both mean "not set" and fall back to `ACTIVE`.
    pub fn or_default(code: Option<u8>) -> Self {
        match code {
            None | Some(0) => Self::ACTIVE,
            Some(code) => Self(code),
        }
    }

    pub fn code(&self) -> u8 {
        self.0
    }

    pub fn can_login(&self) -> bool {
        *self == Self::ACTIVE || *self == Self::ACTIVE_EQUIVALENT
    }
}

impl Default for WorkStatus {
    fn default() -> Self {
        Self::ACTIVE
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password in transit between the transport and the hasher.
///
/// `Debug` is redacted so commands can be logged safely.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Result<Self, ValidationError> {
        if password.is_empty() {
            return Err(ValidationError::Required { field: "password" });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Trim and bound a required free-text field.
pub fn required_text(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<String, ValidationError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(value)
}

/// Trim and bound an optional free-text field; blank becomes `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => required_text(field, v, max).map(Some),
        _ => Ok(None),
    }
}

/// Command to register a new employee with validated fields
#[derive(Debug, Clone)]
pub struct RegisterEmployeeCommand {
    pub employee_no: EmployeeNo,
    pub name: String,
    pub password: Password,
    pub gender: u8,
    pub age: Option<u8>,
    pub email: Option<EmailAddress>,
    pub mobile: Mobile,
    pub department: String,
    pub position: String,
    pub rank: Option<String>,
    pub work_status: Option<u8>,
    pub salary: Decimal,
}

impl RegisterEmployeeCommand {
    pub const NAME_MAX_LENGTH: usize = 32;
    pub const DEPARTMENT_MAX_LENGTH: usize = 64;
    pub const POSITION_MAX_LENGTH: usize = 64;
    pub const RANK_MAX_LENGTH: usize = 32;
}

/// Record handed to the store for insertion.
///
/// The store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub employee_no: EmployeeNo,
    pub name: String,
    pub password_hash: String,
    pub gender: u8,
    pub age: Option<u8>,
    pub email: Option<EmailAddress>,
    pub mobile: Mobile,
    pub department: String,
    pub position: String,
    pub rank: Option<String>,
    pub work_status: WorkStatus,
    pub salary: Decimal,
}

/// Command to authenticate with any login identifier
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub login_id: String,
    pub password: Password,
}

impl LoginCommand {
    pub fn new(login_id: String, password: String) -> Result<Self, ValidationError> {
        let login_id = login_id.trim().to_string();
        if login_id.is_empty() {
            return Err(ValidationError::Required { field: "login_id" });
        }
        Ok(Self {
            login_id,
            password: Password::new(password)?,
        })
    }
}

/// Optional predicates for a directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFilter {
    pub department: Option<String>,
    pub work_status: Option<WorkStatus>,
}

impl DirectoryFilter {
    /// Blank department and work status 0 mean "no filter".
    pub fn new(department: Option<String>, work_status: Option<u8>) -> Self {
        Self {
            department: department
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            work_status: work_status.filter(|s| *s > 0).map(WorkStatus::new),
        }
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        self.department
            .as_deref()
            .map_or(true, |d| employee.department == d)
            && self
                .work_status
                .map_or(true, |s| employee.work_status == s)
    }
}

/// Normalised page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_PAGE_SIZE: i64 = 10;
    pub const MAX_PAGE_SIZE: i64 = 100;

    /// Page below 1 becomes 1; page size outside `1..=100` becomes 10.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p,
            _ => Self::DEFAULT_PAGE,
        };
        let page_size = match page_size {
            Some(s) if (1..=Self::MAX_PAGE_SIZE).contains(&s) => s,
            _ => Self::DEFAULT_PAGE_SIZE,
        };
        Self { page, page_size }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Query for one page of the directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEmployeesQuery {
    pub filter: DirectoryFilter,
    pub page: PageRequest,
}

/// One page of employees plus the filtered total.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeePage {
    pub total: i64,
    pub employees: Vec<Employee>,
}
