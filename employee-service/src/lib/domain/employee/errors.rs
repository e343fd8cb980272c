use std::fmt;

use thiserror::Error;

use crate::domain::employee::models::WorkStatus;

/// Error for caller-correctable input problems.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} is too long: maximum {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{field} is invalid: {reason}")]
    InvalidFormat { field: &'static str, reason: String },
}

/// Columns that must be unique among live employees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    EmployeeNo,
    Mobile,
    Email,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::EmployeeNo => "employee_no",
            UniqueField::Mobile => "mobile",
            UniqueField::Email => "email",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for credential hashing and verification
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedDigest(String),
}

/// Error for access token issuance
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signing failed: {0}")]
    SigningFailed(String),
}

/// Error raised by a directory store implementation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Duplicate value for unique field {0}")]
    DuplicateKey(UniqueField),

    #[error("Store operation timed out: {0}")]
    Timeout(String),

    #[error("Store query failed: {0}")]
    Query(String),

    #[error("Stored row is invalid: {0}")]
    InvalidRow(String),
}

/// Top-level error for all employee operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmployeeError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0} already exists")]
    DuplicateField(UniqueField),

    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),

    #[error("Employee not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive (work status {0})")]
    AccountInactive(WorkStatus),

    #[error("Stored password hash is malformed: {0}")]
    MalformedPasswordHash(String),

    #[error("Token signing failed: {0}")]
    TokenSigningFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

impl EmployeeError {
    /// Wrap a store error with the operation that produced it.
    ///
    /// Duplicate keys keep their field so races at insert surface the same way
    /// as a failed pre-check.
    pub fn from_repository(context: &str, err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateKey(field) => EmployeeError::DuplicateField(field),
            other => EmployeeError::QueryFailed(format!("{}: {}", context, other)),
        }
    }
}
