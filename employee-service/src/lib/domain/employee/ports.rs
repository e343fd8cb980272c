use async_trait::async_trait;

use crate::domain::employee::errors::CredentialError;
use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::errors::RepositoryError;
use crate::domain::employee::errors::TokenError;
use crate::domain::employee::models::DirectoryFilter;
use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeId;
use crate::domain::employee::models::EmployeeNo;
use crate::domain::employee::models::EmployeePage;
use crate::domain::employee::models::ListEmployeesQuery;
use crate::domain::employee::models::LoginCommand;
use crate::domain::employee::models::Mobile;
use crate::domain::employee::models::NewEmployee;
use crate::domain::employee::models::PageRequest;
use crate::domain::employee::models::RegisterEmployeeCommand;

/// Port for employee registration.
#[async_trait]
pub trait RegistrationServicePort: Send + Sync + 'static {
    /// Register a new employee.
    ///
    /// # Errors
    /// * `DuplicateField` - employee_no, mobile or email already in use
    /// * `PasswordHashingFailed` - Hashing the password failed
    /// * `QueryFailed` - Store operation failed
    async fn register(&self, command: RegisterEmployeeCommand) -> Result<(), EmployeeError>;
}

/// Port for employee login.
#[async_trait]
pub trait AuthenticationServicePort: Send + Sync + 'static {
    /// Verify credentials and issue an access token.
    ///
    /// # Returns
    /// Signed access token
    ///
    /// # Errors
    /// * `UserNotFound` - No employee matches the login identifier
    /// * `InvalidCredentials` - Password does not match
    /// * `AccountInactive` - Work status does not permit login
    /// * `MalformedPasswordHash` - Stored digest is corrupt
    /// * `TokenSigningFailed` - Token could not be signed
    /// * `QueryFailed` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<String, EmployeeError>;
}

/// Port for the paginated directory listing.
#[async_trait]
pub trait DirectoryQueryServicePort: Send + Sync + 'static {
    /// Return one page of live employees, newest first, with the filtered total.
    ///
    /// # Errors
    /// * `QueryFailed` - Store operation failed
    async fn list(&self, query: ListEmployeesQuery) -> Result<EmployeePage, EmployeeError>;
}

/// Persistence operations for the employee directory.
///
/// Every read excludes soft-deleted rows.
#[async_trait]
pub trait EmployeeRepository: Send + Sync + 'static {
    async fn find_by_employee_no(
        &self,
        employee_no: &EmployeeNo,
    ) -> Result<Option<Employee>, RepositoryError>;

    async fn find_by_mobile(&self, mobile: &Mobile) -> Result<Option<Employee>, RepositoryError>;

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Employee>, RepositoryError>;

    /// Match `identifier` against employee_no, mobile or email.
    ///
    /// When several rows match, employee_no wins over mobile, mobile over
    /// email, and the lowest id breaks remaining ties.
    async fn find_by_login_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Employee>, RepositoryError>;

    /// Persist a new employee, assigning id and timestamps.
    ///
    /// # Errors
    /// * `DuplicateKey` - A unique index rejected the row
    async fn insert(&self, employee: NewEmployee) -> Result<Employee, RepositoryError>;

    async fn count_filtered(&self, filter: &DirectoryFilter) -> Result<i64, RepositoryError>;

    /// Ordered by creation time descending, then id descending.
    async fn query_page(
        &self,
        filter: &DirectoryFilter,
        page: &PageRequest,
    ) -> Result<Vec<Employee>, RepositoryError>;
}

/// One-way password hashing.
pub trait CredentialHasher: Send + Sync + 'static {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError>;

    /// `Ok(false)` on mismatch; errors only for a corrupt digest.
    fn verify(&self, digest: &str, plaintext: &str) -> Result<bool, CredentialError>;

    /// Do the work of one `verify` when there is no digest to check against.
    fn verify_decoy(&self, plaintext: &str);
}

/// Signs time-bounded identity assertions.
pub trait TokenIssuer: Send + Sync + 'static {
    fn issue(&self, subject_id: EmployeeId, subject_label: &EmployeeNo)
        -> Result<String, TokenError>;
}
