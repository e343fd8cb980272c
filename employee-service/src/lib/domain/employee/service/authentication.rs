use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::employee::errors::CredentialError;
use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::LoginCommand;
use crate::domain::employee::ports::AuthenticationServicePort;
use crate::domain::employee::ports::CredentialHasher;
use crate::domain::employee::ports::EmployeeRepository;
use crate::domain::employee::ports::TokenIssuer;

/// Resolves a login identifier, checks the password and employment status,
/// then issues an access token.
pub struct AuthenticationService<R, H, T>
where
    R: EmployeeRepository,
    H: CredentialHasher,
    T: TokenIssuer,
{
    repository: Arc<R>,
    hasher: Arc<H>,
    token_issuer: Arc<T>,
}

impl<R, H, T> AuthenticationService<R, H, T>
where
    R: EmployeeRepository,
    H: CredentialHasher,
    T: TokenIssuer,
{
    pub fn new(repository: Arc<R>, hasher: Arc<H>, token_issuer: Arc<T>) -> Self {
        Self {
            repository,
            hasher,
            token_issuer,
        }
    }
}

#[async_trait]
impl<R, H, T> AuthenticationServicePort for AuthenticationService<R, H, T>
where
    R: EmployeeRepository,
    H: CredentialHasher,
    T: TokenIssuer,
{
    async fn login(&self, command: LoginCommand) -> Result<String, EmployeeError> {
        let employee = self
            .repository
            .find_by_login_identifier(&command.login_id)
            .await
            .map_err(|e| EmployeeError::from_repository("failed to resolve login identifier", e))?;

        let Some(employee) = employee else {
            // Same hashing cost as a wrong password, so a miss is not faster.
            self.hasher.verify_decoy(command.password.expose());
            return Err(EmployeeError::UserNotFound);
        };

        let password_matches = self
            .hasher
            .verify(&employee.password_hash, command.password.expose())
            .map_err(|e| match e {
                CredentialError::MalformedDigest(reason) => {
                    EmployeeError::MalformedPasswordHash(reason)
                }
                CredentialError::HashingFailed(reason) => {
                    EmployeeError::PasswordHashingFailed(reason)
                }
            })?;

        if !password_matches {
            tracing::info!(employee_id = %employee.id, "Login rejected: wrong password");
            return Err(EmployeeError::InvalidCredentials);
        }

        if !employee.work_status.can_login() {
            tracing::info!(
                employee_id = %employee.id,
                work_status = %employee.work_status,
                "Login rejected: account inactive"
            );
            return Err(EmployeeError::AccountInactive(employee.work_status));
        }

        let token = self
            .token_issuer
            .issue(employee.id, &employee.employee_no)
            .map_err(|e| EmployeeError::TokenSigningFailed(e.to_string()))?;

        tracing::info!(employee_id = %employee.id, "Login succeeded");

        Ok(token)
    }
}
