use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::errors::UniqueField;
use crate::domain::employee::models::NewEmployee;
use crate::domain::employee::models::RegisterEmployeeCommand;
use crate::domain::employee::models::WorkStatus;
use crate::domain::employee::ports::CredentialHasher;
use crate::domain::employee::ports::EmployeeRepository;
use crate::domain::employee::ports::RegistrationServicePort;

/// Registers employees after advisory uniqueness checks.
///
/// The checks run in the order employee_no, mobile, email and stop at the
/// first collision, before any hashing. They are not transactional: the
/// store's unique indexes remain the authority and a collision reported by
/// `insert` surfaces as the same `DuplicateField` error.
pub struct RegistrationService<R, H>
where
    R: EmployeeRepository,
    H: CredentialHasher,
{
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> RegistrationService<R, H>
where
    R: EmployeeRepository,
    H: CredentialHasher,
{
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    async fn ensure_unique(&self, command: &RegisterEmployeeCommand) -> Result<(), EmployeeError> {
        let taken = self
            .repository
            .find_by_employee_no(&command.employee_no)
            .await
            .map_err(|e| EmployeeError::from_repository("failed to look up employee_no", e))?;
        if taken.is_some() {
            return Err(EmployeeError::DuplicateField(UniqueField::EmployeeNo));
        }

        let taken = self
            .repository
            .find_by_mobile(&command.mobile)
            .await
            .map_err(|e| EmployeeError::from_repository("failed to look up mobile", e))?;
        if taken.is_some() {
            return Err(EmployeeError::DuplicateField(UniqueField::Mobile));
        }

        if let Some(email) = &command.email {
            let taken = self
                .repository
                .find_by_email(email)
                .await
                .map_err(|e| EmployeeError::from_repository("failed to look up email", e))?;
            if taken.is_some() {
                return Err(EmployeeError::DuplicateField(UniqueField::Email));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl<R, H> RegistrationServicePort for RegistrationService<R, H>
where
    R: EmployeeRepository,
    H: CredentialHasher,
{
    async fn register(&self, command: RegisterEmployeeCommand) -> Result<(), EmployeeError> {
        if let Err(e) = self.ensure_unique(&command).await {
            tracing::info!(
                employee_no = %command.employee_no,
                error = %e,
                "Registration rejected"
            );
            return Err(e);
        }

        let password_hash = self
            .hasher
            .hash(command.password.expose())
            .map_err(|e| EmployeeError::PasswordHashingFailed(e.to_string()))?;

        let draft = NewEmployee {
            employee_no: command.employee_no,
            name: command.name,
            password_hash,
            gender: command.gender,
            age: command.age,
            email: command.email,
            mobile: command.mobile,
            department: command.department,
            position: command.position,
            rank: command.rank,
            work_status: WorkStatus::or_default(command.work_status),
            salary: command.salary,
        };

        let created = self.repository.insert(draft).await.map_err(|e| {
            let err = EmployeeError::from_repository("failed to insert employee", e);
            if let EmployeeError::DuplicateField(field) = &err {
                tracing::warn!(field = %field, "Unique index rejected employee after pre-check");
            }
            err
        })?;

        tracing::info!(
            employee_id = %created.id,
            employee_no = %created.employee_no,
            "Employee registered"
        );

        Ok(())
    }
}
