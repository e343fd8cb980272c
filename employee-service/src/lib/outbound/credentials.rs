//! Adapters binding the `auth` crate to the domain's credential ports.

use auth::JwtIssuer;
use auth::PasswordError;
use auth::PasswordHasher;

use crate::domain::employee::errors::CredentialError;
use crate::domain::employee::errors::TokenError;
use crate::domain::employee::models::EmployeeId;
use crate::domain::employee::models::EmployeeNo;
use crate::domain::employee::ports::CredentialHasher;
use crate::domain::employee::ports::TokenIssuer;

impl CredentialHasher for PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        PasswordHasher::hash(self, plaintext).map_err(into_credential_error)
    }

    fn verify(&self, digest: &str, plaintext: &str) -> Result<bool, CredentialError> {
        PasswordHasher::verify(self, digest, plaintext).map_err(into_credential_error)
    }

    fn verify_decoy(&self, plaintext: &str) {
        PasswordHasher::verify_decoy(self, plaintext)
    }
}

fn into_credential_error(err: PasswordError) -> CredentialError {
    match err {
        PasswordError::HashingFailed(reason) => CredentialError::HashingFailed(reason),
        PasswordError::MalformedHash(reason) => CredentialError::MalformedDigest(reason),
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(
        &self,
        subject_id: EmployeeId,
        subject_label: &EmployeeNo,
    ) -> Result<String, TokenError> {
        JwtIssuer::issue(self, subject_id.0, subject_label.as_str())
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }
}
