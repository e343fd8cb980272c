use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Issues and verifies time-bounded access tokens for one issuer.
///
/// The signing secret is owned by the instance; nothing process-wide.
pub struct JwtIssuer {
    handler: JwtHandler,
    issuer: String,
    lifetime: Duration,
}

impl JwtIssuer {
    /// Default token lifetime.
    pub const DEFAULT_LIFETIME_HOURS: i64 = 24;

    /// Create a new issuer.
    ///
    /// # Arguments
    /// * `secret` - HS256 signing secret
    /// * `issuer` - Value written to and required in the `iss` claim
    /// * `lifetime` - Time between `iat` and `exp`
    ///
    /// # Errors
    /// * `InvalidKey` - The secret is empty
    pub fn new(
        secret: &[u8],
        issuer: impl Into<String>,
        lifetime: Duration,
    ) -> Result<Self, JwtError> {
        Ok(Self {
            handler: JwtHandler::new(secret)?,
            issuer: issuer.into(),
            lifetime,
        })
    }

    /// Issue a token for a subject, stamped with the current time.
    pub fn issue(&self, subject_id: i64, subject_label: &str) -> Result<String, JwtError> {
        self.issue_at(subject_id, subject_label, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        subject_id: i64,
        subject_label: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = Claims::for_subject(
            subject_id,
            subject_label,
            self.issuer.as_str(),
            issued_at,
            self.lifetime,
        );
        self.handler.encode(&claims)
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// # Errors
    /// * `InvalidSignature` - Not signed with this issuer's secret
    /// * `IssuerMismatch` - `iss` differs from this issuer
    /// * `TokenExpired` - `now` is at or past `exp`
    /// * `Malformed` - Token or claims cannot be parsed
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let claims: Claims = self.handler.decode(token, &self.issuer)?;

        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}
