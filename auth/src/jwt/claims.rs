use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity assertion carried by an access token.
///
/// `sub` holds the employee's numeric id rendered as a string, `employee_no`
/// the human-assigned employee number. Timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (employee id)
    pub sub: String,

    /// Subject label (employee number)
    pub employee_no: String,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,

    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Build claims for a subject issued at `issued_at` and valid for `lifetime`.
    pub fn for_subject(
        subject_id: impl ToString,
        subject_label: impl Into<String>,
        issuer: impl Into<String>,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            sub: subject_id.to_string(),
            employee_no: subject_label.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
            iss: issuer.into(),
        }
    }

    /// A token is expired from the exact second of `exp` onwards.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
