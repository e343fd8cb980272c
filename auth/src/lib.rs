//! Credential primitives for the employee directory.
//!
//! - Password hashing (Argon2id)
//! - JWT access tokens (HS256) with issuer and lifetime binding
//!
//! Services define their own hashing and token traits and adapt these
//! implementations, so the domain never depends on this crate directly.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("pw123").unwrap();
//! assert!(hasher.verify(&hash, "pw123").unwrap());
//! assert!(!hasher.verify(&hash, "wrong").unwrap());
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::JwtIssuer;
//! use chrono::Duration;
//!
//! let issuer = JwtIssuer::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     "employee-system",
//!     Duration::hours(24),
//! )
//! .unwrap();
//! let token = issuer.issue(1, "E001").unwrap();
//! let claims = issuer.verify(&token).unwrap();
//! assert_eq!(claims.employee_no, "E001");
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;

pub use issuer::JwtIssuer;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
