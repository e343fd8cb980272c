//! Domain services for the employee directory.
//!
//! Each service receives its collaborators at construction; none of them
//! holds mutable state between requests.

pub mod authentication;
pub mod directory;
pub mod registration;

pub use authentication::AuthenticationService;
pub use directory::DirectoryQueryService;
pub use registration::RegistrationService;
