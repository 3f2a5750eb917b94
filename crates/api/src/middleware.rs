/// Session tokens and the `AuthUser`/`StaffUser` extractors
pub mod auth;
/// Mapping of domain errors to HTTP responses
pub mod error_handling;
