//! Validation trait definition

/// Validation trait for configuration sections
///
/// Errors are plain messages; [`crate::config::Config::validate`] wraps them
/// into `DeployError::Config` with the section name.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
