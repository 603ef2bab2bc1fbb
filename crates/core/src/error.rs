// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProcessState;

    #[test]
    fn test_domain_error_converts() {
        let err: AppError = ProcessState::Stopped
            .transition_to(ProcessState::Running)
            .unwrap_err()
            .into();

        assert!(matches!(err, AppError::Domain(_)));
        assert_eq!(
            err.to_string(),
            "Domain error: Invalid process state transition: STOPPED -> RUNNING"
        );
    }
}
