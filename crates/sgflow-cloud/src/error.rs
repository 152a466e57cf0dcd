//! Cloud provider error types

use thiserror::Error;

/// Security group provider errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Could not find security group: {0}")]
    SecurityGroupNotFound(String),

    #[error("Security group {id} is ambiguous: {count} groups matched")]
    AmbiguousSecurityGroup { id: String, count: usize },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("{0}")]
    ApiError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CloudError>;
