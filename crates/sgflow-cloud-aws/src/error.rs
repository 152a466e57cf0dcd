//! AWS provider error types

use aws_sdk_ec2::error::ProvideErrorMetadata;
use thiserror::Error;

/// EC2 error codes that mean the request's credentials were not accepted
const AUTH_ERROR_CODES: [&str; 4] = [
    "AuthFailure",
    "InvalidClientTokenId",
    "SignatureDoesNotMatch",
    "UnauthorizedOperation",
];

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("{operation} failed: {message}")]
    Sdk {
        operation: &'static str,
        code: Option<String>,
        message: String,
    },

    #[error("Region is required")]
    MissingRegion,
}

impl AwsError {
    /// Wrap an SDK error, keeping the error code and the full error chain
    pub fn sdk<E>(operation: &'static str, err: E) -> Self
    where
        E: std::error::Error + ProvideErrorMetadata,
    {
        Self::Sdk {
            operation,
            code: err.code().map(str::to_string),
            message: aws_sdk_ec2::error::DisplayErrorContext(err).to_string(),
        }
    }

    fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Sdk { code: Some(code), .. } if AUTH_ERROR_CODES.contains(&code.as_str()))
    }
}

impl From<AwsError> for sgflow_cloud::CloudError {
    fn from(err: AwsError) -> Self {
        match err {
            AwsError::MissingRegion => Self::InvalidConfig(err.to_string()),
            AwsError::Sdk { .. } if err.is_auth_failure() => {
                Self::AuthenticationFailed(err.to_string())
            }
            AwsError::Sdk { .. } => Self::ApiError(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AwsError>;
