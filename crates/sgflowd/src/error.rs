//! Daemon error types

use sgflow_cloud::CloudError;
use sgflow_core::ValidationError;
use thiserror::Error;

/// Message transport errors
#[derive(Error, Debug)]
pub enum BusError {
    #[error("Failed to connect to {url}: {cause}")]
    ConnectionFailed { url: String, cause: String },

    #[error("Failed to subscribe to {subject}: {cause}")]
    SubscribeFailed { subject: String, cause: String },

    #[error("Failed to publish to {subject}: {cause}")]
    PublishFailed { subject: String, cause: String },

    #[error("Failed to flush: {0}")]
    FlushFailed(String),
}

/// Reasons a change request ends on the error subject
///
/// Validation and provider errors display as the underlying message, which
/// is what ends up in the request's `error` field.
#[derive(Error, Debug)]
pub enum HandleError {
    #[error("Malformed request: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Provider(#[from] CloudError),

    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Failures while delivering an outcome notification
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Bus(#[from] BusError),
}
