//! Outcome reporting
//!
//! Every inbound message ends with exactly one notification: the encoded
//! request on the done subject, or on the error subject with its `error`
//! field set. Bodies that never decoded are echoed back unchanged.

use crate::bus::Publisher;
use crate::error::{HandleError, ReportError};
use sgflow_core::Request;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Which subject a request's notification went to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed,
    /// The body never decoded and was echoed on the error subject
    Malformed,
}

pub struct Reporter {
    publisher: Arc<dyn Publisher>,
    done_subject: String,
    error_subject: String,
}

impl Reporter {
    pub fn new(
        publisher: Arc<dyn Publisher>,
        done_subject: impl Into<String>,
        error_subject: impl Into<String>,
    ) -> Self {
        Self {
            publisher,
            done_subject: done_subject.into(),
            error_subject: error_subject.into(),
        }
    }

    /// Publish the unchanged request on the done subject
    ///
    /// Falls back to [`Reporter::report_failure`] if the request cannot be
    /// encoded.
    pub async fn report_success(&self, request: Request) -> Result<Outcome, ReportError> {
        let data = match request.encode() {
            Ok(data) => data,
            Err(e) => {
                self.report_failure(request, &HandleError::Encode(e)).await?;
                return Ok(Outcome::Failed);
            }
        };

        self.publisher.publish(&self.done_subject, data).await?;
        info!(request_id = %request.id, "Request completed");
        Ok(Outcome::Done)
    }

    /// Record the error on the request and publish it on the error subject
    pub async fn report_failure(
        &self,
        mut request: Request,
        err: &HandleError,
    ) -> Result<(), ReportError> {
        warn!(request_id = %request.id, error = %err, "Request failed");
        request.fail(err.to_string());

        let data = request.encode().inspect_err(|e| {
            error!(request_id = %request.id, error = %e, "Could not encode failed request");
        })?;

        self.publisher.publish(&self.error_subject, data).await?;
        Ok(())
    }

    /// Echo an undecodable body on the error subject
    pub async fn report_malformed(&self, raw: &[u8]) -> Result<(), ReportError> {
        self.publisher
            .publish(&self.error_subject, raw.to_vec())
            .await?;
        Ok(())
    }
}
