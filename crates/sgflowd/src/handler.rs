//! Per-message request processing

use crate::error::HandleError;
use crate::reporter::{Outcome, Reporter};
use sgflow_cloud::{ApplyResult, Direction, ProviderFactory};
use sgflow_core::Request;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span};

/// Drives one change request from raw body to outcome notification
pub struct Handler {
    factory: Arc<dyn ProviderFactory>,
    reporter: Reporter,
}

impl Handler {
    pub fn new(factory: Arc<dyn ProviderFactory>, reporter: Reporter) -> Self {
        Self { factory, reporter }
    }

    /// Process one message body and report its outcome
    ///
    /// Never fails: every error ends up on the error subject, and a failed
    /// publish is logged and dropped.
    pub async fn handle(&self, data: &[u8]) -> Outcome {
        let request = match Request::decode(data) {
            Ok(request) => request,
            Err(e) => {
                let err = HandleError::Decode(e);
                error!(error = %err, "Discarding message");
                if let Err(e) = self.reporter.report_malformed(data).await {
                    error!(error = %e, "Failed to report malformed message");
                }
                return Outcome::Malformed;
            }
        };

        let span = info_span!(
            "request",
            request_id = %request.id,
            security_group = %request.security_group_id,
        );

        async {
            let outcome = match self.process(&request).await {
                Ok(_) => self.reporter.report_success(request).await,
                Err(err) => self
                    .reporter
                    .report_failure(request, &err)
                    .await
                    .map(|()| Outcome::Failed),
            };

            outcome.unwrap_or_else(|e| {
                error!(error = %e, "Failed to report outcome");
                Outcome::Failed
            })
        }
        .instrument(span)
        .await
    }

    /// Validate, reconcile and apply one request
    pub async fn process(&self, request: &Request) -> Result<ApplyResult, HandleError> {
        request.validate()?;

        let provider = self
            .factory
            .connect(&request.region, &request.credentials())
            .await?;

        let group = provider
            .describe_security_group(&request.security_group_id)
            .await?;

        let plan = sgflow_cloud::plan(
            &group,
            &request.permissions(Direction::Ingress),
            &request.permissions(Direction::Egress),
        );
        debug!(provider = provider.name(), plan = %plan.summary(), "Planned changes");

        let result = sgflow_cloud::apply(provider.as_ref(), &request.security_group_id, &plan)
            .await?;

        info!(
            revoked = result.revoked,
            authorized = result.authorized,
            duration_ms = result.duration_ms,
            "Security group updated"
        );
        Ok(result)
    }
}
