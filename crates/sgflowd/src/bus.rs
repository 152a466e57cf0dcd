//! Message transport

use crate::error::BusError;
use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;

/// Outbound half of the transport
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BusError>;
}

/// NATS-backed transport
///
/// Connected once at startup and shared by every handler task.
#[derive(Clone)]
pub struct NatsBus {
    client: async_nats::Client,
}

impl NatsBus {
    pub async fn connect(url: &str) -> Result<Self, BusError> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| BusError::ConnectionFailed {
                url: url.to_string(),
                cause: e.to_string(),
            })?;

        tracing::info!(url, "Connected to NATS");
        Ok(Self { client })
    }

    /// Subscribe to a subject, optionally as part of a queue group
    ///
    /// Yields the raw body of every message.
    pub async fn subscribe(
        &self,
        subject: &str,
        queue_group: Option<&str>,
    ) -> Result<BoxStream<'static, Vec<u8>>, BusError> {
        let subscriber = match queue_group {
            Some(group) => {
                self.client
                    .queue_subscribe(subject.to_string(), group.to_string())
                    .await
            }
            None => self.client.subscribe(subject.to_string()).await,
        }
        .map_err(|e| BusError::SubscribeFailed {
            subject: subject.to_string(),
            cause: e.to_string(),
        })?;

        tracing::info!(subject, queue_group = ?queue_group, "Subscribed");
        Ok(subscriber.map(|message| message.payload.to_vec()).boxed())
    }

    /// Wait until every published message has reached the server
    pub async fn flush(&self) -> Result<(), BusError> {
        self.client
            .flush()
            .await
            .map_err(|e| BusError::FlushFailed(e.to_string()))
    }
}

#[async_trait]
impl Publisher for NatsBus {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BusError> {
        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| BusError::PublishFailed {
                subject: subject.to_string(),
                cause: e.to_string(),
            })
    }
}
