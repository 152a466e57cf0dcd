//! Subscription loop

use crate::bus::NatsBus;
use crate::handler::Handler;
use crate::reporter::Reporter;
use futures_util::{FutureExt, Stream, StreamExt};
use sgflow_cloud::ProviderFactory;
use sgflow_config::DaemonConfig;
use std::future::Future;
use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Handle messages until the stream ends or `shutdown` resolves
///
/// Each message gets its own task, so requests are processed concurrently
/// and in no particular order. On shutdown, messages that are already
/// buffered are still handled, and in-flight tasks are awaited before
/// returning.
pub async fn serve<S, F>(mut messages: S, handler: Arc<Handler>, shutdown: F)
where
    S: Stream<Item = Vec<u8>> + Unpin,
    F: Future<Output = ()>,
{
    let mut tasks = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            message = messages.next() => {
                let Some(data) = message else {
                    warn!("Subscription closed");
                    break;
                };
                let handler = handler.clone();
                tasks.spawn(async move { handler.handle(&data).await });
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    error!(error = %e, "Handler task failed");
                }
            }
            _ = &mut shutdown => {
                info!("Shutting down");
                // Messages already delivered to this subscriber still get a notification
                while let Some(Some(data)) = messages.next().now_or_never() {
                    let handler = handler.clone();
                    tasks.spawn(async move { handler.handle(&data).await });
                }
                break;
            }
        }
    }

    if !tasks.is_empty() {
        info!(in_flight = tasks.len(), "Waiting for in-flight requests");
    }
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Handler task failed");
        }
    }
}

/// Connect to NATS and serve change requests until a shutdown signal
pub async fn run(config: &DaemonConfig, factory: Arc<dyn ProviderFactory>) -> anyhow::Result<()> {
    let bus = Arc::new(NatsBus::connect(&config.nats_url).await?);

    let reporter = Reporter::new(bus.clone(), config.done_subject(), config.error_subject());
    let handler = Arc::new(Handler::new(factory, reporter));

    let messages = bus
        .subscribe(&config.subject, config.queue_group.as_deref())
        .await?;

    info!(
        subject = %config.subject,
        done = %config.done_subject(),
        error = %config.error_subject(),
        "Waiting for change requests"
    );

    serve(messages, handler, shutdown_signal()).await;

    bus.flush().await?;
    info!("Stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
