use anyhow::Context;
use sgflow_cloud_aws::AwsProviderFactory;
use sgflow_config::DaemonConfig;
use std::path::Path;
use std::sync::Arc;

/// Command-line values that win over the config file and environment
#[derive(Debug, Default)]
pub struct Overrides {
    pub nats_url: Option<String>,
    pub subject: Option<String>,
    pub queue_group: Option<String>,
}

impl Overrides {
    fn apply(self, config: &mut DaemonConfig) {
        if let Some(url) = self.nats_url {
            config.nats_url = url;
        }
        if let Some(subject) = self.subject {
            config.subject = subject;
        }
        if let Some(group) = self.queue_group {
            config.queue_group = Some(group).filter(|g| !g.is_empty());
        }
    }
}

/// Defaults, file and environment, then command-line overrides, validated once
fn resolve_config(config_path: Option<&Path>, overrides: Overrides) -> anyhow::Result<DaemonConfig> {
    let mut config =
        DaemonConfig::load_from(config_path).context("Failed to load configuration")?;
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

pub async fn handle(config_path: Option<&Path>, overrides: Overrides) -> anyhow::Result<()> {
    let config = resolve_config(config_path, overrides)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        nats_url = %config.nats_url,
        "Starting sgflowd"
    );

    sgflowd::run(&config, Arc::new(AwsProviderFactory::new())).await
}
