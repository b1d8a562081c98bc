use super::{ComponentKind, Lifecycle};
use crate::models::CliConfig;
use tracing::info;

/// Placeholder for the interactive front end's server-side presence.
#[derive(Debug)]
pub struct Cli {
    config: CliConfig,
    lifecycle: Lifecycle,
}

impl Cli {
    pub fn new(config: CliConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::new(ComponentKind::Cli),
        }
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    pub fn initialize(&self) {
        if self.lifecycle.start() {
            info!("CLI endpoint {}:{}", self.config.host, self.config.port);
        }
    }

    pub fn destroy(&self) {
        self.lifecycle.stop();
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle.is_initialized()
    }
}
