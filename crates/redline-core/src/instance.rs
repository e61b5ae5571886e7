//! Instance state.
//!
//! An instance is one running redline server: its configuration, a single
//! baseline store that lives as long as the instance, and the tools that
//! operate on it.

use crate::config::Config;
use crate::error::CoreResult;
use redline_tools::{ToolContext, ToolRegistry};
use redline_tracking::{BaselineStore, Engine};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Everything a server needs to answer tool calls.
#[derive(Clone)]
pub struct Instance {
    config: Arc<Config>,
    sources: Arc<Vec<PathBuf>>,
    registry: Arc<ToolRegistry>,
    context: ToolContext,
}

impl Instance {
    /// Load configuration for `project_dir`, apply `overrides` on top, and
    /// build an instance from the result.
    pub async fn load(project_dir: Option<&Path>, overrides: Config) -> CoreResult<Self> {
        let (config, sources) = Config::load(project_dir).await?;
        let config = config.merge(overrides);
        config.validate()?;
        Self::from_config(config, sources)
    }

    /// Build an instance from an already-loaded config.
    pub fn from_config(config: Config, sources: Vec<PathBuf>) -> CoreResult<Self> {
        let resolver = config.resolver()?;
        let engine = Engine::new(BaselineStore::shared(), config.engine_settings());
        let session_id = format!("redline-{}", chrono::Utc::now().format("%Y%m%dT%H%M%S"));

        info!(
            session = %session_id,
            documents = %resolver.root().display(),
            confined = config.confine_to_root.unwrap_or(false),
            "Instance ready"
        );

        Ok(Self {
            config: Arc::new(config),
            sources: Arc::new(sources),
            registry: Arc::new(ToolRegistry::with_builtins()),
            context: ToolContext::new(session_id, resolver, engine),
        })
    }

    /// The effective configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Config files that were loaded.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// The registered tools.
    pub fn registry(&self) -> Arc<ToolRegistry> {
        self.registry.clone()
    }

    /// Context handed to every tool call.
    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    /// The documents root.
    pub fn documents_root(&self) -> &Path {
        self.context.resolver.root()
    }
}
