mod cache;
mod quote;
mod ratings;
mod slideshow;
mod sources;

use std::time::Duration;

use quoterace_core::{EngineConfig, QuoteEngine, RatingsStore, SettingsStore};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    /// Rendering for `--format text`.
    pub lines: Vec<String>,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            lines: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn with_lines(mut self, lines: impl IntoIterator<Item = String>) -> Self {
        self.lines.extend(lines);
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Engine plus the stores sharing its key-value backend.
pub struct Context {
    pub engine: QuoteEngine,
    pub ratings: RatingsStore,
    pub settings: SettingsStore,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut config = EngineConfig::from_env()?;
        if let Some(data_dir) = &cli.data_dir {
            config = config.with_data_dir(data_dir.clone());
        }
        if let Some(timeout_ms) = cli.timeout_ms {
            config = config.with_timeout(Duration::from_millis(timeout_ms));
        }

        let engine = QuoteEngine::from_config(&config);
        Ok(Self::with_engine(engine))
    }

    pub fn with_engine(engine: QuoteEngine) -> Self {
        let ratings = RatingsStore::new(engine.store());
        let settings = SettingsStore::new(engine.store());
        Self {
            engine,
            ratings,
            settings,
        }
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let context = Context::from_cli(cli)?;

    match &cli.command {
        Command::Quote => quote::run(&context).await,
        Command::Sources => sources::run(&context),
        Command::Rate(args) => ratings::rate(args, &context),
        Command::Ratings(args) => ratings::list(args, &context),
        Command::Cache(args) => cache::run(args, &context).await,
        Command::Slideshow(args) => slideshow::run(args, &context, cli.format, cli.pretty).await,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use quoterace_core::{
        MemoryKeyValueStore, QuoteEngine, ScriptedHttpClient, SourceId, SourceRegistryBuilder,
    };

    use super::Context;

    /// Context whose only source answers with the given dummyjson payload.
    pub fn context_with_dummyjson(body: &str) -> Context {
        let client = ScriptedHttpClient::new().with_json(
            "http://quotes.test/random",
            std::time::Duration::ZERO,
            body,
        );
        let engine = QuoteEngine::builder()
            .with_registry(
                SourceRegistryBuilder::only([SourceId::Dummyjson])
                    .with_address(SourceId::Dummyjson, "http://quotes.test/random")
                    .build(),
            )
            .with_http_client(Arc::new(client))
            .with_store(Arc::new(MemoryKeyValueStore::new()))
            .with_default_timeout(std::time::Duration::from_secs(1))
            .build();
        Context::with_engine(engine)
    }
}
