use serde::Serialize;
use serde_json::json;

use quoterace_core::CachedRecord;

use crate::cli::{CacheArgs, CacheCommand};
use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct CacheListData {
    capacity: usize,
    retention_secs: u64,
    entries: Vec<CachedRecord>,
}

pub async fn run(args: &CacheArgs, context: &Context) -> Result<CommandResult, CliError> {
    let cache = context.engine.cache();

    match args.command {
        CacheCommand::List => {
            let policy = cache.policy().await;
            let entries = cache.entries().await;
            let lines = entries
                .iter()
                .map(|entry| {
                    format!(
                        "{} [{}] {} \"{}\"",
                        entry.cached_at(),
                        entry.record().provenance(),
                        entry.record().id(),
                        entry.record().text()
                    )
                })
                .collect::<Vec<_>>();

            let data = serde_json::to_value(CacheListData {
                capacity: policy.capacity,
                retention_secs: policy.retention.as_secs(),
                entries,
            })?;
            Ok(CommandResult::ok(data).with_lines(lines))
        }
        CacheCommand::Clear => {
            let cleared = cache.entries().await.len();
            cache.clear().await;
            Ok(CommandResult::ok(json!({ "cleared": cleared }))
                .with_line(format!("cleared {cleared} cached record(s)")))
        }
    }
}
