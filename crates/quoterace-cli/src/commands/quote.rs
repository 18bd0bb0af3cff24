use serde::Serialize;

use quoterace_core::{EngineResult, SourceFailure};

use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct QuoteResponseData<'a> {
    id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<&'a str>,
    provenance: String,
    source_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<u8>,
    latency_ms: u64,
    failures: &'a [SourceFailure],
}

pub async fn run(context: &Context) -> Result<CommandResult, CliError> {
    let result = context.engine.acquire(None).await;
    let rating = context.ratings.get(result.record.id()).map(|rating| rating.value());
    render(&result, rating)
}

/// Shared by `quote` and `slideshow play`.
pub fn render(result: &EngineResult, rating: Option<u8>) -> Result<CommandResult, CliError> {
    let record = &result.record;
    let source_label = result.provenance.display_label();

    let data = serde_json::to_value(QuoteResponseData {
        id: record.id(),
        text: record.text(),
        author: record.author(),
        provenance: result.provenance.to_string(),
        source_label: source_label.clone(),
        rating,
        latency_ms: result.latency_ms,
        failures: &result.failures,
    })?;

    let mut lines = vec![format!("\"{}\"", record.text())];
    if let Some(author) = record.author() {
        lines.push(format!("  - {author}"));
    }
    let mut detail = format!(
        "  [{}] id={} {}ms",
        source_label,
        record.id(),
        result.latency_ms
    );
    if let Some(stars) = rating {
        detail.push_str(&format!(" rated {stars}/5"));
    }
    lines.push(detail);

    let mut command_result = CommandResult::ok(data).with_lines(lines);
    if !result.provenance.is_live() {
        command_result = command_result.with_warning(format!(
            "no live source answered ({} failure(s)); served {} record",
            result.failures.len(),
            result.provenance
        ));
    }
    Ok(command_result)
}

#[cfg(test)]
mod tests {
    use quoterace_core::Rating;

    use super::super::test_support::context_with_dummyjson;
    use super::*;

    #[tokio::test]
    async fn quote_reports_live_source_and_rating() {
        let context = context_with_dummyjson(r#"{"id":420,"quote":"Q","author":"Au"}"#);
        context.ratings.save("420", Rating::new(4).expect("valid"));

        let result = run(&context).await.expect("quote succeeds");

        assert_eq!(result.data["id"], "420");
        assert_eq!(result.data["provenance"], "dummyjson.com");
        assert_eq!(result.data["source_label"], "dummyjson.com");
        assert_eq!(result.data["rating"], 4);
        assert!(result.warnings.is_empty());
        assert_eq!(result.lines[0], "\"Q\"");
    }

    #[tokio::test]
    async fn fallback_quote_carries_a_warning() {
        let context = context_with_dummyjson(r#"{"id":1,"quote":""}"#);

        let result = run(&context).await.expect("quote still succeeds");

        assert_eq!(result.data["provenance"], "offline");
        assert_eq!(result.data["source_label"], "Offline fallback");
        assert_eq!(result.warnings.len(), 1);
    }
}
