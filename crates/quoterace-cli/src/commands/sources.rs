use serde::Serialize;

use quoterace_core::SourceId;

use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct SourceStatus<'a> {
    id: SourceId,
    label: &'static str,
    address: &'a str,
    address_overridden: bool,
}

#[derive(Debug, Serialize)]
struct SourcesResponseData<'a> {
    sources: Vec<SourceStatus<'a>>,
    disabled: Vec<SourceId>,
}

pub fn run(context: &Context) -> Result<CommandResult, CliError> {
    let registry = context.engine.registry();
    let sources = registry
        .iter()
        .map(|descriptor| SourceStatus {
            id: descriptor.id(),
            label: descriptor.id().label(),
            address: descriptor.address(),
            address_overridden: descriptor.address() != descriptor.id().default_address(),
        })
        .collect::<Vec<_>>();
    let disabled = SourceId::ALL
        .into_iter()
        .filter(|id| registry.get(*id).is_none())
        .collect::<Vec<_>>();

    let lines = sources
        .iter()
        .map(|source| format!("{:<12} {:<34} {}", source.id.as_str(), source.label, source.address))
        .chain(disabled.iter().map(|id| format!("{:<12} (disabled)", id.as_str())))
        .collect::<Vec<_>>();

    let mut result =
        CommandResult::ok(serde_json::to_value(SourcesResponseData { sources, disabled })?)
            .with_lines(lines);
    if registry.is_empty() {
        result = result.with_warning("every source is disabled; quotes will come from the fallback chain");
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::context_with_dummyjson;
    use super::*;

    #[test]
    fn lists_enabled_and_disabled_sources() {
        let context = context_with_dummyjson("{}");

        let result = run(&context).expect("sources listing");

        assert_eq!(result.data["sources"][0]["id"], "dummyjson");
        assert_eq!(result.data["sources"][0]["address_overridden"], true);
        assert_eq!(result.data["disabled"].as_array().map(Vec::len), Some(4));
        assert_eq!(result.lines.len(), 5);
    }
}
