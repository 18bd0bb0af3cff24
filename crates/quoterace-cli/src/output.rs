use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

#[derive(Serialize)]
struct JsonDocument<'a> {
    data: &'a Value,
    #[serde(skip_serializing_if = "no_warnings")]
    warnings: &'a [String],
}

pub fn render(result: &CommandResult, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let document = JsonDocument {
                data: &result.data,
                warnings: &result.warnings,
            };
            let payload = if pretty {
                serde_json::to_string_pretty(&document)?
            } else {
                serde_json::to_string(&document)?
            };
            println!("{payload}");
        }
        OutputFormat::Text => render_text(result),
    }

    Ok(())
}

fn no_warnings(warnings: &&[String]) -> bool {
    warnings.is_empty()
}

fn render_text(result: &CommandResult) {
    for line in &result.lines {
        println!("{line}");
    }
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
}
