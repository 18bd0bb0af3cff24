use serde_json::json;
use tracing::info;

use quoterace_core::SlideshowSettings;

use crate::cli::{OutputFormat, SlideshowArgs, SlideshowCommand, SlideshowPlayArgs, SlideshowSetArgs};
use crate::error::CliError;
use crate::output;

use super::{quote, CommandResult, Context};

pub async fn run(
    args: &SlideshowArgs,
    context: &Context,
    format: OutputFormat,
    pretty: bool,
) -> Result<CommandResult, CliError> {
    match &args.command {
        SlideshowCommand::Show => show(context.settings.load()),
        SlideshowCommand::Set(set_args) => set(set_args, context),
        SlideshowCommand::Play(play_args) => play(play_args, context, format, pretty).await,
    }
}

fn show(settings: SlideshowSettings) -> Result<CommandResult, CliError> {
    let state = if settings.enabled { "enabled" } else { "disabled" };
    Ok(CommandResult::ok(serde_json::to_value(settings)?).with_line(format!(
        "slideshow {state}, every {}s",
        settings.interval_seconds
    )))
}

fn set(args: &SlideshowSetArgs, context: &Context) -> Result<CommandResult, CliError> {
    let mut settings = context.settings.load();
    if let Some(enabled) = args.enabled {
        settings.enabled = enabled;
    }
    if let Some(interval) = args.interval {
        settings.interval_seconds = interval;
    }

    context.settings.save(settings)?;
    show(settings)
}

/// Settings are read once at start; later changes apply to the next run.
async fn play(
    args: &SlideshowPlayArgs,
    context: &Context,
    format: OutputFormat,
    pretty: bool,
) -> Result<CommandResult, CliError> {
    let settings = context.settings.load();
    if !settings.enabled {
        return Ok(CommandResult::ok(json!({ "played": 0 }))
            .with_warning("slideshow is disabled; enable it with `slideshow set --enabled true`"));
    }
    if args.count == Some(0) {
        return Ok(CommandResult::ok(json!({ "played": 0 })));
    }

    info!(interval_seconds = settings.interval_seconds, "starting slideshow");
    let mut played = 0usize;
    loop {
        let result = context.engine.acquire(None).await;
        let rating = context
            .ratings
            .get(result.record.id())
            .map(|rating| rating.value());
        output::render(&quote::render(&result, rating)?, format, pretty)?;
        played += 1;

        if args.count.is_some_and(|count| played >= count) {
            break;
        }

        tokio::select! {
            () = tokio::time::sleep(settings.interval()) => {}
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
        }
    }

    Ok(CommandResult::ok(json!({ "played": played }))
        .with_line(format!("slideshow finished after {played} record(s)")))
}
