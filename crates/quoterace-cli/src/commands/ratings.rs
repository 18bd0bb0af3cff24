use serde_json::json;

use quoterace_core::Rating;

use crate::cli::{RateArgs, RatingsArgs};
use crate::error::CliError;

use super::{CommandResult, Context};

pub fn rate(args: &RateArgs, context: &Context) -> Result<CommandResult, CliError> {
    let id = args.id.trim();
    if id.is_empty() {
        return Err(CliError::Command(String::from("record id cannot be empty")));
    }
    let rating = Rating::new(args.stars)?;

    context.ratings.save(id, rating);

    Ok(
        CommandResult::ok(json!({ "id": id, "rating": rating.value() }))
            .with_line(format!("rated {id} {}/5", rating.value())),
    )
}

pub fn list(args: &RatingsArgs, context: &Context) -> Result<CommandResult, CliError> {
    if let Some(id) = &args.remove {
        let removed = context.ratings.remove(id);
        let mut result = CommandResult::ok(json!({ "id": id, "removed": removed }));
        result = if removed {
            result.with_line(format!("removed rating for {id}"))
        } else {
            result.with_warning(format!("no rating stored for {id}"))
        };
        return Ok(result);
    }

    let ratings = context.ratings.all();
    let data = ratings
        .iter()
        .map(|(id, rating)| (id.clone(), json!(rating.value())))
        .collect::<serde_json::Map<_, _>>();
    let lines = ratings
        .iter()
        .map(|(id, rating)| format!("{id}: {}/5", rating.value()))
        .collect::<Vec<_>>();

    Ok(CommandResult::ok(json!({ "ratings": data })).with_lines(lines))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::context_with_dummyjson;
    use super::*;

    #[test]
    fn rate_then_list_then_remove() {
        let context = context_with_dummyjson("{}");

        rate(
            &RateArgs {
                id: String::from("420"),
                stars: 5,
            },
            &context,
        )
        .expect("valid rating");

        let listed = list(&RatingsArgs { remove: None }, &context).expect("listing");
        assert_eq!(listed.data["ratings"]["420"], 5);

        let removed = list(
            &RatingsArgs {
                remove: Some(String::from("420")),
            },
            &context,
        )
        .expect("removal");
        assert_eq!(removed.data["removed"], true);
        assert!(context.ratings.all().is_empty());
    }

    #[test]
    fn out_of_range_rating_is_a_validation_error() {
        let context = context_with_dummyjson("{}");

        let error = rate(
            &RateArgs {
                id: String::from("420"),
                stars: 6,
            },
            &context,
        )
        .err()
        .expect("six stars is invalid");

        assert_eq!(error.exit_code(), 2);
    }
}
