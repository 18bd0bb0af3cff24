//! Per-source response normalizers.
//!
//! Each upstream answers in its own JSON shape. A normalizer converts that
//! untyped payload into a [`CanonicalRecord`] stamped with the source's fixed
//! provenance, or fails with a [`ValidationError`] naming what was wrong.
//!
//! | Source | Shape | Text | Author |
//! |--------|-------|------|--------|
//! | `dummyjson` | `{id, quote, author}` | `quote` | `author` |
//! | `zenquotes` | `[{q, a}]` | `q` | `a` |
//! | `programming` | `{quote, author}` | `quote` | `author` |
//! | `catfact` | `{fact, length}` | `fact` | fixed attribution |
//! | `randomuser` | `{results: [{name, location}]}` | joined name parts | joined location parts |

use serde::Deserialize;
use serde_json::Value;

use crate::{CanonicalRecord, Provenance, SourceId, UtcDateTime, ValidationError};

/// Pure conversion from a decoded payload to a canonical record.
pub type Normalizer = fn(&Value) -> Result<CanonicalRecord, ValidationError>;

const CAT_FACT_AUTHOR: &str = "Random Cat Facts";

/// Resolves the normalizer bound to a source at registration time.
pub fn normalizer_for(source: SourceId) -> Normalizer {
    match source {
        SourceId::Dummyjson => normalize_dummyjson,
        SourceId::Zenquotes => normalize_zenquotes,
        SourceId::Programming => normalize_programming,
        SourceId::Catfact => normalize_catfact,
        SourceId::Randomuser => normalize_randomuser,
    }
}

#[derive(Debug, Deserialize)]
struct DummyJsonPayload {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    quote: Option<Value>,
    #[serde(default)]
    author: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ZenQuotePayload {
    #[serde(default)]
    q: Option<Value>,
    #[serde(default)]
    a: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ProgrammingQuotePayload {
    #[serde(default)]
    quote: Option<Value>,
    #[serde(default)]
    author: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CatFactPayload {
    #[serde(default)]
    fact: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RandomUserResponse {
    #[serde(default)]
    results: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RandomUserPayload {
    #[serde(default)]
    name: RandomUserName,
    #[serde(default)]
    location: RandomUserLocation,
    #[serde(default)]
    login: Option<RandomUserLogin>,
}

#[derive(Debug, Default, Deserialize)]
struct RandomUserName {
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    first: Option<Value>,
    #[serde(default)]
    last: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RandomUserLocation {
    #[serde(default)]
    city: Option<Value>,
    #[serde(default)]
    state: Option<Value>,
    #[serde(default)]
    country: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RandomUserLogin {
    #[serde(default)]
    uuid: Option<Value>,
}

pub fn normalize_dummyjson(payload: &Value) -> Result<CanonicalRecord, ValidationError> {
    let payload: DummyJsonPayload = decode_object(payload)?;
    let text = require_text(payload.quote.as_ref(), "quote")?;
    let id = Some(coerce_string(payload.id.as_ref()))
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| generated_id("dummy"));

    CanonicalRecord::new(
        id,
        text,
        optional_text(payload.author.as_ref()),
        Provenance::Source(SourceId::Dummyjson),
    )
}

pub fn normalize_zenquotes(payload: &Value) -> Result<CanonicalRecord, ValidationError> {
    let items = payload
        .as_array()
        .ok_or(ValidationError::InvalidFormat { expected: "array" })?;
    let first = items
        .first()
        .ok_or(ValidationError::EmptyArray { field: "response" })?;
    let item: ZenQuotePayload = decode_object(first)?;
    let text = require_text(item.q.as_ref(), "q")?;

    CanonicalRecord::new(
        generated_id("zen"),
        text,
        optional_text(item.a.as_ref()),
        Provenance::Source(SourceId::Zenquotes),
    )
}

pub fn normalize_programming(payload: &Value) -> Result<CanonicalRecord, ValidationError> {
    let payload: ProgrammingQuotePayload = decode_object(payload)?;
    let text = require_text(payload.quote.as_ref(), "quote")?;

    CanonicalRecord::new(
        generated_id("prog"),
        text,
        optional_text(payload.author.as_ref()),
        Provenance::Source(SourceId::Programming),
    )
}

pub fn normalize_catfact(payload: &Value) -> Result<CanonicalRecord, ValidationError> {
    let payload: CatFactPayload = decode_object(payload)?;
    let text = require_text(payload.fact.as_ref(), "fact")?;

    CanonicalRecord::new(
        generated_id("cat"),
        text,
        Some(String::from(CAT_FACT_AUTHOR)),
        Provenance::Source(SourceId::Catfact),
    )
}

pub fn normalize_randomuser(payload: &Value) -> Result<CanonicalRecord, ValidationError> {
    let response: RandomUserResponse = decode_object(payload)?;
    let results = response
        .results
        .as_ref()
        .and_then(Value::as_array)
        .ok_or(ValidationError::InvalidFormat {
            expected: "object with a 'results' array",
        })?;
    let first = results
        .first()
        .ok_or(ValidationError::EmptyArray { field: "results" })?;
    let person: RandomUserPayload = decode_object(first)?;

    let text = join_parts([
        person.name.title.as_ref(),
        person.name.first.as_ref(),
        person.name.last.as_ref(),
    ]);
    if text.is_empty() {
        return Err(ValidationError::MissingText { field: "name" });
    }

    let author = join_parts([
        person.location.city.as_ref(),
        person.location.state.as_ref(),
        person.location.country.as_ref(),
    ]);
    let id = person
        .login
        .and_then(|login| login.uuid)
        .map(|uuid| coerce_string(Some(&uuid)))
        .filter(|uuid| !uuid.trim().is_empty())
        .map(|uuid| format!("user-{uuid}"))
        .unwrap_or_else(|| generated_id("user"));

    CanonicalRecord::new(
        id,
        text,
        Some(author),
        Provenance::Source(SourceId::Randomuser),
    )
}

fn decode_object<'de, T>(payload: &'de Value) -> Result<T, ValidationError>
where
    T: Deserialize<'de>,
{
    if !payload.is_object() {
        return Err(ValidationError::InvalidFormat { expected: "object" });
    }

    T::deserialize(payload).map_err(|error| ValidationError::MalformedPayload {
        reason: error.to_string(),
    })
}

/// String coercion for loosely typed fields; containers coerce to empty.
fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Null) | Some(Value::Array(_)) | Some(Value::Object(_)) | None => String::new(),
    }
}

fn require_text(value: Option<&Value>, field: &'static str) -> Result<String, ValidationError> {
    let text = coerce_string(value);
    if text.trim().is_empty() {
        return Err(ValidationError::MissingText { field });
    }
    Ok(text)
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    Some(coerce_string(value)).filter(|text| !text.trim().is_empty())
}

fn join_parts<'a>(parts: impl IntoIterator<Item = Option<&'a Value>>) -> String {
    parts
        .into_iter()
        .map(coerce_string)
        .map(|part| part.trim().to_owned())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn generated_id(prefix: &str) -> String {
    format!(
        "{prefix}-{}-{:08x}",
        UtcDateTime::now().unix_millis(),
        fastrand::u32(..)
    )
}
