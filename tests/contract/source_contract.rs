use serde_json::{json, Value};

use quoterace_core::{Provenance, SourceDescriptor, SourceId, SourceRegistry, ValidationError};

#[derive(Clone)]
struct SourceCase {
    id: SourceId,
    valid: Value,
    expected_text: &'static str,
    missing_text: Value,
    empty_text: Value,
}

fn source_cases() -> Vec<SourceCase> {
    vec![
        SourceCase {
            id: SourceId::Dummyjson,
            valid: json!({"id": 420, "quote": "Q", "author": "Au"}),
            expected_text: "Q",
            missing_text: json!({"id": 1, "author": "Au"}),
            empty_text: json!({"id": 1, "quote": "", "author": "Au"}),
        },
        SourceCase {
            id: SourceId::Zenquotes,
            valid: json!([{"q": "Be here now.", "a": "Ram Dass"}]),
            expected_text: "Be here now.",
            missing_text: json!([{"a": "Ram Dass"}]),
            empty_text: json!([{"q": "   ", "a": "Ram Dass"}]),
        },
        SourceCase {
            id: SourceId::Programming,
            valid: json!({"quote": "Simplicity is prerequisite for reliability.", "author": "Dijkstra"}),
            expected_text: "Simplicity is prerequisite for reliability.",
            missing_text: json!({"author": "Dijkstra"}),
            empty_text: json!({"quote": null, "author": "Dijkstra"}),
        },
        SourceCase {
            id: SourceId::Catfact,
            valid: json!({"fact": "Cats sleep a lot.", "length": 17}),
            expected_text: "Cats sleep a lot.",
            missing_text: json!({"length": 0}),
            empty_text: json!({"fact": "", "length": 0}),
        },
        SourceCase {
            id: SourceId::Randomuser,
            valid: json!({"results": [{
                "name": {"title": "Ms", "first": " Ada ", "last": "Lovelace"},
                "location": {"city": "London", "state": "Greater London", "country": "UK"},
                "login": {"uuid": "abc"}
            }]}),
            expected_text: "Ms Ada Lovelace",
            missing_text: json!({"results": [{"location": {"city": "London"}}]}),
            empty_text: json!({"results": [{
                "name": {"title": " ", "first": "", "last": "  "},
                "location": {"city": "London"}
            }]}),
        },
    ]
}

fn descriptor(id: SourceId) -> SourceDescriptor {
    SourceDescriptor::with_default_address(id)
}

#[test]
fn every_registered_source_has_a_contract_case() {
    let covered = source_cases().into_iter().map(|case| case.id).collect::<Vec<_>>();
    assert_eq!(covered, SourceRegistry::default().ids());
}

#[test]
fn valid_payload_normalizes_with_the_source_provenance() {
    for case in source_cases() {
        let record = descriptor(case.id)
            .normalize(&case.valid)
            .unwrap_or_else(|error| panic!("source '{}' rejected a valid payload: {error}", case.id));

        assert_eq!(record.text(), case.expected_text, "source '{}': text", case.id);
        assert_eq!(
            record.provenance(),
            Provenance::Source(case.id),
            "source '{}': provenance",
            case.id
        );
        assert!(!record.id().is_empty(), "source '{}': id must be stamped", case.id);
        assert_eq!(
            record.provenance().as_str(),
            case.id.label(),
            "source '{}': provenance label",
            case.id
        );
    }
}

#[test]
fn missing_or_empty_primary_text_is_rejected_by_every_source() {
    for case in source_cases() {
        for payload in [&case.missing_text, &case.empty_text] {
            let error = descriptor(case.id)
                .normalize(payload)
                .expect_err("payload without text must fail");
            assert!(
                matches!(error, ValidationError::MissingText { .. }),
                "source '{}': expected missing text, got {error}",
                case.id
            );
            assert!(error.to_string().starts_with("Missing quote text"));
        }
    }
}

#[test]
fn provenance_labels_are_distinct_across_sources() {
    let mut labels = SourceId::ALL.iter().map(|id| id.label()).collect::<Vec<_>>();
    labels.sort_unstable();
    labels.dedup();
    assert_eq!(labels.len(), SourceId::ALL.len());
}

#[test]
fn optional_attribution_degrades_to_absent() {
    let record = descriptor(SourceId::Dummyjson)
        .normalize(&json!({"id": 9, "quote": "Q"}))
        .expect("author is optional");
    assert_eq!(record.author(), None);

    let record = descriptor(SourceId::Zenquotes)
        .normalize(&json!([{"q": "Q", "a": ""}]))
        .expect("author is optional");
    assert_eq!(record.author(), None);
}

#[test]
fn empty_arrays_are_validation_failures() {
    let error = descriptor(SourceId::Zenquotes)
        .normalize(&json!([]))
        .expect_err("empty array");
    assert!(matches!(error, ValidationError::EmptyArray { .. }));

    let error = descriptor(SourceId::Randomuser)
        .normalize(&json!({"results": []}))
        .expect_err("empty results");
    assert!(matches!(error, ValidationError::EmptyArray { field: "results" }));
}

#[test]
fn nested_person_records_are_flattened() {
    let record = descriptor(SourceId::Randomuser)
        .normalize(&source_cases()[4].valid)
        .expect("valid randomuser payload");

    assert_eq!(record.text(), "Ms Ada Lovelace");
    assert_eq!(record.author(), Some("London Greater London UK"));
    assert_eq!(record.id(), "user-abc");
}

#[test]
fn generated_ids_are_unique_per_call() {
    let payload = json!({"fact": "Cats purr.", "length": 10});
    let first = descriptor(SourceId::Catfact).normalize(&payload).expect("valid");
    let second = descriptor(SourceId::Catfact).normalize(&payload).expect("valid");

    assert!(first.id().starts_with("cat-"));
    assert_ne!(first.id(), second.id());
    assert_eq!(first.author(), Some("Random Cat Facts"));
}
