//! Integration tests for parsing describe responses.
//!
//! These tests validate that the astica-vision models deserialize complete
//! describe payloads as returned by the service.

use astica_vision::models::{DescribeResponse, Rectangle};
use std::fs;
use std::path::PathBuf;

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Load a fixture from disk.
fn load_fixture(name: &str) -> String {
    let fixture_path = fixtures_dir().join(name);
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

fn parse(name: &str) -> DescribeResponse {
    let json_data = load_fixture(name);
    serde_json::from_str(&json_data).unwrap_or_else(|e| {
        panic!(
            "Failed to deserialize describe response: {}\nJSON: {}",
            e, json_data
        )
    })
}

#[test]
fn test_full_response_call_info() {
    let response = parse("describe_response.json");

    assert_eq!(response.model_version, "2.1_full");
    assert_eq!(response.status, "success");
    assert_eq!(
        response.call.request,
        "3f1c9d2e-7a41-4b6f-9c1e-5d8a0b2f6e13"
    );
    assert_eq!(response.call.request_type, "analyze");
    assert_eq!(response.call.model_version, "2.1_full");
    assert!((response.call.api_quantity - 4.25).abs() < f64::EPSILON);
}

#[test]
fn test_full_response_captions() {
    let response = parse("describe_response.json");

    assert_eq!(response.caption.text, "a woman walking a dog on a street");
    assert!((response.caption.confidence - 0.842).abs() < f64::EPSILON);
    assert_eq!(
        response.caption_gpt,
        "A woman in a red jacket walks her dog along a rainy city street at dusk."
    );
    assert_eq!(response.gpt_level, 1);

    assert_eq!(response.captions.len(), 3);
    assert_eq!(
        response.captions[0].rectangle,
        Some(Rectangle {
            x: 112,
            y: 40,
            width: 210,
            height: 512
        })
    );
    // Captions for the whole image come without a region.
    assert_eq!(response.captions[2].text, "a wet city street");
    assert!(response.captions[2].rectangle.is_none());
}

#[test]
fn test_full_response_objects_and_tags() {
    let response = parse("describe_response.json");

    let names: Vec<&str> = response.objects.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["person", "dog"]);
    assert_eq!(response.objects[1].rectangle.x, 328);
    assert_eq!(response.objects[1].rectangle.width, 146);

    assert_eq!(response.tags.len(), 4);
    assert_eq!(response.tag_names_above(0.9), vec!["outdoor", "street", "dog"]);

    assert_eq!(response.metadata.width, 800);
    assert_eq!(response.metadata.height, 600);
}

#[test]
fn test_full_response_keeps_untyped_sections() {
    let response = parse("describe_response.json");

    let faces = response
        .extra
        .get("faces")
        .and_then(|v| v.as_array())
        .expect("faces should be preserved");
    assert_eq!(faces.len(), 1);
    assert_eq!(faces[0]["gender"], "Female");
    assert!(!response.extra.contains_key("tags"));
}

#[test]
fn test_caption_only_response() {
    let response = parse("describe_response_caption_only.json");

    assert_eq!(response.caption.text, "a bowl of fruit on a wooden table");
    assert_eq!(response.best_caption(), Some("a bowl of fruit on a wooden table"));

    // Sections for parameters that were not requested stay empty.
    assert!(response.caption_gpt.is_empty());
    assert_eq!(response.gpt_level, 0);
    assert!(response.captions.is_empty());
    assert!(response.objects.is_empty());
    assert!(response.tags.is_empty());
    assert!(response.extra.is_empty());
    assert!((response.call.api_quantity - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_truncated_response_fails() {
    let json_data = load_fixture("describe_response.json");
    let truncated = &json_data[..json_data.len() / 2];

    assert!(serde_json::from_str::<DescribeResponse>(truncated).is_err());
}
