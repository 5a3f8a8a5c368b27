//! End-to-end transforms of JSON input against fixture schemas

use pretty_assertions::assert_eq;
use reshape_core::{Error, SchemaDescriptor, Transformer};
use serde_json::{json, Value};
use std::sync::Arc;

fn image_schema() -> Value {
    serde_json::from_str(include_str!("fixtures/image.schema.json")).expect("fixture is valid JSON")
}

fn transform_bytes(transformer: &mut Transformer, input: &Value) -> Value {
    let raw = serde_json::to_vec(input).unwrap();
    let output = transformer.transform(&raw).unwrap();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn image_schema_end_to_end() {
    let mut transformer = Transformer::new(&image_schema(), "cms").unwrap();
    let input = json!({
        "type": "image",
        "crops": [
            {"path": "path"},
            {"name": "aname", "relativePath": "empty"}
        ],
        "publishUrl": "publishURL",
        "absoluteUrl": "absoluteURL"
    });

    let output = transform_bytes(&mut transformer, &input);
    assert_eq!(
        output,
        json!({
            "URL": {"absolute": "absoluteURL", "publish": "publishURL"},
            "crops": [
                {"name": "name", "path": "path"},
                {"name": "aname", "relativePath": "empty"}
            ],
            "type": "image"
        })
    );
}

#[test]
fn image_schema_output_follows_declaration_order() {
    let mut transformer = Transformer::new(&image_schema(), "cms").unwrap();
    let input = json!({"absoluteUrl": "a", "type": "image", "crops": [{"relativePath": "r", "path": "p"}]});

    let raw = transformer.transform(&serde_json::to_vec(&input).unwrap()).unwrap();
    assert_eq!(
        String::from_utf8(raw).unwrap(),
        r#"{"URL":{"absolute":"a"},"crops":[{"name":"name","path":"p","relativePath":"r"}],"type":"image"}"#
    );
}

#[test]
fn image_schema_missing_required_field_fails_validation() {
    let mut transformer = Transformer::new(&image_schema(), "cms").unwrap();
    let err = transformer.transform(br#"{"absoluteUrl": "a"}"#).unwrap_err();
    match err {
        Error::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors.to_string().contains("type"));
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn repeated_transforms_are_identical() {
    let mut transformer = Transformer::new(&image_schema(), "cms").unwrap();
    let input = br#"{"type": "image", "crops": [{"path": "p"}, {"path": "q"}]}"#;

    let first = transformer.transform(input).unwrap();
    let second = transformer.transform(input).unwrap();
    let third = transformer.transform(input).unwrap();
    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[test]
fn array_of_array_drops_elements_without_value() {
    let schema = json!({
        "type": "object",
        "properties": {
            "matrix": {
                "type": "array",
                "items": {"type": "array", "items": {"type": "integer"}}
            }
        }
    });
    let mut transformer = Transformer::new(&schema, "cms").unwrap();
    let output = transformer
        .transform_value(&json!({"matrix": [[1, "x", 2], null, ["y"], [], [3]]}))
        .unwrap();

    assert_eq!(output, json!({"matrix": [[1, 2], [], [], [3]]}));
    assert!(!output.to_string().contains("null"));
}

#[test]
fn max_picks_highest_rendition() {
    let schema = json!({
        "type": "object",
        "properties": {
            "bestUrl": {
                "type": "string",
                "transform": {"cms": {"from": [{
                    "jsonPath": "$.renditions",
                    "operations": [{"type": "max", "args": {"by": "@.encodingRate", "return": "@.url"}}]
                }]}}
            }
        }
    });
    let mut transformer = Transformer::new(&schema, "cms").unwrap();
    let output = transformer
        .transform_value(&json!({
            "renditions": [
                {"url": "max", "encodingRate": 10},
                {"url": "min", "encodingRate": 2}
            ]
        }))
        .unwrap();
    assert_eq!(output, json!({"bestUrl": "max"}));
}

#[test]
fn element_rules_can_reach_outside_the_element() {
    let schema = json!({
        "type": "object",
        "properties": {
            "crops": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "label": {
                            "type": "string",
                            "transform": {"cms": {
                                "from": [{"jsonPath": "$.title"}, {"jsonPath": "@.name"}],
                                "method": "concatenate",
                                "methodOptions": {"concatenateDelimiter": " - "}
                            }}
                        }
                    }
                }
            }
        }
    });
    let mut transformer = Transformer::new(&schema, "cms").unwrap();
    let output = transformer
        .transform_value(&json!({"title": "Gallery", "crops": [{"name": "wide"}, {}]}))
        .unwrap();
    assert_eq!(
        output,
        json!({"crops": [{"label": "Gallery - wide"}, {"label": "Gallery"}]})
    );
}

#[test]
fn array_rule_with_split_seeds_elements() {
    let schema = json!({
        "type": "object",
        "properties": {
            "keywords": {
                "type": "array",
                "transform": {"cms": {"from": [{
                    "jsonPath": "$.keywords",
                    "operations": [{"type": "split", "args": {"on": ","}}]
                }]}},
                "items": {
                    "type": "string",
                    "transform": {"cms": {"from": [{"jsonPath": "@", "operations": [{"type": "trim"}, {"type": "toCamelCase"}]}]}}
                }
            }
        }
    });
    let mut transformer = Transformer::new(&schema, "cms").unwrap();
    let output = transformer
        .transform_value(&json!({"keywords": "breaking-news, live_blog"}))
        .unwrap();
    assert_eq!(output, json!({"keywords": ["breakingNews", "liveBlog"]}));
}

#[test]
fn transformers_share_one_descriptor_across_threads() {
    let descriptor = Arc::new(SchemaDescriptor::parse(&image_schema()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let descriptor = Arc::clone(&descriptor);
            std::thread::spawn(move || {
                let mut transformer = Transformer::from_descriptor(descriptor, "cms").unwrap();
                transformer
                    .transform_value(&json!({"type": format!("image-{}", i)}))
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), json!({"type": format!("image-{}", i)}));
    }
}

#[test]
fn unparseable_input_is_an_input_error() {
    let mut transformer = Transformer::new(&image_schema(), "cms").unwrap();
    assert!(matches!(
        transformer.transform(b"{\"type\": "),
        Err(Error::Input { .. })
    ));
}
