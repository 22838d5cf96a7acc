//! Verify body encoding and config merging against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each vector file describes inputs and expected outputs as plain JSON.
//! JSON-body expectations are compared as parsed values, not raw strings;
//! form-pair expectations are compared exactly, order included, since pair
//! order is part of the encoding contract.

use courier_core::{encode, Body, Config, FormValue, Headers, Options, Payload};

// ---------------------------------------------------------------------------
// Body encoding
// ---------------------------------------------------------------------------

#[test]
fn encode_test_vectors() {
    let raw = include_str!("../../test-vectors/encode.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let content_type = case["content_type"].as_str().unwrap();
        let payload = Payload::from(case["data"].clone());

        let body = encode(&payload, content_type).unwrap();

        if let Some(expected) = case.get("expected_form") {
            let Body::Form(form) = &body else {
                panic!("{name}: expected a form body, got {body:?}");
            };
            let pairs: Vec<serde_json::Value> = form
                .pairs()
                .iter()
                .map(|(key, value)| {
                    let text = match value {
                        FormValue::Text(text) => text.clone(),
                        FormValue::Blob(_) => panic!("{name}: unexpected blob pair"),
                    };
                    serde_json::json!([key, text])
                })
                .collect();
            assert_eq!(&serde_json::Value::Array(pairs), expected, "{name}: pairs");
        } else {
            let expected = &case["expected_json"];
            let Body::Text(text) = &body else {
                panic!("{name}: expected a text body, got {body:?}");
            };
            let value: serde_json::Value = serde_json::from_str(text).unwrap();
            assert_eq!(&value, expected, "{name}: json body");
        }
    }
}

// ---------------------------------------------------------------------------
// Config merging
// ---------------------------------------------------------------------------

fn headers_from_vector(value: &serde_json::Value) -> Headers {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let pair = pair.as_array().unwrap();
            (
                pair[0].as_str().unwrap().to_string(),
                pair[1].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[test]
fn header_merge_test_vectors() {
    let raw = include_str!("../../test-vectors/merge.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["header_cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let base = Config {
            headers: headers_from_vector(&case["base"]),
            ..Config::default()
        };
        let options = Options {
            headers: Some(headers_from_vector(&case["override"])),
            ..Options::default()
        };

        let merged = base.merged(&options);
        assert_eq!(
            merged.headers,
            headers_from_vector(&case["expected"]),
            "{name}"
        );
    }
}

#[test]
fn data_merge_test_vectors() {
    let raw = include_str!("../../test-vectors/merge.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["data_cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let base = Config {
            data: Payload::from(case["base"].clone()),
            ..Config::default()
        };
        let options = Options {
            data: Some(Payload::from(case["override"].clone())),
            ..Options::default()
        };

        let merged = base.merged(&options);
        assert_eq!(merged.data, Payload::from(case["expected"].clone()), "{name}");
    }
}
