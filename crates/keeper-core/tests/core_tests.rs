//! Integration tests for the core crate.

use keeper_core::{Expiry, ModelRecord, PsModel, PsResponse};

#[test]
fn test_ps_response_parse() {
    let payload = r#"{
        "models": [
            {
                "name": "llama3:8b",
                "model": "llama3:8b",
                "size": 5137025024,
                "digest": "abc123",
                "expires_at": "2024-06-04T14:38:31.83753-07:00",
                "size_vram": 5137025024
            }
        ]
    }"#;
    let resp: PsResponse = serde_json::from_str(payload).unwrap();
    assert_eq!(resp.models.len(), 1);

    let record = ModelRecord::from(resp.models[0].clone());
    assert_eq!(record.name, "llama3:8b");
    match record.expires_at {
        Expiry::At(ms) => assert!(ms > 0),
        Expiry::Never => panic!("expected a concrete expiry"),
    }
}

#[test]
fn test_missing_expiry_normalizes_to_never() {
    let payload = r#"{"models": [{"name": "llama3:8b"}]}"#;
    let resp: PsResponse = serde_json::from_str(payload).unwrap();
    let record = ModelRecord::from(resp.models[0].clone());
    assert_eq!(record.expires_at, Expiry::Never);
    assert!(!record.is_expiring());
}

#[test]
fn test_go_zero_time_normalizes_to_never() {
    // The daemon serializes "no expiry" as Go's zero time.
    let payload = r#"{"models": [{"name": "llama3:8b", "expires_at": "0001-01-01T00:00:00Z"}]}"#;
    let resp: PsResponse = serde_json::from_str(payload).unwrap();
    let record = ModelRecord::from(resp.models[0].clone());
    assert_eq!(record.expires_at, Expiry::Never);
}

#[test]
fn test_empty_models_list() {
    let resp: PsResponse = serde_json::from_str(r#"{"models": []}"#).unwrap();
    assert!(resp.models.is_empty());

    // Some daemon builds omit the field entirely when nothing is loaded.
    let resp: PsResponse = serde_json::from_str(r#"{}"#).unwrap();
    assert!(resp.models.is_empty());
}

#[test]
fn test_entry_without_name_is_rejected() {
    let payload = r#"{"models": [{"expires_at": "2024-06-04T14:38:31Z"}]}"#;
    assert!(serde_json::from_str::<PsResponse>(payload).is_err());
}

#[test]
fn test_expiry_preserves_millisecond_precision() {
    let model = PsModel {
        name: "llama3:8b".into(),
        expires_at: Some("2024-06-04T21:38:31.500Z".parse().unwrap()),
    };
    let record = ModelRecord::from(model);
    match record.expires_at {
        Expiry::At(ms) => assert_eq!(ms % 1000, 500),
        Expiry::Never => panic!("expected a concrete expiry"),
    }
}
