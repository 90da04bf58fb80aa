//! REST gateway tests against a local mock PostgREST server.

use laptop_picker::gateway::{DataGateway, JsonRow, Query, RestGateway, RestGatewayConfig};
use laptop_picker::{Collection, PickerError, Repository};
use mockito::{Matcher, Server};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

fn gateway(server: &Server) -> RestGateway {
    RestGateway::new(RestGatewayConfig {
        base_url: server.url(),
        api_key: "anon-key".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn row(value: Value) -> JsonRow {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_select_sends_key_filters_and_range() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/rest/v1/cpus")
        .match_header("apikey", "anon-key")
        .match_header("authorization", "Bearer anon-key")
        .match_header("range", "20-39")
        .match_header("prefer", "count=exact")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("name".into(), "ilike.*ryzen*".into()),
            Matcher::UrlEncoded("order".into(), "id.asc".into()),
        ]))
        .with_status(206)
        .with_header("content-type", "application/json")
        .with_header("content-range", "20-20/21")
        .with_body(r#"[{"id": 21, "name": "Ryzen 9 7940HS"}]"#)
        .create();

    let query = Query::all()
        .ilike("name", "ryzen")
        .order_by("id", true)
        .page(1, 20);
    let page = gateway(&server).select(Collection::Cpus, &query).unwrap();

    mock.assert();
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.total, Some(21));
}

#[test]
fn test_range_past_end_is_empty_page() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/rest/v1/gpus")
        .match_query(Matcher::Any)
        .with_status(416)
        .with_header("content-range", "*/40")
        .create();

    let page = gateway(&server)
        .select(Collection::Gpus, &Query::all().page(5, 20))
        .unwrap();
    assert!(page.rows.is_empty());
    assert_eq!(page.total, Some(40));
}

#[test]
fn test_empty_collection_is_not_an_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/rest/v1/laptop_min_price")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create();

    let page = gateway(&server)
        .select(Collection::LaptopMinPrice, &Query::all())
        .unwrap();
    assert!(page.rows.is_empty());
    assert_eq!(page.total, None);
}

#[test]
fn test_auth_failure_carries_backend_message() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/rest/v1/categories")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message": "Invalid API key", "hint": "Double check your key"}"#)
        .create();

    let err = gateway(&server)
        .select(Collection::Categories, &Query::all())
        .unwrap_err();
    match err {
        PickerError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid API key (Double check your key)");
        }
        other => panic!("expected an API error, got {:?}", other),
    }
}

#[test]
fn test_unreachable_backend_is_transport_error() {
    let gateway = RestGateway::new(RestGatewayConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: "k".to_string(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();
    let err = gateway
        .select(Collection::Features, &Query::all())
        .unwrap_err();
    assert!(matches!(err, PickerError::Transport(_)), "{:?}", err);
}

#[test]
fn test_insert_strips_server_keys_and_returns_row() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/rest/v1/gpus")
        .match_header("prefer", "return=representation")
        .match_body(Matcher::Json(json!([{"name": "Arc A370M", "benchmark_gpu": 5400}])))
        .with_status(201)
        .with_body(r#"[{"id": 88, "name": "Arc A370M", "benchmark_gpu": 5400}]"#)
        .create();

    let stored = gateway(&server)
        .insert(
            Collection::Gpus,
            &row(json!({"id": 3, "created_at": "2024-01-01", "name": "Arc A370M", "benchmark_gpu": 5400})),
        )
        .unwrap();

    mock.assert();
    assert_eq!(stored["id"], 88);
}

#[test]
fn test_constraint_violation_is_reported() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/rest/v1/laptops")
        .with_status(409)
        .with_body(r#"{"message": "duplicate key value violates unique constraint \"laptops_name_key\""}"#)
        .create();

    let err = gateway(&server)
        .insert(Collection::Laptops, &row(json!({"name": "X", "url": "u"})))
        .unwrap_err();
    assert!(err.to_string().contains("duplicate key value"), "{}", err);
}

#[test]
fn test_update_filters_by_id() {
    let mut server = Server::new();
    let mock = server
        .mock("PATCH", "/rest/v1/programs")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.12".into()))
        .match_body(Matcher::Json(json!({"ram_min": 16})))
        .with_status(200)
        .with_body(r#"[{"id": 12, "name": "Blender", "ram_min": 16}]"#)
        .create();

    let updated = gateway(&server)
        .update(Collection::Programs, 12, &row(json!({"id": 12, "ram_min": 16})))
        .unwrap();
    mock.assert();
    assert_eq!(updated["ram_min"], 16);
}

#[test]
fn test_update_of_missing_row_is_not_found() {
    let mut server = Server::new();
    let _mock = server
        .mock("PATCH", "/rest/v1/cpus")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create();

    let err = gateway(&server)
        .update(Collection::Cpus, 404, &row(json!({"name": "gone"})))
        .unwrap_err();
    assert!(matches!(err, PickerError::Api { status: 404, .. }), "{:?}", err);
}

#[test]
fn test_delete_filters_by_id() {
    let mut server = Server::new();
    let mock = server
        .mock("DELETE", "/rest/v1/cpus")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.7".into()))
        .with_status(204)
        .create();

    gateway(&server).delete(Collection::Cpus, 7).unwrap();
    mock.assert();
}

#[test]
fn test_programs_by_category_matches_lists_locally() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/rest/v1/programs_latest")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("order".into(), "id.asc".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"id": 1, "name": "Cyberpunk 2077", "category": ["gaming"]},
                {"id": 2, "name": "LibreOffice", "category": "office"},
                {"id": 3, "name": "Discord", "category": ["office", "gaming"]},
                {"id": 4, "name": "Notes", "category": null}
            ]"#,
        )
        .create();

    let repository = Repository::new(Arc::new(gateway(&server)));
    let names: Vec<String> = repository
        .programs_by_category(Some("gaming"))
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();

    mock.assert();
    assert_eq!(names, vec!["Cyberpunk 2077", "Discord"]);
}
