//! Process-wide options.
//!
//! This binary owns the global store, so everything runs in one test: the
//! steps below depend on the order they mutate it in.

use http::StatusCode;
use kanon::config::{KanonConfig, ValidationSettings};
use kanon::prelude::*;
use kanon_test::{run, TestRequest};
use serde_json::json;

fn notes_route() -> ValidationMiddleware {
    ValidationMiddleware::builder()
        .body(SchemaDecl::fields([("title", FieldSchema::string().shared())]))
        .build()
        .unwrap()
}

fn note_with_extra_key() -> TestRequest {
    TestRequest::post("/notes")
        .json(&json!({"title": "a", "pinned": true}))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_builders_without_a_store_follow_global_options() {
    // Documented defaults before anything is set.
    let options = global_options();
    assert!(options.handler.is_none());
    assert_eq!(options.default_schema_object, ObjectMode::Lax);
    assert_eq!(options.missing_schema_behavior, MissingSchemaBehavior::Strict);

    let lax = notes_route();
    let outcome = run(&lax, note_with_extra_key()).await.unwrap();
    assert_eq!(outcome.continued, 1);
    assert_eq!(outcome.seen.unwrap().body, json!({"title": "a"}));

    // Startup applies the configured defaults to the global store.
    let mut config = KanonConfig::default();
    config.logging.level = "warn".to_string();
    config.validation = ValidationSettings {
        default_schema_object: ObjectMode::Strict,
        missing_schema_behavior: MissingSchemaBehavior::Strict,
    };
    kanon::init(&config).unwrap();
    assert_eq!(global_options().default_schema_object, ObjectMode::Strict);

    let strict = notes_route();
    let outcome = run(&strict, note_with_extra_key()).await.unwrap();
    assert_eq!(outcome.continued, 0);
    outcome.response.assert_failed_segments(&["body"]);

    // Routes built earlier keep their strictness.
    let outcome = run(&lax, note_with_extra_key()).await.unwrap();
    assert_eq!(outcome.continued, 1);

    // A second subscriber cannot be installed.
    assert!(matches!(kanon::init(&config), Err(kanon::InitError::Telemetry(_))));

    // A global handler reaches routes that were already built.
    let handler = FnFailureHandler::shared(|failures: Vec<SegmentFailure>| {
        Response::json(
            StatusCode::UNPROCESSABLE_ENTITY,
            &json!({ "failed": failures.len() }),
        )
    });
    set_global_options(OptionsUpdate::new().handler(handler));
    let options = global_options();
    assert!(options.handler.is_some());
    assert_eq!(options.default_schema_object, ObjectMode::Strict);

    let outcome = run(&strict, note_with_extra_key()).await.unwrap();
    assert_eq!(outcome.continued, 0);
    outcome.response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(outcome.response.json_value().unwrap(), json!({"failed": 1}));

    // A local handler still wins over the global one.
    let local = ValidationMiddleware::builder()
        .body(SchemaDecl::fields([("title", FieldSchema::string().shared())]))
        .handler(FnFailureHandler::shared(|_| {
            Response::json(StatusCode::CONFLICT, &json!(null))
        }))
        .build()
        .unwrap();
    let outcome = run(&local, note_with_extra_key()).await.unwrap();
    outcome.response.assert_status(StatusCode::CONFLICT);
}
