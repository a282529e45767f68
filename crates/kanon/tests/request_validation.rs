//! End-to-end behavior of the validation middleware, driven through
//! `kanon_test::run`.

use http::StatusCode;
use kanon::prelude::*;
use kanon_test::{run, TestRequest};
use serde_json::json;
use std::sync::Arc;

fn store(update: OptionsUpdate) -> Arc<OptionsStore> {
    let store = Arc::new(OptionsStore::new());
    store.update(update);
    store
}

fn status_handler(status: StatusCode) -> SharedFailureHandler {
    FnFailureHandler::shared(move |_failures| Response::json(status, &json!(null)))
}

/// `GET /users/:id?name=..&age=..` with no body schema.
fn users_route(options: Arc<OptionsStore>) -> ValidationMiddleware {
    ValidationMiddleware::builder()
        .params(SchemaDecl::fields([("id", FieldSchema::integer().coerce().shared())]))
        .query(SchemaDecl::fields([
            ("name", FieldSchema::string().min_length(3).max_length(10).shared()),
            ("age", FieldSchema::integer().coerce().minimum(18).shared()),
        ]))
        .options(options)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_valid_request_reaches_route_with_coerced_segments() {
    let middleware = users_route(Arc::new(OptionsStore::new()));
    let request = TestRequest::get("/users/7?name=Ann&age=20")
        .params([("id", "7")])
        .json(&json!({}))
        .build()
        .unwrap();

    let outcome = run(&middleware, request).await.unwrap();

    outcome.response.assert_status(StatusCode::OK);
    assert_eq!(outcome.continued, 1);
    let seen = outcome.seen.unwrap();
    assert_eq!(seen.params["id"], json!(7));
    assert_eq!(seen.query["age"], json!(20));
    assert_eq!(seen.query["name"], json!("Ann"));
    assert_eq!(seen.body, json!({}));
}

#[tokio::test]
async fn test_underage_query_is_rejected_by_default_handler() {
    let middleware = users_route(Arc::new(OptionsStore::new()));
    let request = TestRequest::get("/users/7?name=Ann&age=10")
        .params([("id", "7")])
        .json(&json!({}))
        .build()
        .unwrap();

    let outcome = run(&middleware, request).await.unwrap();

    assert_eq!(outcome.continued, 0);
    outcome.response.assert_failed_segments(&["query"]);
    let failures = outcome.response.failures().unwrap();
    assert_eq!(failures[0].issues.len(), 1);
    assert_eq!(failures[0].issues[0].path, vec!["age".to_string()]);
    assert_eq!(failures[0].issues[0].code, IssueCode::TooSmall);
}

#[tokio::test]
async fn test_failure_leaves_every_segment_untouched() {
    let middleware = users_route(Arc::new(OptionsStore::new()));
    let request = TestRequest::get("/users/7?name=Ann&age=ten")
        .params([("id", "7")])
        .json(&json!({}))
        .build()
        .unwrap();
    let raw = request.segments.clone();

    let outcome = run(&middleware, request).await.unwrap();

    assert_eq!(outcome.continued, 0);
    assert!(outcome.seen.is_none());
    // params validated fine on its own but is still the raw string.
    assert_eq!(outcome.context.segments(), &raw);
    assert_eq!(outcome.context.segments().params["id"], json!("7"));
}

#[tokio::test]
async fn test_failures_are_reported_in_segment_order() {
    let middleware = users_route(Arc::new(OptionsStore::new()));
    let request = TestRequest::post("/users/x?name=An&age=20")
        .params([("id", "x")])
        .json(&json!({"unexpected": true}))
        .build()
        .unwrap();

    let outcome = run(&middleware, request).await.unwrap();

    assert_eq!(outcome.continued, 0);
    outcome
        .response
        .assert_failed_segments(&["params", "query", "body"]);
}

#[tokio::test]
async fn test_query_string_number_is_coerced_to_integer() {
    let middleware = ValidationMiddleware::builder()
        .query(SchemaDecl::fields([("limit", FieldSchema::integer().coerce().shared())]))
        .options(Arc::new(OptionsStore::new()))
        .build()
        .unwrap();
    let request = TestRequest::get("/items?limit=42").build().unwrap();

    let outcome = run(&middleware, request).await.unwrap();

    let query = outcome.seen.unwrap().query;
    assert_eq!(query["limit"], json!(42));
    assert!(query["limit"].is_i64());
}

#[tokio::test]
async fn test_missing_body_schema_rejects_data_by_default() {
    let middleware = ValidationMiddleware::builder()
        .options(Arc::new(OptionsStore::new()))
        .build()
        .unwrap();

    let empty = TestRequest::post("/ping").json(&json!({})).build().unwrap();
    let outcome = run(&middleware, empty).await.unwrap();
    assert_eq!(outcome.continued, 1);

    let filled = TestRequest::post("/ping")
        .json(&json!({"anything": 1}))
        .build()
        .unwrap();
    let outcome = run(&middleware, filled).await.unwrap();
    assert_eq!(outcome.continued, 0);
    outcome.response.assert_failed_segments(&["body"]);
}

#[tokio::test]
async fn test_missing_body_schema_passes_data_through_under_any() {
    let options = store(OptionsUpdate::new().missing_schema_behavior(MissingSchemaBehavior::Any));
    let middleware = ValidationMiddleware::builder()
        .options(options)
        .build()
        .unwrap();
    let body = json!({"anything": [1, "two", {"three": 3}]});
    let request = TestRequest::post("/ping?debug=yes")
        .json(&body)
        .build()
        .unwrap();

    let outcome = run(&middleware, request).await.unwrap();

    assert_eq!(outcome.continued, 1);
    let seen = outcome.seen.unwrap();
    assert_eq!(seen.body, body);
    assert_eq!(seen.query, json!({"debug": "yes"}));
}

#[tokio::test]
async fn test_field_mapping_follows_object_mode() {
    let request = || {
        TestRequest::post("/notes")
            .json(&json!({"name": "x", "extra": "y"}))
            .build()
            .unwrap()
    };
    let route = |mode: ObjectMode| {
        ValidationMiddleware::builder()
            .body(SchemaDecl::fields([("name", FieldSchema::string().shared())]))
            .options(store(OptionsUpdate::new().default_schema_object(mode)))
            .build()
            .unwrap()
    };

    let outcome = run(&route(ObjectMode::Strict), request()).await.unwrap();
    assert_eq!(outcome.continued, 0);
    outcome.response.assert_failed_segments(&["body"]);
    let failures = outcome.response.failures().unwrap();
    assert_eq!(failures[0].issues[0].code, IssueCode::UnrecognizedKeys);

    let outcome = run(&route(ObjectMode::Lax), request()).await.unwrap();
    assert_eq!(outcome.continued, 1);
    assert_eq!(outcome.seen.unwrap().body, json!({"name": "x"}));
}

#[tokio::test]
async fn test_handler_precedence() {
    let options = store(OptionsUpdate::new().handler(status_handler(StatusCode::CONFLICT)));
    let route = |handler: Option<SharedFailureHandler>, options: Arc<OptionsStore>| {
        let builder = ValidationMiddleware::builder()
            .params(SchemaDecl::fields([("id", FieldSchema::integer().coerce().shared())]))
            .options(options);
        let builder = match handler {
            Some(handler) => builder.handler(handler),
            None => builder,
        };
        builder.build().unwrap()
    };
    let request = || TestRequest::get("/users/x").params([("id", "x")]).build().unwrap();

    let local = route(Some(status_handler(StatusCode::IM_A_TEAPOT)), Arc::clone(&options));
    let global = route(None, Arc::clone(&options));
    let default = route(None, Arc::new(OptionsStore::new()));

    let outcome = run(&local, request()).await.unwrap();
    outcome.response.assert_status(StatusCode::IM_A_TEAPOT);

    let outcome = run(&global, request()).await.unwrap();
    outcome.response.assert_status(StatusCode::CONFLICT);

    let outcome = run(&default, request()).await.unwrap();
    outcome.response.assert_failed_segments(&["params"]);

    for middleware in [&local, &global, &default] {
        let outcome = run(middleware, request()).await.unwrap();
        assert_eq!(outcome.continued, 0);
    }
}

#[tokio::test]
async fn test_custom_schema_sees_raw_segment() {
    let even = schema_fn(|value: serde_json::Value| async move {
        match value["n"].as_str().and_then(|n| n.parse::<i64>().ok()) {
            Some(n) if n % 2 == 0 => Ok(json!({"n": n})),
            _ => Err(ValidationError::single(Issue::custom("n must be even"))),
        }
    });
    let middleware = ValidationMiddleware::builder()
        .query(SchemaDecl::schema(even))
        .options(Arc::new(OptionsStore::new()))
        .build()
        .unwrap();

    let outcome = run(&middleware, TestRequest::get("/?n=4").build().unwrap())
        .await
        .unwrap();
    assert_eq!(outcome.seen.unwrap().query, json!({"n": 4}));

    let outcome = run(&middleware, TestRequest::get("/?n=3").build().unwrap())
        .await
        .unwrap();
    outcome.response.assert_failed_segments(&["query"]);
    let failures = outcome.response.failures().unwrap();
    assert_eq!(failures[0].issues[0].message, "n must be even");
}

#[tokio::test]
async fn test_whole_float_body_field_is_an_integer() {
    let middleware = ValidationMiddleware::builder()
        .body(SchemaDecl::fields([("age", FieldSchema::integer().minimum(18).shared())]))
        .options(Arc::new(OptionsStore::new()))
        .build()
        .unwrap();
    let request = |body: serde_json::Value| TestRequest::post("/users").json(&body).build().unwrap();

    let outcome = run(&middleware, request(json!({"age": 20.0}))).await.unwrap();
    assert_eq!(outcome.continued, 1);
    let body = outcome.seen.unwrap().body;
    assert_eq!(body["age"], json!(20));
    assert!(body["age"].is_i64());

    let outcome = run(&middleware, request(json!({"age": 20.5}))).await.unwrap();
    assert_eq!(outcome.continued, 0);
    let failures = outcome.response.failures().unwrap();
    assert_eq!(failures[0].issues[0].code, IssueCode::InvalidType);
}
