//! Validation defaults loaded from a configuration file.

use kanon::config::ConfigLoader;
use kanon::prelude::*;
use kanon_test::{run, TestRequest};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

fn load(toml: &str) -> kanon::config::KanonConfig {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(toml.as_bytes()).unwrap();
    ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap()
}

fn notes_route(options: Arc<OptionsStore>) -> ValidationMiddleware {
    ValidationMiddleware::builder()
        .body(SchemaDecl::fields([("title", FieldSchema::string().shared())]))
        .options(options)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_strict_objects_from_file() {
    let config = load("[validation]\ndefault_schema_object = \"strict\"\n");
    let options = Arc::new(OptionsStore::new());
    kanon::apply_settings(&options, &config.validation);

    let request = TestRequest::post("/notes")
        .json(&json!({"title": "a", "pinned": true}))
        .build()
        .unwrap();
    let outcome = run(&notes_route(options), request).await.unwrap();

    assert_eq!(outcome.continued, 0);
    outcome.response.assert_failed_segments(&["body"]);
}

#[tokio::test]
async fn test_settings_do_not_reach_routes_built_earlier() {
    let options = Arc::new(OptionsStore::new());
    let before = notes_route(Arc::clone(&options));

    let config = load("[validation]\ndefault_schema_object = \"strict\"\n");
    kanon::apply_settings(&options, &config.validation);
    let after = notes_route(Arc::clone(&options));

    let request = || {
        TestRequest::post("/notes")
            .json(&json!({"title": "a", "pinned": true}))
            .build()
            .unwrap()
    };

    let outcome = run(&before, request()).await.unwrap();
    assert_eq!(outcome.continued, 1);
    assert_eq!(outcome.seen.unwrap().body, json!({"title": "a"}));

    let outcome = run(&after, request()).await.unwrap();
    assert_eq!(outcome.continued, 0);
}

#[tokio::test]
async fn test_any_missing_schema_from_file() {
    let config = load("[validation]\nmissing_schema_behavior = \"any\"\n[logging]\nenabled = false\n");
    assert!(!config.logging.enabled);

    let options = Arc::new(OptionsStore::new());
    kanon::apply_settings(&options, &config.validation);
    let middleware = ValidationMiddleware::builder()
        .options(options)
        .build()
        .unwrap();

    let request = TestRequest::get("/search?q=rust").build().unwrap();
    let outcome = run(&middleware, request).await.unwrap();

    assert_eq!(outcome.continued, 1);
    assert_eq!(outcome.seen.unwrap().query, json!({"q": "rust"}));
}
