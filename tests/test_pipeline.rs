//! Integration tests for the Hrana v2/v3 pipeline endpoints.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{assert_baton_shape, spawn_service};
use serde_json::{json, Value};

#[actix_web::test]
async fn test_v3_execute_select() {
    let app = spawn_service().await;

    let req = test::TestRequest::post()
        .uri("/v3/pipeline")
        .set_json(json!({
            "baton": null,
            "requests": [{"type": "execute", "stmt": {"sql": "SELECT 1 AS x"}}]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_baton_shape(&body["baton"]);
    assert_eq!(body["base_url"], Value::Null);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["results"][0]["type"], "ok");

    let result = &body["results"][0]["response"]["result"];
    assert_eq!(result["cols"][0]["name"], "x");
    assert_eq!(result["rows"][0][0], json!({"type": "integer", "value": "1"}));
    assert_eq!(result["rows_read"], 1);
    assert_eq!(result["rows_written"], 0);
    assert!(result["query_duration_ms"].is_number());
}

#[actix_web::test]
async fn test_v2_omits_v3_metadata() {
    let app = spawn_service().await;

    let req = test::TestRequest::post()
        .uri("/v2/pipeline")
        .set_json(json!({
            "baton": null,
            "requests": [{"type": "execute", "stmt": {"sql": "SELECT 1"}}]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let result = &body["results"][0]["response"]["result"];
    assert!(result.get("rows_read").is_none());
    assert!(result.get("rows_written").is_none());
    assert!(result.get("query_duration_ms").is_none());
    assert_eq!(result["affected_row_count"], 0);
}

#[actix_web::test]
async fn test_stored_sql_executes_across_pipelines() {
    let app = spawn_service().await;

    let req = test::TestRequest::post()
        .uri("/v2/pipeline")
        .set_json(json!({
            "baton": null,
            "requests": [{"type": "store_sql", "sql_id": 7, "sql": "SELECT ?"}]
        }))
        .to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["results"][0]["type"], "ok");
    let baton = first["baton"].as_str().expect("baton").to_string();

    let req = test::TestRequest::post()
        .uri("/v2/pipeline")
        .set_json(json!({
            "baton": baton,
            "requests": [{"type": "execute", "stmt": {
                "sql_id": 7,
                "args": [{"type": "integer", "value": "42"}]
            }}]
        }))
        .to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;

    let result = &second["results"][0]["response"]["result"];
    assert_eq!(result["rows"][0][0], json!({"type": "integer", "value": "42"}));
}

#[actix_web::test]
async fn test_transaction_control_is_intercepted() {
    let app = spawn_service().await;

    let req = test::TestRequest::post()
        .uri("/v3/pipeline")
        .set_json(json!({
            "baton": null,
            "requests": [
                {"type": "execute", "stmt": {"sql": "BEGIN"}},
                {"type": "get_autocommit"}
            ]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["results"][0]["type"], "ok");
    let begin = &body["results"][0]["response"]["result"];
    assert_eq!(begin["cols"], json!([]));
    assert_eq!(begin["rows"], json!([]));
    assert_eq!(begin["affected_row_count"], 0);
    assert_eq!(begin["last_insert_rowid"], Value::Null);

    assert_eq!(body["results"][1]["type"], "ok");
    assert_eq!(body["results"][1]["response"]["is_autocommit"], true);
}

#[actix_web::test]
async fn test_insert_still_works_after_begin() {
    let app = spawn_service().await;

    let req = test::TestRequest::post()
        .uri("/v3/pipeline")
        .set_json(json!({
            "baton": null,
            "requests": [
                {"type": "execute", "stmt": {"sql": "CREATE TABLE t(id INTEGER PRIMARY KEY, v TEXT)"}},
                {"type": "execute", "stmt": {"sql": "BEGIN"}},
                {"type": "execute", "stmt": {"sql": "INSERT INTO t(v) VALUES('hi')"}},
                {"type": "execute", "stmt": {"sql": "COMMIT"}},
                {"type": "execute", "stmt": {"sql": "SELECT count(*) AS n FROM t"}}
            ]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let insert = &body["results"][2]["response"]["result"];
    assert_eq!(insert["affected_row_count"], 1);
    assert_eq!(insert["last_insert_rowid"], "1");

    let count = &body["results"][4]["response"]["result"];
    assert_eq!(count["rows"][0][0], json!({"type": "integer", "value": "1"}));
}

#[actix_web::test]
async fn test_per_request_errors_are_isolated() {
    let app = spawn_service().await;

    let req = test::TestRequest::post()
        .uri("/v2/pipeline")
        .set_json(json!({
            "baton": null,
            "requests": [
                {"type": "execute", "stmt": {"sql": "SELECT notacolumn"}},
                {"type": "execute", "stmt": {"sql": "SELECT 2"}}
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    // Per-request failures never fail the pipeline itself.
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["results"][0]["type"], "error");
    assert!(body["results"][0]["error"]["message"].as_str().unwrap().contains("notacolumn"));
    assert_eq!(body["results"][1]["type"], "ok");
    assert_eq!(
        body["results"][1]["response"]["result"]["rows"][0][0],
        json!({"type": "integer", "value": "2"})
    );
}

#[actix_web::test]
async fn test_results_preserve_request_order() {
    let app = spawn_service().await;

    let requests: Vec<Value> = (0..5)
        .map(|i| json!({"type": "execute", "stmt": {"sql": format!("SELECT {}", i)}}))
        .collect();
    let req = test::TestRequest::post()
        .uri("/v2/pipeline")
        .set_json(json!({"baton": null, "requests": requests}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 5);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(
            result["response"]["result"]["rows"][0][0],
            json!({"type": "integer", "value": i.to_string()})
        );
    }
}

#[actix_web::test]
async fn test_batch_conditions() {
    let app = spawn_service().await;

    let req = test::TestRequest::post()
        .uri("/v2/pipeline")
        .set_json(json!({
            "baton": null,
            "requests": [{"type": "batch", "batch": {"steps": [
                {"stmt": {"sql": "SELECT notacolumn"}},
                {"condition": {"type": "ok", "step": 0}, "stmt": {"sql": "SELECT 1"}},
                {"condition": {"type": "error", "step": 0}, "stmt": {"sql": "SELECT 2"}}
            ]}}]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["results"][0]["type"], "ok");
    let result = &body["results"][0]["response"]["result"];

    let step_results = result["step_results"].as_array().unwrap();
    assert_eq!(step_results.len(), 3);
    assert_eq!(step_results[0], Value::Null);
    assert_eq!(step_results[1], Value::Null);
    assert_eq!(step_results[2]["rows"][0][0], json!({"type": "integer", "value": "2"}));

    let step_errors = result["step_errors"].as_array().unwrap();
    assert!(step_errors[0]["message"].is_string());
    assert_eq!(step_errors[1], Value::Null);
    assert_eq!(step_errors[2], Value::Null);
}

#[actix_web::test]
async fn test_batch_not_condition_and_skip_chains() {
    let app = spawn_service().await;

    // Step 1 is skipped; step 2's ok(1) sees the skip as neither ok nor error.
    let req = test::TestRequest::post()
        .uri("/v2/pipeline")
        .set_json(json!({
            "baton": null,
            "requests": [{"type": "batch", "batch": {"steps": [
                {"stmt": {"sql": "SELECT 1"}},
                {"condition": {"type": "error", "step": 0}, "stmt": {"sql": "SELECT 2"}},
                {"condition": {"type": "ok", "step": 1}, "stmt": {"sql": "SELECT 3"}},
                {"condition": {"type": "not", "cond": {"type": "ok", "step": 1}},
                 "stmt": {"sql": "SELECT 4"}}
            ]}}]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let result = &body["results"][0]["response"]["result"];
    let step_results = result["step_results"].as_array().unwrap();
    assert!(step_results[0].is_object());
    assert_eq!(step_results[1], Value::Null);
    assert_eq!(step_results[2], Value::Null);
    assert_eq!(step_results[3]["rows"][0][0], json!({"type": "integer", "value": "4"}));
}

#[actix_web::test]
async fn test_describe() {
    let app = spawn_service().await;

    let req = test::TestRequest::post()
        .uri("/v2/pipeline")
        .set_json(json!({
            "baton": null,
            "requests": [
                {"type": "execute", "stmt": {"sql": "CREATE TABLE t(id INTEGER PRIMARY KEY, v TEXT)"}},
                {"type": "describe", "sql": "SELECT id, v FROM t WHERE id = :id"},
                {"type": "describe", "sql": "UPDATE t SET v = ?"},
                {"type": "describe", "sql": "EXPLAIN SELECT 1"}
            ]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let select = &body["results"][1]["response"]["result"];
    assert_eq!(select["is_readonly"], true);
    assert_eq!(select["is_explain"], false);
    assert_eq!(select["params"], json!([{"name": ":id"}]));
    assert_eq!(select["cols"][0]["name"], "id");
    assert_eq!(select["cols"][1]["name"], "v");

    let update = &body["results"][2]["response"]["result"];
    assert_eq!(update["is_readonly"], false);
    assert_eq!(update["params"], json!([{"name": null}]));

    let explain = &body["results"][3]["response"]["result"];
    assert_eq!(explain["is_explain"], true);
}

#[actix_web::test]
async fn test_sequence_runs_scripts() {
    let app = spawn_service().await;

    let req = test::TestRequest::post()
        .uri("/v2/pipeline")
        .set_json(json!({
            "baton": null,
            "requests": [
                {"type": "sequence", "sql":
                    "CREATE TABLE s(v TEXT); INSERT INTO s VALUES('a'); INSERT INTO s VALUES('b');"},
                {"type": "execute", "stmt": {"sql": "SELECT count(*) FROM s"}}
            ]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["results"][0], json!({"type": "ok", "response": {"type": "sequence"}}));
    assert_eq!(
        body["results"][1]["response"]["result"]["rows"][0][0],
        json!({"type": "integer", "value": "2"})
    );
}

#[actix_web::test]
async fn test_named_args_bind_by_name() {
    let app = spawn_service().await;

    // v3 pair shape, declaration order reversed on purpose.
    let req = test::TestRequest::post()
        .uri("/v3/pipeline")
        .set_json(json!({
            "baton": null,
            "requests": [{"type": "execute", "stmt": {
                "sql": "SELECT :a AS a, :b AS b",
                "named_args": [
                    {"name": "b", "value": {"type": "integer", "value": "2"}},
                    {"name": "a", "value": {"type": "integer", "value": "1"}}
                ]
            }}]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let rows = &body["results"][0]["response"]["result"]["rows"];
    assert_eq!(rows[0][0], json!({"type": "integer", "value": "1"}));
    assert_eq!(rows[0][1], json!({"type": "integer", "value": "2"}));

    // v2 map shape.
    let req = test::TestRequest::post()
        .uri("/v2/pipeline")
        .set_json(json!({
            "baton": null,
            "requests": [{"type": "execute", "stmt": {
                "sql": "SELECT :a AS a",
                "named_args": {"a": "hello"}
            }}]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["results"][0]["response"]["result"]["rows"][0][0],
        json!({"type": "text", "value": "hello"})
    );
}

#[actix_web::test]
async fn test_missing_sql_and_unknown_sql_id_are_request_errors() {
    let app = spawn_service().await;

    let req = test::TestRequest::post()
        .uri("/v2/pipeline")
        .set_json(json!({
            "baton": null,
            "requests": [
                {"type": "execute", "stmt": {}},
                {"type": "execute", "stmt": {"sql_id": 9}}
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["results"][0]["type"], "error");
    assert_eq!(body["results"][1]["type"], "error");
    assert!(body["results"][1]["error"]["message"].as_str().unwrap().contains('9'));
}

#[actix_web::test]
async fn test_blob_roundtrip_over_the_wire() {
    let app = spawn_service().await;

    let req = test::TestRequest::post()
        .uri("/v2/pipeline")
        .set_json(json!({
            "baton": null,
            "requests": [
                {"type": "execute", "stmt": {"sql": "CREATE TABLE b(data BLOB)"}},
                {"type": "execute", "stmt": {
                    "sql": "INSERT INTO b VALUES (?)",
                    "args": [{"type": "blob", "value": "AAEC/w=="}]
                }},
                {"type": "execute", "stmt": {"sql": "SELECT data FROM b"}}
            ]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body["results"][2]["response"]["result"]["rows"][0][0],
        json!({"type": "blob", "value": "AAEC/w=="})
    );
}
