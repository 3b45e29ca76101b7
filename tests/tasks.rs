mod common;

use actix_web::{http::StatusCode, rt, test, HttpServer};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{bearer, send, signed_in_user, TestState};

#[actix_rt::test]
async fn test_create_task_unauthorized() {
    let state = TestState::new();
    let server = HttpServer::new(move || state.app())
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("Failed to bind random port");
    let port = server.addrs()[0].port();
    let server = server.run();
    let handle = server.handle();
    rt::spawn(server);

    let client = reqwest::Client::new();
    let request_url = format!("http://127.0.0.1:{}/api/tasks", port);
    let resp = client
        .post(&request_url)
        .json(&json!({ "title": "Unauthorized Task" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("error body is JSON");
    assert_eq!(body, json!({ "error": "Authorization header required" }));

    handle.stop(true).await;
}

#[actix_rt::test]
async fn test_malformed_authorization_headers() {
    let app = test::init_service(TestState::new().app()).await;
    let token = signed_in_user(&app, "header").await;

    for header in [
        format!("Token {}", token),
        format!("Bearer  {}", token),
        format!("Bearer {} extra", token),
        "Bearer ".to_string(),
        "Bearer".to_string(),
    ] {
        let req = test::TestRequest::get()
            .uri("/api/tasks")
            .insert_header(("Authorization", header.clone()))
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {:?}", header);
        assert_eq!(body, json!({ "error": "Invalid authorization format" }));
    }

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(bearer("not.a.jwt"))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid or expired token" }));
}

#[actix_rt::test]
async fn test_task_crud_flow() {
    let app = test::init_service(TestState::new().app()).await;
    let token = signed_in_user(&app, "crud").await;

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Write report", "description": "quarterly numbers" }))
        .to_request();
    let (status, created) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Write report");
    assert_eq!(created["description"], "quarterly numbers");
    assert_eq!(created["is_done"], false);
    assert!(created.get("user_id").is_none());
    let task_uri = format!("/api/tasks/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::get()
        .uri(&task_uri)
        .insert_header(bearer(&token))
        .to_request();
    let (status, fetched) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let req = test::TestRequest::put()
        .uri(&task_uri)
        .insert_header(bearer(&token))
        .set_json(json!({ "is_done": true }))
        .to_request();
    let (status, updated) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_done"], true);
    assert_eq!(updated["title"], created["title"]);
    assert_eq!(updated["description"], created["description"]);
    assert_eq!(updated["created_at"], created["created_at"]);

    let req = test::TestRequest::put()
        .uri(&task_uri)
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Write final report", "description": null }))
        .to_request();
    let (status, updated) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Write final report");
    assert_eq!(updated["description"], Value::Null);
    assert_eq!(updated["is_done"], true);

    let req = test::TestRequest::delete()
        .uri(&task_uri)
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let req = test::TestRequest::get()
        .uri(&task_uri)
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Task not found" }));
}

#[actix_rt::test]
async fn test_list_is_newest_first() {
    let app = test::init_service(TestState::new().app()).await;
    let token = signed_in_user(&app, "lister").await;

    for title in ["first", "second", "third"] {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": title }))
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[actix_rt::test]
async fn test_tasks_are_isolated_between_users() {
    let app = test::init_service(TestState::new().app()).await;
    let alice = signed_in_user(&app, "alice").await;
    let bob = signed_in_user(&app, "bob").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&alice))
        .set_json(json!({ "title": "alice's secret" }))
        .to_request();
    let (_, created) = send(&app, req).await;
    let task_uri = format!("/api/tasks/{}", created["id"].as_str().unwrap());
    let not_found = (StatusCode::NOT_FOUND, json!({ "error": "Task not found" }));

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(bearer(&bob))
        .to_request();
    assert_eq!(send(&app, req).await, (StatusCode::OK, json!([])));

    let req = test::TestRequest::get()
        .uri(&task_uri)
        .insert_header(bearer(&bob))
        .to_request();
    assert_eq!(send(&app, req).await, not_found);

    let req = test::TestRequest::put()
        .uri(&task_uri)
        .insert_header(bearer(&bob))
        .set_json(json!({ "is_done": true }))
        .to_request();
    assert_eq!(send(&app, req).await, not_found);

    let req = test::TestRequest::delete()
        .uri(&task_uri)
        .insert_header(bearer(&bob))
        .to_request();
    assert_eq!(send(&app, req).await, not_found);

    let req = test::TestRequest::get()
        .uri(&task_uri)
        .insert_header(bearer(&alice))
        .to_request();
    let (status, untouched) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(untouched, created);
}

#[actix_rt::test]
async fn test_malformed_task_id_is_not_found() {
    let app = test::init_service(TestState::new().app()).await;
    let token = signed_in_user(&app, "ids").await;

    let req = test::TestRequest::get()
        .uri("/api/tasks/not-a-uuid")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Task not found" }));

    let req = test::TestRequest::delete()
        .uri("/api/tasks/12345")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_invalid_task_payloads() {
    let app = test::init_service(TestState::new().app()).await;
    let token = signed_in_user(&app, "validator").await;

    let test_cases = vec![
        (json!({}), "missing title"),
        (json!({ "title": "" }), "empty title"),
        (json!({ "title": "x".repeat(256) }), "title too long"),
        (json!({ "title": 7 }), "title of the wrong type"),
    ];

    for (payload, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .insert_header(bearer(&token))
            .set_json(&payload)
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(
            status,
            StatusCode::BAD_REQUEST,
            "Test case failed: {}. Body: {}",
            description,
            body
        );
    }

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "valid" }))
        .to_request();
    let (_, created) = send(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", created["id"].as_str().unwrap()))
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "" }))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::BAD_REQUEST);
}
