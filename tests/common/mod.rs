#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::{self, MessageBody},
    dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse},
    http::StatusCode,
    middleware::Logger,
    test, web, App,
};
use chrono::Duration;
use serde_json::{json, Value};

use tasklist::routes;
use tasklist::services::{AuthService, TaskService};
use tasklist::storage::{InMemoryTaskStore, InMemoryUserStore};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Services backed by in-memory stores, shared by every app built from it.
#[derive(Clone)]
pub struct TestState {
    pub auth: web::Data<AuthService>,
    pub tasks: web::Data<TaskService>,
}

impl TestState {
    pub fn new() -> Self {
        Self::with_token_ttl(Duration::hours(1))
    }

    pub fn with_token_ttl(token_ttl: Duration) -> Self {
        let auth = AuthService::new(TEST_SECRET, token_ttl, Arc::new(InMemoryUserStore::new()))
            .with_bcrypt_cost(4);
        Self {
            auth: web::Data::new(auth),
            tasks: web::Data::new(TaskService::new(Arc::new(InMemoryTaskStore::new()))),
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.auth.clone())
            .app_data(self.tasks.clone())
            .wrap(Logger::default())
            .configure(routes::configure(self.auth.clone()))
    }
}

/// Sends `req` and returns the status with the decoded JSON body (`Null` when empty).
///
/// Requests rejected by the auth middleware come back as service errors; they are
/// rendered the way the server would render them.
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let bytes = test::read_body(resp).await;
            (status, parse(&bytes))
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let bytes = body::to_bytes(resp.into_body()).await.unwrap();
            (status, parse(&bytes))
        }
    }
}

fn parse(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(bytes).unwrap()
    }
}

pub async fn register<S, B>(app: &S, email: &str, username: &str, password: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({
            "email": email,
            "username": username,
            "password": password
        }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

/// Registers a fresh account and returns its bearer token.
pub async fn signed_in_user<S, B>(app: &S, name: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let email = format!("{}@example.com", name);
    register(app, &email, name, "password123").await;
    login(app, &email, "password123").await
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
