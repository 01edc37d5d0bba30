use uranus_api::{
    api::router::create_router,
    config::Config,
    domain::ports::Mailer,
    error::AppError,
    infra::factory::sqlite_state,
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "Sehr-Geheim-2024";
pub const BASE_URL: &str = "http://uranus.test/";

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentMail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub mailer: Arc<RecordingMailer>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url,
            port: 0,
            secret_key: "integration-test-secret".to_string(),
            access_token_expire_minutes: 30,
            refresh_token_expire_days: 7,
            reset_token_expire_minutes: 15,
            base_url: BASE_URL.to_string(),
            upload_dir: std::env::temp_dir(),
            frontend_url: "http://frontend.test".to_string(),
            log_dir: std::env::temp_dir(),
        };

        let mailer = Arc::new(RecordingMailer::default());
        let state = Arc::new(sqlite_state(&config, pool.clone(), mailer.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            mailer,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request("GET", uri, None, None).await
    }

    /// Signs up a user with [`PASSWORD`] and returns an access token.
    pub async fn signup_and_signin(&self, email: &str) -> String {
        let res = self.request("POST", "/user/signup", None, Some(json!({
            "first_name": "Test",
            "last_name": "User",
            "email_address": email,
            "password": PASSWORD
        }))).await;
        assert_eq!(res.status(), StatusCode::CREATED, "signup failed");

        let res = self.request("POST", "/user/signin", None, Some(json!({
            "email_address": email,
            "password": PASSWORD
        }))).await;
        assert_eq!(res.status(), StatusCode::OK, "signin failed");
        parse_body(res).await["access_token"].as_str().unwrap().to_string()
    }

    pub async fn create_organizer(&self, token: &str, name: &str) -> i64 {
        let res = self.request("POST", "/organizer/", Some(token), Some(json!({ "name": name }))).await;
        assert_eq!(res.status(), StatusCode::CREATED, "organizer creation failed");
        parse_body(res).await["id"].as_i64().unwrap()
    }

    pub async fn create_venue(&self, token: &str, organizer_id: i64, venue: Value) -> i64 {
        let mut body = venue;
        body["organizer_id"] = json!(organizer_id);
        let res = self.request("POST", "/venue/", Some(token), Some(body)).await;
        assert_eq!(res.status(), StatusCode::CREATED, "venue creation failed");
        parse_body(res).await["id"].as_i64().unwrap()
    }

    /// Returns the created event detail.
    pub async fn create_event(&self, token: &str, event: Value) -> Value {
        let res = self.request("POST", "/event/", Some(token), Some(event)).await;
        assert_eq!(res.status(), StatusCode::CREATED, "event creation failed");
        parse_body(res).await
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
