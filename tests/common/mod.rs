//! Common test utilities for API integration tests

use std::sync::{Arc, RwLock};

use axum_test::{TestServer, TestServerConfig};
use serde_json::{json, Value};
use uuid::Uuid;

use topcity_server::models::Role;
use topcity_server::{
    routes, AppState, Config, Mailer, MemoryAuthStore, MemoryEntityStore,
};

/// Mock mailer that captures confirmation and reset tokens
#[derive(Default, Clone)]
pub struct MockMailer {
    /// Captured (email, token) pairs
    pub sent: Arc<RwLock<Vec<(String, String)>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the last token sent to an email
    pub fn get_token(&self, email: &str) -> Option<String> {
        self.sent
            .read()
            .unwrap()
            .iter()
            .rev()
            .find(|(e, _)| e == email)
            .map(|(_, t)| t.clone())
    }
}

impl Mailer for MockMailer {
    fn send_confirmation(&self, email: &str, token: &str) -> Result<(), String> {
        self.sent
            .write()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }

    fn send_password_reset(&self, email: &str, token: &str) -> Result<(), String> {
        self.sent
            .write()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }
}

pub struct TestContext {
    pub server: TestServer,
    pub mailer: MockMailer,
    pub entities: Arc<MemoryEntityStore>,
}

/// Create a test server over the in-memory stores with a capturing
/// mailer. Cookies are saved across requests, so the jar holds whoever
/// signed in last; use [`TestContext::sign_in`] to switch identities.
pub fn create_test_server() -> TestContext {
    let entities = Arc::new(MemoryEntityStore::new());
    let auth = Arc::new(MemoryAuthStore::new());
    let mailer = MockMailer::new();

    let config = Config {
        database_url: String::new(),
        port: 0,
        upload_dir: "target/test-uploads".to_string(),
        allowed_origins: vec!["http://localhost:3000".to_string()],
        production: false,
    };
    let state = Arc::new(AppState::new(
        Arc::clone(&entities),
        auth,
        Arc::new(mailer.clone()),
        config,
    ));

    let mut server_config = TestServerConfig::default();
    server_config.save_cookies = true;
    let server = TestServer::new_with_config(routes::create_routes(state), server_config)
        .expect("Failed to create test server");

    TestContext {
        server,
        mailer,
        entities,
    }
}

impl TestContext {
    /// Walk the full sign-up flow (stage, confirm, sign in) and return
    /// the new profile's id. Leaves the session cookie in the jar.
    pub async fn sign_up_user(&self, email: &str, password: &str) -> Uuid {
        let response = self
            .server
            .post("/api/auth/sign-up")
            .json(&json!({
                "email": email,
                "password": password,
                "full_name": "Test Person",
            }))
            .await;
        assert_eq!(response.status_code(), 200, "sign-up failed: {}", response.text());

        let token = self.mailer.get_token(email).expect("No confirmation token sent");
        let response = self
            .server
            .post("/api/auth/confirm")
            .json(&json!({ "token": token }))
            .await;
        assert_eq!(response.status_code(), 200);

        self.sign_in(email, password).await
    }

    /// Sign in, replacing whatever identity the cookie jar held; the
    /// fresh session cookie overwrites the previous one.
    pub async fn sign_in(&self, email: &str, password: &str) -> Uuid {
        let response = self
            .server
            .post("/api/auth/sign-in")
            .json(&json!({ "email": email, "password": password }))
            .await;
        assert_eq!(response.status_code(), 200, "sign-in failed: {}", response.text());

        let body: Value = response.json();
        body["data"]["id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("sign-in response carries the profile id")
    }

    /// Create a confirmed account holding the given role. The role write
    /// goes straight to the store; there is no sign-up path to admin.
    pub async fn sign_up_with_role(&self, email: &str, password: &str, role: Role) -> Uuid {
        let id = self.sign_up_user(email, password).await;
        self.entities.set_role(id, role).unwrap();
        id
    }
}

/// Fields for a valid seller application submission
pub fn application_body() -> Value {
    json!({
        "business_name": "City Beats",
        "business_type": "company",
        "website": "https://citybeats.example",
        "experience": "Five years of club nights",
        "event_types": "Concerts, festivals",
    })
}

/// Fields for a valid event request submission
pub fn event_body() -> Value {
    json!({
        "title": "Summer Music Festival",
        "description": "Open air, all day",
        "date": "2099-09-12",
        "time": "18:00",
        "location": "Riverside Park",
        "price": "49.99",
        "capacity": "200",
        "category": "music",
    })
}
