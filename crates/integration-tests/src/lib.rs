//! Test harness for end-to-end site tests.
//!
//! [`MockBackend`] stands in for the company's REST API: it records every
//! call and answers with canned data unless a test overrides a route.
//! [`TestSite`] serves `reshow_site::app` on an ephemeral port against it.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use reqwest::Client;
use reshow_site::config::{ApiConfig, SiteConfig};
use reshow_site::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};

/// Password accepted for every seeded account.
pub const PASSWORD: &str = "Reshow@2024";
/// Superadmin account.
pub const SUPERADMIN_EMAIL: &str = "admin@reshow.co.zw";
/// Regular admin account.
pub const STAFF_EMAIL: &str = "staff@reshow.co.zw";
/// Account that still has the default password.
pub const NEW_USER_EMAIL: &str = "new@reshow.co.zw";

const SUPERADMIN_TOKEN: &str = "token-superadmin";
const STAFF_TOKEN: &str = "token-staff";
const NEW_USER_TOKEN: &str = "token-new-user";

/// Path the mock returns for every uploaded image.
pub const UPLOADED_IMAGE: &str = "/uploads/mock-image.png";

const SESSION_SECRET: &str =
    "k9Qv2Lx7Tz4Wm1Rb8Ny3Hc6Jp0Fs5Gd2Ke7Ua4Vo9Xi1Zl3Bq8Mt6Cw0Pr5Yn2Sh7Ej4Df1";

/// One request received by the mock backend.
#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    /// Path below `/api`.
    pub path: String,
    pub authorization: Option<String>,
    /// JSON body, `Null` when there was none or it was not JSON.
    pub body: Value,
    /// Body as text, for multipart requests.
    pub raw: String,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<Call>,
    overrides: HashMap<(Method, String), (StatusCode, Value)>,
}

/// In-process stand-in for the backend API.
#[derive(Debug, Clone)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
    url: String,
}

impl MockBackend {
    /// Serve the mock on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockState::default()));
        let listener = tokio::net::TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");

        let mock = Self {
            state,
            url: format!("http://{addr}/api"),
        };
        let app = Router::new().fallback(handle).with_state(mock.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        mock
    }

    /// Base URL, ending in `/api`.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answer `method path` with `status` and `body` from now on.
    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.lock()
            .overrides
            .insert((method, path.to_string()), (status, body));
    }

    /// Every call to `method path`, oldest first.
    #[must_use]
    pub fn calls_to(&self, method: &Method, path: &str) -> Vec<Call> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.method == *method && c.path == path)
            .cloned()
            .collect()
    }

    /// Every call with `method` whose path starts with `prefix`.
    #[must_use]
    pub fn calls_under(&self, method: &Method, prefix: &str) -> Vec<Call> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.method == *method && c.path.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Calls to `method path` once at least `count` arrived or a second
    /// passed. For requests the site sends from a background task.
    pub async fn wait_for(&self, method: &Method, path: &str, count: usize) -> Vec<Call> {
        for _ in 0..50 {
            let calls = self.calls_to(method, path);
            if calls.len() >= count {
                return calls;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.calls_to(method, path)
    }
}

fn admin_user(id: i64, name: &str, email: &str, role: &str) -> Value {
    json!({
        "id": id,
        "fullName": name,
        "email": email,
        "role": role,
        "mustChangePassword": false,
        "isActive": true,
    })
}

fn user_for_token(token: &str) -> Option<Value> {
    match token {
        SUPERADMIN_TOKEN => Some(admin_user(1, "Rudo Moyo", SUPERADMIN_EMAIL, "superadmin")),
        STAFF_TOKEN => Some(admin_user(3, "Tafadzwa Ncube", STAFF_EMAIL, "admin")),
        NEW_USER_TOKEN => Some(admin_user(2, "Chipo Dube", NEW_USER_EMAIL, "admin")),
        _ => None,
    }
}

fn login(body: &Value) -> (StatusCode, Value) {
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            json!({ "error": "Invalid credentials" }),
        );
    }
    let token = match email {
        SUPERADMIN_EMAIL => SUPERADMIN_TOKEN,
        STAFF_EMAIL => STAFF_TOKEN,
        NEW_USER_EMAIL => {
            return (
                StatusCode::OK,
                json!({ "mustChangePassword": true, "userId": 2 }),
            );
        }
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid credentials" }),
            );
        }
    };
    let user = user_for_token(token).unwrap_or_default();
    (StatusCode::OK, json!({ "token": token, "user": user }))
}

fn canned(method: &Method, path: &str, body: &Value, bearer: Option<&str>) -> (StatusCode, Value) {
    match (method.as_str(), path) {
        ("POST", "/auth/login") => login(body),
        ("POST", "/auth/change-password") => (
            StatusCode::OK,
            json!({ "token": NEW_USER_TOKEN, "user": user_for_token(NEW_USER_TOKEN) }),
        ),
        ("GET", "/auth/me") => bearer.and_then(user_for_token).map_or_else(
            || (StatusCode::UNAUTHORIZED, json!({ "error": "Invalid token" })),
            |user| (StatusCode::OK, user),
        ),
        ("GET", "/categories") => (
            StatusCode::OK,
            json!([
                { "id": 3, "name": "Caps", "createdAt": "2024-03-01T08:00:00Z" },
                { "id": 4, "name": "Pens", "createdAt": "2024-03-02T08:00:00Z" },
            ]),
        ),
        ("GET", "/admin/users") => (
            StatusCode::OK,
            json!([
                user_for_token(SUPERADMIN_TOKEN),
                user_for_token(STAFF_TOKEN),
            ]),
        ),
        ("GET", "/products" | "/services-content/items" | "/quotes") => {
            (StatusCode::OK, json!([]))
        }
        ("GET", "/admin/dashboard") => (
            StatusCode::OK,
            json!({
                "totalVisitors": 120,
                "totalProducts": 8,
                "totalQuotes": 5,
                "pendingQuotes": 2,
                "totalUsers": 2,
            }),
        ),
        ("POST", "/admin/upload") => (StatusCode::OK, json!({ "url": UPLOADED_IMAGE })),
        ("GET", _) => (StatusCode::OK, json!({})),
        _ => (StatusCode::OK, json!({ "success": true })),
    }
}

async fn handle(
    State(mock): State<MockBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix("/api")
        .unwrap_or_else(|| uri.path())
        .to_string();
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let raw = String::from_utf8_lossy(&body).into_owned();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let (status, reply) = {
        let mut state = mock.lock();
        state.calls.push(Call {
            method: method.clone(),
            path: path.clone(),
            authorization: authorization.clone(),
            body: body.clone(),
            raw,
        });
        state.overrides.get(&(method.clone(), path.clone())).cloned()
    }
    .unwrap_or_else(|| {
        let bearer = authorization
            .as_deref()
            .and_then(|v| v.strip_prefix("Bearer "));
        canned(&method, &path, &body, bearer)
    });

    (status, Json(reply)).into_response()
}

/// Site configuration pointing at `api_url`.
#[must_use]
pub fn site_config(api_url: &str) -> SiteConfig {
    SiteConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        session_secret: SecretString::from(SESSION_SECRET.to_string()),
        api: ApiConfig {
            base_url: api_url.to_string(),
            timeout: Duration::from_secs(5),
        },
        content_cache_ttl: Duration::from_secs(30),
        idle_timeout_secs: 60,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A browser: keeps cookies, does not follow redirects.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build HTTP client")
}

/// The site served against a fresh [`MockBackend`].
#[derive(Debug)]
pub struct TestSite {
    pub backend: MockBackend,
    pub client: Client,
    url: String,
}

impl TestSite {
    /// Start a mock backend and the site in front of it.
    ///
    /// # Panics
    ///
    /// Panics if the site cannot be built or bound.
    pub async fn start() -> Self {
        let backend = MockBackend::start().await;
        let state =
            AppState::new(site_config(backend.url())).expect("Failed to build application state");
        let app = reshow_site::app(state).expect("Failed to build router");

        let listener = tokio::net::TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .expect("Failed to bind site");
        let addr = listener.local_addr().expect("Site has no address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            backend,
            client: browser(),
            url: format!("http://{addr}"),
        }
    }

    /// Absolute URL of `path` on the site.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }

    /// GET `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    /// POST `fields` to `path` as a urlencoded form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(fields)
            .send()
            .await
            .expect("POST failed")
    }

    /// POST `fields` to `path` as multipart form data.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_multipart(&self, path: &str, fields: &[(&str, &str)]) -> reqwest::Response {
        let form = fields
            .iter()
            .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                form.text((*name).to_string(), (*value).to_string())
            });
        self.client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// Submit a multipart form with one file in the `file_input` part.
    pub async fn post_multipart_file(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        file_input: &str,
        file_name: &str,
    ) -> reqwest::Response {
        let file = reqwest::multipart::Part::bytes(b"\x89PNG\r\n".to_vec())
            .file_name(file_name.to_string())
            .mime_str("image/png")
            .expect("Invalid mime type");
        let form = fields
            .iter()
            .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                form.text((*name).to_string(), (*value).to_string())
            })
            .part(file_input.to_string(), file);
        self.client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// Log in and return the redirect target.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post_form("/admin/login", &[("email", email), ("password", password)])
            .await;
        location(&response)
    }
}

/// `Location` header of a redirect, empty when there is none.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Body text of `response`.
///
/// # Panics
///
/// Panics if the body cannot be read.
pub async fn text(response: reqwest::Response) -> String {
    response.text().await.expect("Failed to read body")
}
