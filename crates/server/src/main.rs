// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::Parser;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info};
use timeclock_api::{
    ApiError, ApiResponse, ClockEventInfo, CreatePunchRequest, DaySummaryInfo, ListQuery,
    LoginRequest, LoginResponse, PagedResponse, PunchFilter, RegisterRequest, UserProfile,
    create_punch, delete_punch, get_profile, get_punch, list_accounts, list_punches, list_summary,
    list_today, login, logout, register,
};
use timeclock_persistence::Persistence;

mod session;

use session::SessionUser;

/// Timeclock Server - HTTP server for the Timeclock system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex so the
/// sequence check and insert of a punch stay atomic per request.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for accounts, sessions, and clock events.
    persistence: Arc<Mutex<Persistence>>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ApiResponse<()>> = Json(ApiResponse::error(self.message));
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        // Internal detail is logged here and never sent to the client.
        if let ApiError::Internal { message } = &err {
            error!(detail = %message, "Internal error");
            return Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: String::from("An internal error occurred"),
            };
        }
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handler for POST `/auth/register` endpoint.
///
/// Registers a new employee account.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, HttpError> {
    info!(email = %req.email, "Handling register request");

    let mut persistence = app_state.persistence.lock().await;
    let profile: UserProfile = register(&mut persistence, &req)?;
    drop(persistence);

    info!(user_id = profile.user_id, "Successfully registered account");

    Ok(Json(ApiResponse::success(
        profile,
        String::from("Account registered"),
    )))
}

/// Handler for POST `/auth/login` endpoint.
///
/// Authenticates credentials and opens a session.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, HttpError> {
    info!(email = %req.email, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = login(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(ApiResponse::success(
        response,
        String::from("Login successful"),
    )))
}

/// Handler for POST `/auth/logout` endpoint.
///
/// Deletes the presented session.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, token): SessionUser,
) -> Result<Json<ApiResponse<()>>, HttpError> {
    info!(email = %user.email, "Handling logout request");

    let mut persistence = app_state.persistence.lock().await;
    logout(&mut persistence, &token)?;
    drop(persistence);

    Ok(Json(ApiResponse::success(
        (),
        String::from("Logged out"),
    )))
}

/// Handler for GET `/auth/me` endpoint.
///
/// Returns the authenticated user's own profile.
async fn handle_get_profile(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
) -> Result<Json<ApiResponse<UserProfile>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let profile: UserProfile = get_profile(&mut persistence, &user)?;
    drop(persistence);

    Ok(Json(ApiResponse::success(
        profile,
        String::from("Profile retrieved"),
    )))
}

/// Handler for POST `/time-records` endpoint.
///
/// Records a punch for the authenticated user.
async fn handle_create_punch(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Json(req): Json<CreatePunchRequest>,
) -> Result<Json<ApiResponse<ClockEventInfo>>, HttpError> {
    info!(
        email = %user.email,
        punch_type = %req.punch_type,
        "Handling create punch request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let info: ClockEventInfo =
        create_punch(&mut persistence, &user, &req, OffsetDateTime::now_utc())?;
    drop(persistence);

    info!(event_id = info.event_id, "Successfully recorded punch");

    Ok(Json(ApiResponse::success(
        info,
        String::from("Punch recorded"),
    )))
}

/// Handler for GET `/time-records` endpoint.
///
/// Lists the authenticated user's punches, most recent first.
async fn handle_list_punches(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Query(filter): Query<PunchFilter>,
) -> Result<Json<ApiResponse<PagedResponse<ClockEventInfo>>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let page: PagedResponse<ClockEventInfo> = list_punches(
        &mut persistence,
        &user,
        &filter,
        OffsetDateTime::now_utc().date(),
    )?;
    drop(persistence);

    Ok(Json(ApiResponse::success(
        page,
        String::from("Punches retrieved"),
    )))
}

/// Handler for GET `/time-records/summary` endpoint.
///
/// Lists per-day summaries, most recent day first.
async fn handle_list_summary(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Query(filter): Query<PunchFilter>,
) -> Result<Json<ApiResponse<PagedResponse<DaySummaryInfo>>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let page: PagedResponse<DaySummaryInfo> = list_summary(
        &mut persistence,
        &user,
        &filter,
        OffsetDateTime::now_utc().date(),
    )?;
    drop(persistence);

    Ok(Json(ApiResponse::success(
        page,
        String::from("Summary retrieved"),
    )))
}

/// Handler for GET `/time-records/today` endpoint.
///
/// Lists today's punches, ascending.
async fn handle_list_today(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
) -> Result<Json<ApiResponse<Vec<ClockEventInfo>>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let events: Vec<ClockEventInfo> = list_today(
        &mut persistence,
        &user,
        OffsetDateTime::now_utc().date(),
    )?;
    drop(persistence);

    Ok(Json(ApiResponse::success(
        events,
        String::from("Today's punches retrieved"),
    )))
}

/// Handler for GET `/time-records/{event_id}` endpoint.
///
/// Returns a single punch owned by the authenticated user.
async fn handle_get_punch(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(event_id): Path<i64>,
) -> Result<Json<ApiResponse<ClockEventInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let info: ClockEventInfo = get_punch(&mut persistence, &user, event_id)?;
    drop(persistence);

    Ok(Json(ApiResponse::success(
        info,
        String::from("Punch retrieved"),
    )))
}

/// Handler for DELETE `/time-records/{event_id}` endpoint.
///
/// Deletes a punch owned by the authenticated user.
async fn handle_delete_punch(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(event_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, HttpError> {
    info!(
        email = %user.email,
        event_id = event_id,
        "Handling delete punch request"
    );

    let mut persistence = app_state.persistence.lock().await;
    delete_punch(&mut persistence, &user, event_id)?;
    drop(persistence);

    Ok(Json(ApiResponse::success(
        (),
        String::from("Punch deleted"),
    )))
}

/// Handler for GET `/users` endpoint.
///
/// Lists all accounts. Admin only.
async fn handle_list_accounts(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<PagedResponse<UserProfile>>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let page: PagedResponse<UserProfile> = list_accounts(&mut persistence, &user, &query)?;
    drop(persistence);

    Ok(Json(ApiResponse::success(
        page,
        String::from("Accounts retrieved"),
    )))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(handle_register))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/me", get(handle_get_profile))
        .route("/time-records", post(handle_create_punch))
        .route("/time-records", get(handle_list_punches))
        .route("/time-records/summary", get(handle_list_summary))
        .route("/time-records/today", get(handle_list_today))
        .route("/time-records/{event_id}", get(handle_get_punch))
        .route("/time-records/{event_id}", delete(handle_delete_punch))
        .route("/users", get(handle_list_accounts))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Timeclock Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode as HttpStatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
        }
    }

    /// Sends a request and returns the status plus the decoded JSON body.
    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (HttpStatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request: Request<Body> = match body {
            Some(value) => builder
                .header("content-type", "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status: HttpStatusCode = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn register_body(email: &str) -> Value {
        json!({
            "email": email,
            "full_name": "Test User",
            "employee_code": null,
            "password": "Passw0rd",
            "confirm_password": "Passw0rd",
        })
    }

    /// Registers an account and logs it in, returning the session token.
    async fn register_and_login(app: &Router, email: &str) -> String {
        let (status, _) = send(
            app.clone(),
            Method::POST,
            "/auth/register",
            None,
            Some(register_body(email)),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) = send(
            app.clone(),
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": "Passw0rd" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        body["data"]["session_token"]
            .as_str()
            .expect("Login response should carry a session token")
            .to_string()
    }

    #[tokio::test]
    async fn test_register_returns_profile() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            app,
            Method::POST,
            "/auth/register",
            None,
            Some(register_body("alice@example.com")),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["email"], json!("alice@example.com"));
        assert_eq!(body["data"]["role"], json!("Employee"));
        assert!(body["data"]["user_id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_register_weak_password_rejected() {
        let app: Router = build_router(create_test_app_state());

        let mut body: Value = register_body("alice@example.com");
        body["password"] = json!("short");
        body["confirm_password"] = json!("short");

        let (status, response) =
            send(app, Method::POST, "/auth/register", None, Some(body)).await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(response["success"], json!(false));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_unauthorized() {
        let app: Router = build_router(create_test_app_state());
        register_and_login(&app, "alice@example.com").await;

        let (status, _) = send(
            app,
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "WrongPass1" })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_record_punch_with_session() {
        let app: Router = build_router(create_test_app_state());
        let token: String = register_and_login(&app, "alice@example.com").await;

        let (status, body) = send(
            app,
            Method::POST,
            "/time-records",
            Some(&token),
            Some(json!({ "punch_type": "ClockIn", "timestamp": null, "description": null })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["data"]["punch_type"], json!("ClockIn"));
        assert!(body["data"]["event_id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_record_punch_without_session_unauthorized() {
        let app: Router = build_router(create_test_app_state());

        let (status, _) = send(
            app,
            Method::POST,
            "/time-records",
            None,
            Some(json!({ "punch_type": "ClockIn" })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_double_clock_in_unprocessable() {
        let app: Router = build_router(create_test_app_state());
        let token: String = register_and_login(&app, "alice@example.com").await;

        // First clock-in succeeds; a second on the same day violates
        // the sequence rule.
        let (status, _) = send(
            app.clone(),
            Method::POST,
            "/time-records",
            Some(&token),
            Some(json!({ "punch_type": "ClockIn", "timestamp": null, "description": null })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) = send(
            app,
            Method::POST,
            "/time-records",
            Some(&token),
            Some(json!({ "punch_type": "ClockIn", "timestamp": null, "description": null })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_today_lists_recorded_punches() {
        let app: Router = build_router(create_test_app_state());
        let token: String = register_and_login(&app, "alice@example.com").await;

        send(
            app.clone(),
            Method::POST,
            "/time-records",
            Some(&token),
            Some(json!({ "punch_type": "ClockIn", "timestamp": null, "description": null })),
        )
        .await;

        let (status, body) = send(
            app,
            Method::GET,
            "/time-records/today",
            Some(&token),
            None,
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["punch_type"], json!("ClockIn"));
    }

    #[tokio::test]
    async fn test_unknown_record_not_found() {
        let app: Router = build_router(create_test_app_state());
        let token: String = register_and_login(&app, "alice@example.com").await;

        let (status, _) = send(app, Method::GET, "/time-records/9999", Some(&token), None).await;

        assert_eq!(status, HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_accounts_forbidden_for_employee() {
        let app: Router = build_router(create_test_app_state());
        let token: String = register_and_login(&app, "alice@example.com").await;

        let (status, body) = send(app, Method::GET, "/users", Some(&token), None).await;

        assert_eq!(status, HttpStatusCode::FORBIDDEN);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let app: Router = build_router(create_test_app_state());
        let token: String = register_and_login(&app, "alice@example.com").await;

        let (status, _) = send(
            app.clone(),
            Method::POST,
            "/auth/logout",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, _) = send(app, Method::GET, "/auth/me", Some(&token), None).await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_reflects_last_login() {
        let app: Router = build_router(create_test_app_state());
        let token: String = register_and_login(&app, "alice@example.com").await;

        let (status, body) = send(app, Method::GET, "/auth/me", Some(&token), None).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["data"]["email"], json!("alice@example.com"));
        assert!(body["data"]["last_login_at"].is_string());
    }

    #[test]
    fn test_internal_errors_are_opaque_to_clients() {
        let err: HttpError = HttpError::from(ApiError::Internal {
            message: String::from("Database error: disk I/O error"),
        });

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "An internal error occurred");
    }

    #[tokio::test]
    async fn test_huge_page_number_is_rejected() {
        let app: Router = build_router(create_test_app_state());
        let token: String = register_and_login(&app, "alice@example.com").await;

        let uri: String = format!("/time-records?page={}&page_size=100", i64::MAX);
        let (status, body) = send(app, Method::GET, &uri, Some(&token), None).await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
    }
}
