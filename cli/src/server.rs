use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use vitalog_core::Error as CoreError;
use vitalog_core::db::Database;
use vitalog_core::engine::HealthEngine;
use vitalog_core::models::{
    ActivityLevel, DashboardSnapshot, EmotionalState, HealthLogEntry, Profile, Recommendation,
    Reminder, SeriesPoint, Symptom, SymptomKind,
};
use vitalog_core::series::DEFAULT_WINDOW;

const BODY_LIMIT: usize = 64 * 1024; // 64 KB

#[derive(Clone)]
struct AppState {
    engine: Arc<Mutex<HealthEngine<Database>>>,
    api_key: Option<String>,
}

impl AppState {
    fn engine(&self) -> MutexGuard<'_, HealthEngine<Database>> {
        self.engine
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

// --- Request / Response types ---

#[derive(Deserialize)]
struct CreateLogRequest {
    weight_kg: f64,
    emotional_state: Option<String>,
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct SeriesQuery {
    window: Option<usize>,
}

#[derive(Deserialize)]
struct ProfileRequest {
    height_m: f64,
    activity_level: Option<String>,
}

#[derive(Deserialize)]
struct CreateSymptomRequest {
    name: String,
    kind: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// --- Error handling ---

enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(err) => {
                tracing::error!(error = %format!("{err:#}"), "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(_) | CoreError::InvalidCategory(_) => {
                Self::BadRequest(err.to_string())
            }
            CoreError::NotFound(_) => Self::NotFound(err.to_string()),
            CoreError::StoreUnavailable(inner) => Self::Internal(inner),
        }
    }
}

// --- Middleware ---

async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(ref expected_key) = state.api_key {
        let authorized = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected_key);

        if !authorized {
            tracing::warn!(path = %request.uri().path(), "rejected unauthenticated request");
            return (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid or missing API key".to_string(),
                }),
            )
                .into_response();
        }
    }
    next.run(request).await
}

async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static("default-src 'none'"),
    );
    response
}

// --- Handlers ---

async fn create_log(
    State(state): State<AppState>,
    Json(req): Json<CreateLogRequest>,
) -> Result<(StatusCode, Json<HealthLogEntry>), ApiError> {
    let mood = req
        .emotional_state
        .as_deref()
        .map(str::parse::<EmotionalState>)
        .transpose()?
        .unwrap_or_default();

    let entry = state.engine().add_log(req.weight_kg, mood)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<HealthLogEntry>>, ApiError> {
    Ok(Json(state.engine().list_logs(query.limit)?))
}

async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardSnapshot>, ApiError> {
    Ok(Json(state.engine().dashboard()?))
}

async fn get_series(
    State(state): State<AppState>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<Vec<SeriesPoint>>, ApiError> {
    let window = query.window.unwrap_or(DEFAULT_WINDOW);
    Ok(Json(state.engine().series(window)?))
}

async fn get_recommendations(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Recommendation>>, ApiError> {
    Ok(Json(state.engine().recommendations(&category)?))
}

async fn get_profile(State(state): State<AppState>) -> Result<Json<Profile>, ApiError> {
    state
        .engine()
        .get_profile()?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Profile not set".to_string()))
}

async fn put_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let activity_level = req
        .activity_level
        .as_deref()
        .map(str::parse::<ActivityLevel>)
        .transpose()?;

    let profile = state.engine().set_profile(Profile {
        height_m: req.height_m,
        activity_level,
    })?;
    Ok(Json(profile))
}

async fn create_symptom(
    State(state): State<AppState>,
    Json(req): Json<CreateSymptomRequest>,
) -> Result<(StatusCode, Json<Symptom>), ApiError> {
    let kind = req
        .kind
        .as_deref()
        .map(str::parse::<SymptomKind>)
        .transpose()?
        .unwrap_or(SymptomKind::Physical);

    let symptom = state.engine().log_symptom(&req.name, kind)?;
    Ok((StatusCode::CREATED, Json(symptom)))
}

async fn list_symptoms(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<Symptom>>, ApiError> {
    Ok(Json(state.engine().list_symptoms(query.limit)?))
}

async fn list_reminders(State(state): State<AppState>) -> Result<Json<Vec<Reminder>>, ApiError> {
    Ok(Json(state.engine().list_reminders()?))
}

async fn toggle_reminder(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Reminder>, ApiError> {
    Ok(Json(state.engine().toggle_reminder(id)?))
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/logs", post(create_log).get(list_logs))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/series", get(get_series))
        .route("/api/recommendations/{category}", get(get_recommendations))
        .route("/api/profile", get(get_profile).put(put_profile))
        .route("/api/symptoms", post(create_symptom).get(list_symptoms))
        .route("/api/reminders", get(list_reminders))
        .route("/api/reminders/{id}/toggle", post(toggle_reminder))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// --- Server startup ---

/// First and last four characters of the key, or all stars when it is too
/// short to reveal any of it.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < 12 {
        return "*".repeat(chars.len().max(4));
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

pub async fn start_server(
    db: Database,
    port: u16,
    bind: &str,
    api_key: Option<String>,
) -> anyhow::Result<()> {
    let state = AppState {
        engine: Arc::new(Mutex::new(HealthEngine::new(db))),
        api_key: api_key.clone(),
    };

    let app = build_router(state);

    if let Some(ref key) = api_key {
        eprintln!(
            "API key: {} (see api_key file in data directory)",
            mask_key(key)
        );
    } else {
        eprintln!("Warning: Authentication disabled (--no-auth). API is open to anyone.");
    }

    if bind != "127.0.0.1" && bind != "localhost" && api_key.is_none() {
        eprintln!(
            "Warning: Listening on {bind} with no authentication. Any device on your network can access this API."
        );
    }

    let listener = tokio::net::TcpListener::bind(format!("{bind}:{port}")).await?;
    eprintln!("Listening on http://{bind}:{port}");
    tracing::info!(bind, port, auth = api_key.is_some(), "server started");
    axum::serve(listener, app).await?;

    Ok(())
}
