use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::debug;

mod html;

use crate::loader::Pages;
use crate::reports::ReportSource;
use crate::session::SessionData;
use crate::sports::{self, Sport};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ReportSource>,
    pub session: Arc<SessionData>,
    pub pages: Arc<Pages>,
    /// Sport preselected in the dashboard pickers
    pub default_sport: Sport,
}

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/about", get(|| async { Html(html::ABOUT_HTML) }))
        .route("/privacy-policy", get(|| async { Html(html::PRIVACY_HTML) }))
        .route("/terms-of-service", get(|| async { Html(html::TERMS_HTML) }))
        .route("/api/sports", get(sports_handler))
        .route("/api/home", get(home_handler))
        .route("/api/sports/:sport", get(sport_detail_handler))
        .route("/api/sports/:sport/ratings", get(team_ratings_handler))
        .route("/api/sports/:sport/upcoming", get(upcoming_handler))
        .route("/api/sports/:sport/past", get(past_handler))
        .route("/api/sports/:sport/evaluation", get(evaluation_handler))
        .fallback(not_found_handler)
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

fn parse_sport(raw: &str) -> Result<Sport, (StatusCode, String)> {
    raw.parse::<Sport>()
        .map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))
}

/// Serve the dashboard HTML page, injecting the default sport.
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let html = html::DASHBOARD_HTML.replace(
        r#"<body>"#,
        &format!(r#"<body data-sport="{}">"#, state.default_sport),
    );
    Html(html)
}

async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(html::NOT_FOUND_HTML))
}

/// GET /api/sports
async fn sports_handler() -> impl IntoResponse {
    Json(sports::catalog())
}

/// GET /api/home
async fn home_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.session.state().await)
}

/// GET /api/sports/:sport
async fn sport_detail_handler(
    State(state): State<Arc<AppState>>,
    Path(sport): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let sport = parse_sport(&sport)?;
    let detail = state.pages.sport.load(state.source.as_ref(), sport).await;
    Ok(Json(detail))
}

/// GET /api/sports/:sport/ratings
async fn team_ratings_handler(
    State(state): State<Arc<AppState>>,
    Path(sport): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let sport = parse_sport(&sport)?;
    let detail = state.pages.sport.load(state.source.as_ref(), sport).await;
    Ok(Json(detail.teams))
}

/// GET /api/sports/:sport/upcoming
async fn upcoming_handler(
    State(state): State<Arc<AppState>>,
    Path(sport): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let sport = parse_sport(&sport)?;
    debug!("Upcoming events requested for {}", sport);
    let events = state
        .pages
        .upcoming
        .load(state.source.as_ref(), sport, Utc::now())
        .await;
    Ok(Json(events))
}

/// GET /api/sports/:sport/past
async fn past_handler(
    State(state): State<Arc<AppState>>,
    Path(sport): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let sport = parse_sport(&sport)?;
    let view = state
        .pages
        .past_events(state.source.as_ref(), sport, Utc::now())
        .await;
    Ok(Json(view))
}

/// GET /api/sports/:sport/evaluation
async fn evaluation_handler(
    State(state): State<Arc<AppState>>,
    Path(sport): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let sport = parse_sport(&sport)?;
    let view = state
        .pages
        .evaluation
        .load(state.source.as_ref(), sport)
        .await;
    Ok(Json(view))
}
