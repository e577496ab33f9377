use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    services::{
        display::{FilmDetails, FilmView, NOT_FOUND_NOTICE},
        recommendations, Session,
    },
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct FilmQuery {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct FilmLookupResponse {
    pub film: FilmView,
    pub recommendations: Vec<FilmView>,
}

/// The searched film as currently shown in a session
#[derive(Debug, Serialize)]
pub struct SearchView {
    pub query: String,
    pub found: bool,
    pub film: Option<FilmView>,
    pub recommendations: Vec<FilmView>,
    pub notice: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct PinnedView {
    #[serde(flatten)]
    pub view: FilmView,
    pub details: FilmDetails,
}

/// Everything the presentation layer needs to redraw a session
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub details_expanded: bool,
    pub search: Option<SearchView>,
    /// Details pane of the searched film, present only while expanded
    pub details: Option<FilmDetails>,
    pub pinned: Option<PinnedView>,
}

impl SessionView {
    pub fn render(session: &Session, state: &AppState) -> Self {
        let resolved = session
            .query
            .as_deref()
            .map(|query| (query, state.catalog.find_by_title(query)));

        let search = resolved.map(|(query, found)| match found {
            Some((film, recommended)) => SearchView {
                query: query.to_string(),
                found: true,
                film: Some(FilmView::new(film, &state.images)),
                recommendations: recommendations::top_n(recommended, state.recommendation_limit)
                    .iter()
                    .map(|f| FilmView::new(f, &state.images))
                    .collect(),
                notice: None,
            },
            None => SearchView {
                query: query.to_string(),
                found: false,
                film: None,
                recommendations: Vec::new(),
                notice: Some(NOT_FOUND_NOTICE),
            },
        });

        let details = resolved
            .and_then(|(_, found)| found)
            .filter(|_| session.selection.details_expanded)
            .map(|(film, _)| FilmDetails::from(film));

        let pinned = session
            .selection
            .pinned_recommendation
            .as_ref()
            .map(|film| PinnedView {
                view: FilmView::new(film, &state.images),
                details: FilmDetails::from(film),
            });

        Self {
            session_id: session.id,
            created_at: session.created_at,
            details_expanded: session.selection.details_expanded,
            search,
            details,
            pinned,
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "films": state.catalog.len() })),
    )
}

/// Serves the stylesheet loaded at startup
pub async fn stylesheet(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.stylesheet.to_string(),
    )
}

/// Get all searchable titles, sorted for display
pub async fn get_titles(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.sorted_titles())
}

/// Stateless lookup of a film and its recommendations
pub async fn get_film(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<FilmQuery>,
) -> AppResult<Json<FilmLookupResponse>> {
    let (film, recommended) = state.catalog.find_by_title(&params.title).ok_or_else(|| {
        tracing::debug!(request_id = %request_id, title = %params.title, "Film not found");
        AppError::NotFound(format!("No film titled {}", params.title))
    })?;

    let recommendations = recommendations::top_n(recommended, state.recommendation_limit)
        .iter()
        .map(|f| FilmView::new(f, &state.images))
        .collect();

    Ok(Json(FilmLookupResponse {
        film: FilmView::new(film, &state.images),
        recommendations,
    }))
}

/// Open a new session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionView::render(&session, &state)))
}

/// Get the current view of a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = state.sessions.get(id).await?;
    Ok(Json(SessionView::render(&session, &state)))
}

/// Close a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Search a new film in a session
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(request): Json<SearchRequest>,
) -> AppResult<Json<SessionView>> {
    tracing::info!(
        request_id = %request_id,
        session_id = %id,
        title = %request.title,
        "Processing search"
    );

    let policy = state.reset_policy;
    let session = state
        .sessions
        .update(id, |session| session.search(&request.title, policy))
        .await?;

    Ok(Json(SessionView::render(&session, &state)))
}

/// Show or hide the searched film's details
pub async fn toggle_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = state
        .sessions
        .update(id, |session| session.toggle_details())
        .await?;

    Ok(Json(SessionView::render(&session, &state)))
}

/// Open a recommended film's details
pub async fn pin_recommendation(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(request): Json<PinRequest>,
) -> AppResult<Json<SessionView>> {
    tracing::info!(
        request_id = %request_id,
        session_id = %id,
        title = %request.title,
        "Pinning recommendation"
    );

    let catalog = state.catalog.clone();
    let limit = state.recommendation_limit;
    let session = state
        .sessions
        .update(id, |session| session.pin(&catalog, limit, &request.title))
        .await?;

    Ok(Json(SessionView::render(&session, &state)))
}

/// Close the pinned recommendation
pub async fn close_pinned(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = state
        .sessions
        .update(id, |session| session.close_pinned())
        .await?;

    Ok(Json(SessionView::render(&session, &state)))
}
