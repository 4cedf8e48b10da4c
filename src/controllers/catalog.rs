use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::respond;
use crate::catalog::FilterForm;
use crate::error::AppError;
use crate::middleware::Session;
use crate::models::FavoriteAction;
use crate::render::{self, layout};
use crate::{cart, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/catalog/filter", get(filter_artists))
        .route("/catalog/suggestions", get(suggestions))
        .route("/favorites/{artist_id}", post(toggle_favorite))
        .route("/refresh", post(refresh))
}

/// Фильтрация проксируется в backend. Ошибка не роняет страницу: показываем сообщение.
pub async fn filter_artists(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Response {
    let form = FilterForm::from_query(raw.as_deref().unwrap_or_default());
    let grid = match state.backend.filter_artists(&session, &form).await {
        Ok(artists) => {
            info!("Filter returned {} artists", artists.len());
            render::catalog::grid(&artists, None)
        }
        Err(e) => {
            warn!("Filter request failed: {}", e);
            render::catalog::error_state()
        }
    };

    if layout::is_fragment_request(&headers) {
        return Html(grid).into_response();
    }
    let meta = state.catalog.meta().await;
    let body = format!("{}{}", render::catalog::filter_form(&meta, &form), grid);
    let count = cart::count(&state.backend, &session).await;
    respond(&headers, "Artistes", body, count)
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    #[serde(default)]
    pub q: String,
}

/// Автодополнение. Запрос, который перебит более новым в окне debounce, получает 204.
pub async fn suggestions(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(params): Query<SuggestionsQuery>,
) -> Response {
    if !state.debouncer.settle(session.key()).await {
        return StatusCode::NO_CONTENT.into_response();
    }
    let items = state.catalog.suggest(&params.q).await;
    Html(render::catalog::suggestions(&items)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct FavoriteForm {
    pub action: FavoriteAction,
}

pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Path(artist_id): Path<i64>,
    Form(form): Form<FavoriteForm>,
) -> Result<Response, AppError> {
    let _guard = state
        .in_flight
        .try_acquire(format!("favorite:{}:{}", session.key(), artist_id))
        .ok_or(AppError::Conflict)?;

    // Избранное хранит только backend: следующий рендер этой сессии перечитает его оттуда
    state.backend.set_favorite(&session, artist_id, form.action).await?;
    let is_favorite = form.action == FavoriteAction::Add;
    info!("Favorite {:?} for artist {}", form.action, artist_id);

    if layout::is_fragment_request(&headers) {
        return Ok(Html(render::catalog::favorite_button(artist_id, is_favorite)).into_response());
    }
    Ok(Redirect::to(&format!("/artist?id={artist_id}")).into_response())
}

pub async fn refresh(State(state): State<Arc<AppState>>, session: Session) -> Result<Response, AppError> {
    state.backend.refresh(&session).await?;
    let count = state.catalog.reload(&state.backend).await?;
    info!("Catalog refreshed: {} artists", count);
    Ok(Redirect::to("/").into_response())
}
