use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use super::respond;
use crate::catalog::{FilterForm, Highlight};
use crate::error::AppError;
use crate::middleware::Session;
use crate::render;
use crate::{cart, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/artist", get(artist_page))
        .route("/health", get(|| async { "OK" }))
}

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub highlight: Option<i64>,
}

/// Каталог целиком. Пустой каталог (backend был недоступен при старте) перечитывается.
pub async fn home(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<HomeQuery>,
) -> Response {
    let mut failed = false;
    if state.catalog.is_empty().await {
        if let Err(e) = state.catalog.reload(&state.backend).await {
            warn!("Catalog reload failed: {}", e);
            failed = true;
        }
    }

    let (artists, count) = futures::join!(
        state.catalog.for_session(&state.backend, &session),
        cart::count(&state.backend, &session)
    );
    let meta = state.catalog.meta().await;
    let highlight = params
        .highlight
        .map(|artist_id| Highlight::new(artist_id, state.config.search.highlight()));
    let grid = if failed {
        render::catalog::error_state()
    } else {
        render::catalog::grid(&artists, highlight.as_ref())
    };

    let body = format!(
        r#"<section class="catalog" data-highlight-ms="{ms}">
{search}
{filters}
<form class="refresh-form" method="post" action="/refresh"><button type="submit" class="btn btn-outline"><i class="fas fa-sync"></i> Actualiser</button></form>
{grid}
</section>"#,
        ms = state.config.search.highlight_ms,
        search = render::catalog::search_box(""),
        filters = render::catalog::filter_form(&meta, &FilterForm::default()),
    );
    respond(&headers, "Artistes", body, count)
}

#[derive(Debug, Deserialize)]
pub struct ArtistQuery {
    pub id: i64,
}

pub async fn artist_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ArtistQuery>,
) -> Result<Response, AppError> {
    let (artists, count) = futures::join!(
        state.catalog.for_session(&state.backend, &session),
        cart::count(&state.backend, &session)
    );
    let artist = artists
        .into_iter()
        .find(|artist| artist.id == params.id)
        .ok_or(AppError::NotFound)?;
    let today = chrono::Local::now().date_naive();
    let body = render::artist::page_body(&artist, today);
    Ok(respond(&headers, &artist.name, body, count))
}
