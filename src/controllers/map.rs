use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::respond;
use crate::error::AppError;
use crate::map::{MapBuild, MapVariant, MapView};
use crate::middleware::Session;
use crate::render;
use crate::{cart, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/map", get(map_page))
        .route("/map/pins", get(map_pins))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MapQuery {
    pub variant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl MapQuery {
    fn variant(&self) -> Result<MapVariant, AppError> {
        MapVariant::parse(&self.variant, self.id)
            .ok_or_else(|| AppError::BadRequest(format!("unknown map variant {}", self.variant)))
    }
}

async fn build(state: &AppState, variant: MapVariant) -> Result<MapBuild, AppError> {
    if let MapVariant::Artist(id) = variant {
        state.catalog.find(id).await.ok_or(AppError::NotFound)?;
    }
    let artists = state.catalog.all().await;
    let today = chrono::Local::now().date_naive();
    let view = MapView::new(&state.backend, &state.geocode_cache, &state.config.geocode);
    Ok(view.build(variant, &artists, today).await)
}

pub async fn map_pins(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MapQuery>,
) -> Result<Json<MapBuild>, AppError> {
    let variant = params.variant()?;
    Ok(Json(build(&state, variant).await?))
}

pub async fn map_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<MapQuery>,
) -> Result<Response, AppError> {
    let variant = params.variant()?;
    let pins_url = format!(
        "/map/pins?{}",
        serde_urlencoded::to_string(&params).map_err(|e| AppError::BadRequest(e.to_string()))?
    );
    let map = build(&state, variant).await?;
    let count = cart::count(&state.backend, &session).await;
    Ok(respond(&headers, "Carte", render::map::page_body(variant, &pins_url, &map), count))
}
