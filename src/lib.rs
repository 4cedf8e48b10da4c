pub mod backend_client;
pub mod booking;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod controllers;
pub mod error;
pub mod map;
pub mod middleware;
pub mod models;
pub mod render;
pub mod services;

use axum::Router;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::ApiError;

// Shared state для всего приложения
pub struct AppState {
    pub config: config::Config,
    pub backend: backend_client::BackendClient,
    pub catalog: catalog::Catalog,
    pub bookings: booking::store::BookingStore,
    pub geocode_cache: map::GeocodeCache,
    pub debouncer: catalog::Debouncer,
    pub in_flight: services::inflight::InFlight,
}

impl AppState {
    /// Состояние с пустым каталогом. Сетевых запросов не делает.
    pub fn new(config: config::Config) -> Result<Arc<Self>, ApiError> {
        let backend = backend_client::BackendClient::from_config(&config.backend)?;
        let bookings = booking::store::BookingStore::new(config.booking.ttl());
        let debouncer = catalog::Debouncer::new(config.search.debounce());

        Ok(Arc::new(Self {
            config,
            backend,
            catalog: catalog::Catalog::new(Vec::new()),
            bookings,
            geocode_cache: map::GeocodeCache::default(),
            debouncer,
            in_flight: services::inflight::InFlight::default(),
        }))
    }

    /// Состояние плюс первичная загрузка каталога.
    /// Недоступный backend не мешает старту: каталог перечитывается через `/refresh`.
    pub async fn bootstrap(config: config::Config) -> Result<Arc<Self>, ApiError> {
        let state = Self::new(config)?;
        match state.catalog.reload(&state.backend).await {
            Ok(count) => info!("Catalog warmed up with {} artists", count),
            Err(e) => warn!("Catalog warmup failed, starting empty: {}", e),
        }
        Ok(state)
    }
}

/// Полный роутер приложения: страницы, фрагменты, статика.
pub fn app(state: Arc<AppState>) -> Router {
    let static_dir = ServeDir::new(&state.config.app.static_dir);
    Router::new()
        .merge(controllers::routes())
        .nest_service("/static", static_dir)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
