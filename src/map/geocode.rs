use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::backend_client::BackendClient;
use crate::error::ApiError;
use crate::models::Coordinates;

/// Источник координат для пинов без координат.
pub trait Geocoder {
    fn geocode(&self, location: &str) -> impl Future<Output = Result<Option<Coordinates>, ApiError>> + Send;
}

impl Geocoder for BackendClient {
    async fn geocode(&self, location: &str) -> Result<Option<Coordinates>, ApiError> {
        self.lookup_coordinates(location).await
    }
}

/// Кеш найденных координат по названию площадки (без учета регистра).
/// Отрицательные ответы не кешируются.
#[derive(Clone, Default)]
pub struct GeocodeCache {
    entries: Arc<RwLock<HashMap<String, Coordinates>>>,
}

impl GeocodeCache {
    pub async fn get(&self, location: &str) -> Option<Coordinates> {
        self.entries.read().await.get(&location.to_lowercase()).copied()
    }

    pub async fn insert(&self, location: &str, coordinates: Coordinates) {
        self.entries
            .write()
            .await
            .insert(location.to_lowercase(), coordinates);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Фиксированная пауза после каждой пачки запросов. Не адаптивная.
#[derive(Debug)]
pub struct Throttle {
    batch_size: usize,
    pause: Duration,
    issued: usize,
}

impl Throttle {
    pub fn new(batch_size: usize, pause: Duration) -> Self {
        Self { batch_size, pause, issued: 0 }
    }

    /// Вызывается перед каждым сетевым запросом.
    pub async fn acquire(&mut self) {
        if self.batch_size > 0 && self.issued > 0 && self.issued % self.batch_size == 0 {
            debug!("Geocoding pause after {} requests", self.issued);
            tokio::time::sleep(self.pause).await;
        }
        self.issued += 1;
    }

    pub fn issued(&self) -> usize {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn pauses_after_every_batch() {
        let mut throttle = Throttle::new(3, Duration::from_millis(1200));
        let started = Instant::now();
        for _ in 0..7 {
            throttle.acquire().await;
        }
        // паузы перед 4-м и 7-м запросом
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(2400), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(3600), "{elapsed:?}");
        assert_eq!(throttle.issued(), 7);
    }

    #[tokio::test]
    async fn cache_is_case_insensitive() {
        let cache = GeocodeCache::default();
        cache.insert("Paris, France", Coordinates { lat: 48.85, lng: 2.35 }).await;
        assert_eq!(cache.get("PARIS, france").await, Some(Coordinates { lat: 48.85, lng: 2.35 }));
        assert_eq!(cache.len().await, 1);
    }
}
