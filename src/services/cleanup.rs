use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::AppState;

/// Фоновая очистка брошенных модалок бронирования.
pub struct CleanupService {
    state: Arc<AppState>,
}

impl CleanupService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Один проход: удаляет модалки старше TTL. Возвращает сколько удалено.
    pub async fn run_once(&self) -> usize {
        let removed = self.state.bookings.sweep_expired().await;
        debug!(
            "Booking sweep done: {} removed, {} still open",
            removed,
            self.state.bookings.len().await
        );
        removed
    }

    /// Запускает бесконечный цикл очистки с интервалом из конфигурации.
    pub fn spawn(self) -> JoinHandle<()> {
        let interval = self.state.config.booking.sweep_interval();
        info!("Booking sweeper started, interval {:?}", interval);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                self.run_once().await;
            }
        })
    }
}
