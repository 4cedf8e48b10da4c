use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use super::BookingModal;
use crate::models::ConcertSelection;

struct Entry {
    modal: BookingModal,
    touched: Instant,
}

/// Открытые модалки бронирования, по id модалки.
/// Ничего не персистится: запись живет пока модалка открыта или до истечения TTL.
#[derive(Clone)]
pub struct BookingStore {
    entries: Arc<RwLock<HashMap<Uuid, Entry>>>,
    ttl: Duration,
}

impl BookingStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn open(&self, selection: ConcertSelection) -> (Uuid, BookingModal) {
        let id = Uuid::new_v4();
        let modal = BookingModal::opened(selection);
        self.entries.write().await.insert(
            id,
            Entry { modal: modal.clone(), touched: Instant::now() },
        );
        (id, modal)
    }

    pub async fn get(&self, id: Uuid) -> Option<BookingModal> {
        self.entries.read().await.get(&id).map(|entry| entry.modal.clone())
    }

    /// Атомарно применяет переход к модалке (под write-локом) и возвращает снимок.
    pub async fn update<T, F>(&self, id: Uuid, f: F) -> Option<(T, BookingModal)>
    where
        F: FnOnce(&mut BookingModal) -> T,
    {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&id)?;
        let result = f(&mut entry.modal);
        entry.touched = Instant::now();
        let snapshot = entry.modal.clone();
        if !snapshot.is_open() {
            entries.remove(&id);
        }
        Some((result, snapshot))
    }

    pub async fn remove(&self, id: Uuid) -> Option<BookingModal> {
        self.entries.write().await.remove(&id).map(|entry| entry.modal)
    }

    /// Удаляет модалки, к которым давно не обращались.
    pub async fn sweep_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.touched.elapsed() < ttl);
        let removed = before - entries.len();
        if removed > 0 {
            info!("Dropped {} abandoned booking modals", removed);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingError, BookingState};
    use crate::models::SeatCategory;

    fn selection() -> ConcertSelection {
        ConcertSelection {
            artist_id: 2,
            artist_name: "Pink Floyd".to_string(),
            artist_image: String::new(),
            location: "Wembley".to_string(),
            city: None,
            country: None,
            date: "01-07-25".to_string(),
            all_dates: vec!["01-07-25".to_string()],
            time: "20:00".to_string(),
        }
    }

    #[tokio::test]
    async fn second_submit_sees_the_lock() {
        let store = BookingStore::new(Duration::from_secs(60));
        let (id, _) = store.open(selection()).await;
        store.update(id, |m| m.select_seat(SeatCategory::Vip)).await.unwrap().0.unwrap();

        let (first, _) = store.update(id, |m| m.begin_submit()).await.unwrap();
        let (second, _) = store.update(id, |m| m.begin_submit()).await.unwrap();
        assert!(first.is_ok());
        assert_eq!(second.unwrap_err(), BookingError::AlreadySubmitting);
    }

    #[tokio::test]
    async fn closing_removes_the_entry() {
        let store = BookingStore::new(Duration::from_secs(60));
        let (id, modal) = store.open(selection()).await;
        assert_eq!(modal.state(), BookingState::SeatUnselected);

        store.update(id, |m| m.close()).await.unwrap();
        assert!(store.get(id).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_drops_idle_modals() {
        let store = BookingStore::new(Duration::from_secs(30));
        let (stale, _) = store.open(selection()).await;
        tokio::time::advance(Duration::from_secs(20)).await;
        let (fresh, _) = store.open(selection()).await;
        tokio::time::advance(Duration::from_secs(15)).await;

        assert_eq!(store.sweep_expired().await, 1);
        assert!(store.get(stale).await.is_none());
        assert!(store.get(fresh).await.is_some());
    }
}
