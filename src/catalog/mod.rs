pub mod search;

use std::collections::BTreeSet;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::backend_client::BackendClient;
use crate::error::ApiError;
use crate::middleware::Session;
use crate::models::Artist;

pub use search::{Debouncer, Highlight, Suggestion, SuggestionKind, MAX_SUGGESTIONS};

/// Полный список артистов. Поиск всегда идет по нему, а не по отфильтрованной выдаче.
/// Список общий для всех сессий, поэтому `is_favorite` в нем всегда сброшен.
pub struct Catalog {
    artists: RwLock<Vec<Artist>>,
}

impl Catalog {
    pub fn new(artists: Vec<Artist>) -> Self {
        Self { artists: RwLock::new(shared(artists)) }
    }

    pub async fn all(&self) -> Vec<Artist> {
        self.artists.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.artists.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.artists.read().await.is_empty()
    }

    pub async fn find(&self, id: i64) -> Option<Artist> {
        self.artists.read().await.iter().find(|artist| artist.id == id).cloned()
    }

    pub async fn replace(&self, artists: Vec<Artist>) {
        *self.artists.write().await = shared(artists);
    }

    pub async fn meta(&self) -> FilterMeta {
        FilterMeta::build(&self.artists.read().await)
    }

    pub async fn suggest(&self, query: &str) -> Vec<Suggestion> {
        search::suggest(&self.artists.read().await, query)
    }

    /// Каталог глазами пользователя: избранное знает только backend, по cookie сессии.
    /// Избранные идут первыми. Без сессии или при ошибке backend - общий список.
    pub async fn for_session(&self, client: &BackendClient, session: &Session) -> Vec<Artist> {
        if session.cookie().is_none() {
            return self.all().await;
        }
        match client.filter_artists(session, &FilterForm::default()).await {
            Ok(artists) => favorites_first(sorted(artists)),
            Err(e) => {
                warn!("Personal catalog request failed, using shared list: {}", e);
                self.all().await
            }
        }
    }

    /// Перечитывает весь каталог из backend.
    pub async fn reload(&self, client: &BackendClient) -> Result<usize, ApiError> {
        let artists = client
            .filter_artists(&Session::anonymous(), &FilterForm::default())
            .await?;
        let count = artists.len();
        self.replace(artists).await;
        info!("Catalog loaded: {} artists", count);
        Ok(count)
    }
}

fn sorted(mut artists: Vec<Artist>) -> Vec<Artist> {
    artists.sort_by_key(|artist| artist.name.to_lowercase());
    artists
}

fn shared(artists: Vec<Artist>) -> Vec<Artist> {
    sorted(artists)
        .into_iter()
        .map(|artist| Artist { is_favorite: false, ..artist })
        .collect()
}

/// Стабильная сортировка: внутри групп порядок по имени сохраняется.
fn favorites_first(mut artists: Vec<Artist>) -> Vec<Artist> {
    artists.sort_by_key(|artist| !artist.is_favorite);
    artists
}

/// Поля формы фильтров. Пустые и нечисловые значения игнорируются.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub creation_min: Option<i32>,
    pub creation_max: Option<i32>,
    pub album_min: Option<i32>,
    pub album_max: Option<i32>,
    pub members_min: Option<i32>,
    pub members_max: Option<i32>,
    pub locations: Vec<String>,
}

impl FilterForm {
    /// Из сырых пар query-string (`location` может повторяться).
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = FilterForm::default();
        for (key, value) in pairs {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let number = || value.parse::<i32>().ok();
            match key.as_str() {
                "creationMin" => form.creation_min = number(),
                "creationMax" => form.creation_max = number(),
                "albumMin" => form.album_min = number(),
                "albumMax" => form.album_max = number(),
                "membersMin" => form.members_min = number(),
                "membersMax" => form.members_max = number(),
                "location" => form.locations.push(value.to_string()),
                _ => {}
            }
        }
        form
    }

    pub fn from_query(raw: &str) -> Self {
        Self::from_pairs(serde_urlencoded::from_str(raw).unwrap_or_default())
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let numbers = [
            ("creationMin", self.creation_min),
            ("creationMax", self.creation_max),
            ("albumMin", self.album_min),
            ("albumMax", self.album_max),
            ("membersMin", self.members_min),
            ("membersMax", self.members_max),
        ];
        numbers
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v.to_string())))
            .chain(self.locations.iter().map(|loc| ("location", loc.clone())))
            .collect()
    }

    pub fn to_query(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self.to_pairs())
    }

    pub fn is_empty(&self) -> bool {
        self.to_pairs().is_empty()
    }
}

/// Границы для формы фильтров, считаются по полному каталогу.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterMeta {
    pub creation_min: i32,
    pub creation_max: i32,
    pub album_min: i32,
    pub album_max: i32,
    pub members_min: i32,
    pub members_max: i32,
    pub locations: Vec<String>,
}

impl FilterMeta {
    pub fn build(artists: &[Artist]) -> Self {
        if artists.is_empty() {
            return FilterMeta::default();
        }

        let bounds = |values: Vec<i32>| {
            let min = values.iter().copied().min().unwrap_or(0);
            let max = values.iter().copied().max().unwrap_or(0);
            (min, max)
        };
        let (creation_min, creation_max) = bounds(artists.iter().map(|a| a.creation_date).collect());
        let (album_min, album_max) = bounds(artists.iter().map(|a| a.first_album_year).collect());
        let (members_min, members_max) =
            bounds(artists.iter().map(|a| a.members.len() as i32).collect());

        let locations: BTreeSet<String> = artists
            .iter()
            .flat_map(|artist| artist.concerts.iter())
            .map(|concert| concert.display_location.clone())
            .filter(|location| !location.is_empty())
            .collect();

        FilterMeta {
            creation_min,
            creation_max,
            album_min,
            album_max,
            members_min,
            members_max,
            locations: locations.into_iter().collect(),
        }
    }
}
