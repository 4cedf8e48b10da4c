use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use crate::models::Artist;

pub const MAX_SUGGESTIONS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SuggestionKind {
    Artist,
    Member,
    Creation,
    Location,
}

impl SuggestionKind {
    pub fn label(self) -> &'static str {
        match self {
            SuggestionKind::Artist => "Artiste",
            SuggestionKind::Member => "Membre",
            SuggestionKind::Creation => "Création",
            SuggestionKind::Location => "Lieu",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub label: String,
    pub kind: SuggestionKind,
    pub meta: String,
    pub artist_id: i64,
}

/// Подсказки автодополнения: подстрока без учета регистра по имени артиста,
/// участникам, году создания и площадкам. Порядок - по артистам каталога,
/// внутри артиста: имя, участники, год, площадки. Не больше [`MAX_SUGGESTIONS`].
pub fn suggest(artists: &[Artist], query: &str) -> Vec<Suggestion> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for artist in artists {
        if artist.name.to_lowercase().contains(&needle) {
            matches.push(Suggestion {
                label: artist.name.clone(),
                kind: SuggestionKind::Artist,
                meta: format!("Créé en {} • 1er album {}", artist.creation_date, artist.first_album),
                artist_id: artist.id,
            });
        }

        for member in &artist.members {
            if member.to_lowercase().contains(&needle) {
                matches.push(Suggestion {
                    label: member.clone(),
                    kind: SuggestionKind::Member,
                    meta: format!("Appartient à {}", artist.name),
                    artist_id: artist.id,
                });
            }
        }

        if artist.creation_date.to_string().contains(&needle) {
            matches.push(Suggestion {
                label: artist.name.clone(),
                kind: SuggestionKind::Creation,
                meta: format!("Fondé en {}", artist.creation_date),
                artist_id: artist.id,
            });
        }

        for concert in &artist.concerts {
            if concert.display_location.is_empty() {
                continue;
            }
            if concert.display_location.to_lowercase().contains(&needle) {
                let first_date = concert
                    .dates
                    .first()
                    .map(String::as_str)
                    .unwrap_or("Dates non précisées");
                matches.push(Suggestion {
                    label: concert.display_location.clone(),
                    kind: SuggestionKind::Location,
                    meta: format!("{} • {}", artist.name, first_date),
                    artist_id: artist.id,
                });
            }
        }

        if matches.len() >= MAX_SUGGESTIONS {
            break;
        }
    }

    matches.truncate(MAX_SUGGESTIONS);
    matches
}

/// Debounce по ключу сессии: из серии быстрых запросов ответ получает только последний.
#[derive(Clone)]
pub struct Debouncer {
    delay: Duration,
    generations: Arc<Mutex<HashMap<String, u64>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Ждет окно debounce. `true`, если за это время по ключу не пришло более нового вызова.
    pub async fn settle(&self, key: &str) -> bool {
        let ticket = self.bump(key);
        tokio::time::sleep(self.delay).await;

        let mut generations = self.generations.lock().unwrap_or_else(|e| e.into_inner());
        let latest = generations.get(key).copied() == Some(ticket);
        if latest {
            generations.remove(key);
        }
        latest
    }

    fn bump(&self, key: &str) -> u64 {
        let mut generations = self.generations.lock().unwrap_or_else(|e| e.into_inner());
        let generation = generations.entry(key.to_string()).or_insert(0);
        *generation += 1;
        *generation
    }
}

/// Подсветка карточки после выбора подсказки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub artist_id: i64,
    pub duration: Duration,
    until: Instant,
}

impl Highlight {
    pub fn new(artist_id: i64, duration: Duration) -> Self {
        Self { artist_id, duration, until: Instant::now() + duration }
    }

    pub fn is_active(&self) -> bool {
        Instant::now() < self.until
    }

    pub fn applies_to(&self, artist_id: i64) -> bool {
        self.artist_id == artist_id && self.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Concert;

    fn artist(id: i64, name: &str, members: &[&str], creation: i32, venues: &[&str]) -> Artist {
        Artist {
            id,
            name: name.to_string(),
            image: String::new(),
            members: members.iter().map(|m| m.to_string()).collect(),
            creation_date: creation,
            first_album: "14-12-1973".to_string(),
            first_album_year: 1973,
            concerts: venues
                .iter()
                .map(|venue| Concert {
                    location: String::new(),
                    display_location: venue.to_string(),
                    dates: vec!["12-06-25".to_string()],
                    coordinates: None,
                })
                .collect(),
            tags: vec![],
            is_favorite: false,
        }
    }

    #[test]
    fn matches_every_field_case_insensitively() {
        let artists = vec![
            artist(1, "Queen", &["Freddie Mercury", "Brian May"], 1970, &["London, UK"]),
            artist(2, "Mayhem", &["Necrobutcher"], 1984, &["Oslo, Norway"]),
        ];
        let found = suggest(&artists, "  MAY ");
        let kinds: Vec<(SuggestionKind, &str)> =
            found.iter().map(|s| (s.kind, s.label.as_str())).collect();
        assert_eq!(
            kinds,
            vec![(SuggestionKind::Member, "Brian May"), (SuggestionKind::Artist, "Mayhem")]
        );
        assert_eq!(found[0].meta, "Appartient à Queen");
    }

    #[test]
    fn year_and_location_matches_carry_meta() {
        let artists = vec![artist(1, "Queen", &[], 1970, &["London, UK"])];
        let by_year = suggest(&artists, "197");
        assert_eq!(by_year[0].kind, SuggestionKind::Creation);
        assert_eq!(by_year[0].meta, "Fondé en 1970");

        let by_place = suggest(&artists, "lond");
        assert_eq!(by_place[0].kind, SuggestionKind::Location);
        assert_eq!(by_place[0].meta, "Queen • 12-06-25");
    }

    #[test]
    fn never_more_than_six() {
        let artists: Vec<Artist> = (0..10)
            .map(|i| artist(i, &format!("The Band {i}"), &["band member"], 1990, &["Band City"]))
            .collect();
        assert_eq!(suggest(&artists, "band").len(), MAX_SUGGESTIONS);
        assert!(suggest(&artists, "   ").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn debouncer_lets_only_the_last_call_through() {
        let debouncer = Debouncer::new(Duration::from_millis(150));
        let first = {
            let debouncer = debouncer.clone();
            tokio::spawn(async move { debouncer.settle("session=a").await })
        };
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(50)).await;
        let second = debouncer.settle("session=a");
        let other_session = debouncer.settle("session=b");

        let (second, other_session) = tokio::join!(second, other_session);
        assert!(!first.await.unwrap());
        assert!(second);
        assert!(other_session);
    }

    #[tokio::test(start_paused = true)]
    async fn highlight_expires() {
        let highlight = Highlight::new(3, Duration::from_millis(2500));
        assert!(highlight.applies_to(3));
        assert!(!highlight.applies_to(4));
        tokio::time::advance(Duration::from_millis(2600)).await;
        assert!(!highlight.is_active());
    }
}
