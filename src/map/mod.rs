//! Карта концертов. Один компонент на три варианта страницы:
//! карта артиста, общая карта и список концертов (ближайшие сначала).
//!
//! Пины с готовыми координатами ставятся сразу, остальные геокодируются
//! через backend последовательно с паузами. Не найденные - пропускаются.

pub mod geocode;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::GeocodeConfig;
use crate::models::concert::parse_concert_date;
use crate::models::{Artist, Concert, Coordinates};
use crate::render;

pub use geocode::{GeocodeCache, Geocoder, Throttle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapVariant {
    Artist(i64),
    Global,
    ConcertsList,
}

impl MapVariant {
    pub fn parse(kind: &str, artist_id: Option<i64>) -> Option<Self> {
        match (kind, artist_id) {
            ("artist", Some(id)) => Some(MapVariant::Artist(id)),
            ("global", _) => Some(MapVariant::Global),
            ("concerts", _) => Some(MapVariant::ConcertsList),
            _ => None,
        }
    }

    /// Карта одного артиста геокодирует все, общие карты - не больше `max_lookups`.
    fn lookup_limit(self, max_lookups: usize) -> usize {
        match self {
            MapVariant::Artist(_) => usize::MAX,
            MapVariant::Global | MapVariant::ConcertsList => max_lookups,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcertStatus {
    Upcoming,
    Past,
}

impl ConcertStatus {
    pub fn of(dates: &[String], today: NaiveDate) -> Self {
        if next_date(dates, today).is_some() {
            ConcertStatus::Upcoming
        } else {
            ConcertStatus::Past
        }
    }
}

/// Ближайшая дата не раньше сегодняшней. Нераспознанные даты пропускаются.
pub fn next_date(dates: &[String], today: NaiveDate) -> Option<&str> {
    dates
        .iter()
        .filter_map(|raw| parse_concert_date(raw).map(|date| (date, raw.as_str())))
        .filter(|(date, _)| *date >= today)
        .min_by_key(|(date, _)| *date)
        .map(|(_, raw)| raw)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPin {
    pub artist_id: i64,
    pub artist_name: String,
    pub location: String,
    pub coordinates: Coordinates,
    pub dates: Vec<String>,
    pub status: ConcertStatus,
    pub popup: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapBuild {
    pub pins: Vec<MapPin>,
    /// Концерты, для которых координат не нашлось.
    pub missing: usize,
}

pub struct MapView<'a, G> {
    geocoder: &'a G,
    cache: &'a GeocodeCache,
    config: &'a GeocodeConfig,
}

impl<'a, G: Geocoder> MapView<'a, G> {
    pub fn new(geocoder: &'a G, cache: &'a GeocodeCache, config: &'a GeocodeConfig) -> Self {
        Self { geocoder, cache, config }
    }

    pub async fn build(&self, variant: MapVariant, artists: &[Artist], today: NaiveDate) -> MapBuild {
        let mut build = MapBuild::default();
        let mut pending: Vec<(&Artist, &Concert, &str)> = Vec::new();

        let scoped = artists.iter().filter(|artist| match variant {
            MapVariant::Artist(id) => artist.id == id,
            MapVariant::Global | MapVariant::ConcertsList => true,
        });

        for artist in scoped {
            for concert in &artist.concerts {
                if let Some(coordinates) = concert.valid_coordinates() {
                    build.pins.push(pin(artist, concert, coordinates, today));
                } else if let Some(query) = concert.geocode_query() {
                    pending.push((artist, concert, query));
                } else {
                    debug!("Concert of {} has no location, skipped", artist.name);
                    build.missing += 1;
                }
            }
        }

        let limit = variant.lookup_limit(self.config.max_lookups);
        let mut throttle = Throttle::new(self.config.batch_size, self.config.pause());
        let mut skipped = 0;
        for (artist, concert, query) in pending {
            // Лимит считает только реальные запросы, кеш бесплатен
            let resolved = match self.cache.get(query).await {
                Some(coordinates) => Some(coordinates),
                None if throttle.issued() >= limit => {
                    skipped += 1;
                    None
                }
                None => self.lookup(query, &mut throttle).await,
            };
            match resolved {
                Some(coordinates) => build.pins.push(pin(artist, concert, coordinates, today)),
                None => build.missing += 1,
            }
        }
        if skipped > 0 {
            debug!("Lookup limit reached, {} locations left without coordinates", skipped);
        }

        if variant == MapVariant::ConcertsList {
            build.pins.sort_by_key(|pin| pin.status != ConcertStatus::Upcoming);
        }

        info!(
            "Map {:?}: {} pins, {} without coordinates, {} geocoding requests",
            variant,
            build.pins.len(),
            build.missing,
            throttle.issued()
        );
        build
    }

    async fn lookup(&self, query: &str, throttle: &mut Throttle) -> Option<Coordinates> {
        throttle.acquire().await;
        match self.geocoder.geocode(query).await {
            Ok(Some(coordinates)) => {
                self.cache.insert(query, coordinates).await;
                Some(coordinates)
            }
            Ok(None) => {
                warn!("No coordinates found for {}", query);
                None
            }
            Err(err) => {
                warn!("Geocoding {} failed: {}", query, err);
                None
            }
        }
    }
}

fn pin(artist: &Artist, concert: &Concert, coordinates: Coordinates, today: NaiveDate) -> MapPin {
    let status = ConcertStatus::of(&concert.dates, today);
    MapPin {
        artist_id: artist.id,
        artist_name: artist.name.clone(),
        location: concert.label().to_string(),
        coordinates,
        dates: concert.dates.clone(),
        status,
        popup: render::map::popup(artist, concert, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_depends_on_any_future_date() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
        assert_eq!(
            ConcertStatus::of(&["01-01-2020".to_string(), "12-06-25".to_string()], today),
            ConcertStatus::Upcoming
        );
        assert_eq!(ConcertStatus::of(&["11-06-25".to_string()], today), ConcertStatus::Past);
        assert_eq!(ConcertStatus::of(&["n/a".to_string()], today), ConcertStatus::Past);
    }

    #[test]
    fn next_date_skips_past_and_unparsed() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
        let dates: Vec<String> = ["01-01-2020", "n/a", "20-06-25", "12-06-25"]
            .iter()
            .map(|d| d.to_string())
            .collect();
        assert_eq!(next_date(&dates, today), Some("12-06-25"));
        assert_eq!(next_date(&dates[..2], today), None);
    }

    #[test]
    fn variant_parsing() {
        assert_eq!(MapVariant::parse("artist", Some(3)), Some(MapVariant::Artist(3)));
        assert_eq!(MapVariant::parse("artist", None), None);
        assert_eq!(MapVariant::parse("global", None), Some(MapVariant::Global));
        assert_eq!(MapVariant::parse("concerts", Some(1)), Some(MapVariant::ConcertsList));
        assert_eq!(MapVariant::parse("world", None), None);
    }
}
