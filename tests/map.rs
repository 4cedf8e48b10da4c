use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

use concert_front::config::GeocodeConfig;
use concert_front::error::ApiError;
use concert_front::map::{ConcertStatus, GeocodeCache, Geocoder, MapVariant, MapView};
use concert_front::models::{Artist, Concert, Coordinates};

/// Геокодер в памяти: считает обращения, неизвестные места - `None`.
#[derive(Default)]
struct FakeGeocoder {
    known: HashMap<String, Coordinates>,
    calls: AtomicUsize,
}

impl FakeGeocoder {
    fn with(places: &[(&str, f64, f64)]) -> Self {
        Self {
            known: places
                .iter()
                .map(|(name, lat, lng)| (name.to_string(), Coordinates { lat: *lat, lng: *lng }))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for FakeGeocoder {
    async fn geocode(&self, location: &str) -> Result<Option<Coordinates>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if location == "Broken" {
            return Err(ApiError::Status(500));
        }
        Ok(self.known.get(location).copied())
    }
}

fn concert(place: &str, dates: &[&str], coordinates: Option<Coordinates>) -> Concert {
    Concert {
        location: place.to_lowercase(),
        display_location: place.to_string(),
        dates: dates.iter().map(|d| d.to_string()).collect(),
        coordinates,
    }
}

fn artist(id: i64, name: &str, concerts: Vec<Concert>) -> Artist {
    Artist {
        id,
        name: name.to_string(),
        image: String::new(),
        members: Vec::new(),
        creation_date: 1980,
        first_album: "01-01-1985".to_string(),
        first_album_year: 1985,
        concerts,
        tags: Vec::new(),
        is_favorite: false,
    }
}

fn config(max_lookups: usize) -> GeocodeConfig {
    GeocodeConfig { batch_size: 3, pause_ms: 1200, max_lookups }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

#[tokio::test(start_paused = true)]
async fn global_map_geocodes_with_pauses_and_skips_misses() {
    let geocoder = FakeGeocoder::with(&[
        ("Paris, France", 48.85, 2.35),
        ("Lyon, France", 45.76, 4.83),
        ("Lille, France", 50.63, 3.06),
        ("Nantes, France", 47.21, -1.55),
    ]);
    let artists = vec![
        artist(
            1,
            "Queen",
            vec![
                concert("Paris, France", &["12-06-25"], None),
                concert("Lyon, France", &["01-01-2020"], None),
                concert("Wembley", &["13-07-1985"], Some(Coordinates { lat: 51.55, lng: -0.28 })),
            ],
        ),
        artist(
            2,
            "ABBA",
            vec![
                concert("Atlantis", &["01-07-25"], None),
                concert("Lille, France", &["02-07-25"], None),
                concert("Broken", &["03-07-25"], None),
                concert("Nantes, France", &["04-07-25"], None),
            ],
        ),
    ];
    let cache = GeocodeCache::default();
    let config = config(50);

    let started = Instant::now();
    let build = MapView::new(&geocoder, &cache, &config)
        .build(MapVariant::Global, &artists, today())
        .await;

    // 6 запросов: одна пауза перед 4-м
    assert_eq!(geocoder.calls(), 6);
    assert!(started.elapsed() >= Duration::from_millis(1200));
    assert_eq!(build.pins.len(), 5);
    assert_eq!(build.missing, 2);
    assert_eq!(cache.len().await, 4);

    let wembley = build.pins.iter().find(|pin| pin.location == "Wembley").unwrap();
    assert_eq!(wembley.status, ConcertStatus::Past);
    assert!(!wembley.popup.contains("/booking"));
}

#[tokio::test(start_paused = true)]
async fn lookup_limit_counts_the_rest_as_missing() {
    let geocoder = FakeGeocoder::with(&[("A", 1.0, 1.0), ("B", 2.0, 2.0), ("C", 3.0, 3.0)]);
    let artists = vec![artist(
        1,
        "Queen",
        vec![
            concert("A", &["01-07-25"], None),
            concert("B", &["01-07-25"], None),
            concert("C", &["01-07-25"], None),
        ],
    )];
    let cache = GeocodeCache::default();
    let config = config(2);

    let build = MapView::new(&geocoder, &cache, &config)
        .build(MapVariant::ConcertsList, &artists, today())
        .await;
    assert_eq!(geocoder.calls(), 2);
    assert_eq!(build.pins.len(), 2);
    assert_eq!(build.missing, 1);

    // Карта артиста не ограничена и берет найденное из кеша
    let build = MapView::new(&geocoder, &cache, &config)
        .build(MapVariant::Artist(1), &artists, today())
        .await;
    assert_eq!(geocoder.calls(), 3);
    assert_eq!(build.pins.len(), 3);
    assert_eq!(build.missing, 0);
}

#[tokio::test(start_paused = true)]
async fn cached_locations_do_not_count_against_the_limit() {
    let geocoder = FakeGeocoder::with(&[("A", 1.0, 1.0), ("B", 2.0, 2.0), ("C", 3.0, 3.0), ("D", 4.0, 4.0)]);
    let mut artists = vec![artist(
        1,
        "Queen",
        vec![
            concert("A", &["01-07-25"], None),
            concert("B", &["01-07-25"], None),
            concert("C", &["01-07-25"], None),
        ],
    )];
    let cache = GeocodeCache::default();
    let config = config(2);

    MapView::new(&geocoder, &cache, &config)
        .build(MapVariant::Artist(1), &artists, today())
        .await;
    assert_eq!(geocoder.calls(), 3);

    let build = MapView::new(&geocoder, &cache, &config)
        .build(MapVariant::Global, &artists, today())
        .await;
    assert_eq!(geocoder.calls(), 3);
    assert_eq!(build.pins.len(), 3);
    assert_eq!(build.missing, 0);

    // Новая площадка после теплых: лимит еще не израсходован
    artists.push(artist(2, "ABBA", vec![concert("D", &["02-07-25"], None)]));
    let build = MapView::new(&geocoder, &cache, &config)
        .build(MapVariant::ConcertsList, &artists, today())
        .await;
    assert_eq!(geocoder.calls(), 4);
    assert_eq!(build.pins.len(), 4);
    assert_eq!(build.missing, 0);
}

#[tokio::test(start_paused = true)]
async fn concerts_list_puts_upcoming_first() {
    let geocoder = FakeGeocoder::default();
    let artists = vec![artist(
        1,
        "Queen",
        vec![
            concert("Old", &["01-01-2019"], Some(Coordinates { lat: 1.0, lng: 1.0 })),
            concert("New", &["01-01-2026"], Some(Coordinates { lat: 2.0, lng: 2.0 })),
        ],
    )];
    let cache = GeocodeCache::default();
    let config = config(50);

    let build = MapView::new(&geocoder, &cache, &config)
        .build(MapVariant::ConcertsList, &artists, today())
        .await;
    assert_eq!(geocoder.calls(), 0);
    assert_eq!(build.pins[0].location, "New");
    assert_eq!(build.pins[0].status, ConcertStatus::Upcoming);
    assert_eq!(build.pins[1].status, ConcertStatus::Past);
}
