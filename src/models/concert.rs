use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::artist::{Artist, Concert};
use crate::models::seat::SeatCategory;

const MONTHS: [&str; 12] = [
    "Janvier", "Février", "Mars", "Avril", "Mai", "Juin",
    "Juillet", "Août", "Septembre", "Octobre", "Novembre", "Décembre",
];
const DAYS: [&str; 7] = ["Dimanche", "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi"];

pub const DEFAULT_TIME: &str = "20:00";

/// Контекст концерта, с которым открывается модалка бронирования.
/// Живет только пока модалка открыта.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcertSelection {
    pub artist_id: i64,
    pub artist_name: String,
    #[serde(default)]
    pub artist_image: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub date: String,
    #[serde(default)]
    pub all_dates: Vec<String>,
    #[serde(default = "default_time")]
    pub time: String,
}

fn default_time() -> String {
    DEFAULT_TIME.to_string()
}

/// `concertData` в теле `POST /api/cart/add`: выбор плюс поля для отображения в корзине.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcertData {
    #[serde(flatten)]
    pub selection: ConcertSelection,
    pub date_formatted: String,
    pub price: u32,
}

impl ConcertSelection {
    /// Выбор даты на странице артиста или в попапе карты.
    /// Город и страна берутся из `displayLocation` вида "Paris, France".
    pub fn for_date(artist: &Artist, concert: &Concert, date: &str) -> Self {
        let mut place = concert.display_location.splitn(2, ',').map(str::trim);
        let city = place.next().filter(|c| !c.is_empty()).map(str::to_string);
        let country = place.next().filter(|c| !c.is_empty()).map(str::to_string);
        ConcertSelection {
            artist_id: artist.id,
            artist_name: artist.name.clone(),
            artist_image: artist.image.clone(),
            location: concert.label().to_string(),
            city,
            country,
            date: date.to_string(),
            all_dates: concert.dates.clone(),
            time: DEFAULT_TIME.to_string(),
        }
    }

    pub fn date_formatted(&self) -> String {
        format_concert_date(&self.date)
    }

    /// "Paris, France", либо то что есть, либо название площадки.
    pub fn city_line(&self) -> String {
        let city = self.city.as_deref().filter(|c| !c.is_empty());
        let country = self.country.as_deref().filter(|c| !c.is_empty());
        match (city, country) {
            (Some(city), Some(country)) => format!("{city}, {country}"),
            (Some(one), None) | (None, Some(one)) => one.to_string(),
            (None, None) => self.location.clone(),
        }
    }

    /// Остальные даты площадки (не больше 5) и сколько еще не показано.
    pub fn other_dates(&self) -> (Vec<&str>, usize) {
        if self.all_dates.len() <= 1 {
            return (Vec::new(), 0);
        }
        let shown = self
            .all_dates
            .iter()
            .filter(|date| **date != self.date)
            .take(5)
            .map(String::as_str)
            .collect();
        let hidden = self.all_dates.len().saturating_sub(6);
        (shown, hidden)
    }

    pub fn to_concert_data(&self) -> ConcertData {
        ConcertData {
            selection: self.clone(),
            date_formatted: self.date_formatted(),
            price: SeatCategory::starting_price(),
        }
    }
}

/// Даты приходят как `DD-MM-YY` или `DD-MM-YYYY`, иногда с префиксом `*`.
pub fn parse_concert_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().trim_start_matches('*').split('-');
    let day: u32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let year: i32 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let full_year = if year < 100 { 2000 + year } else { year };
    NaiveDate::from_ymd_opt(full_year, month, day)
}

/// "Jeudi 12 Juin 2025". Непарсящиеся даты возвращаются как есть.
pub fn format_concert_date(raw: &str) -> String {
    match parse_concert_date(raw) {
        Some(date) => format!(
            "{} {} {} {}",
            DAYS[date.weekday().num_days_from_sunday() as usize],
            date.day(),
            MONTHS[date.month0() as usize],
            date.year()
        ),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stade_de_france() -> ConcertSelection {
        ConcertSelection {
            artist_id: 1,
            artist_name: "Queen".to_string(),
            artist_image: String::new(),
            location: "Stade de France".to_string(),
            city: None,
            country: None,
            date: "12-06-25".to_string(),
            all_dates: vec!["12-06-25".to_string(), "13-06-25".to_string()],
            time: DEFAULT_TIME.to_string(),
        }
    }

    #[test]
    fn formats_short_and_long_years() {
        assert_eq!(format_concert_date("12-06-25"), "Jeudi 12 Juin 2025");
        assert_eq!(format_concert_date("01-01-2020"), "Mercredi 1 Janvier 2020");
        assert_eq!(format_concert_date("*23-08-2019"), "Vendredi 23 Août 2019");
        assert_eq!(format_concert_date("bientôt"), "bientôt");
        assert_eq!(format_concert_date("31-02-2020"), "31-02-2020");
    }

    #[test]
    fn city_line_falls_back_to_venue() {
        let mut selection = stade_de_france();
        assert_eq!(selection.city_line(), "Stade de France");
        selection.city = Some("Saint-Denis".to_string());
        selection.country = Some("France".to_string());
        assert_eq!(selection.city_line(), "Saint-Denis, France");
    }

    #[test]
    fn other_dates_excludes_chosen_one() {
        let selection = stade_de_france();
        let (others, hidden) = selection.other_dates();
        assert_eq!(others, vec!["13-06-25"]);
        assert_eq!(hidden, 0);

        let mut many = stade_de_france();
        many.all_dates = (1..=9).map(|d| format!("0{d}-07-25")).collect();
        many.date = "01-07-25".to_string();
        let (others, hidden) = many.other_dates();
        assert_eq!(others.len(), 5);
        assert!(!others.contains(&"01-07-25"));
        assert_eq!(hidden, 3);
    }

    #[test]
    fn concert_data_is_flattened() {
        let value = serde_json::to_value(stade_de_france().to_concert_data()).unwrap();
        assert_eq!(value["artistName"], "Queen");
        assert_eq!(value["dateFormatted"], "Jeudi 12 Juin 2025");
        assert_eq!(value["price"], 45);
        assert_eq!(value["time"], "20:00");
        assert!(value.get("city").is_none());
    }

    #[test]
    fn selection_for_date_splits_display_location() {
        let artist = Artist {
            id: 4,
            name: "Queen".to_string(),
            image: "/img/queen.jpg".to_string(),
            members: Vec::new(),
            creation_date: 1970,
            first_album: "13-07-1973".to_string(),
            first_album_year: 1973,
            concerts: Vec::new(),
            tags: Vec::new(),
            is_favorite: false,
        };
        let concert = Concert {
            location: "paris-france".to_string(),
            display_location: "Paris, France".to_string(),
            dates: vec!["12-06-25".to_string(), "13-06-25".to_string()],
            coordinates: None,
        };
        let selection = ConcertSelection::for_date(&artist, &concert, "13-06-25");
        assert_eq!(selection.city.as_deref(), Some("Paris"));
        assert_eq!(selection.country.as_deref(), Some("France"));
        assert_eq!(selection.location, "Paris, France");
        assert_eq!(selection.all_dates.len(), 2);
        assert_eq!(selection.time, DEFAULT_TIME);
    }
}
