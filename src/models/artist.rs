use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const UNKNOWN_LOCATION: &str = "Lieu inconnu";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub creation_date: i32,
    #[serde(default)]
    pub first_album: String,
    #[serde(default)]
    pub first_album_year: i32,
    #[serde(default)]
    pub concerts: Vec<Concert>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concert {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub display_location: String,
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// Backend отдает `lat`/`lng`, старые записи - `latitude`/`longitude`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lng: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl Concert {
    pub fn label(&self) -> &str {
        if !self.display_location.is_empty() {
            &self.display_location
        } else if !self.location.is_empty() {
            &self.location
        } else {
            UNKNOWN_LOCATION
        }
    }

    /// Ключ для геокодинга: человекочитаемое название, иначе сырое.
    pub fn geocode_query(&self) -> Option<&str> {
        [self.display_location.as_str(), self.location.as_str()]
            .into_iter()
            .find(|value| !value.trim().is_empty())
    }

    pub fn valid_coordinates(&self) -> Option<Coordinates> {
        self.coordinates.filter(Coordinates::is_valid)
    }
}

impl Artist {
    pub fn unique_locations(&self) -> usize {
        self.concerts
            .iter()
            .map(|concert| {
                if concert.display_location.is_empty() {
                    "Lieu non renseigné"
                } else {
                    concert.display_location.as_str()
                }
            })
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn concerts_count(&self) -> usize {
        self.concerts.iter().map(|concert| concert.dates.len()).sum()
    }
}
