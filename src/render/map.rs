use super::artist::status_class;
use super::{booking, escape};
use chrono::NaiveDate;

use crate::map::{next_date, ConcertStatus, MapBuild, MapPin, MapVariant};
use crate::models::concert::format_concert_date;
use crate::models::{Artist, Concert, ConcertSelection};

const POPUP_DATES: usize = 3;

/// Содержимое попапа пина: артист, площадка, статус, даты и бронирование ближайшей даты.
pub fn popup(artist: &Artist, concert: &Concert, today: NaiveDate) -> String {
    let upcoming = next_date(&concert.dates, today);
    let status = if upcoming.is_some() { ConcertStatus::Upcoming } else { ConcertStatus::Past };
    let mut dates: String = concert
        .dates
        .iter()
        .take(POPUP_DATES)
        .map(|date| format!("<li>{}</li>", escape(&format_concert_date(date))))
        .collect();
    if concert.dates.len() > POPUP_DATES {
        dates.push_str(&format!("<li>+ {} autres dates</li>", concert.dates.len() - POPUP_DATES));
    }

    let action = upcoming
        .map(|date| booking::open_form(&ConcertSelection::for_date(artist, concert, date), "Réserver"))
        .unwrap_or_default();

    format!(
        r#"<div class="map-popup"><h4><a href="/artist?id={id}">{name}</a></h4><p class="map-popup-location">{location}</p><span class="map-popup-status {class}">{label}</span><ul>{dates}</ul>{action}</div>"#,
        id = artist.id,
        name = escape(&artist.name),
        location = escape(concert.label()),
        class = status_class(status),
        label = status_label(status),
    )
}

fn status_label(status: ConcertStatus) -> &'static str {
    match status {
        ConcertStatus::Upcoming => "À venir",
        ConcertStatus::Past => "Passé",
    }
}

/// Страница карты: контейнер для клиентской карты и список пинов.
pub fn page_body(variant: MapVariant, pins_url: &str, build: &MapBuild) -> String {
    let title = match variant {
        MapVariant::Artist(_) => "Concerts de l'artiste",
        MapVariant::Global => "Carte des concerts",
        MapVariant::ConcertsList => "Tous les concerts",
    };
    let items: String = build.pins.iter().map(list_item).collect();
    let missing = if build.missing > 0 {
        format!(
            r#"<p class="map-missing">{} lieu(x) sans coordonnées</p>"#,
            build.missing
        )
    } else {
        String::new()
    };

    format!(
        r#"<section class="map-page">
<h1>{title}</h1>
<div id="map" class="map" data-pins-url="{url}"></div>
{missing}
<ul class="concerts-list">{items}</ul>
</section>"#,
        url = escape(pins_url),
    )
}

fn list_item(pin: &MapPin) -> String {
    format!(
        r#"<li class="concerts-list-item {class}" data-lat="{lat}" data-lng="{lng}">{popup}</li>"#,
        class = status_class(pin.status),
        lat = pin.coordinates.lat,
        lng = pin.coordinates.lng,
        popup = pin.popup,
    )
}
