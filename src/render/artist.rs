use chrono::NaiveDate;

use super::{booking, catalog, escape};
use crate::map::ConcertStatus;
use crate::models::concert::format_concert_date;
use crate::models::{Artist, ConcertSelection};

/// Страница артиста: шапка, участники, концерты с кнопкой бронирования на каждую дату.
pub fn page_body(artist: &Artist, today: NaiveDate) -> String {
    let members: String = artist
        .members
        .iter()
        .map(|member| format!("<li>{}</li>", escape(member)))
        .collect();

    let concerts: String = if artist.concerts.is_empty() {
        r#"<p class="concerts-empty">Aucun concert annoncé pour le moment.</p>"#.to_string()
    } else {
        artist
            .concerts
            .iter()
            .map(|concert| {
                let status = ConcertStatus::of(&concert.dates, today);
                let dates: String = concert
                    .dates
                    .iter()
                    .map(|date| {
                        let selection = ConcertSelection::for_date(artist, concert, date);
                        format!(
                            r#"<li class="concert-date"><span>{}</span>{}</li>"#,
                            escape(&format_concert_date(date)),
                            booking::open_form(&selection, "Réserver")
                        )
                    })
                    .collect();
                format!(
                    r#"<div class="concert-venue {status}"><h4><i class="fas fa-map-marker-alt"></i> {label}</h4><ul>{dates}</ul></div>"#,
                    status = status_class(status),
                    label = escape(concert.label()),
                )
            })
            .collect()
    };

    format!(
        r#"<section class="artist-detail" data-artist-id="{id}">
<div class="artist-hero">
<img src="{image}" alt="{name}">
<div>
<h1>{name}</h1>
<p>Créé en {creation} • 1er album {album}</p>
{favorite}
<a class="btn btn-outline" href="/map?variant=artist&amp;id={id}"><i class="fas fa-map"></i> Voir sur la carte</a>
</div>
</div>
<div class="artist-members"><h2>Membres</h2><ul>{members}</ul></div>
<div class="artist-concerts"><h2>Concerts</h2>{concerts}</div>
</section>"#,
        id = artist.id,
        image = escape(&artist.image),
        name = escape(&artist.name),
        creation = artist.creation_date,
        album = escape(&artist.first_album),
        favorite = catalog::favorite_button(artist.id, artist.is_favorite),
    )
}

pub(crate) fn status_class(status: ConcertStatus) -> &'static str {
    match status {
        ConcertStatus::Upcoming => "is-upcoming",
        ConcertStatus::Past => "is-past",
    }
}
