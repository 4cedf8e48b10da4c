use super::{escape, hidden};
use crate::catalog::{FilterForm, FilterMeta, Highlight, Suggestion};
use crate::models::Artist;

pub const EMPTY_MESSAGE: &str = "Aucun artiste ne correspond à ces critères.";
pub const ERROR_MESSAGE: &str = "Une erreur est survenue.";

/// "12 artistes visibles"
pub fn total_label(count: usize) -> String {
    if count > 1 {
        format!("{count} artistes visibles")
    } else {
        format!("{count} artiste visible")
    }
}

/// Сетка карточек после фильтрации. Пустой результат - отдельное сообщение.
pub fn grid(artists: &[Artist], highlight: Option<&Highlight>) -> String {
    let total = format!(r#"<p id="artists-total" class="artists-total">{}</p>"#, total_label(artists.len()));
    if artists.is_empty() {
        return format!(
            r#"{total}<div id="artists-grid" class="artists-grid"><p class="artists-empty">{EMPTY_MESSAGE}</p></div>"#
        );
    }
    let cards: String = artists
        .iter()
        .map(|artist| card(artist, highlight.is_some_and(|h| h.applies_to(artist.id))))
        .collect();
    format!(r#"{total}<div id="artists-grid" class="artists-grid">{cards}</div>"#)
}

pub fn error_state() -> String {
    format!(
        r#"<div id="artists-grid" class="artists-grid"><p class="artists-error">{ERROR_MESSAGE}</p></div>"#
    )
}

pub fn card(artist: &Artist, highlighted: bool) -> String {
    let tags: String = artist
        .tags
        .iter()
        .map(|tag| format!(r#"<span class="tag">{}</span>"#, escape(tag)))
        .collect();
    format!(
        r#"<article class="artist-card{class}" id="artist-{id}" data-artist-id="{id}">
<a href="/artist?id={id}" class="artist-card-link">
<img src="{image}" alt="{name}" loading="lazy">
<h3>{name}</h3>
</a>
<ul class="artist-card-meta">
<li><i class="fas fa-calendar"></i> Créé en {creation}</li>
<li><i class="fas fa-compact-disc"></i> 1er album {album}</li>
<li><i class="fas fa-users"></i> {members} membre(s)</li>
<li><i class="fas fa-map-marker-alt"></i> {concerts} concert(s), {locations} lieu(x)</li>
</ul>
<div class="artist-card-tags">{tags}</div>
{favorite}
</article>"#,
        class = if highlighted { " is-highlighted" } else { "" },
        id = artist.id,
        image = escape(&artist.image),
        name = escape(&artist.name),
        creation = artist.creation_date,
        album = escape(&artist.first_album),
        members = artist.members.len(),
        concerts = artist.concerts_count(),
        locations = artist.unique_locations(),
        favorite = favorite_button(artist.id, artist.is_favorite),
    )
}

/// Кнопка избранного. Отправляет противоположное текущему состоянию действие.
pub fn favorite_button(artist_id: i64, is_favorite: bool) -> String {
    let (action, class, label) = if is_favorite {
        ("remove", "fas fa-heart", "Retirer des favoris")
    } else {
        ("add", "far fa-heart", "Ajouter aux favoris")
    };
    format!(
        r#"<form class="favorite-form" method="post" action="/favorites/{artist_id}">{field}<button type="submit" class="favorite-btn{active}" aria-label="{label}"><i class="{class}"></i></button></form>"#,
        field = hidden("action", action),
        active = if is_favorite { " is-active" } else { "" },
    )
}

/// Форма фильтров с границами по полному каталогу и текущими значениями.
pub fn filter_form(meta: &FilterMeta, form: &FilterForm) -> String {
    let range = |label: &str, min_name: &str, max_name: &str, bounds: (i32, i32), current: (Option<i32>, Option<i32>)| {
        format!(
            r#"<fieldset class="filter-range"><legend>{label}</legend>
<input type="number" name="{min_name}" min="{lo}" max="{hi}" placeholder="{lo}" value="{min}">
<input type="number" name="{max_name}" min="{lo}" max="{hi}" placeholder="{hi}" value="{max}">
</fieldset>"#,
            lo = bounds.0,
            hi = bounds.1,
            min = current.0.map(|v| v.to_string()).unwrap_or_default(),
            max = current.1.map(|v| v.to_string()).unwrap_or_default(),
        )
    };

    let locations: String = meta
        .locations
        .iter()
        .map(|location| {
            let checked = if form.locations.contains(location) { " checked" } else { "" };
            format!(
                r#"<label class="filter-location"><input type="checkbox" name="location" value="{value}"{checked}> {value}</label>"#,
                value = escape(location)
            )
        })
        .collect();

    format!(
        r#"<form id="filters" class="filters" method="get" action="/catalog/filter">
{creation}
{album}
{members}
<fieldset class="filter-locations"><legend>Lieux</legend>{locations}</fieldset>
<button type="submit" class="btn btn-primary">Filtrer</button>
<a class="btn btn-outline" href="/">Réinitialiser</a>
</form>"#,
        creation = range(
            "Année de création",
            "creationMin",
            "creationMax",
            (meta.creation_min, meta.creation_max),
            (form.creation_min, form.creation_max)
        ),
        album = range(
            "Premier album",
            "albumMin",
            "albumMax",
            (meta.album_min, meta.album_max),
            (form.album_min, form.album_max)
        ),
        members = range(
            "Membres",
            "membersMin",
            "membersMax",
            (meta.members_min, meta.members_max),
            (form.members_min, form.members_max)
        ),
    )
}

pub fn search_box(query: &str) -> String {
    format!(
        r#"<div class="search"><input type="search" id="search-input" name="q" value="{}" placeholder="Rechercher un artiste, un membre, un lieu..." autocomplete="off"><ul id="search-suggestions" class="search-suggestions"></ul></div>"#,
        escape(query)
    )
}

/// Выпадающий список подсказок. Клик ведет на каталог с подсветкой карточки.
pub fn suggestions(items: &[Suggestion]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                r#"<li class="suggestion"><a href="/?highlight={id}#artist-{id}"><span class="suggestion-label">{label}</span><span class="suggestion-kind">{kind}</span><span class="suggestion-meta">{meta}</span></a></li>"#,
                id = item.artist_id,
                label = escape(&item.label),
                kind = item.kind.label(),
                meta = escape(&item.meta),
            )
        })
        .collect()
}
