use uuid::Uuid;

use super::{escape, euros, hidden, plural};
use crate::booking::{BookingModal, Confirmation};
use crate::models::concert::format_concert_date;
use crate::models::{ConcertSelection, SeatCategory};

/// Кнопка "Réserver": открывает модалку для конкретной даты.
pub fn open_form(selection: &ConcertSelection, label: &str) -> String {
    let fields = [
        hidden("artistId", &selection.artist_id.to_string()),
        hidden("artistName", &selection.artist_name),
        hidden("artistImage", &selection.artist_image),
        hidden("location", &selection.location),
        hidden("city", selection.city.as_deref().unwrap_or_default()),
        hidden("country", selection.country.as_deref().unwrap_or_default()),
        hidden("date", &selection.date),
        hidden("allDates", &selection.all_dates.join(",")),
        hidden("time", &selection.time),
    ]
    .concat();

    format!(
        r#"<form class="booking-open" method="post" action="/booking">{fields}<button type="submit" class="btn btn-primary"><i class="fas fa-ticket-alt"></i> {label}</button></form>"#,
        label = escape(label),
    )
}

pub fn modal(id: Uuid, modal: &BookingModal) -> String {
    let Some(selection) = modal.selection() else {
        return String::new();
    };

    let body = match modal.confirmation() {
        Some(confirmation) => confirmation_body(id, confirmation),
        None => [seat_grid(id, modal), quantity_section(id, modal), summary(modal)].concat(),
    };
    let footer = if modal.confirmation().is_some() { String::new() } else { footer(id, modal) };
    let alert = modal
        .alert()
        .map(|message| format!(r#"<div class="booking-alert" role="alert">{}</div>"#, escape(message)))
        .unwrap_or_default();

    format!(
        r#"<div id="booking-modal" class="booking-modal is-open" data-modal-id="{id}">
<form class="booking-modal-overlay" method="post" action="/booking/{id}/close"><button type="submit" aria-label="Fermer"></button></form>
<div class="booking-modal-content">
<form method="post" action="/booking/{id}/close"><button type="submit" class="booking-modal-close" aria-label="Fermer"><i class="fas fa-times"></i></button></form>
{header}
{alert}
<div class="booking-body">{body}</div>
{footer}
</div>
</div>"#,
        header = header(selection),
    )
}

fn header(selection: &ConcertSelection) -> String {
    let (others, hidden_count) = selection.other_dates();
    let all_dates = if others.is_empty() {
        String::new()
    } else {
        let mut items: String = others
            .iter()
            .map(|date| format!("<li>{}</li>", escape(&format_concert_date(date))))
            .collect();
        if hidden_count > 0 {
            items.push_str(&format!("<li>... et {hidden_count} autres dates</li>"));
        }
        format!(
            r#"<div id="booking-all-dates" class="all-dates-list"><strong>Autres dates disponibles :</strong><ul>{items}</ul></div>"#
        )
    };

    format!(
        r#"<div class="booking-header"><div class="booking-artist-info">
<img src="{image}" alt="{name}" class="booking-artist-image">
<div>
<h2 id="booking-artist-name">{name}</h2>
<div class="booking-location-info"><i class="fas fa-map-marker-alt"></i><div>
<p id="booking-location" class="booking-location-name">{location}</p>
<p id="booking-city" class="booking-city">{city}</p>
</div></div>
<div class="booking-date-time-info">
<div class="date-time-item"><i class="fas fa-calendar"></i><span id="booking-date">{date}</span></div>
<div class="date-time-item"><i class="fas fa-clock"></i><span id="booking-time">{time}</span></div>
<div class="date-time-item price-preview"><i class="fas fa-ticket-alt"></i><span id="booking-price-preview">À partir de {price}</span></div>
</div>
{all_dates}
</div></div></div>"#,
        image = escape(&selection.artist_image),
        name = escape(&selection.artist_name),
        location = escape(&selection.location),
        city = escape(&selection.city_line()),
        date = escape(&selection.date_formatted()),
        time = escape(&selection.time),
        price = euros(SeatCategory::starting_price()),
    )
}

fn seat_grid(id: Uuid, modal: &BookingModal) -> String {
    let selected = modal.draft().seat();
    let cards: String = SeatCategory::ALL
        .iter()
        .filter(|seat| seat.is_available())
        .map(|seat| {
            let is_selected = selected == Some(*seat);
            format!(
                r#"<form class="seat-type-card{class}" data-seat-type="{key}" method="post" action="/booking/{id}/seat">
<input type="hidden" name="seat" value="{key}">
<div class="seat-type-icon"><i class="{icon}"></i></div>
<div class="seat-type-info"><h4>{name}</h4><p>{description}</p>
<div class="seat-type-price"><span class="price-amount">{price}</span><span class="price-label">par personne</span></div></div>
<button type="submit" class="seat-type-select" aria-pressed="{is_selected}">Choisir</button>
</form>"#,
                class = if is_selected { " selected" } else { "" },
                key = seat.key(),
                icon = seat.icon(),
                name = seat.name(),
                description = escape(seat.description()),
                price = euros(seat.price()),
            )
        })
        .collect();

    format!(
        r#"<div class="booking-section"><h3><i class="fas fa-ticket-alt"></i> Choisissez votre type de place</h3><div class="seat-types-grid" id="seat-types-grid">{cards}</div></div>"#
    )
}

/// Степпер количества - только после выбора категории, ровно один.
fn quantity_section(id: Uuid, modal: &BookingModal) -> String {
    if modal.draft().seat().is_none() {
        return String::new();
    }
    let quantity = modal.draft().quantity();
    format!(
        r#"<div class="booking-section" id="quantity-section"><h3><i class="fas fa-users"></i> Nombre de billets</h3>
<div class="quantity-selector">
<form method="post" action="/booking/{id}/quantity"><input type="hidden" name="delta" value="dec"><button type="submit" class="quantity-btn" id="quantity-decrease" aria-label="Diminuer"><i class="fas fa-minus"></i></button></form>
<input type="number" id="quantity-input" value="{quantity}" min="1" max="10" readonly>
<form method="post" action="/booking/{id}/quantity"><input type="hidden" name="delta" value="inc"><button type="submit" class="quantity-btn" id="quantity-increase" aria-label="Augmenter"><i class="fas fa-plus"></i></button></form>
</div>
<p class="quantity-hint">Maximum 10 billets par commande</p></div>"#
    )
}

fn summary(modal: &BookingModal) -> String {
    let (Some(seat), Some(total)) = (modal.draft().seat(), modal.total()) else {
        return String::new();
    };
    format!(
        r#"<div class="booking-summary" id="booking-summary"><h3><i class="fas fa-receipt"></i> Récapitulatif</h3>
<div class="summary-details">
<div class="summary-row"><span>Type de place</span><span id="summary-seat-type">{name}</span></div>
<div class="summary-row"><span>Nombre de billets</span><span id="summary-quantity">{quantity}</span></div>
<div class="summary-row summary-total"><span>Total</span><span id="summary-total">{total}</span></div>
</div></div>"#,
        name = seat.name(),
        quantity = modal.draft().quantity(),
        total = euros(total),
    )
}

fn footer(id: Uuid, modal: &BookingModal) -> String {
    let disabled = if modal.can_submit() { "" } else { " disabled" };
    format!(
        r#"<div class="booking-footer">
<form method="post" action="/booking/{id}/close"><button type="submit" class="btn btn-outline" id="booking-cancel">Annuler</button></form>
<form method="post" action="/booking/{id}/confirm"><button type="submit" class="btn btn-primary" id="booking-confirm"{disabled}><i class="fas fa-shopping-cart"></i><span>Ajouter au panier</span></button></form>
</div>"#
    )
}

fn confirmation_body(id: Uuid, confirmation: &Confirmation) -> String {
    format!(
        r#"<div class="booking-confirmation">
<div class="confirmation-icon"><i class="fas fa-check-circle"></i></div>
<h3>Ajouté au panier !</h3>
<p>Vous avez ajouté <strong>{quantity}</strong> {tickets} {seat}</p>
<p class="confirmation-total">Total : <strong>{total}</strong></p>
<div class="confirmation-actions">
<form method="post" action="/booking/{id}/close"><button type="submit" class="btn btn-outline">Continuer</button></form>
<a class="btn btn-primary" href="/cart">Voir le panier</a>
</div>
</div>"#,
        quantity = confirmation.quantity,
        tickets = plural(confirmation.quantity, "billet"),
        seat = confirmation.seat.name().to_lowercase(),
        total = euros(confirmation.total),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::concert::DEFAULT_TIME;

    fn selection() -> ConcertSelection {
        ConcertSelection {
            artist_id: 1,
            artist_name: "Queen".to_string(),
            artist_image: "/img/queen.jpg".to_string(),
            location: "Stade de France".to_string(),
            city: None,
            country: None,
            date: "12-06-25".to_string(),
            all_dates: vec!["12-06-25".to_string(), "13-06-25".to_string()],
            time: DEFAULT_TIME.to_string(),
        }
    }

    #[test]
    fn submit_is_disabled_until_a_seat_is_chosen() {
        let id = Uuid::new_v4();
        let mut booking = BookingModal::opened(selection());
        let html = modal(id, &booking);
        assert!(html.contains(r#"id="booking-confirm" disabled"#));
        assert!(!html.contains("quantity-section"));
        assert!(!html.contains("booking-summary"));
        assert!(html.contains("Vendredi 13 Juin 2025"));

        booking.select_seat(SeatCategory::Vip).unwrap();
        let html = modal(id, &booking);
        assert!(!html.contains(r#"id="booking-confirm" disabled"#));
    }

    #[test]
    fn repeated_selection_renders_one_quantity_and_summary_panel() {
        let id = Uuid::new_v4();
        let mut booking = BookingModal::opened(selection());
        booking.select_seat(SeatCategory::Fosse).unwrap();
        booking.select_seat(SeatCategory::Vip).unwrap();
        booking.select_seat(SeatCategory::Vip).unwrap();
        booking.increment().unwrap();

        let html = modal(id, &booking);
        assert_eq!(html.matches(r#"id="quantity-section""#).count(), 1);
        assert_eq!(html.matches(r#"id="booking-summary""#).count(), 1);
        assert_eq!(html.matches("seat-type-card selected").count(), 1);
        assert!(html.contains(r#"<span id="summary-total">240€</span>"#));
    }

    #[test]
    fn confirmation_replaces_the_body() {
        let id = Uuid::new_v4();
        let mut booking = BookingModal::opened(selection());
        booking.select_seat(SeatCategory::Vip).unwrap();
        booking.increment().unwrap();
        booking.begin_submit().unwrap();
        booking.apply_outcome(Ok(()));

        let html = modal(id, &booking);
        assert!(html.contains("Ajouté au panier !"));
        assert!(html.contains("<strong>240€</strong>"));
        assert!(html.contains("2</strong> billets vip"));
        assert!(!html.contains("seat-types-grid"));
        assert!(!html.contains("booking-confirm"));
    }

    #[test]
    fn open_form_carries_all_dates() {
        let html = open_form(&selection(), "Réserver");
        assert!(html.contains(r#"name="allDates" value="12-06-25,13-06-25""#));
        assert!(html.contains(r#"action="/booking""#));
    }
}
