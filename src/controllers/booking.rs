use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use super::respond;
use crate::booking::{BookingEffect, BookingModal};
use crate::error::AppError;
use crate::middleware::Session;
use crate::models::concert::DEFAULT_TIME;
use crate::models::seat::UnknownSeatCategory;
use crate::models::{ConcertSelection, SeatCategory};
use crate::render::{self, layout};
use crate::{cart, AppState};

const TITLE: &str = "Réservation";
const CART_PATH: &str = "/cart";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/booking", post(open_booking))
        .route("/booking/{id}/seat", post(select_seat))
        .route("/booking/{id}/quantity", post(change_quantity))
        .route("/booking/{id}/confirm", post(confirm_booking))
        .route("/booking/{id}/close", post(close_booking))
}

/// Скрытые поля кнопки "Réserver". `allDates` - даты площадки через запятую.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OpenBookingForm {
    pub artist_id: i64,
    #[validate(length(min = 1))]
    pub artist_name: String,
    #[serde(default)]
    pub artist_image: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[validate(length(min = 1))]
    pub date: String,
    #[serde(default)]
    pub all_dates: String,
    #[serde(default)]
    pub time: String,
}

impl OpenBookingForm {
    pub fn into_selection(self) -> ConcertSelection {
        let non_empty = |value: String| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        let mut all_dates: Vec<String> = self
            .all_dates
            .split(',')
            .map(str::trim)
            .filter(|date| !date.is_empty())
            .map(str::to_string)
            .collect();
        if all_dates.is_empty() {
            all_dates.push(self.date.clone());
        }

        ConcertSelection {
            artist_id: self.artist_id,
            artist_name: self.artist_name,
            artist_image: self.artist_image,
            location: self.location,
            city: non_empty(self.city),
            country: non_empty(self.country),
            date: self.date,
            all_dates,
            time: non_empty(self.time).unwrap_or_else(|| DEFAULT_TIME.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SeatForm {
    pub seat: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityDelta {
    Inc,
    Dec,
}

#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub delta: QuantityDelta,
}

fn render_modal(headers: &HeaderMap, id: Uuid, modal: &BookingModal, cart_count: u32) -> Response {
    respond(headers, TITLE, render::booking::modal(id, modal), cart_count)
}

pub async fn open_booking(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<OpenBookingForm>,
) -> Result<Response, AppError> {
    form.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;
    let selection = form.into_selection();
    info!("Opening booking for {} at {} on {}", selection.artist_name, selection.location, selection.date);

    let (id, modal) = state.bookings.open(selection).await;
    let count = cart::count(&state.backend, &session).await;
    Ok(render_modal(&headers, id, &modal, count))
}

pub async fn select_seat(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Form(form): Form<SeatForm>,
) -> Result<Response, AppError> {
    let seat: SeatCategory = form
        .seat
        .parse()
        .map_err(|e: UnknownSeatCategory| AppError::BadRequest(e.to_string()))?;

    let (result, modal) = state
        .bookings
        .update(id, |modal| modal.select_seat(seat))
        .await
        .ok_or(AppError::NotFound)?;
    result?;

    let count = cart::count(&state.backend, &session).await;
    Ok(render_modal(&headers, id, &modal, count))
}

pub async fn change_quantity(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Form(form): Form<QuantityForm>,
) -> Result<Response, AppError> {
    let (result, modal) = state
        .bookings
        .update(id, |modal| match form.delta {
            QuantityDelta::Inc => modal.increment(),
            QuantityDelta::Dec => modal.decrement(),
        })
        .await
        .ok_or(AppError::NotFound)?;
    result?;

    let count = cart::count(&state.backend, &session).await;
    Ok(render_modal(&headers, id, &modal, count))
}

/// Отправка в корзину. Повторный клик, пока запрос в полете, получает 409.
pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (request, _) = state
        .bookings
        .update(id, |modal| modal.begin_submit())
        .await
        .ok_or(AppError::NotFound)?;
    let request = request?;

    // Запрос в backend доводится до конца даже если клиент отключился,
    // иначе модалка осталась бы в состоянии отправки
    let task_state = state.clone();
    let task_session = session.clone();
    let (outcome, applied) = tokio::spawn(async move {
        let outcome = task_state.backend.add_to_cart(&task_session, &request).await;
        let summary = outcome.as_ref().map_err(|e| e.is_unauthorized()).copied();
        let applied = task_state
            .bookings
            .update(id, |modal| modal.apply_outcome(outcome))
            .await;
        (summary, applied)
    })
    .await
    .map_err(|e| {
        error!("Booking submit task failed: {}", e);
        AppError::Internal(e.to_string())
    })?;

    let Some((effect, modal)) = applied else {
        // Модалку закрыли, пока запрос был в полете: результат показываем без нее
        return match outcome {
            Ok(()) => {
                info!("Booking {} closed during submit, item already in cart", id);
                Ok(Redirect::to(CART_PATH).into_response())
            }
            Err(true) => Err(AppError::Unauthorized),
            Err(false) => Err(AppError::NotFound),
        };
    };
    match effect {
        BookingEffect::RedirectToLogin => Err(AppError::Unauthorized),
        BookingEffect::RefreshCartCount | BookingEffect::Alert(_) => {
            let count = cart::count(&state.backend, &session).await;
            Ok(render_modal(&headers, id, &modal, count))
        }
    }
}

/// Закрытие модалки. Для скриптов - пустой ответ, для формы - возврат на страницу артиста.
pub async fn close_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let closed = state.bookings.remove(id).await;
    if layout::is_fragment_request(&headers) {
        return Html(String::new()).into_response();
    }
    let target = closed
        .and_then(|modal| modal.selection().map(|selection| format!("/artist?id={}", selection.artist_id)))
        .unwrap_or_else(|| "/".to_string());
    Redirect::to(&target).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_form_builds_selection() {
        let form: OpenBookingForm = serde_urlencoded::from_str(
            "artistId=1&artistName=Queen&location=Stade+de+France&date=12-06-25&allDates=12-06-25%2C+13-06-25&city=&time=",
        )
        .unwrap();
        assert!(form.validate().is_ok());

        let selection = form.into_selection();
        assert_eq!(selection.all_dates, vec!["12-06-25", "13-06-25"]);
        assert_eq!(selection.city, None);
        assert_eq!(selection.time, DEFAULT_TIME);
    }

    #[test]
    fn open_form_requires_artist_and_date() {
        let form: OpenBookingForm =
            serde_urlencoded::from_str("artistId=1&artistName=&location=Wembley&date=").unwrap();
        assert!(form.validate().is_err());
    }

    #[test]
    fn single_date_defaults_all_dates() {
        let form: OpenBookingForm =
            serde_urlencoded::from_str("artistId=1&artistName=Queen&location=Wembley&date=01-07-25").unwrap();
        assert_eq!(form.into_selection().all_dates, vec!["01-07-25"]);
    }
}
