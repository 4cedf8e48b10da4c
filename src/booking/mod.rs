//! Модалка бронирования одного концерта.
//!
//! Состояния: `Closed -> SeatUnselected -> SeatSelected -> Confirmed`.
//! Черновик (категория + количество) сбрасывается при каждом открытии.
//! Пока запрос в корзину в полете, повторная отправка запрещена.

pub mod store;

use thiserror::Error;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{AddToCartRequest, ConcertSelection, SeatCategory};

pub use store::BookingStore;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    Closed,
    SeatUnselected,
    SeatSelected,
    Confirmed,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("booking modal is not open")]
    NotOpen,
    #[error("no seat category selected")]
    NoSeatSelected,
    #[error("booking is already being submitted")]
    AlreadySubmitting,
    #[error("invalid booking: {0}")]
    Invalid(String),
}

/// Что должна сделать страница после ответа корзины.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingEffect {
    RefreshCartCount,
    RedirectToLogin,
    Alert(String),
}

/// Черновик: выбранная категория и количество билетов.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    seat: Option<SeatCategory>,
    quantity: u32,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self { seat: None, quantity: MIN_QUANTITY }
    }
}

impl BookingDraft {
    pub fn seat(&self) -> Option<SeatCategory> {
        self.seat
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn increment(&mut self) -> u32 {
        self.quantity = (self.quantity + 1).min(MAX_QUANTITY);
        self.quantity
    }

    pub fn decrement(&mut self) -> u32 {
        self.quantity = self.quantity.saturating_sub(1).max(MIN_QUANTITY);
        self.quantity
    }

    /// price × quantity, если категория выбрана.
    pub fn total(&self) -> Option<u32> {
        self.seat.map(|seat| seat.price() * self.quantity)
    }
}

/// Итог успешного добавления - показывается вместо тела модалки.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub seat: SeatCategory,
    pub quantity: u32,
    pub total: u32,
}

#[derive(Debug, Clone)]
pub struct BookingModal {
    state: BookingState,
    selection: Option<ConcertSelection>,
    draft: BookingDraft,
    submitting: bool,
    confirmation: Option<Confirmation>,
    alert: Option<String>,
}

impl Default for BookingModal {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingModal {
    pub fn new() -> Self {
        Self {
            state: BookingState::Closed,
            selection: None,
            draft: BookingDraft::default(),
            submitting: false,
            confirmation: None,
            alert: None,
        }
    }

    pub fn opened(selection: ConcertSelection) -> Self {
        let mut modal = Self::new();
        modal.open(selection);
        modal
    }

    pub fn state(&self) -> BookingState {
        self.state
    }

    pub fn selection(&self) -> Option<&ConcertSelection> {
        self.selection.as_ref()
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_open(&self) -> bool {
        self.state != BookingState::Closed
    }

    pub fn total(&self) -> Option<u32> {
        self.draft.total()
    }

    /// Кнопка подтверждения активна только с выбранной категорией.
    pub fn can_submit(&self) -> bool {
        self.state == BookingState::SeatSelected && !self.submitting
    }

    pub fn open(&mut self, selection: ConcertSelection) {
        info!(
            "Opening booking modal: artist={} location={} date={}",
            selection.artist_id, selection.location, selection.date
        );
        self.selection = Some(selection);
        self.draft = BookingDraft::default();
        self.submitting = false;
        self.confirmation = None;
        self.alert = None;
        self.state = BookingState::SeatUnselected;
    }

    pub fn select_seat(&mut self, seat: SeatCategory) -> Result<(), BookingError> {
        match self.state {
            BookingState::SeatUnselected | BookingState::SeatSelected => {
                self.draft.seat = Some(seat);
                self.alert = None;
                self.state = BookingState::SeatSelected;
                debug!("Seat selected: {}", seat.key());
                Ok(())
            }
            BookingState::Closed | BookingState::Confirmed => Err(BookingError::NotOpen),
        }
    }

    pub fn increment(&mut self) -> Result<u32, BookingError> {
        self.ensure_seat_selected()?;
        self.alert = None;
        Ok(self.draft.increment())
    }

    pub fn decrement(&mut self) -> Result<u32, BookingError> {
        self.ensure_seat_selected()?;
        self.alert = None;
        Ok(self.draft.decrement())
    }

    /// Собирает тело запроса в корзину и помечает модалку как отправляющую.
    pub fn begin_submit(&mut self) -> Result<AddToCartRequest, BookingError> {
        self.ensure_seat_selected()?;
        if self.submitting {
            return Err(BookingError::AlreadySubmitting);
        }
        let (Some(seat), Some(selection)) = (self.draft.seat, self.selection.as_ref()) else {
            return Err(BookingError::NoSeatSelected);
        };

        let quantity = self.draft.quantity;
        let request = AddToCartRequest {
            concert_data: selection.to_concert_data(),
            seat_type: seat,
            seat_name: seat.name().to_string(),
            quantity,
            price: seat.price(),
            total: seat.price() * quantity,
        };
        request
            .validate()
            .map_err(|e| BookingError::Invalid(e.to_string()))?;

        self.submitting = true;
        self.alert = None;
        Ok(request)
    }

    /// Применяет ответ `POST /api/cart/add`.
    pub fn apply_outcome(&mut self, outcome: Result<(), ApiError>) -> BookingEffect {
        self.submitting = false;
        match outcome {
            Ok(()) => {
                // begin_submit гарантирует выбранную категорию
                let seat = self.draft.seat.unwrap_or(SeatCategory::Fosse);
                let quantity = self.draft.quantity;
                self.confirmation = Some(Confirmation { seat, quantity, total: seat.price() * quantity });
                self.state = BookingState::Confirmed;
                info!("Booking added to cart: {} x{}", seat.key(), quantity);
                BookingEffect::RefreshCartCount
            }
            Err(ApiError::Unauthorized) => {
                self.close();
                BookingEffect::RedirectToLogin
            }
            Err(ApiError::Business(message)) => {
                warn!("Cart rejected booking: {}", message);
                let alert = format!("Erreur lors de l'ajout au panier: {message}");
                self.alert = Some(alert.clone());
                BookingEffect::Alert(alert)
            }
            Err(err) => {
                warn!("Booking submit failed: {}", err);
                let alert = "Erreur lors de l'ajout au panier. Veuillez réessayer.".to_string();
                self.alert = Some(alert.clone());
                BookingEffect::Alert(alert)
            }
        }
    }

    /// Escape, клик по оверлею, "Annuler" - из любого состояния.
    pub fn close(&mut self) {
        self.state = BookingState::Closed;
        self.selection = None;
        self.draft = BookingDraft::default();
        self.submitting = false;
        self.confirmation = None;
        self.alert = None;
    }

    fn ensure_seat_selected(&self) -> Result<(), BookingError> {
        match self.state {
            BookingState::SeatSelected => Ok(()),
            BookingState::SeatUnselected => Err(BookingError::NoSeatSelected),
            BookingState::Closed | BookingState::Confirmed => Err(BookingError::NotOpen),
        }
    }
}
