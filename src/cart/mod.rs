//! Модалка корзины. Корзина целиком на стороне backend: здесь только
//! отображение, двухшаговое подтверждение удаления и реакция на ответы.

use tracing::{error, info, warn};

use crate::backend_client::BackendClient;
use crate::error::ApiError;
use crate::middleware::Session;
use crate::models::CartItem;

/// Содержимое корзины, как его вернул backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSummary {
    pub items: Vec<CartItem>,
}

impl CartSummary {
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Что показать в модалке после загрузки.
#[derive(Debug, Clone, PartialEq)]
pub enum CartView {
    Items(CartSummary),
    Empty,
    /// Ошибка загрузки с кнопкой "Réessayer".
    Failed(String),
}

/// Загрузка корзины при открытии модалки. 401 поднимается наверх (редирект на логин).
pub async fn load(client: &BackendClient, session: &Session) -> Result<CartView, ApiError> {
    match client.cart(session).await {
        Ok(items) if items.is_empty() => Ok(CartView::Empty),
        Ok(items) => Ok(CartView::Items(CartSummary { items })),
        Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized),
        Err(err) => {
            error!("Failed to load cart: {}", err);
            Ok(CartView::Failed(err.to_string()))
        }
    }
}

/// Счетчик на кнопке корзины. Без сессии или при ошибке - 0 (индикатор скрыт).
pub async fn count(client: &BackendClient, session: &Session) -> u32 {
    match client.cart_count(session).await {
        Ok(count) => count,
        Err(ApiError::Unauthorized) => 0,
        Err(err) => {
            warn!("Failed to refresh cart count: {}", err);
            0
        }
    }
}

/// Деструктивное действие над корзиной. Требует явного подтверждения.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    Remove(i64),
    Clear,
}

/// Подтвержденное пользователем действие. Создается только через [`CartAction::confirm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmed(CartAction);

impl CartAction {
    pub fn prompt(self) -> &'static str {
        match self {
            CartAction::Remove(_) => "Êtes-vous sûr de vouloir supprimer cet article du panier ?",
            CartAction::Clear => "Êtes-vous sûr de vouloir vider tout le panier ?",
        }
    }

    fn failure_label(self) -> &'static str {
        match self {
            CartAction::Remove(_) => "Erreur lors de la suppression",
            CartAction::Clear => "Erreur lors du vidage du panier",
        }
    }

    pub fn confirm(self, accepted: bool) -> Option<Confirmed> {
        accepted.then_some(Confirmed(self))
    }
}

impl Confirmed {
    pub fn action(self) -> CartAction {
        self.0
    }
}

/// Итог действия для страницы.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOutcome {
    /// Перезагрузить список и счетчик.
    Reload,
    RedirectToLogin,
    Alert(String),
}

pub async fn execute(client: &BackendClient, session: &Session, confirmed: Confirmed) -> CartOutcome {
    let action = confirmed.action();
    let result = match action {
        CartAction::Remove(item_id) => client.remove_cart_item(session, item_id).await,
        CartAction::Clear => client.clear_cart(session).await,
    };
    outcome_of(action, result)
}

pub fn outcome_of(action: CartAction, result: Result<(), ApiError>) -> CartOutcome {
    match result {
        Ok(()) => {
            info!("Cart action applied: {:?}", action);
            CartOutcome::Reload
        }
        Err(ApiError::Unauthorized) => CartOutcome::RedirectToLogin,
        Err(ApiError::Business(message)) => {
            CartOutcome::Alert(format!("{}: {}", action.failure_label(), message))
        }
        Err(err) => {
            warn!("Cart action {:?} failed: {}", action, err);
            CartOutcome::Alert(format!("{}. Veuillez réessayer.", action.failure_label()))
        }
    }
}
