pub mod booking;
pub mod cart;
pub mod catalog;
pub mod map;
pub mod pages;

use axum::{
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    Router,
};
use std::sync::Arc;

use crate::render::layout;

/// Заголовок с актуальным счетчиком корзины для скриптов страницы.
pub const CART_COUNT_HEADER: &str = "x-cart-count";

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(pages::routes())
        .merge(catalog::routes())
        .merge(booking::routes())
        .merge(cart::routes())
        .merge(map::routes())
}

/// Фрагмент для запросов из скриптов, иначе полная страница.
pub(crate) fn respond(headers: &HeaderMap, title: &str, body: String, cart_count: u32) -> Response {
    if layout::is_fragment_request(headers) {
        ([(CART_COUNT_HEADER, cart_count.to_string())], Html(body)).into_response()
    } else {
        Html(layout::page(title, &body, cart_count)).into_response()
    }
}
