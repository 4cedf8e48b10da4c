use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::respond;
use crate::cart::{self, CartAction, CartOutcome};
use crate::error::{AppError, CHECKOUT_PATH};
use crate::middleware::Session;
use crate::render;
use crate::AppState;

const TITLE: &str = "Mon panier";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cart", get(show_cart))
        .route("/cart/count", get(cart_count))
        .route("/cart/items/{id}/remove", get(ask_remove).post(remove_item))
        .route("/cart/clear", get(ask_clear).post(clear_cart))
        .route("/cart/checkout", get(checkout))
}

/// Второй шаг удаления. Без `confirm=yes` действие считается отмененным.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

impl ConfirmForm {
    fn accepted(&self) -> bool {
        self.confirm.as_deref() == Some("yes")
    }
}

async fn render_cart(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
    alert: Option<&str>,
) -> Result<Response, AppError> {
    let (view, count) = futures::join!(
        cart::load(&state.backend, session),
        cart::count(&state.backend, session)
    );
    let view = view?;
    Ok(respond(headers, TITLE, render::cart::modal(&view, alert), count))
}

pub async fn show_cart(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    render_cart(&state, &session, &headers, None).await
}

pub async fn cart_count(State(state): State<Arc<AppState>>, session: Session) -> Json<serde_json::Value> {
    let count = cart::count(&state.backend, &session).await;
    Json(json!({ "count": count }))
}

async fn prompt(state: &AppState, session: &Session, headers: &HeaderMap, action: CartAction) -> Response {
    let count = cart::count(&state.backend, session).await;
    respond(headers, TITLE, render::cart::confirm_prompt(action), count)
}

pub async fn ask_remove(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Path(item_id): Path<i64>,
) -> Response {
    prompt(&state, &session, &headers, CartAction::Remove(item_id)).await
}

pub async fn ask_clear(State(state): State<Arc<AppState>>, session: Session, headers: HeaderMap) -> Response {
    prompt(&state, &session, &headers, CartAction::Clear).await
}

async fn apply(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
    action: CartAction,
    form: ConfirmForm,
) -> Result<Response, AppError> {
    let Some(confirmed) = action.confirm(form.accepted()) else {
        return render_cart(state, session, headers, None).await;
    };

    match cart::execute(&state.backend, session, confirmed).await {
        CartOutcome::Reload => render_cart(state, session, headers, None).await,
        CartOutcome::RedirectToLogin => Err(AppError::Unauthorized),
        CartOutcome::Alert(message) => render_cart(state, session, headers, Some(&message)).await,
    }
}

pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Path(item_id): Path<i64>,
    Form(form): Form<ConfirmForm>,
) -> Result<Response, AppError> {
    apply(&state, &session, &headers, CartAction::Remove(item_id), form).await
}

pub async fn clear_cart(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<ConfirmForm>,
) -> Result<Response, AppError> {
    apply(&state, &session, &headers, CartAction::Clear, form).await
}

pub async fn checkout() -> Response {
    Redirect::to(CHECKOUT_PATH).into_response()
}
