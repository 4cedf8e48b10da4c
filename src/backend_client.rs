//! Клиент внешнего backend: каталог, корзина, геокодинг, избранное.
//!
//! Backend владеет корзиной и сессиями. Мы пробрасываем cookie пользователя
//! и переводим ответы в [`ApiError`]: 401 - `Unauthorized`, не-OK с полем
//! `error` - `Business`, остальное - `Status`/`Transport`. Повторов нет.

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::catalog::FilterForm;
use crate::config::BackendConfig;
use crate::error::ApiError;
use crate::middleware::Session;
use crate::models::cart::{CartCountResponse, CartResponse, FavoriteRequest, MutationResponse};
use crate::models::{AddToCartRequest, Artist, CartItem, Coordinates, FavoriteAction};

pub const USER_AGENT: &str = "concert-front/0.1";

#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl BackendClient {
    pub fn from_config(config: &BackendConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, session: &Session) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, format!("{}{}", self.base_url, path));
        match session.cookie() {
            Some(cookie) => builder.header(reqwest::header::COOKIE, cookie),
            None => builder,
        }
    }

    /// `GET /api/filter?<поля формы>`. Пустая форма - весь каталог.
    /// С cookie сессии backend отмечает избранное этого пользователя.
    pub async fn filter_artists(&self, session: &Session, form: &FilterForm) -> Result<Vec<Artist>, ApiError> {
        let query = form.to_query()?;
        let path = if query.is_empty() {
            "/api/filter".to_string()
        } else {
            format!("/api/filter?{query}")
        };
        debug!("Requesting artists: {}", path);

        let response = self.request(Method::GET, &path, session).send().await?;
        let artists = check_status(response).await?.json::<Vec<Artist>>().await?;
        Ok(artists)
    }

    /// `GET /api/geocode?location=`. 404 и невалидные координаты - `None`.
    pub async fn lookup_coordinates(&self, location: &str) -> Result<Option<Coordinates>, ApiError> {
        let response = self
            .request(Method::GET, "/api/geocode", &Session::anonymous())
            .query(&[("location", location)])
            .send()
            .await?;

        let coordinates = match check_status(response).await {
            Ok(response) => response.json::<Coordinates>().await?,
            Err(ApiError::NotFound) => {
                debug!("No coordinates for {}", location);
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        if !coordinates.is_valid() {
            warn!("Geocoder returned invalid coordinates for {}: {:?}", location, coordinates);
            return Ok(None);
        }
        Ok(Some(coordinates))
    }

    pub async fn add_to_cart(&self, session: &Session, item: &AddToCartRequest) -> Result<(), ApiError> {
        info!(
            "Adding to cart: seat={} quantity={} total={}",
            item.seat_type.key(),
            item.quantity,
            item.total
        );
        let response = self
            .request(Method::POST, "/api/cart/add", session)
            .json(item)
            .send()
            .await?;
        expect_success(response).await
    }

    pub async fn cart(&self, session: &Session) -> Result<Vec<CartItem>, ApiError> {
        let response = self.request(Method::GET, "/api/cart", session).send().await?;
        let body = check_status(response).await?.json::<CartResponse>().await?;
        Ok(body.items.unwrap_or_default())
    }

    pub async fn remove_cart_item(&self, session: &Session, item_id: i64) -> Result<(), ApiError> {
        let path = format!("/api/cart/remove/{item_id}");
        let response = self.request(Method::DELETE, &path, session).send().await?;
        expect_success(response).await
    }

    pub async fn clear_cart(&self, session: &Session) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, "/api/cart/clear", session).send().await?;
        expect_success(response).await
    }

    pub async fn cart_count(&self, session: &Session) -> Result<u32, ApiError> {
        let response = self.request(Method::GET, "/api/cart/count", session).send().await?;
        let body = check_status(response).await?.json::<CartCountResponse>().await?;
        Ok(body.count)
    }

    pub async fn set_favorite(
        &self,
        session: &Session,
        artist_id: i64,
        action: FavoriteAction,
    ) -> Result<(), ApiError> {
        let response = self
            .request(Method::POST, "/api/user/favorite", session)
            .json(&FavoriteRequest { artist_id, action })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Просит backend перечитать данные. Каталог после этого нужно перезагрузить.
    pub async fn refresh(&self, session: &Session) -> Result<(), ApiError> {
        let response = self.request(Method::POST, "/api/refresh", session).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        _ => {
            // Тело может быть и JSON {error}, и обычным текстом
            let body = response.text().await.unwrap_or_default();
            match serde_json::from_str::<MutationResponse>(&body) {
                Ok(MutationResponse { error: Some(message), .. }) if !message.is_empty() => {
                    Err(ApiError::Business(message))
                }
                _ => Err(ApiError::Status(status.as_u16())),
            }
        }
    }
}

async fn expect_success(response: Response) -> Result<(), ApiError> {
    let body = check_status(response).await?.json::<MutationResponse>().await?;
    if body.success {
        Ok(())
    } else {
        Err(ApiError::Business(
            body.error.unwrap_or_else(|| "Erreur inconnue".to_string()),
        ))
    }
}
