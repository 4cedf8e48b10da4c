use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::concert::ConcertData;
use crate::models::seat::SeatCategory;

pub const DEFAULT_COVER: &str = "/assets/pictures/cover.png";

/// Позиция корзины. Хранится на backend, клиент только отображает.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    #[serde(default)]
    pub concert_data: CartConcertData,
    #[serde(default)]
    pub seat_type: String,
    #[serde(default)]
    pub seat_name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Денормализованные поля концерта. Любое может отсутствовать.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartConcertData {
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub artist_image: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date_formatted: Option<String>,
}

impl CartItem {
    pub fn total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    pub fn seat_label(&self) -> String {
        if !self.seat_name.is_empty() {
            self.seat_name.clone()
        } else if !self.seat_type.is_empty() {
            SeatCategory::display_name_for(&self.seat_type)
        } else {
            "Place".to_string()
        }
    }

    pub fn artist_name(&self) -> &str {
        non_empty(&self.concert_data.artist_name).unwrap_or("Artiste inconnu")
    }

    pub fn artist_image(&self) -> &str {
        non_empty(&self.concert_data.artist_image).unwrap_or(DEFAULT_COVER)
    }

    pub fn location(&self) -> &str {
        non_empty(&self.concert_data.location).unwrap_or("Lieu inconnu")
    }

    pub fn date_formatted(&self) -> &str {
        non_empty(&self.concert_data.date_formatted).unwrap_or("Date non définie")
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartResponse {
    #[serde(default)]
    pub items: Option<Vec<CartItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartCountResponse {
    #[serde(default)]
    pub count: u32,
}

/// Общий ответ мутирующих ручек корзины.
#[derive(Debug, Clone, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Тело `POST /api/cart/add`.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_total"))]
pub struct AddToCartRequest {
    pub concert_data: ConcertData,
    pub seat_type: SeatCategory,
    pub seat_name: String,
    #[validate(range(min = 1, max = 10))]
    pub quantity: u32,
    pub price: u32,
    pub total: u32,
}

fn validate_total(request: &AddToCartRequest) -> Result<(), ValidationError> {
    if request.price != request.seat_type.price() || request.total != request.price * request.quantity {
        return Err(ValidationError::new("total_mismatch"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteAction {
    Add,
    Remove,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub artist_id: i64,
    pub action: FavoriteAction,
}
