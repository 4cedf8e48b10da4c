use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Категория места. Таблица статична и не меняется во время работы.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatCategory {
    Fosse,
    Gradin,
    Vip,
    Premium,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown seat category: {0}")]
pub struct UnknownSeatCategory(pub String);

impl SeatCategory {
    /// Порядок отображения в модалке.
    pub const ALL: [SeatCategory; 4] = [
        SeatCategory::Fosse,
        SeatCategory::Gradin,
        SeatCategory::Vip,
        SeatCategory::Premium,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SeatCategory::Fosse => "fosse",
            SeatCategory::Gradin => "gradin",
            SeatCategory::Vip => "vip",
            SeatCategory::Premium => "premium",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SeatCategory::Fosse => "Fosse",
            SeatCategory::Gradin => "Gradin",
            SeatCategory::Vip => "VIP",
            SeatCategory::Premium => "Premium",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SeatCategory::Fosse => "Place debout au plus près de la scène",
            SeatCategory::Gradin => "Place assise avec vue panoramique",
            SeatCategory::Vip => "Accès VIP avec boissons et rencontre possible",
            SeatCategory::Premium => "Place premium avec vue privilégiée",
        }
    }

    /// Цена за одно место, в евро.
    pub fn price(self) -> u32 {
        match self {
            SeatCategory::Fosse => 45,
            SeatCategory::Gradin => 65,
            SeatCategory::Vip => 120,
            SeatCategory::Premium => 95,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SeatCategory::Fosse => "fas fa-users",
            SeatCategory::Gradin => "fas fa-chair",
            SeatCategory::Vip => "fas fa-crown",
            SeatCategory::Premium => "fas fa-star",
        }
    }

    // Наличие мест на клиенте не отслеживается
    pub fn is_available(self) -> bool {
        true
    }

    /// Цена для "À partir de ...": самая дешевая категория.
    pub fn starting_price() -> u32 {
        Self::ALL.iter().map(|seat| seat.price()).min().unwrap_or(0)
    }

    /// Название для строки корзины. Неизвестный ключ показываем как есть.
    pub fn display_name_for(key: &str) -> String {
        key.parse::<SeatCategory>()
            .map(|seat| seat.name().to_string())
            .unwrap_or_else(|_| key.to_string())
    }
}

impl FromStr for SeatCategory {
    type Err = UnknownSeatCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fosse" => Ok(SeatCategory::Fosse),
            "gradin" => Ok(SeatCategory::Gradin),
            "vip" => Ok(SeatCategory::Vip),
            "premium" => Ok(SeatCategory::Premium),
            other => Err(UnknownSeatCategory(other.to_string())),
        }
    }
}

impl fmt::Display for SeatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
