use serde::Deserialize;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub backend: BackendConfig,
    pub geocode: GeocodeConfig,
    pub search: SearchConfig,
    pub booking: BookingConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    /// `pretty` или `json`
    pub log_format: String,
    pub static_dir: String,
}

// Внешний backend (каталог, корзина, геокодинг, избранное)
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub timeout_seconds: u64,
}

// Геокодинг пинов карты: пауза после каждой пачки запросов
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeConfig {
    pub batch_size: usize,
    pub pause_ms: u64,
    pub max_lookups: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    pub highlight_ms: u64,
}

// Модалки бронирования живут в памяти, пока пользователь с ними работает
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    pub ttl_seconds: u64,
    pub sweep_interval_seconds: u64,
}

impl GeocodeConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }
}

impl BookingConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: AppConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                environment: "development".to_string(),
                rust_log: "concert_front=debug,tower_http=debug".to_string(),
                log_format: "pretty".to_string(),
                static_dir: "static".to_string(),
            },
            backend: BackendConfig {
                url: "http://localhost:8000".to_string(),
                timeout_seconds: 10,
            },
            geocode: GeocodeConfig {
                batch_size: 3,
                pause_ms: 1200,
                max_lookups: 50,
            },
            search: SearchConfig {
                debounce_ms: 150,
                highlight_ms: 2500,
            },
            booking: BookingConfig {
                ttl_seconds: 1800,
                sweep_interval_seconds: 300,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or(defaults.app.host),
                port: parse_var("PORT", defaults.app.port),
                environment: env::var("ENVIRONMENT").unwrap_or(defaults.app.environment),
                rust_log: env::var("RUST_LOG").unwrap_or(defaults.app.rust_log),
                log_format: env::var("LOG_FORMAT").unwrap_or(defaults.app.log_format),
                static_dir: env::var("STATIC_DIR").unwrap_or(defaults.app.static_dir),
            },
            backend: BackendConfig {
                url: env::var("BACKEND_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.backend.url),
                timeout_seconds: parse_var("BACKEND_TIMEOUT_SECONDS", defaults.backend.timeout_seconds),
            },
            geocode: GeocodeConfig {
                batch_size: parse_var("GEOCODE_BATCH_SIZE", defaults.geocode.batch_size),
                pause_ms: parse_var("GEOCODE_PAUSE_MS", defaults.geocode.pause_ms),
                max_lookups: parse_var("GEOCODE_MAX_LOOKUPS", defaults.geocode.max_lookups),
            },
            search: SearchConfig {
                debounce_ms: parse_var("SEARCH_DEBOUNCE_MS", defaults.search.debounce_ms),
                highlight_ms: parse_var("SEARCH_HIGHLIGHT_MS", defaults.search.highlight_ms),
            },
            booking: BookingConfig {
                ttl_seconds: parse_var("BOOKING_TTL_SECONDS", defaults.booking.ttl_seconds),
                sweep_interval_seconds: parse_var(
                    "BOOKING_SWEEP_INTERVAL_SECONDS",
                    defaults.booking.sweep_interval_seconds,
                ),
            },
        }
    }
}

// Невалидное значение - падаем при старте, а не в середине запроса
fn parse_var<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid value: {e}")),
        Err(_) => default,
    }
}
