use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::convert::Infallible;

/// Cookie пользователя, который пробрасываем в backend как есть.
/// Аутентификацией занимается backend: мы только передаем сессию и реагируем на 401.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    cookie: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_cookie(cookie: impl Into<String>) -> Self {
        let cookie = cookie.into();
        Self {
            cookie: (!cookie.trim().is_empty()).then_some(cookie),
        }
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Ключ для debounce и защиты от двойных кликов.
    pub fn key(&self) -> &str {
        self.cookie.as_deref().unwrap_or("anonymous")
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Несколько заголовков Cookie склеиваем как это сделал бы браузер
        let cookies: Vec<&str> = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();

        if cookies.is_empty() {
            return Ok(Session::anonymous());
        }
        Ok(Session::with_cookie(cookies.join("; ")))
    }
}
