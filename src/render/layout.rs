use super::{cart, escape};

/// Полная страница: шапка с навигацией и кнопкой корзины, контент, скрипты.
pub fn page(title: &str, body: &str, cart_count: u32) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Groupie Tracker</title>
<link rel="stylesheet" href="/static/css/style.css">
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
</head>
<body>
<header class="site-header">
<a class="logo" href="/">Groupie Tracker</a>
<nav class="site-nav">
<a href="/">Artistes</a>
<a href="/map?variant=concerts">Concerts</a>
<a href="/map?variant=global">Carte</a>
</nav>
<a class="cart-button" href="/cart" aria-label="Panier"><i class="fas fa-shopping-cart"></i>{badge}</a>
</header>
<main id="content">
{body}
</main>
<script src="/static/js/app.js" defer></script>
</body>
</html>"#,
        title = escape(title),
        badge = cart::count_badge(cart_count),
    )
}

/// Фрагмент без обвязки - ответ на запросы из скриптов страницы.
pub fn is_fragment_request(headers: &axum::http::HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("fetch"))
}
