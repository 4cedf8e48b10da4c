use super::{amount, escape};
use crate::cart::{CartAction, CartSummary, CartView};
use crate::models::CartItem;

/// Индикатор на кнопке корзины. При нуле скрыт.
pub fn count_badge(count: u32) -> String {
    if count > 0 {
        format!(r#"<span id="cart-count" class="cart-count">{count}</span>"#)
    } else {
        r#"<span id="cart-count" class="cart-count" hidden>0</span>"#.to_string()
    }
}

pub fn modal(view: &CartView, alert: Option<&str>) -> String {
    let content = match view {
        CartView::Items(summary) => items(summary),
        CartView::Empty => r#"<div class="cart-empty"><i class="fas fa-shopping-cart"></i><p>Votre panier est vide</p><a class="btn btn-primary" href="/">Découvrir les concerts</a></div>"#.to_string(),
        CartView::Failed(message) => format!(
            r#"<div class="cart-error"><p>Erreur lors du chargement du panier</p><p class="cart-error-detail">{}</p><a class="btn btn-outline" href="/cart">Réessayer</a></div>"#,
            escape(message)
        ),
    };
    let alert = alert
        .map(|message| format!(r#"<div class="cart-alert" role="alert">{}</div>"#, escape(message)))
        .unwrap_or_default();

    format!(
        r#"<section id="cart-modal" class="cart-modal is-open">
<div class="cart-modal-header"><h2><i class="fas fa-shopping-cart"></i> Mon panier</h2><a class="cart-modal-close" href="/" aria-label="Fermer"><i class="fas fa-times"></i></a></div>
{alert}
<div class="cart-modal-body">{content}</div>
</section>"#
    )
}

fn items(summary: &CartSummary) -> String {
    let rows: String = summary.items.iter().map(row).collect();
    format!(
        r#"<div class="cart-items">{rows}</div>
<div class="cart-footer">
<div class="cart-total"><span>Total</span><strong id="cart-total">{total}</strong></div>
<div class="cart-actions">
<a class="btn btn-outline" href="/cart/clear">Vider le panier</a>
<a class="btn btn-primary" href="/cart/checkout">Passer commande</a>
</div>
</div>"#,
        total = amount(summary.total()),
    )
}

fn row(item: &CartItem) -> String {
    format!(
        r#"<div class="cart-item" data-item-id="{id}">
<img src="{image}" alt="{name}" class="cart-item-image">
<div class="cart-item-info">
<h4>{name}</h4>
<p class="cart-item-location"><i class="fas fa-map-marker-alt"></i> {location}</p>
<p class="cart-item-date"><i class="fas fa-calendar"></i> {date}</p>
<p class="cart-item-seat">{seat} × {quantity}</p>
</div>
<div class="cart-item-price"><strong>{total}</strong><span>{price} / billet</span></div>
<a class="cart-item-remove" href="/cart/items/{id}/remove" aria-label="Supprimer"><i class="fas fa-trash"></i></a>
</div>"#,
        id = item.id,
        image = escape(item.artist_image()),
        name = escape(item.artist_name()),
        location = escape(item.location()),
        date = escape(item.date_formatted()),
        seat = escape(&item.seat_label()),
        quantity = item.quantity,
        total = amount(item.total()),
        price = amount(item.price),
    )
}

/// Второй шаг удаления: явный вопрос с кнопками подтверждения и отмены.
pub fn confirm_prompt(action: CartAction) -> String {
    let target = match action {
        CartAction::Remove(item_id) => format!("/cart/items/{item_id}/remove"),
        CartAction::Clear => "/cart/clear".to_string(),
    };
    format!(
        r#"<section id="cart-confirm" class="cart-confirm" role="alertdialog">
<p>{prompt}</p>
<form method="post" action="{target}">
<input type="hidden" name="confirm" value="yes">
<button type="submit" class="btn btn-danger">Confirmer</button>
<a class="btn btn-outline" href="/cart">Annuler</a>
</form>
</section>"#,
        prompt = escape(action.prompt()),
    )
}
