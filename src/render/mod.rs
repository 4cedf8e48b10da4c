//! HTML-шаблоны страниц и фрагментов. Каждая функция - чистая: данные на входе,
//! разметка на выходе. Все пользовательские строки проходят через [`escape`].

pub mod artist;
pub mod booking;
pub mod cart;
pub mod catalog;
pub mod layout;
pub mod map;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// "240€"
pub fn euros(amount: u32) -> String {
    format!("{amount}€")
}

/// "210.00€" - для сумм корзины, которые приходят с backend как числа с плавающей точкой.
pub fn amount(value: f64) -> String {
    format!("{value:.2}€")
}

/// "billet" / "billets"
pub fn plural(count: u32, word: &str) -> String {
    if count > 1 {
        format!("{word}s")
    } else {
        word.to_string()
    }
}

/// Скрытое поле формы.
pub(crate) fn hidden(name: &str, value: &str) -> String {
    format!(r#"<input type="hidden" name="{}" value="{}">"#, escape(name), escape(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"AC/DC" & 'co'</b>"#),
            "&lt;b&gt;&quot;AC/DC&quot; &amp; &#39;co&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn money_formats() {
        assert_eq!(euros(240), "240€");
        assert_eq!(amount(210.0), "210.00€");
        assert_eq!(plural(1, "billet"), "billet");
        assert_eq!(plural(2, "billet"), "billets");
    }
}
