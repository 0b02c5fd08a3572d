//! Currency-label extraction from formatted price strings.

/// Strip the numeric part of a formatted price, leaving the currency label.
///
/// Free items carry no meaningful label; the empty string is returned.
pub fn currency_label(price: f64, price_formatted: &str) -> String {
    if price == 0.0 {
        return String::new();
    }

    price_formatted
        .chars()
        .filter(|c| !c.is_ascii_digit() && *c != '.' && *c != ',')
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_digits_and_separators() {
        assert_eq!(currency_label(4.99, "$4.99"), "$");
        assert_eq!(currency_label(499.0, "499,00 ₽"), "₽");
        assert_eq!(currency_label(0.99, "0,99 €"), "€");
    }

    #[test]
    fn free_items_have_no_label() {
        assert_eq!(currency_label(0.0, "Free"), "");
    }
}
