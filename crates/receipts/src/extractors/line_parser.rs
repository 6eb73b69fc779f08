use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use storage::models::MAX_ITEM_PRICE;

use crate::models::ReceiptLineItem;

lazy_static! {
    /// A line ending in an amount with one or two decimals, e.g. "Bananas 1.23" or "Coffee $4.50".
    static ref PRICED_LINE: Regex =
        Regex::new(r"^(?P<name>.*?)\s+[$€£]?(?P<price>\d+\.\d{1,2})$").expect("valid regex");
}

fn is_separator(c: char) -> bool {
    matches!(c, '-' | ':' | '.' | ' ' | '\t')
}

/// Parses one recognized line; `None` for lines without a trailing amount or without a name.
///
/// An amount larger than a stored item price can be is kept as an unpriced item.
pub fn parse_line(raw_line: &str) -> Option<ReceiptLineItem> {
    let line = raw_line.trim();
    if line.chars().count() < 2 {
        return None;
    }

    let captures = PRICED_LINE.captures(line)?;
    let name = captures["name"].trim_matches(is_separator);
    if name.is_empty() {
        return None;
    }
    let price = Decimal::from_str(&captures["price"])
        .ok()
        .filter(|p| *p <= MAX_ITEM_PRICE);

    Some(ReceiptLineItem::new(name, price, None))
}

/// Turns full recognized receipt text into line items, in reading order.
pub fn parse_receipt_text(text: &str) -> Vec<ReceiptLineItem> {
    text.lines().filter_map(parse_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> Option<Decimal> {
        Some(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_parses_trailing_prices() {
        let items = parse_receipt_text("Bananas 1.23\nCoffee $4.50\nORGANIC KALE    3.9");

        assert_eq!(
            items,
            vec![
                ReceiptLineItem::new("Bananas", price("1.23"), None),
                ReceiptLineItem::new("Coffee", price("4.50"), None),
                ReceiptLineItem::new("ORGANIC KALE", price("3.9"), None),
            ]
        );
    }

    #[test]
    fn test_strips_separator_punctuation_from_name() {
        let item = parse_line("  Bread loaf ...:  2.99 ").unwrap();
        assert_eq!(item.name, "Bread loaf");
        assert_eq!(item.price, price("2.99"));

        let item = parse_line("- Rice -\t€3.10").unwrap();
        assert_eq!(item.name, "Rice");
    }

    #[test]
    fn test_drops_lines_without_trailing_amount() {
        assert_eq!(parse_line("WHOLE FOODS MARKET"), None);
        assert_eq!(parse_line("Milk 2"), None);
        assert_eq!(parse_line("Eggs 1.234"), None);
        assert_eq!(parse_line("4.99 Cheese"), None);
        assert_eq!(parse_line("x"), None);
        assert_eq!(parse_line(""), None);
    }

    #[test]
    fn test_drops_lines_with_no_name() {
        assert_eq!(parse_line("$4.50"), None);
        assert_eq!(parse_line("-- 4.50"), None);
    }

    #[test]
    fn test_text_without_prices_yields_nothing() {
        assert!(parse_receipt_text("THANK YOU\nCOME AGAIN\n").is_empty());
    }

    #[test]
    fn test_same_text_same_items() {
        let text = "Chicken 8.40\nSalad 5.00\nTOTAL 13.40";
        assert_eq!(parse_receipt_text(text), parse_receipt_text(text));
        assert_eq!(parse_receipt_text(text).len(), 3);
    }

    #[test]
    fn test_oversized_amounts_become_unpriced() {
        let items = parse_receipt_text(
            "Kale 9999999999.99\nTV 123456789012.00\nGround beef 70000000000000000000000000000.00",
        );

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].price, price("9999999999.99"));
        assert_eq!(items[1].name, "TV");
        assert_eq!(items[1].price, None);
        assert_eq!(items[2].name, "Ground beef");
        assert_eq!(items[2].price, None);
    }
}
