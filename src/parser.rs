// 🧾 Receipt Parser
// Turns pasted ticket text into structured items. The real-world format is
// one product name per line followed by its price on the next line:
//
//   1 BASE PIZZA
//   1,40
//   4 SET ANTIHUMEDAD
//   3,50
//
// Subtotal lines (a bare price with no preceding name) are ignored, and the
// leading quantity in a product line ("4 SET ANTIHUMEDAD") is stripped.

use serde::{Deserialize, Serialize};

/// Sentinel that ends receipt input (case-insensitive match).
pub const TERMINATOR: &str = "END";

/// Check whether a raw input line is the end-of-ticket marker.
pub fn is_terminator(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(TERMINATOR)
}

// ============================================================================
// LINE CLASSIFIER
// ============================================================================

/// A single classified line of ticket text. Transient: produced and consumed
/// entirely inside parsing, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum LineToken {
    /// A price line ("1,40" or "1.40"), normalized to a decimal value
    Price(f64),

    /// A product name line, with any leading quantity prefix stripped
    Name(String),
}

/// Classify one line of ticket text.
///
/// Returns `None` for blank lines and for lines that are nothing but a
/// quantity prefix (noise, not a product). A line that fails the price
/// pattern is treated as a product name, never as an error: malformed
/// prices are deliberately lenient and fall through to `Name`.
pub fn classify(line: &str) -> Option<LineToken> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return None;
    }

    if let Some(value) = parse_price(trimmed) {
        return Some(LineToken::Price(value));
    }

    let name = strip_quantity(trimmed);
    if name.is_empty() {
        return None;
    }

    Some(LineToken::Name(name.to_string()))
}

/// Parse a strict price line: one or more digits, a single comma or period,
/// one or more digits, nothing else. The comma is the common decimal
/// separator on Spanish tickets; it is normalized to a period.
fn parse_price(text: &str) -> Option<f64> {
    let sep = text.find(|c| c == ',' || c == '.')?;
    let int_part = &text[..sep];
    let frac_part = &text[sep + 1..];

    if int_part.is_empty() || frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    format!("{int_part}.{frac_part}").parse().ok()
}

/// Strip a leading quantity marker: one or more digits followed by
/// whitespace. "4 SET ANTIHUMEDAD" → "SET ANTIHUMEDAD". A bare number with
/// no following word is left untouched (it already failed the price check).
fn strip_quantity(text: &str) -> &str {
    let digits_end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());

    if digits_end == 0 {
        return text;
    }

    let rest = &text[digits_end..];
    if rest.starts_with(char::is_whitespace) {
        rest.trim_start()
    } else {
        text
    }
}

// ============================================================================
// TICKET ITEMS
// ============================================================================

/// One purchased item reconstructed from the ticket text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketItem {
    pub product: String,
    pub price: f64,
}

/// Pair name lines with the price line that follows them.
///
/// State machine with a single `pending_name` slot:
/// - a Price consumes the pending name into an item; with no pending name
///   the price is an orphan (subtotal) and is ignored
/// - a Name overwrites any unconsumed pending name (the earlier one is
///   dropped without emitting an item)
/// - a pending name left over at end of input is dropped
///
/// Order is preserved and duplicate products stay separate items. An empty
/// result is the caller's "no products detected" condition, not an error.
pub fn parse_ticket<S: AsRef<str>>(lines: &[S]) -> Vec<TicketItem> {
    let mut items = Vec::new();
    let mut pending_name: Option<String> = None;

    for line in lines {
        match classify(line.as_ref()) {
            Some(LineToken::Price(price)) => {
                if let Some(product) = pending_name.take() {
                    items.push(TicketItem { product, price });
                }
            }
            Some(LineToken::Name(name)) => {
                pending_name = Some(name);
            }
            None => {}
        }
    }

    items
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product: &str, price: f64) -> TicketItem {
        TicketItem {
            product: product.to_string(),
            price,
        }
    }

    #[test]
    fn test_classify_price_with_comma() {
        assert_eq!(classify("1,40"), Some(LineToken::Price(1.40)));
    }

    #[test]
    fn test_classify_price_with_period() {
        assert_eq!(classify("  12.60 "), Some(LineToken::Price(12.60)));
    }

    #[test]
    fn test_bare_integer_is_not_a_price() {
        // "12" has no decimal separator → product name
        assert_eq!(classify("12"), Some(LineToken::Name("12".to_string())));
    }

    #[test]
    fn test_malformed_price_becomes_name() {
        // Trailing garbage fails the strict pattern; the line falls through
        // to the name branch instead of raising
        assert_eq!(
            classify("3,5 0"),
            Some(LineToken::Name("3,5 0".to_string()))
        );
        assert_eq!(classify("1,"), Some(LineToken::Name("1,".to_string())));
        assert_eq!(classify(",40"), Some(LineToken::Name(",40".to_string())));
        assert_eq!(
            classify("1,4,0"),
            Some(LineToken::Name("1,4,0".to_string()))
        );
    }

    #[test]
    fn test_blank_line_is_noise() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
    }

    #[test]
    fn test_quantity_prefix_is_stripped() {
        assert_eq!(
            classify("4 SET ANTIHUMEDAD"),
            Some(LineToken::Name("SET ANTIHUMEDAD".to_string()))
        );
        assert_eq!(
            classify("1 BASE PIZZA"),
            Some(LineToken::Name("BASE PIZZA".to_string()))
        );
    }

    #[test]
    fn test_name_without_quantity_untouched() {
        assert_eq!(
            classify("QUESO LONCHAS"),
            Some(LineToken::Name("QUESO LONCHAS".to_string()))
        );
    }

    #[test]
    fn test_terminator_detection() {
        assert!(is_terminator("END"));
        assert!(is_terminator("  end  "));
        assert!(is_terminator("End"));
        assert!(!is_terminator("ENDIVIAS"));
    }

    #[test]
    fn test_parse_ticket_pairs_names_with_prices() {
        let lines = ["1 BASE PIZZA", "1,40", "QUESO LONCHAS", "2,10"];
        assert_eq!(
            parse_ticket(&lines),
            vec![item("BASE PIZZA", 1.40), item("QUESO LONCHAS", 2.10)]
        );
    }

    #[test]
    fn test_parse_ticket_skips_blank_lines() {
        let lines = ["PAN", "", "  ", "0,85"];
        assert_eq!(parse_ticket(&lines), vec![item("PAN", 0.85)]);
    }

    #[test]
    fn test_orphan_price_is_ignored() {
        // A subtotal line with no pending name produces no item
        let lines = ["12,60", "PAN", "0,85", "13,45"];
        assert_eq!(parse_ticket(&lines), vec![item("PAN", 0.85)]);
    }

    #[test]
    fn test_two_names_in_a_row_drop_the_first() {
        // Known leniency: a malformed price reads as a second name and the
        // first pending name is silently replaced
        let lines = ["PAN", "LECHE", "1,20"];
        assert_eq!(parse_ticket(&lines), vec![item("LECHE", 1.20)]);
    }

    #[test]
    fn test_trailing_name_without_price_is_dropped() {
        let lines = ["PAN", "0,85", "LECHE"];
        assert_eq!(parse_ticket(&lines), vec![item("PAN", 0.85)]);
    }

    #[test]
    fn test_empty_input_yields_no_items() {
        let lines: [&str; 0] = [];
        assert!(parse_ticket(&lines).is_empty());
    }

    #[test]
    fn test_duplicate_products_stay_separate() {
        let lines = ["AGUA", "0,60", "AGUA", "0,60"];
        assert_eq!(
            parse_ticket(&lines),
            vec![item("AGUA", 0.60), item("AGUA", 0.60)]
        );
    }

    #[test]
    fn test_quantity_prefixed_name_pairs_with_price() {
        let lines = ["4 SET ANTIHUMEDAD", "3,50"];
        assert_eq!(parse_ticket(&lines), vec![item("SET ANTIHUMEDAD", 3.50)]);
    }

    #[test]
    fn test_bare_number_kept_as_name() {
        // An all-digit line is not a price (no separator) and keeps its
        // text as the product name
        let lines = ["4", "1,00"];
        assert_eq!(parse_ticket(&lines), vec![item("4", 1.00)]);
    }
}
