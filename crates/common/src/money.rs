//! Currency-cell parsing.
//!
//! Cart and order tables render prices as display strings ("$1,234.56",
//! "-$12.00", sometimes "—" for absent values). Assertions need numbers, so
//! the page objects funnel every scraped cell through [`parse_currency`].

/// Parse a rendered currency string into a numeric amount.
///
/// Returns `None` for empty cells and placeholder dashes. Currency symbol,
/// thousands separators and surrounding whitespace are ignored; a leading
/// `-` or parenthesized amount is negative.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "—" || trimmed == "–" {
        return None;
    }

    let negative = trimmed.starts_with('-') || (trimmed.starts_with('(') && trimmed.ends_with(')'));

    let digits: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }

    let value: f64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("$1,234.56", Some(1234.56); "dollar with thousands")]
    #[test_case("$0.00", Some(0.0); "zero")]
    #[test_case("123.45", Some(123.45); "bare amount")]
    #[test_case("-$12.00", Some(-12.0); "negative")]
    #[test_case("($45.10)", Some(-45.10); "parenthesized negative")]
    #[test_case("  $9.99  ", Some(9.99); "padded")]
    #[test_case("", None; "empty")]
    #[test_case("—", None; "em dash placeholder")]
    #[test_case("-", None; "hyphen placeholder")]
    #[test_case("N/A", None; "non numeric")]
    fn parses(raw: &str, expected: Option<f64>) {
        assert_eq!(parse_currency(raw), expected);
    }
}
