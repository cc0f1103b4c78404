//! Semantic locator builders.
//!
//! Page objects address elements by role and accessible name rather than
//! fixed DOM paths, so minor markup drift does not break a scenario. These
//! helpers compile a role + name pair into a case-insensitive XPath; plain
//! structural lookups stay as CSS selector lists with alternatives.

use thirtyfour::By;

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// Quote a string for embedding in an XPath expression. Strings containing
/// both quote kinds fall back to `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{value}'")
    } else if !value.contains('"') {
        format!("\"{value}\"")
    } else {
        let parts: Vec<String> = value
            .split('\'')
            .map(|part| format!("'{part}'"))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

/// Case-insensitive containment test against an XPath string expression.
fn contains_ci(haystack_expr: &str, needle: &str) -> String {
    format!(
        "contains(translate({haystack_expr}, '{UPPER}', '{LOWER}'), {})",
        xpath_literal(&needle.to_lowercase())
    )
}

/// A button whose visible text contains `name` (case-insensitive).
pub fn button_named(name: &str) -> By {
    By::XPath(format!(
        "//button[{}]",
        contains_ci("normalize-space(.)", name)
    ))
}

/// A link whose visible text contains `name` (case-insensitive).
pub fn link_named(name: &str) -> By {
    By::XPath(format!("//a[{}]", contains_ci("normalize-space(.)", name)))
}

/// A link whose visible text equals `name` exactly.
pub fn link_named_exact(name: &str) -> By {
    By::XPath(format!("//a[normalize-space(.)={}]", xpath_literal(name)))
}

/// A text input identified by accessible name: aria-label, placeholder or
/// name attribute, matched case-insensitively.
pub fn textbox_named(name: &str) -> By {
    By::XPath(format!(
        "//input[{} or {} or {}]",
        contains_ci("@aria-label", name),
        contains_ci("@placeholder", name),
        contains_ci("@name", name),
    ))
}

/// A listbox option whose text contains `text`.
pub fn option_containing(text: &str) -> By {
    By::XPath(format!(
        "//*[@role='option' or self::li][{}]",
        contains_ci("normalize-space(.)", text)
    ))
}

/// A button inside the current element (for row-scoped actions).
pub fn button_within(name: &str) -> By {
    By::XPath(format!(
        ".//button[{}]",
        contains_ci("normalize-space(.)", name)
    ))
}

/// A date-picker grid cell by its full aria-label ("Friday, November 27, 2026").
pub fn gridcell_labeled(label: &str) -> By {
    By::XPath(format!(
        "//div[@role='gridcell' and @aria-label={}]//div",
        xpath_literal(label)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_plain() {
        assert_eq!(xpath_literal("Shop"), "'Shop'");
    }

    #[test]
    fn literal_with_apostrophe() {
        assert_eq!(xpath_literal("it's"), "\"it's\"");
    }

    #[test]
    fn literal_with_both_quotes() {
        assert_eq!(xpath_literal(r#"a'b"c"#), r#"concat('a', "'", 'b"c')"#);
    }

    #[test]
    fn button_xpath_is_case_insensitive() {
        let by = button_named("Add to Cart");
        let repr = format!("{by:?}");
        assert!(repr.contains("'add to cart'"), "lowercased needle: {repr}");
        assert!(repr.contains("translate"));
    }
}
