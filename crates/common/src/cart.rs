//! Observed cart state.
//!
//! `CartItem` is a read-only projection of one rendered cart row. The suite
//! never constructs cart state directly; it drives the UI and scrapes the
//! result for assertions. Mutation happens server-side, out of scope here.

use serde::{Deserialize, Serialize};

/// One cart table row as scraped from the live DOM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub sku: String,
    pub name: String,
    pub retail_price: Option<f64>,
    pub cost_price: Option<f64>,
    pub quantity: u32,
    pub ship_qty: u32,
    pub ship_price: Option<f64>,
    pub bo_qty: u32,
    pub bo_price: Option<f64>,
    pub total_price: Option<f64>,
}

impl CartItem {
    /// Whether this row refers to the given SKU. Rendered SKUs occasionally
    /// carry prefixes ("ID 36A103"), so containment is the contract.
    pub fn matches_sku(&self, sku: &str) -> bool {
        self.sku.contains(sku)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sku_match_is_containment() {
        let item = CartItem {
            sku: "ID 36A103".to_string(),
            ..CartItem::default()
        };
        assert!(item.matches_sku("36A103"));
        assert!(!item.matches_sku("EW2390-50D"));
    }
}
