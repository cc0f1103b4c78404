//! Storefront E2E Common Library
//!
//! Shared reference data and observed-state types for the storefront test
//! suite: the test-data registry (users, catalog fixtures, checkout
//! constants), currency parsing for scraped table cells, and the read-only
//! cart-item projection the cart page object extracts from rendered rows.

pub mod cart;
pub mod money;
pub mod testdata;

pub use cart::CartItem;
pub use money::parse_currency;
pub use testdata::{checkout, parts, products, quick_order, urls, users, Credentials, Part, Product};

/// Suite version, stamped into reports.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
