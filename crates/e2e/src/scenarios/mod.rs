//! Scenario definitions, grouped by suite area.

pub mod cart;
pub mod category_rules;
pub mod quick_order;
pub mod saved_cart;
pub mod search;
pub mod smoke;
pub mod visual;
