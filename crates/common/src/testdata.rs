//! Static test-data registry.
//!
//! Credentials and catalog references are plain data resolved at call time.
//! Every credential can be overridden through an environment variable and
//! falls back to the account provisioned in the QA environment, so the same
//! binary runs locally and in CI without edits. Product codes and part
//! numbers point at fixtures that exist in the external commerce catalog;
//! this suite never creates them.

use serde::{Deserialize, Serialize};

/// A storefront login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    fn from_env(user_var: &str, pass_var: &str, user_default: &str, pass_default: &str) -> Self {
        Self {
            username: env_or(user_var, user_default),
            password: env_or(pass_var, pass_default),
        }
    }
}

/// A catalog product reference used to drive search/menu navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub code: &'static str,
    pub brand: &'static str,
    pub collection: &'static str,
    pub name: &'static str,
}

/// A spare-part reference for the parts-search flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub model_number: &'static str,
    pub part_number: &'static str,
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

/// Test users. Each suite that mutates cart state gets its own account so
/// parallel runs do not fight over one server-side cart.
pub mod users {
    use super::Credentials;

    pub fn valid() -> Credentials {
        Credentials::from_env("TEST_USERNAME", "TEST_PASSWORD", "uvr0713@gmail.com", "1234")
    }

    pub fn invalid() -> Credentials {
        Credentials {
            username: "wronguser@mailinator.com".to_string(),
            password: "wrongpass".to_string(),
        }
    }

    pub fn cart_add_remove() -> Credentials {
        Credentials::from_env("CART_USER", "CART_PASSWORD", "udumulav@outlook.com", "1234")
    }

    pub fn luxury_goods() -> Credentials {
        Credentials::from_env("LUXURY_USER", "LUXURY_PASSWORD", "ITC1_10102512@gmail.com", "1234")
    }

    pub fn saved_cart() -> Credentials {
        Credentials::from_env(
            "SAVED_CART_USER",
            "SAVED_CART_PASSWORD",
            "uvr0713@gmail.com",
            "1234",
        )
    }

    pub fn finished_goods_parts() -> Credentials {
        Credentials::from_env("PARTS_USER", "PARTS_PASSWORD", "ITC1_10103867@gmail.com", "1234")
    }

    pub fn global_search() -> Credentials {
        Credentials::from_env(
            "GLOBAL_SEARCH_USER",
            "GLOBAL_SEARCH_PASSWORD",
            "ITC1_10103866@gmail.com",
            "1234",
        )
    }

    pub fn quick_order() -> Credentials {
        Credentials::from_env(
            "QUICK_ORDER_USER",
            "QUICK_ORDER_PASSWORD",
            "ITC1_10103826@gmail.com",
            "1234",
        )
    }
}

/// Catalog product fixtures.
pub mod products {
    use super::Product;

    pub const AMERICAN_CLIPPER: Product = Product {
        code: "96M146",
        brand: "BULOVA",
        collection: "",
        name: "American Clipper",
    };

    pub const CITIZEN_TSUYOSA: Product = Product {
        code: "EW2440-53A",
        brand: "CITIZEN",
        collection: "TSUYOSA",
        name: "",
    };

    /// Default finished-goods fixture for cart and exclusivity flows.
    pub const BULOVA_ALL_CLOCKS: Product = Product {
        code: "36A103",
        brand: "BULOVA CLOCKS",
        collection: "All Clocks",
        name: "",
    };

    pub const LUXURY_TOURBILLON: Product = Product {
        code: "FC-980MT3HPT",
        brand: "Frederique Constant",
        collection: "",
        name: "Classic Tourbillon",
    };

    pub const CORSO: Product = Product {
        code: "EW2390-50D",
        brand: "CITIZEN",
        collection: "All Clocks",
        name: "Corso",
    };

    pub const CHANDLER: Product = Product {
        code: "AT2372-50E",
        brand: "CITIZEN",
        collection: "All Clocks",
        name: "Chandler",
    };
}

pub mod parts {
    use super::Part;

    pub const PART_1: Part = Part {
        model_number: "98R266",
        part_number: "8601410-4983",
    };
}

/// SKUs for the quick-order bulk-entry flow. Exactly ten: the quick-order
/// table caps at ten rows and the scenario exercises the cap.
pub mod quick_order {
    pub const PRODUCTS: [&str; 10] = [
        "BU2020-02A",
        "JY8035-04E",
        "EW2390-50D",
        "EG3100-09E",
        "43A144",
        "BH3002-62E",
        "AW0060-54H",
        "EU6070-51D",
        "BM6010-55A",
        "FC-303MN5B4",
    ];

    /// An SKU beyond the ten-row cap, used to trigger the max-products notice.
    pub const OVERFLOW_PRODUCT: &str = "AU1054-54G";
}

pub mod checkout {
    pub const PO_NUMBER: &str = "TestOrder";
    /// Order-cancel date offset, in months from today.
    pub const CANCEL_DATE_MONTHS_OUT: u32 = 3;
}

/// Storefront paths. The site root carries the shop/locale/currency prefix.
pub mod urls {
    pub const HOMEPAGE: &str = "/cwa/en/USD";
    pub const LOGIN: &str = "/login";
    pub const CART: &str = "/cart";
    pub const CHECKOUT: &str = "/checkout";
    pub const SAVED_CARTS: &str = "/my-account/saved-carts";
    pub const QUICK_ORDER: &str = "/my-account/quick-order";
    pub const PARTS_SEARCH: &str = "/partsSearch";

    /// Pattern matching the homepage URL after a successful login redirect.
    pub const HOMEPAGE_PATTERN: &str = r"/cwa/en/USD/?$";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_user_never_reads_env() {
        let user = users::invalid();
        assert_eq!(user.username, "wronguser@mailinator.com");
        assert_eq!(user.password, "wrongpass");
    }

    #[test]
    fn env_override_wins() {
        std::env::set_var("STOREFRONT_TEST_ENV_OVERRIDE", "someone@example.com");
        assert_eq!(
            env_or("STOREFRONT_TEST_ENV_OVERRIDE", "fallback"),
            "someone@example.com"
        );
        std::env::remove_var("STOREFRONT_TEST_ENV_OVERRIDE");
        assert_eq!(env_or("STOREFRONT_TEST_ENV_OVERRIDE", "fallback"), "fallback");
    }

    #[test]
    fn quick_order_skus_are_distinct() {
        let mut skus: Vec<&str> = quick_order::PRODUCTS.to_vec();
        skus.sort_unstable();
        skus.dedup();
        assert_eq!(skus.len(), quick_order::PRODUCTS.len());
        assert!(!skus.contains(&quick_order::OVERFLOW_PRODUCT));
    }
}
