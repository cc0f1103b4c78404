//! Page objects: one wrapper per storefront screen.
//!
//! Each page object binds semantic locators and intention-revealing actions
//! to a live [`Session`](crate::session::Session). Actions wait for their
//! target's visibility/enabled state before interacting; `expect_*` helpers
//! poll within the configured expect window. Page objects track the
//! storefront's markup: if the application changes, the page object is the
//! one place to update.

pub mod cart;
pub mod checkout;
pub mod home;
pub mod login;
pub mod parts_search;
pub mod product_detail;
pub mod product_list;
pub mod quick_order;
pub mod saved_cart;
pub mod search_results;

pub use cart::CartPage;
pub use checkout::CheckoutPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use parts_search::PartsSearchPage;
pub use product_detail::ProductDetailPage;
pub use product_list::ProductListPage;
pub use quick_order::QuickOrderPage;
pub use saved_cart::SavedCartPage;
pub use search_results::SearchResultsPage;
