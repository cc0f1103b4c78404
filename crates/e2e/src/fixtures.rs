//! Fixture layer: one instance of every page object bound to a session.
//!
//! Scenarios receive a [`Pages`] bundle instead of constructing page
//! objects themselves. `authenticate` is the composed variant for groups
//! that need a logged-in session before any scenario runs.

use storefront_common::testdata::Credentials;
use tracing::info;

use crate::error::E2eResult;
use crate::pages::{
    CartPage, CheckoutPage, HomePage, LoginPage, PartsSearchPage, ProductDetailPage,
    ProductListPage, QuickOrderPage, SavedCartPage, SearchResultsPage,
};
use crate::session::Session;

/// Every page object, constructed once per session.
pub struct Pages {
    pub login: LoginPage,
    pub home: HomePage,
    pub product_list: ProductListPage,
    pub product_detail: ProductDetailPage,
    pub search_results: SearchResultsPage,
    pub cart: CartPage,
    pub checkout: CheckoutPage,
    pub saved_cart: SavedCartPage,
    pub quick_order: QuickOrderPage,
    pub parts_search: PartsSearchPage,
}

impl Pages {
    pub fn new(session: &Session) -> Self {
        Self {
            login: LoginPage::new(session),
            home: HomePage::new(session),
            product_list: ProductListPage::new(session),
            product_detail: ProductDetailPage::new(session),
            search_results: SearchResultsPage::new(session),
            cart: CartPage::new(session),
            checkout: CheckoutPage::new(session),
            saved_cart: SavedCartPage::new(session),
            quick_order: QuickOrderPage::new(session),
            parts_search: PartsSearchPage::new(session),
        }
    }

    /// Log in and wait for the homepage redirect. Groups with a shared
    /// session run this once in setup; isolated scenarios call it inline.
    pub async fn authenticate(&self, creds: &Credentials) -> E2eResult<()> {
        info!(user = %creds.username, "authenticating session");
        self.login.goto().await?;
        self.login.login_and_wait(creds).await
    }
}
