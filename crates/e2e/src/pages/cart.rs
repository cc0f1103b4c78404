//! Active cart page.
//!
//! The cart is the most stateful screen in the suite: rows appear and
//! disappear asynchronously after every mutation, so reads go through
//! [`CartPage::stabilized_item_count`], which polls until the row count
//! stops moving or the empty-state marker shows up.

use std::time::Instant;

use regex::Regex;
use storefront_common::cart::CartItem;
use storefront_common::money::parse_currency;
use storefront_common::testdata::urls;
use thirtyfour::prelude::*;
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::locator;
use crate::session::Session;

pub struct CartPage {
    session: Session,
}

impl CartPage {
    pub fn new(session: &Session) -> Self {
        Self { session: session.clone() }
    }

    fn item_rows() -> By {
        By::Css("cw-cart-item-list-row, cx-cart-item")
    }

    fn empty_marker() -> By {
        By::Css("cx-cart-details .cx-empty, cw-cart-details .empty, .empty-cart")
    }

    fn proceed_button() -> By {
        locator::button_named("Proceed to Checkout")
    }

    fn save_cart_link() -> By {
        By::Css("cw-add-to-saved-cart a.link.cx-action-link")
    }

    fn saved_cart_form() -> By {
        By::Css("form.modal-content.cx-saved-cart-form-container")
    }

    fn clear_cart_button() -> By {
        locator::button_named("Clear Cart")
    }

    fn clear_cart_dialog() -> By {
        By::Css("cx-clear-cart-dialog")
    }

    fn global_alerts() -> By {
        By::Css(".alert-success, .alert-info, .alert-danger")
    }

    /// Navigate to `/cart` and wait until either rows or the empty-state
    /// marker render.
    pub async fn goto(&self) -> E2eResult<()> {
        self.session.goto(urls::CART).await?;
        let timeout = self.session.config().navigation_timeout;
        let deadline = Instant::now() + timeout;
        loop {
            if self.session.exists(Self::item_rows()).await?
                || self.session.exists(Self::empty_marker()).await?
            {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(E2eError::Timeout {
                    what: "cart page content".into(),
                    elapsed_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.session.config().poll_interval).await;
        }
    }

    pub async fn expect_cart_url(&self) -> E2eResult<()> {
        let cart = Regex::new(r"/cart").map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&cart, self.session.config().expect_timeout)
            .await
    }

    pub async fn expect_cart_not_empty(&self) -> E2eResult<()> {
        self.session
            .wait_visible(Self::item_rows(), self.session.config().action_timeout)
            .await?;
        Ok(())
    }

    pub async fn expect_cart_empty(&self) -> E2eResult<()> {
        let count = self.stabilized_item_count().await?;
        if count == 0 {
            Ok(())
        } else {
            Err(E2eError::AssertionFailed(format!(
                "expected empty cart, found {count} item(s)"
            )))
        }
    }

    pub async fn expect_empty_cart_message(&self) -> E2eResult<()> {
        self.session
            .wait_visible(Self::empty_marker(), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    /// Alert text anywhere on the page, e.g. category-rule rejections or
    /// the saved-cart confirmation.
    pub async fn expect_message(&self, needle: &str) -> E2eResult<()> {
        self.session
            .wait_text_contains(Self::global_alerts(), needle, self.session.config().action_timeout)
            .await?;
        Ok(())
    }

    // ---- row reads ---------------------------------------------------------

    /// Poll the row count until two consecutive reads agree, or the
    /// empty-state marker appears (count 0).
    pub async fn stabilized_item_count(&self) -> E2eResult<usize> {
        let timeout = self.session.config().action_timeout;
        let deadline = Instant::now() + timeout;
        let mut previous: Option<usize> = None;
        loop {
            if self.session.exists(Self::empty_marker()).await? {
                return Ok(0);
            }
            let count = self.session.count(Self::item_rows()).await?;
            if previous == Some(count) {
                return Ok(count);
            }
            previous = Some(count);
            if Instant::now() >= deadline {
                return Ok(count);
            }
            tokio::time::sleep(self.session.config().poll_interval).await;
        }
    }

    /// Scrape every row into a [`CartItem`] projection.
    pub async fn all_cart_items(&self) -> E2eResult<Vec<CartItem>> {
        if self.stabilized_item_count().await? == 0 {
            return Ok(Vec::new());
        }
        let mut items = Vec::new();
        for row in self.session.driver().find_all(Self::item_rows()).await? {
            items.push(self.read_row(&row).await?);
        }
        Ok(items)
    }

    async fn read_row(&self, row: &WebElement) -> E2eResult<CartItem> {
        let sku = text_of(row, "[class*='code'], .model").await.unwrap_or_default();
        let name = text_of(row, ".cx-name, [class*='name'] a, [class*='name']")
            .await
            .unwrap_or_default();
        let quantity = quantity_of(row).await.unwrap_or(0);
        Ok(CartItem {
            sku,
            name,
            retail_price: price_of(row, "[class*='retail']").await,
            cost_price: price_of(row, "[class*='cost']").await,
            quantity,
            ship_qty: uint_of(row, "[class*='ship'][class*='qty'], .ship-qty")
                .await
                .unwrap_or(0),
            ship_price: price_of(row, "[class*='ship'][class*='price'], .ship-price").await,
            bo_qty: uint_of(row, "[class*='bo'][class*='qty'], .bo-qty").await.unwrap_or(0),
            bo_price: price_of(row, "[class*='bo'][class*='price'], .bo-price").await,
            total_price: price_of(row, "[class*='total']").await,
        })
    }

    // ---- mutations ---------------------------------------------------------

    /// Remove the row whose code matches `sku`, then wait for the count to
    /// settle below its previous value.
    pub async fn remove_item_by_sku(&self, sku: &str) -> E2eResult<()> {
        let before = self.stabilized_item_count().await?;
        if before == 0 {
            return Err(E2eError::Precondition("cart is already empty".into()));
        }
        let row = self.row_for_sku(sku).await?;
        self.click_remove(&row).await?;
        self.wait_count_below(before).await
    }

    /// Remove the first row. Guarded: never attempted on an empty cart.
    pub async fn remove_first_item(&self) -> E2eResult<()> {
        let before = self.stabilized_item_count().await?;
        if before == 0 {
            return Err(E2eError::Precondition("cart is already empty".into()));
        }
        let rows = self.session.driver().find_all(Self::item_rows()).await?;
        let first = rows.first().ok_or_else(|| {
            E2eError::Precondition("cart rows vanished before removal".into())
        })?;
        self.click_remove(first).await?;
        self.wait_count_below(before).await
    }

    /// Loop single-row removal until the cart is empty.
    pub async fn remove_all_items(&self) -> E2eResult<()> {
        loop {
            let count = self.stabilized_item_count().await?;
            if count == 0 {
                return Ok(());
            }
            debug!(remaining = count, "removing cart item");
            self.remove_first_item().await?;
        }
    }

    async fn row_for_sku(&self, sku: &str) -> E2eResult<WebElement> {
        for row in self.session.driver().find_all(Self::item_rows()).await? {
            let text = row.text().await?;
            if text.contains(sku) {
                return Ok(row);
            }
        }
        Err(E2eError::AssertionFailed(format!("no cart row for sku `{sku}`")))
    }

    async fn click_remove(&self, row: &WebElement) -> E2eResult<()> {
        // Spartacus renders either a Remove button or an action link.
        let button = match row.find(locator::button_within("Remove")).await {
            Ok(b) => b,
            Err(_) => row.find(By::Css("button.cx-remove-btn, .cx-remove-btn")).await?,
        };
        button.scroll_into_view().await?;
        button.click().await?;
        Ok(())
    }

    async fn wait_count_below(&self, before: usize) -> E2eResult<()> {
        let timeout = self.session.config().action_timeout;
        let deadline = Instant::now() + timeout;
        loop {
            if self.session.exists(Self::empty_marker()).await? {
                return Ok(());
            }
            let count = self.session.count(Self::item_rows()).await?;
            if count < before {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(E2eError::Timeout {
                    what: format!("cart row count to drop below {before}"),
                    elapsed_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.session.config().poll_interval).await;
        }
    }

    // ---- clear-cart dialog --------------------------------------------

    pub async fn click_clear_cart(&self) -> E2eResult<()> {
        self.session.click(Self::clear_cart_button()).await
    }

    pub async fn expect_clear_cart_dialog(&self) -> E2eResult<()> {
        self.session
            .wait_visible(Self::clear_cart_dialog(), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    pub async fn confirm_clear_cart(&self) -> E2eResult<()> {
        let dialog = self
            .session
            .wait_visible(Self::clear_cart_dialog(), self.session.config().expect_timeout)
            .await?;
        dialog.find(locator::button_within("Clear Cart")).await?.click().await?;
        self.session
            .wait_hidden(Self::clear_cart_dialog(), self.session.config().action_timeout)
            .await
    }

    pub async fn cancel_clear_cart(&self) -> E2eResult<()> {
        let dialog = self
            .session
            .wait_visible(Self::clear_cart_dialog(), self.session.config().expect_timeout)
            .await?;
        dialog.find(locator::button_within("Cancel")).await?.click().await?;
        self.session
            .wait_hidden(Self::clear_cart_dialog(), self.session.config().action_timeout)
            .await
    }

    // ---- save for later ------------------------------------------------

    /// Open the save-cart modal, name the cart, and submit.
    pub async fn save_cart_as(&self, name: &str) -> E2eResult<()> {
        self.session.click(Self::save_cart_link()).await?;
        self.session
            .wait_visible(Self::saved_cart_form(), self.session.config().action_timeout)
            .await?;
        self.session.fill(By::Css("input[formcontrolname='name']"), name).await?;
        self.session
            .click(By::Css(".cx-saved-cart-form-footer button.btn-primary"))
            .await?;
        self.session
            .wait_hidden(Self::saved_cart_form(), self.session.config().action_timeout)
            .await
    }

    // ---- checkout handoff ------------------------------------------------

    pub async fn expect_checkout_enabled(&self) -> E2eResult<()> {
        self.session
            .wait_clickable(Self::proceed_button(), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    pub async fn proceed_to_checkout(&self) -> E2eResult<()> {
        self.session.click(Self::proceed_button()).await?;
        let checkout =
            Regex::new(r"/checkout").map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&checkout, self.session.config().navigation_timeout)
            .await
    }

    // ---- assertions over scraped rows -----------------------------------

    pub async fn expect_product_in_cart(&self, sku: &str) -> E2eResult<()> {
        let items = self.all_cart_items().await?;
        if items.iter().any(|item| item.matches_sku(sku)) {
            Ok(())
        } else {
            Err(E2eError::AssertionFailed(format!(
                "sku `{sku}` not in cart; rows: {:?}",
                items.iter().map(|i| i.sku.as_str()).collect::<Vec<_>>()
            )))
        }
    }

    /// Exactly one row, and it matches `sku`.
    pub async fn expect_only_product_in_cart(&self, sku: &str) -> E2eResult<()> {
        let items = self.all_cart_items().await?;
        match items.as_slice() {
            [only] if only.matches_sku(sku) => Ok(()),
            _ => Err(E2eError::AssertionFailed(format!(
                "expected only `{sku}` in cart; rows: {:?}",
                items.iter().map(|i| i.sku.as_str()).collect::<Vec<_>>()
            ))),
        }
    }
}

async fn text_of(row: &WebElement, css: &str) -> Option<String> {
    let elem = row.find(By::Css(css)).await.ok()?;
    let text = elem.text().await.ok()?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

async fn price_of(row: &WebElement, css: &str) -> Option<f64> {
    parse_currency(&text_of(row, css).await?)
}

async fn uint_of(row: &WebElement, css: &str) -> Option<u32> {
    text_of(row, css).await?.trim().parse().ok()
}

/// Quantity lives in a number input when editable, plain text otherwise.
async fn quantity_of(row: &WebElement) -> Option<u32> {
    if let Ok(input) = row.find(By::Css("input[type='number']")).await {
        if let Ok(Some(value)) = input.attr("value").await {
            if let Ok(n) = value.trim().parse() {
                return Some(n);
            }
        }
    }
    uint_of(row, "[class*='quantity']").await
}
