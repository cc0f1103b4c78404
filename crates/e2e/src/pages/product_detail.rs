//! Product detail page: add-to-cart flow and the added-to-cart dialog.

use std::time::Duration;

use regex::Regex;
use thirtyfour::prelude::*;

use crate::error::{E2eError, E2eResult};
use crate::locator;
use crate::session::Session;

/// Backend product lookups can be slow, so add-to-cart waits much longer
/// than a normal interaction before giving up.
const ADD_TO_CART_TIMEOUT: Duration = Duration::from_secs(120);

pub struct ProductDetailPage {
    session: Session,
}

impl ProductDetailPage {
    pub fn new(session: &Session) -> Self {
        Self { session: session.clone() }
    }

    fn add_to_cart_button() -> By {
        locator::button_named("Add to cart")
    }

    fn added_to_cart_dialog() -> By {
        By::Css("cx-added-to-cart-dialog")
    }

    fn view_cart_link() -> By {
        By::XPath(
            "//cx-added-to-cart-dialog//a[contains(translate(normalize-space(), \
             'VIEWCART', 'viewcart'), 'view cart')]"
                .to_string(),
        )
    }

    fn quantity_input() -> By {
        By::Css("input[type='number']")
    }

    pub async fn expect_loaded(&self) -> E2eResult<()> {
        let detail =
            Regex::new(r"/product/").map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&detail, self.session.config().expect_timeout)
            .await?;
        self.session
            .wait_visible(Self::add_to_cart_button(), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    pub async fn set_quantity(&self, quantity: u32) -> E2eResult<()> {
        self.session.fill(Self::quantity_input(), &quantity.to_string()).await
    }

    /// Click add-to-cart once the button enables. The button stays disabled
    /// until the product data finishes loading.
    pub async fn add_to_cart(&self) -> E2eResult<()> {
        let button = self
            .session
            .wait_clickable(Self::add_to_cart_button(), ADD_TO_CART_TIMEOUT)
            .await?;
        button.click().await?;
        Ok(())
    }

    pub async fn expect_added_to_cart_dialog(&self) -> E2eResult<()> {
        self.session
            .wait_visible(Self::added_to_cart_dialog(), self.session.config().action_timeout)
            .await?;
        Ok(())
    }

    /// Expect the category-rule rejection text inside the dialog.
    pub async fn expect_dialog_message(&self, needle: &str) -> E2eResult<()> {
        self.session
            .wait_text_contains(
                Self::added_to_cart_dialog(),
                needle,
                self.session.config().action_timeout,
            )
            .await?;
        Ok(())
    }

    /// Category-rule rejections surface as a page-level danger alert.
    pub async fn expect_error_message(&self, needle: &str) -> E2eResult<()> {
        self.session
            .wait_text_contains(
                By::Css(".alert.alert-danger, .alert-danger"),
                needle,
                self.session.config().action_timeout,
            )
            .await?;
        Ok(())
    }

    /// The rendered product code, e.g. "ID AT2372-50E".
    pub async fn product_code(&self) -> E2eResult<String> {
        let elem = self
            .session
            .wait_visible(By::Css(".code, .cx-code, .model"), self.session.config().expect_timeout)
            .await?;
        Ok(elem.text().await?.trim().to_string())
    }

    pub async fn expect_product_code(&self, code: &str) -> E2eResult<()> {
        let rendered = self.product_code().await?;
        if rendered.contains(code) {
            Ok(())
        } else {
            Err(E2eError::AssertionFailed(format!(
                "expected product code `{code}`, page shows `{rendered}`"
            )))
        }
    }

    /// Follow the dialog's View Cart link through to the cart page.
    pub async fn go_to_cart(&self) -> E2eResult<()> {
        self.expect_added_to_cart_dialog().await?;
        self.session.click(Self::view_cart_link()).await?;
        let cart = Regex::new(r"/cart").map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&cart, self.session.config().navigation_timeout)
            .await
    }
}
