//! Saved-cart list and detail pages under My Account.

use regex::Regex;
use storefront_common::testdata::urls;
use thirtyfour::prelude::*;

use crate::error::{E2eError, E2eResult};
use crate::locator::{self, xpath_literal};
use crate::session::Session;

pub struct SavedCartPage {
    session: Session,
}

impl SavedCartPage {
    pub fn new(session: &Session) -> Self {
        Self { session: session.clone() }
    }

    fn list() -> By {
        By::Css("cw-saved-cart-list")
    }

    fn cart_link(name: &str) -> By {
        By::XPath(format!(
            "//cw-saved-cart-list//table//tbody//tr//td//a[contains(normalize-space(), {})]",
            xpath_literal(name)
        ))
    }

    fn restore_button() -> By {
        By::XPath(
            "//cw-saved-cart-details-action//button[contains(@class,'btn-primary')]\
             [contains(normalize-space(), 'Restore cart')]"
                .to_string(),
        )
    }

    fn modal_form() -> By {
        By::Css("form.modal-content.cx-saved-cart-form-container")
    }

    fn modal_confirm_restore() -> By {
        By::XPath(
            "//*[contains(@class,'cx-saved-cart-form-footer')]\
             //button[contains(@class,'btn-primary')][contains(normalize-space(), 'Restore')]"
                .to_string(),
        )
    }

    pub async fn goto(&self) -> E2eResult<()> {
        self.session.goto(urls::SAVED_CARTS).await?;
        self.expect_loaded().await
    }

    /// Follow the Saved Carts header link instead of direct navigation.
    pub async fn navigate_from_header(&self) -> E2eResult<()> {
        self.session.click(locator::link_named("Saved Cart")).await?;
        self.expect_loaded().await
    }

    pub async fn expect_loaded(&self) -> E2eResult<()> {
        let url = Regex::new(r"saved.*cart").map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&url, self.session.config().navigation_timeout)
            .await?;
        self.session
            .wait_visible(Self::list(), self.session.config().action_timeout)
            .await?;
        Ok(())
    }

    pub async fn expect_saved_cart_in_list(&self, name: &str) -> E2eResult<()> {
        self.session
            .wait_visible(Self::cart_link(name), self.session.config().action_timeout)
            .await?;
        Ok(())
    }

    /// Open the detail page of the named saved cart.
    pub async fn open_saved_cart(&self, name: &str) -> E2eResult<()> {
        self.session.click(Self::cart_link(name)).await?;
        let detail = Regex::new(r"my-account/saved-cart")
            .map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&detail, self.session.config().navigation_timeout)
            .await
    }

    /// The detail page lists the saved rows; assert one mentions `sku`.
    pub async fn expect_product_in_details(&self, sku: &str) -> E2eResult<()> {
        let by = By::XPath(format!("//*[contains(normalize-space(), {})]", xpath_literal(sku)));
        self.session
            .wait_visible(by, self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    pub async fn expect_restore_enabled(&self) -> E2eResult<()> {
        self.session
            .wait_clickable(Self::restore_button(), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    /// Run the restore flow: open the modal, confirm, wait for it to close.
    pub async fn restore_cart(&self) -> E2eResult<()> {
        self.session.click(Self::restore_button()).await?;
        let expect = self.session.config().expect_timeout;
        self.session.wait_visible(Self::modal_form(), expect).await?;
        self.session
            .wait_text_contains(
                By::Css(".cx-saved-cart-form-title"),
                "Restore Saved Cart",
                expect,
            )
            .await?;
        self.session.click(Self::modal_confirm_restore()).await?;
        self.session
            .wait_hidden(Self::modal_form(), self.session.config().action_timeout)
            .await
    }
}
