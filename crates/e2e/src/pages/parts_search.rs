//! Parts search: model-number lookup and row-level add-to-cart.

use regex::Regex;
use storefront_common::testdata::urls;
use thirtyfour::prelude::*;

use crate::error::{E2eError, E2eResult};
use crate::locator::{self, xpath_literal};
use crate::session::Session;

pub struct PartsSearchPage {
    session: Session,
}

impl PartsSearchPage {
    pub fn new(session: &Session) -> Self {
        Self { session: session.clone() }
    }

    fn model_input() -> By {
        By::Css("[formcontrolname='modelNumber']")
    }

    fn results() -> By {
        By::Css("cw-parts-results")
    }

    fn results_table() -> By {
        By::Css("cw-parts-results table")
    }

    fn row_for_part(part_number: &str) -> By {
        By::XPath(format!(
            "//cw-parts-results//table//tr[.//td[contains(normalize-space(), {})]]",
            xpath_literal(part_number)
        ))
    }

    fn success_alert() -> By {
        By::Css(".alert.alert-success")
    }

    pub async fn goto(&self) -> E2eResult<()> {
        self.session.goto(urls::PARTS_SEARCH).await?;
        self.expect_loaded().await
    }

    /// Follow the header Parts link instead of direct navigation.
    pub async fn navigate_from_header(&self) -> E2eResult<()> {
        self.session.click(locator::link_named_exact("Parts")).await?;
        self.expect_loaded().await
    }

    pub async fn expect_loaded(&self) -> E2eResult<()> {
        let url =
            Regex::new(r"/partsSearch").map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&url, self.session.config().navigation_timeout)
            .await?;
        self.session
            .wait_visible(Self::model_input(), self.session.config().action_timeout)
            .await?;
        Ok(())
    }

    /// Search by model number and wait for the results table.
    pub async fn search_by_model_number(&self, model: &str) -> E2eResult<()> {
        self.session.fill(Self::model_input(), model).await?;
        self.session.click(locator::button_named("Search")).await?;
        self.expect_results_loaded().await
    }

    pub async fn expect_results_loaded(&self) -> E2eResult<()> {
        let timeout = self.session.config().action_timeout;
        self.session.wait_visible(Self::results(), timeout).await?;
        self.session.wait_visible(Self::results_table(), timeout).await?;
        Ok(())
    }

    pub async fn expect_part_in_results(&self, part_number: &str) -> E2eResult<()> {
        self.session
            .wait_visible(Self::row_for_part(part_number), self.session.config().action_timeout)
            .await?;
        Ok(())
    }

    /// Click the Add to Cart button on the row of the given part.
    pub async fn add_part_to_cart(&self, part_number: &str) -> E2eResult<()> {
        let row = self
            .session
            .wait_visible(Self::row_for_part(part_number), self.session.config().action_timeout)
            .await?;
        let button = row.find(locator::button_within("Add to Cart")).await?;
        button
            .wait_until()
            .wait(self.session.config().action_timeout, self.session.config().poll_interval)
            .enabled()
            .await
            .map_err(|_| E2eError::Timeout {
                what: format!("add-to-cart button for part `{part_number}`"),
                elapsed_ms: self.session.config().action_timeout.as_millis() as u64,
            })?;
        button.click().await?;
        Ok(())
    }

    /// The confirmation banner names the exact part that was added.
    pub async fn expect_added_message(&self, part_number: &str) -> E2eResult<()> {
        self.session
            .wait_text_contains(
                Self::success_alert(),
                &format!("Cart quantity for product {part_number} was updated successfully"),
                self.session.config().action_timeout,
            )
            .await?;
        Ok(())
    }
}
