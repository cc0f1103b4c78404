//! Global search results grid.

use regex::Regex;
use thirtyfour::prelude::*;

use crate::error::{E2eError, E2eResult};
use crate::locator::xpath_literal;
use crate::session::Session;

pub struct SearchResultsPage {
    session: Session,
}

impl SearchResultsPage {
    pub fn new(session: &Session) -> Self {
        Self { session: session.clone() }
    }

    fn product_tiles() -> By {
        By::Css("[cw-product-tile]")
    }

    fn tile_models() -> By {
        By::Css("[cw-product-tile] .model")
    }

    fn tile_for_code(code: &str) -> By {
        By::XPath(format!(
            "//*[@cw-product-tile][.//*[contains(@class,'model') and contains(., {})]]",
            xpath_literal(code)
        ))
    }

    fn tile_link_for_code(code: &str) -> By {
        By::XPath(format!(
            "//*[@cw-product-tile][.//*[contains(@class,'model') and contains(., {})]]//a",
            xpath_literal(code)
        ))
    }

    pub async fn expect_loaded(&self) -> E2eResult<()> {
        let results =
            Regex::new(r"/search/").map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&results, self.session.config().expect_timeout)
            .await?;
        self.session
            .wait_visible(Self::product_tiles(), self.session.config().action_timeout)
            .await?;
        Ok(())
    }

    pub async fn expect_product_tile(&self, code: &str) -> E2eResult<()> {
        self.session
            .wait_visible(Self::tile_for_code(code), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    /// Open the detail page of the tile showing `code`.
    pub async fn select_product_by_code(&self, code: &str) -> E2eResult<()> {
        self.session
            .wait_visible(Self::product_tiles(), self.session.config().action_timeout)
            .await?;
        self.session.click(Self::tile_link_for_code(code)).await?;
        let detail =
            Regex::new(r"/product/").map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&detail, self.session.config().action_timeout)
            .await
    }

    /// Model codes of every tile on the page, in display order.
    pub async fn product_codes(&self) -> E2eResult<Vec<String>> {
        self.session
            .wait_visible(Self::product_tiles(), self.session.config().action_timeout)
            .await?;
        let mut codes = Vec::new();
        for model in self.session.driver().find_all(Self::tile_models()).await? {
            let text = model.text().await?;
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                codes.push(trimmed.to_string());
            }
        }
        Ok(codes)
    }
}
