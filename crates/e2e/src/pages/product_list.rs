//! Product listing grid (brand and collection pages).

use regex::Regex;
use thirtyfour::prelude::*;

use crate::error::{E2eError, E2eResult};
use crate::locator::xpath_literal;
use crate::session::Session;

pub struct ProductListPage {
    session: Session,
}

impl ProductListPage {
    pub fn new(session: &Session) -> Self {
        Self { session: session.clone() }
    }

    fn product_cards() -> By {
        By::Css("cw-product-grid-item")
    }

    fn card_link_for_code(code: &str) -> By {
        By::XPath(format!(
            "//cw-product-grid-item[contains(., {})]//a",
            xpath_literal(code)
        ))
    }

    pub async fn expect_products_visible(&self) -> E2eResult<()> {
        self.session
            .wait_visible(Self::product_cards(), self.session.config().action_timeout)
            .await?;
        Ok(())
    }

    pub async fn product_count(&self) -> E2eResult<usize> {
        self.session.count(Self::product_cards()).await
    }

    /// Open the detail page of the grid card that shows `code`.
    pub async fn select_product_by_code(&self, code: &str) -> E2eResult<()> {
        self.session.click(Self::card_link_for_code(code)).await?;
        self.wait_for_detail_page().await
    }

    /// Open the detail page of the n-th grid card.
    pub async fn select_product_by_index(&self, index: usize) -> E2eResult<()> {
        let timeout = self.session.config().action_timeout;
        self.session.wait_visible(Self::product_cards(), timeout).await?;
        let cards = self.session.driver().find_all(Self::product_cards()).await?;
        let card = cards.get(index).ok_or_else(|| {
            E2eError::AssertionFailed(format!(
                "wanted product card {index} but grid has {}",
                cards.len()
            ))
        })?;
        card.find(By::Tag("a")).await?.click().await?;
        self.wait_for_detail_page().await
    }

    async fn wait_for_detail_page(&self) -> E2eResult<()> {
        let detail =
            Regex::new(r"/product/").map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&detail, self.session.config().action_timeout)
            .await
    }
}
