//! Homepage: global search box, category navigation, footer and the
//! My Account dropdown.

use regex::Regex;
use storefront_common::testdata::urls;
use thirtyfour::prelude::*;

use crate::error::{E2eError, E2eResult};
use crate::locator::{self, xpath_literal};
use crate::session::Session;

/// Anchor attributes collected for navigation-order checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    pub text: String,
    pub href: String,
    pub target: Option<String>,
}

pub struct HomePage {
    session: Session,
}

impl HomePage {
    pub fn new(session: &Session) -> Self {
        Self { session: session.clone() }
    }

    fn search_input() -> By {
        locator::textbox_named("Search")
    }

    fn shop_button() -> By {
        locator::button_named("Shop")
    }

    fn suggestion_listbox() -> By {
        By::Css("ul[role='listbox'].products")
    }

    fn search_reset_button() -> By {
        By::Css("button.reset[aria-label='Reset']")
    }

    fn my_account_button() -> By {
        By::Css("cw-navigation-ui button[aria-label='My Account']")
    }

    fn my_account_wrapper() -> By {
        By::Css("cw-navigation-ui .wrapper")
    }

    fn my_account_links() -> By {
        By::Css("cw-navigation-ui .childs cx-generic-link a")
    }

    fn account_sidebar_links() -> By {
        By::Css("cw-account-navigation .childs cx-generic-link a")
    }

    fn footer_section(title: &str) -> By {
        By::XPath(format!(
            "//footer//*[contains(@class,'links-wrapper')]\
             [.//*[contains(@class,'title-font') and normalize-space()={}]]",
            xpath_literal(title)
        ))
    }

    fn footer_section_links(title: &str) -> By {
        By::XPath(format!(
            "//footer//*[contains(@class,'links-wrapper')]\
             [.//*[contains(@class,'title-font') and normalize-space()={}]]\
             //*[contains(@class,'childs')]//cx-generic-link/a",
            xpath_literal(title)
        ))
    }

    /// Navigate to the storefront root and wait for the search box.
    pub async fn goto(&self) -> E2eResult<()> {
        self.session.goto(urls::HOMEPAGE).await?;
        self.session
            .wait_visible(Self::search_input(), self.session.config().navigation_timeout)
            .await?;
        Ok(())
    }

    pub async fn expect_homepage_loaded(&self) -> E2eResult<()> {
        self.session
            .wait_title_is("Homepage", self.session.config().expect_timeout)
            .await
    }

    // ---- global search -----------------------------------------------------

    /// Type a query into the search box without submitting, so the
    /// suggestion dropdown stays open.
    pub async fn search_product(&self, query: &str) -> E2eResult<()> {
        let input = self
            .session
            .wait_visible(Self::search_input(), self.session.config().action_timeout)
            .await?;
        input.click().await?;
        input.clear().await?;
        input.send_keys(query).await?;
        Ok(())
    }

    /// Type a query and press Enter, waiting for the results page.
    pub async fn search_product_and_submit(&self, query: &str) -> E2eResult<()> {
        let input = self
            .session
            .wait_visible(Self::search_input(), self.session.config().action_timeout)
            .await?;
        input.click().await?;
        input.clear().await?;
        input.send_keys(query).await?;
        input.send_keys(Key::Enter).await?;
        let results = Regex::new(r"/search/").map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&results, self.session.config().action_timeout)
            .await
    }

    /// Pick a product from the suggestion dropdown by visible name.
    pub async fn select_search_suggestion(&self, product_name: &str) -> E2eResult<()> {
        self.session.click(locator::option_containing(product_name)).await
    }

    /// Pick a suggestion by its "ID {code}" line.
    pub async fn select_suggestion_by_code(&self, code: &str) -> E2eResult<()> {
        self.select_search_suggestion(&format!("ID {code}")).await
    }

    pub async fn expect_search_placeholder(&self, needle: &str) -> E2eResult<()> {
        let input = self
            .session
            .wait_visible(Self::search_input(), self.session.config().expect_timeout)
            .await?;
        let placeholder = input.attr("placeholder").await?.unwrap_or_default();
        if placeholder.to_lowercase().contains(&needle.to_lowercase()) {
            Ok(())
        } else {
            Err(E2eError::AssertionFailed(format!(
                "search placeholder `{placeholder}` does not mention `{needle}`"
            )))
        }
    }

    pub async fn expect_suggestions_visible(&self) -> E2eResult<()> {
        self.session
            .wait_visible(Self::suggestion_listbox(), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    pub async fn expect_suggestion_containing(&self, needle: &str) -> E2eResult<()> {
        self.session
            .wait_text_contains(
                Self::suggestion_listbox(),
                needle,
                self.session.config().expect_timeout,
            )
            .await?;
        Ok(())
    }

    /// Items currently in the suggestion dropdown. The storefront caps the
    /// list at five.
    pub async fn suggestion_count(&self) -> E2eResult<usize> {
        self.expect_suggestions_visible().await?;
        self.session
            .count(By::Css("ul[role='listbox'].products li a[role='option']"))
            .await
    }

    /// Click the X button and confirm the input emptied.
    pub async fn clear_search(&self) -> E2eResult<()> {
        self.session.click(Self::search_reset_button()).await?;
        let input = self
            .session
            .wait_visible(Self::search_input(), self.session.config().expect_timeout)
            .await?;
        let value = input.attr("value").await?.unwrap_or_default();
        if value.is_empty() {
            Ok(())
        } else {
            Err(E2eError::AssertionFailed(format!(
                "search input not cleared, still holds `{value}`"
            )))
        }
    }

    /// The dropdown's no-results notice for a query with no matches.
    pub async fn expect_no_search_results(&self) -> E2eResult<()> {
        let timeout = self.session.config().expect_timeout;
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let source = self.session.page_source().await?;
            if source.contains("We could not find any results")
                || source.contains("No results found")
            {
                return Ok(());
            }
            if std::time::Instant::now() >= deadline {
                return Err(E2eError::AssertionFailed("no-results notice not shown".into()));
            }
            tokio::time::sleep(self.session.config().poll_interval).await;
        }
    }

    pub async fn expect_category_navigation(&self) -> E2eResult<()> {
        self.session
            .wait_visible(By::Css("cw-category-navigation"), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    pub async fn expect_header_link(&self, name: &str) -> E2eResult<()> {
        self.session
            .wait_visible(locator::link_named_exact(name), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    // ---- category navigation -----------------------------------------------

    /// Open the Shop menu and follow a brand link.
    pub async fn navigate_to_brand(&self, brand_name: &str) -> E2eResult<()> {
        self.session.click(Self::shop_button()).await?;
        self.session.click(locator::link_named_exact(brand_name)).await
    }

    /// Follow a collection link and wait for the product grid.
    pub async fn navigate_to_collection(&self, collection_name: &str) -> E2eResult<()> {
        self.session.click(locator::link_named(collection_name)).await?;
        self.session
            .wait_visible(By::Css("cw-product-grid-item"), self.session.config().action_timeout)
            .await?;
        Ok(())
    }

    // ---- footer --------------------------------------------------------

    pub async fn expect_footer_visible(&self) -> E2eResult<()> {
        self.session
            .wait_visible(By::Css("footer"), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    pub async fn expect_footer_section(&self, title: &str) -> E2eResult<()> {
        self.session
            .wait_visible(Self::footer_section(title), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    /// Collect the anchors of one footer section in DOM order.
    pub async fn footer_links(&self, section_title: &str) -> E2eResult<Vec<LinkInfo>> {
        self.expect_footer_section(section_title).await?;
        self.collect_links(Self::footer_section_links(section_title)).await
    }

    // ---- My Account dropdown ------------------------------------------

    pub async fn open_my_account_menu(&self) -> E2eResult<()> {
        self.session.click(Self::my_account_button()).await?;
        self.session
            .wait_visible(Self::my_account_wrapper(), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    /// Collapse the dropdown and confirm aria-expanded flips back.
    pub async fn close_my_account_menu(&self) -> E2eResult<()> {
        let button = self
            .session
            .wait_clickable(Self::my_account_button(), self.session.config().action_timeout)
            .await?;
        button.click().await?;
        let expanded = button.attr("aria-expanded").await?;
        if expanded.as_deref() == Some("false") {
            Ok(())
        } else {
            Err(E2eError::AssertionFailed(format!(
                "My Account dropdown still expanded (aria-expanded={expanded:?})"
            )))
        }
    }

    /// Anchors of the open My Account dropdown in DOM order.
    pub async fn my_account_menu_links(&self) -> E2eResult<Vec<LinkInfo>> {
        self.session
            .wait_visible(Self::my_account_links(), self.session.config().expect_timeout)
            .await?;
        self.collect_links(Self::my_account_links()).await
    }

    /// Follow a dropdown entry by href suffix and wait for the URL change.
    pub async fn follow_my_account_link(&self, href: &str) -> E2eResult<()> {
        let by = By::Css(format!("cw-navigation-ui .childs cx-generic-link a[href='{href}']"));
        self.session.click(by).await?;
        let pattern =
            Regex::new(&regex::escape(href)).map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&pattern, self.session.config().navigation_timeout)
            .await
    }

    // ---- My Account sidebar -------------------------------------------

    pub async fn expect_account_sidebar(&self) -> E2eResult<()> {
        let expect = self.session.config().expect_timeout;
        self.session.wait_visible(By::Css("cw-account-navigation"), expect).await?;
        self.session
            .wait_text_contains(By::Css("cw-account-navigation .title"), "My Account", expect)
            .await?;
        Ok(())
    }

    pub async fn account_sidebar_link_infos(&self) -> E2eResult<Vec<LinkInfo>> {
        self.session
            .wait_visible(Self::account_sidebar_links(), self.session.config().expect_timeout)
            .await?;
        self.collect_links(Self::account_sidebar_links()).await
    }

    async fn collect_links(&self, by: By) -> E2eResult<Vec<LinkInfo>> {
        let mut out = Vec::new();
        for anchor in self.session.driver().find_all(by).await? {
            let text = anchor.text().await?;
            let href = anchor.attr("href").await?.unwrap_or_default();
            let target = anchor.attr("target").await?;
            out.push(LinkInfo {
                text: normalize_ws(&text),
                href,
                target,
            });
        }
        Ok(out)
    }
}

/// Trim and collapse runs of whitespace, matching how link labels render.
fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::normalize_ws;

    #[test]
    fn normalize_ws_collapses_runs() {
        assert_eq!(normalize_ws("  Brand   Assets \n"), "Brand Assets");
        assert_eq!(normalize_ws("Contact Us"), "Contact Us");
        assert_eq!(normalize_ws(""), "");
    }
}
