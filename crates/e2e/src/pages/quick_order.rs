//! Quick-order page: SKU suggestion entry, the ten-row table cap, CSV
//! import and the export/template downloads.

use std::path::Path;

use regex::Regex;
use storefront_common::testdata::urls;
use thirtyfour::prelude::*;

use crate::error::{E2eError, E2eResult};
use crate::locator::{self, xpath_literal};
use crate::session::Session;

pub struct QuickOrderPage {
    session: Session,
}

impl QuickOrderPage {
    pub fn new(session: &Session) -> Self {
        Self { session: session.clone() }
    }

    fn form() -> By {
        By::Css("cw-quick-order-form")
    }

    fn product_input() -> By {
        locator::textbox_named("Enter Product name or SKU")
    }

    fn suggestion_list() -> By {
        By::Css(".product-suggestion-list ul.quick-order-results-products")
    }

    fn table_rows() -> By {
        By::Css("tr[cw-quick-order-item]")
    }

    fn row_codes() -> By {
        By::Css("tr[cw-quick-order-item] td .code-name-wrapper div")
    }

    fn row_for_code(code: &str) -> By {
        By::XPath(format!(
            "//tr[@cw-quick-order-item][.//td//*[contains(@class,'code-name-wrapper')]\
             //div[contains(normalize-space(), {})]]",
            xpath_literal(code)
        ))
    }

    fn import_dialog() -> By {
        By::Css("cw-import-entries-dialog")
    }

    fn import_summary() -> By {
        By::Css("cw-import-entries-summary")
    }

    fn file_input() -> By {
        By::Css("cw-import-entries-dialog input[type='file']")
    }

    fn info_alert() -> By {
        By::Css(".alert-info")
    }

    pub async fn goto(&self) -> E2eResult<()> {
        self.session.goto(urls::QUICK_ORDER).await?;
        self.expect_loaded().await
    }

    pub async fn expect_loaded(&self) -> E2eResult<()> {
        let timeout = self.session.config().action_timeout;
        self.session.wait_visible(Self::form(), timeout).await?;
        self.session.wait_visible(Self::product_input(), timeout).await?;
        Ok(())
    }

    /// Type a code, pick its "ID {code}" suggestion and wait for the row.
    pub async fn search_and_select_product(&self, code: &str) -> E2eResult<()> {
        let timeout = self.session.config().action_timeout;
        let input = self.session.wait_visible(Self::product_input(), timeout).await?;
        input.click().await?;
        input.clear().await?;
        input.send_keys(code).await?;

        self.session.wait_visible(Self::suggestion_list(), timeout).await?;
        self.session
            .click(locator::option_containing(&format!("ID {code}")))
            .await?;
        self.session.wait_hidden(Self::suggestion_list(), timeout).await?;

        self.session.wait_visible(Self::row_for_code(code), timeout).await?;
        Ok(())
    }

    pub async fn product_count(&self) -> E2eResult<usize> {
        self.session.count(Self::table_rows()).await
    }

    /// Codes of every table row, in display order.
    pub async fn all_product_codes(&self) -> E2eResult<Vec<String>> {
        let mut codes = Vec::new();
        for row in self.session.driver().find_all(Self::table_rows()).await? {
            if let Ok(cell) = row.find(By::Css("td .code-name-wrapper div")).await {
                let text = cell.text().await?;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    codes.push(trimmed.to_string());
                }
            }
        }
        Ok(codes)
    }

    pub async fn expect_product_in_table(&self, code: &str) -> E2eResult<()> {
        self.session
            .wait_visible(Self::row_for_code(code), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    pub async fn expect_table_empty(&self) -> E2eResult<()> {
        self.session
            .wait_count(Self::table_rows(), 0, self.session.config().expect_timeout)
            .await
    }

    /// The cap notice shown when an eleventh SKU is attempted.
    pub async fn expect_max_products_message(&self) -> E2eResult<()> {
        let pattern =
            Regex::new(r"Only \d+ valid Products/SKUs").map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        let timeout = self.session.config().expect_timeout;
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let source = self.session.page_source().await?;
            if pattern.is_match(&source) {
                return Ok(());
            }
            if std::time::Instant::now() >= deadline {
                return Err(E2eError::AssertionFailed(
                    "max-products notice not shown".into(),
                ));
            }
            tokio::time::sleep(self.session.config().poll_interval).await;
        }
    }

    pub async fn expect_info_message(&self, needle: &str) -> E2eResult<()> {
        self.session
            .wait_text_contains(Self::info_alert(), needle, self.session.config().action_timeout)
            .await?;
        Ok(())
    }

    /// Type into the product field without selecting a suggestion, for
    /// exercising the row cap.
    pub async fn fill_product_input(&self, code: &str) -> E2eResult<()> {
        let input = self
            .session
            .wait_visible(Self::product_input(), self.session.config().action_timeout)
            .await?;
        input.click().await?;
        input.clear().await?;
        input.send_keys(code).await?;
        Ok(())
    }

    pub async fn expect_input_empty(&self) -> E2eResult<()> {
        let input = self
            .session
            .wait_visible(Self::product_input(), self.session.config().expect_timeout)
            .await?;
        let value = input.attr("value").await?.unwrap_or_default();
        if value.is_empty() {
            Ok(())
        } else {
            Err(E2eError::AssertionFailed(format!(
                "product input not cleared, still holds `{value}`"
            )))
        }
    }

    pub async fn expect_import_button_visible(&self) -> E2eResult<()> {
        self.session
            .wait_visible(
                locator::button_named("Import Products"),
                self.session.config().expect_timeout,
            )
            .await?;
        Ok(())
    }

    pub async fn click_empty_list(&self) -> E2eResult<()> {
        self.session.click(locator::button_named("Empty list")).await
    }

    pub async fn click_reset(&self) -> E2eResult<()> {
        self.session.click(locator::button_named("Reset")).await
    }

    /// Trigger the CSV export. The download itself is not observable over
    /// the wire protocol; no error on click is the success signal.
    pub async fn export_products(&self) -> E2eResult<()> {
        self.session.click(locator::button_named("Export")).await
    }

    pub async fn download_template(&self) -> E2eResult<()> {
        self.session.click(locator::link_named("Download Template")).await
    }

    /// Import SKUs from a CSV file through the upload dialog.
    pub async fn import_products_from_file(&self, path: &Path) -> E2eResult<()> {
        let timeout = self.session.config().action_timeout;
        self.session.click(locator::button_named("Import Products")).await?;
        self.session.wait_visible(Self::import_dialog(), timeout).await?;

        let file_path = path
            .to_str()
            .ok_or_else(|| E2eError::InvalidConfig("import path is not valid UTF-8".into()))?;
        let input = self
            .session
            .driver()
            .query(Self::file_input())
            .wait(timeout, self.session.config().poll_interval)
            .first()
            .await?;
        input.send_keys(file_path).await?;

        self.session.click(locator::button_named("Upload")).await?;
        self.session.wait_visible(Self::import_summary(), timeout).await?;
        self.session
            .wait_text_contains(Self::import_summary(), "Upload finished", timeout)
            .await?;
        Ok(())
    }

    pub async fn expect_import_summary(&self, succeeded: usize, total: usize) -> E2eResult<()> {
        self.session
            .wait_text_contains(
                Self::import_summary(),
                &format!("{succeeded} out of {total} products have been imported successfully"),
                self.session.config().action_timeout,
            )
            .await?;
        Ok(())
    }

    pub async fn close_import_dialog(&self) -> E2eResult<()> {
        let summary = self
            .session
            .wait_visible(Self::import_summary(), self.session.config().action_timeout)
            .await?;
        summary.find(locator::button_within("Close")).await?.click().await?;
        self.session
            .wait_hidden(Self::import_dialog(), self.session.config().action_timeout)
            .await
    }

    /// Every expected code is present and the row count matches exactly.
    pub async fn expect_products_loaded(&self, expected: &[&str]) -> E2eResult<()> {
        self.session
            .wait_count(Self::table_rows(), expected.len(), self.session.config().action_timeout)
            .await?;
        let codes = self.all_product_codes().await?;
        for code in expected {
            if !codes.iter().any(|c| c.contains(code)) {
                return Err(E2eError::AssertionFailed(format!(
                    "imported code `{code}` missing from table; rows: {codes:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Build the CSV body the import dialog accepts: a header plus one
/// `code,quantity` line per SKU.
pub fn import_csv(codes: &[&str], quantity: u32) -> String {
    let mut csv = String::from("Sku,Quantity\n");
    for code in codes {
        csv.push_str(&format!("{code},{quantity}\n"));
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::import_csv;

    #[test]
    fn csv_has_header_and_one_line_per_sku() {
        let csv = import_csv(&["96M146", "EW2440-53A"], 1);
        assert_eq!(csv, "Sku,Quantity\n96M146,1\nEW2440-53A,1\n");
    }

    #[test]
    fn csv_with_no_codes_is_header_only() {
        assert_eq!(import_csv(&[], 2), "Sku,Quantity\n");
    }
}
