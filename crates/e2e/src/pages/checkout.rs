//! Multi-step checkout wizard: delivery address, delivery mode with the
//! order-cancel date picker, review and order confirmation.

use chrono::{Datelike, Local, Months, NaiveDate};
use regex::Regex;
use thirtyfour::components::SelectElement;
use thirtyfour::prelude::*;

use crate::error::{E2eError, E2eResult};
use crate::locator;
use crate::session::Session;

pub struct CheckoutPage {
    session: Session,
}

impl CheckoutPage {
    pub fn new(session: &Session) -> Self {
        Self { session: session.clone() }
    }

    fn continue_button() -> By {
        locator::button_named("Continue")
    }

    fn place_order_button() -> By {
        locator::button_named("Place Order")
    }

    fn cancel_date_input() -> By {
        locator::textbox_named("Order Cancel Date")
    }

    fn year_select() -> By {
        By::Css("select[aria-label='Select year']")
    }

    fn month_select() -> By {
        By::Css("select[aria-label='Select month']")
    }

    fn po_number_input() -> By {
        locator::textbox_named("P.O. Number")
    }

    fn terms_checkbox() -> By {
        By::Css("input[formcontrolname='termsAndConditions']")
    }

    fn thank_you_message() -> By {
        By::Css("cw-order-confirmation-thank-you-message")
    }

    async fn expect_url(&self, pattern: &str) -> E2eResult<()> {
        let re = Regex::new(pattern).map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&re, self.session.config().navigation_timeout)
            .await
    }

    pub async fn expect_checkout_url(&self) -> E2eResult<()> {
        self.expect_url(r"/checkout").await
    }

    pub async fn expect_delivery_address_step(&self) -> E2eResult<()> {
        self.expect_url(r"/checkout/delivery-address").await
    }

    pub async fn expect_delivery_mode_step(&self) -> E2eResult<()> {
        self.expect_url(r"/checkout/delivery-mode").await
    }

    pub async fn expect_review_order_step(&self) -> E2eResult<()> {
        self.expect_url(r"/checkout/review-order").await
    }

    pub async fn continue_from_delivery_address(&self) -> E2eResult<()> {
        self.session.click(Self::continue_button()).await?;
        self.expect_delivery_mode_step().await
    }

    /// Fill the delivery-mode step: pick a cancel date three months out in
    /// the date-picker grid and set the purchase-order number.
    pub async fn fill_delivery_mode_details(&self, po_number: &str) -> E2eResult<()> {
        let date = cancel_date(Local::now().date_naive())?;

        self.session.click(Self::cancel_date_input()).await?;

        let timeout = self.session.config().action_timeout;
        let year = self.session.wait_visible(Self::year_select(), timeout).await?;
        SelectElement::new(&year)
            .await?
            .select_by_value(&date.year().to_string())
            .await?;
        let month = self.session.wait_visible(Self::month_select(), timeout).await?;
        SelectElement::new(&month)
            .await?
            .select_by_value(&date.month().to_string())
            .await?;

        // The grid re-renders after the month change.
        tokio::time::sleep(self.session.config().poll_interval).await;
        self.session.click(locator::gridcell_labeled(&grid_label(date))).await?;

        self.session.fill(Self::po_number_input(), po_number).await
    }

    pub async fn continue_from_delivery_mode(&self) -> E2eResult<()> {
        self.session.click(Self::continue_button()).await?;
        self.expect_review_order_step().await
    }

    pub async fn accept_terms_and_conditions(&self) -> E2eResult<()> {
        let checkbox = self
            .session
            .wait_visible(Self::terms_checkbox(), self.session.config().action_timeout)
            .await?;
        if !checkbox.is_selected().await? {
            checkbox.click().await?;
        }
        Ok(())
    }

    pub async fn place_order(&self) -> E2eResult<()> {
        self.session.click(Self::place_order_button()).await?;
        self.expect_url(r"/order-confirmation").await
    }

    pub async fn expect_order_confirmation(&self) -> E2eResult<()> {
        self.expect_url(r"/order-confirmation").await?;
        self.session
            .wait_text_contains(
                Self::thank_you_message(),
                "thank you for your order",
                self.session.config().expect_timeout,
            )
            .await?;
        Ok(())
    }
}

/// Order-cancel date: three months from `today`, clamped to the last day of
/// the target month when today's day does not exist there.
fn cancel_date(today: NaiveDate) -> E2eResult<NaiveDate> {
    today
        .checked_add_months(Months::new(storefront_common::testdata::checkout::CANCEL_DATE_MONTHS_OUT))
        .ok_or_else(|| E2eError::InvalidConfig("cancel date out of range".into()))
}

/// The aria-label the date-picker puts on each grid cell, e.g.
/// "Friday, November 27, 2026".
fn grid_label(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_date_is_three_months_out() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        assert_eq!(cancel_date(today).unwrap(), NaiveDate::from_ymd_opt(2026, 11, 29).unwrap());
    }

    #[test]
    fn cancel_date_clamps_to_month_end() {
        let today = NaiveDate::from_ymd_opt(2026, 11, 30).unwrap();
        assert_eq!(cancel_date(today).unwrap(), NaiveDate::from_ymd_opt(2027, 2, 28).unwrap());
    }

    #[test]
    fn grid_label_matches_picker_format() {
        let date = NaiveDate::from_ymd_opt(2026, 11, 27).unwrap();
        assert_eq!(grid_label(date), "Friday, November 27, 2026");
    }

    #[test]
    fn grid_label_has_no_zero_padding() {
        let date = NaiveDate::from_ymd_opt(2027, 3, 3).unwrap();
        assert_eq!(grid_label(date), "Wednesday, March 3, 2027");
    }
}
