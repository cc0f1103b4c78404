//! Login screen: credential form, alert banners, forgot-password dialog.

use regex::Regex;
use storefront_common::testdata::{urls, Credentials};
use thirtyfour::By;

use crate::error::{E2eError, E2eResult};
use crate::session::Session;

pub struct LoginPage {
    session: Session,
}

impl LoginPage {
    pub fn new(session: &Session) -> Self {
        Self { session: session.clone() }
    }

    fn form() -> By {
        By::Css("cw-login-form")
    }

    fn username_input() -> By {
        By::Css("cw-login-form input[formcontrolname='userId']")
    }

    fn password_input() -> By {
        By::Css("cw-login-form input[formcontrolname='password']")
    }

    fn submit_button() -> By {
        By::Css("cw-login-form button[type='submit']")
    }

    fn error_alert() -> By {
        By::Css(".alert-danger")
    }

    fn success_alert() -> By {
        By::Css(".alert-success")
    }

    fn banner() -> By {
        By::Css("cx-banner")
    }

    fn forgot_password_button() -> By {
        By::Css("cw-forgot-password-button button[type='button']")
    }

    fn forgot_password_dialog() -> By {
        By::Css("cw-forgot-password-dialog")
    }

    fn forgot_password_input() -> By {
        By::Css("input[formcontrolname='userEmail']")
    }

    /// Navigate to `/login` and wait for the form to be interactive.
    pub async fn goto(&self) -> E2eResult<()> {
        self.session.goto(urls::LOGIN).await?;
        self.session
            .wait_visible(Self::username_input(), self.session.config().navigation_timeout)
            .await?;
        Ok(())
    }

    pub async fn login(&self, creds: &Credentials) -> E2eResult<()> {
        self.session.fill(Self::username_input(), &creds.username).await?;
        self.session.fill(Self::password_input(), &creds.password).await?;
        self.session.click(Self::submit_button()).await
    }

    /// Log in and wait for the homepage redirect to land.
    pub async fn login_and_wait(&self, creds: &Credentials) -> E2eResult<()> {
        self.login(creds).await?;
        let homepage = Regex::new(urls::HOMEPAGE_PATTERN)
            .map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&homepage, self.session.config().navigation_timeout)
            .await
    }

    pub async fn expect_login_form_visible(&self) -> E2eResult<()> {
        let expect = self.session.config().expect_timeout;
        self.session.wait_visible(Self::form(), expect).await?;
        self.session.wait_visible(Self::username_input(), expect).await?;
        self.session.wait_visible(Self::password_input(), expect).await?;
        Ok(())
    }

    pub async fn expect_banner_visible(&self) -> E2eResult<()> {
        self.session
            .wait_visible(Self::banner(), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    pub async fn expect_error_message(&self, needle: &str) -> E2eResult<()> {
        self.session
            .wait_text_contains(Self::error_alert(), needle, self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    pub async fn expect_success_message(&self, needle: &str) -> E2eResult<()> {
        self.session
            .wait_text_contains(Self::success_alert(), needle, self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    pub async fn expect_still_on_login(&self) -> E2eResult<()> {
        let pattern =
            Regex::new(r"/login").map_err(|e| E2eError::InvalidConfig(e.to_string()))?;
        self.session
            .wait_url_matches(&pattern, self.session.config().expect_timeout)
            .await
    }

    // ---- forgot password ---------------------------------------------------

    pub async fn expect_forgot_password_button_visible(&self) -> E2eResult<()> {
        self.session
            .wait_visible(Self::forgot_password_button(), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    pub async fn open_forgot_password(&self) -> E2eResult<()> {
        self.session.click(Self::forgot_password_button()).await?;
        self.session
            .wait_visible(Self::forgot_password_dialog(), self.session.config().expect_timeout)
            .await?;
        Ok(())
    }

    pub async fn expect_forgot_password_dialog_text(&self, needle: &str) -> E2eResult<()> {
        self.session
            .wait_text_contains(
                Self::forgot_password_dialog(),
                needle,
                self.session.config().expect_timeout,
            )
            .await?;
        Ok(())
    }

    pub async fn submit_forgot_password(&self, email: &str) -> E2eResult<()> {
        let dialog = self
            .session
            .wait_visible(Self::forgot_password_dialog(), self.session.config().expect_timeout)
            .await?;
        self.session.fill(Self::forgot_password_input(), email).await?;
        let submit = dialog.find(crate::locator::button_within("Reset")).await?;
        submit.click().await.map_err(E2eError::from)
    }
}
