//! Run configuration: endpoints, timeouts, capture policy, run profiles.
//!
//! Everything here is declarative. Scheduling, waiting and retry semantics
//! are carried out by the WebDriver backend and the suite runner; this
//! module only names the knobs.

use std::path::PathBuf;
use std::time::Duration;

/// Default public QA storefront. Override with `BASE_URL`.
const DEFAULT_BASE_URL: &str =
    "https://jsapps.c3ntdqbuek-citizenwa1-s1-public.model-t.cc.commerce.ondemand.com";

/// Default chromedriver endpoint. Override with `WEBDRIVER_URL`.
const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Suite-wide configuration, shared by the runner, sessions and page objects.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Storefront root; all navigation paths are joined onto it.
    pub base_url: String,

    /// WebDriver (chromedriver / selenium standalone) endpoint.
    pub webdriver_url: String,

    /// Run the browser headless. Forced on in Docker/cloud environments.
    pub headless: bool,

    /// Extra browser launch flags (sandbox/shm flags in containers).
    pub browser_args: Vec<String>,

    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Per-interaction bound (click/fill target must become visible).
    pub action_timeout: Duration,

    /// Bound on URL-pattern and page-load waits.
    pub navigation_timeout: Duration,

    /// Polling window for `expect_*` assertions.
    pub expect_timeout: Duration,

    /// Hard cap on one scenario end to end.
    pub test_timeout: Duration,

    /// Poll interval for bounded waits.
    pub poll_interval: Duration,

    /// Concurrent scenario groups.
    pub workers: usize,

    /// Whether this is a CI run (affects retry policy).
    pub ci: bool,

    /// Root for failure artifacts, screenshots and reports.
    pub output_dir: PathBuf,

    /// Overwrite visual baselines instead of comparing.
    pub update_baselines: bool,

    /// Allowed pixel difference for visual comparisons, in percent.
    pub visual_threshold: f64,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        let in_container = std::env::var("DOCKER").map(|v| v == "true").unwrap_or(false)
            || std::env::var("CF_INSTANCE_INDEX").is_ok();
        let ci = std::env::var("CI").is_ok();

        let mut browser_args = Vec::new();
        if in_container {
            // Chrome refuses to start in unprivileged containers without these.
            browser_args.extend(
                [
                    "--disable-dev-shm-usage",
                    "--no-sandbox",
                    "--disable-setuid-sandbox",
                    "--disable-gpu",
                ]
                .map(String::from),
            );
        }

        Self {
            base_url: std::env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            webdriver_url: std::env::var("WEBDRIVER_URL")
                .unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_string()),
            headless: in_container || std::env::var("HEADLESS").map(|v| v == "1").unwrap_or(true),
            browser_args,
            viewport_width: 1280,
            viewport_height: 720,
            action_timeout: Duration::from_secs(15),
            navigation_timeout: Duration::from_secs(30),
            expect_timeout: Duration::from_secs(10),
            test_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(250),
            workers: if ci { 1 } else { 4 },
            ci,
            output_dir: PathBuf::from("test-results"),
            update_baselines: false,
            visual_threshold: 0.5,
        }
    }
}

impl SuiteConfig {
    /// Join a storefront path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

/// Named run profiles, each mapping to a scenario selection and a retry
/// policy applied uniformly by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "kebab-case")]
pub enum Profile {
    /// Everything.
    Full,
    /// The checkout happy path only, no retries.
    CheckoutCritical,
    /// Smoke tier minus the critical checkout path, no retries.
    Smoke,
    /// Business-rule edge cases, no retries.
    Feature,
    /// Pixel-comparison regression.
    Visual,
}

impl Profile {
    /// Retries on CI mirror the automated environment policy; local runs
    /// never retry so flakiness stays visible during development.
    pub fn retries(self, ci: bool) -> u32 {
        match self {
            Profile::Full | Profile::Visual => {
                if ci {
                    2
                } else {
                    0
                }
            }
            Profile::CheckoutCritical | Profile::Smoke | Profile::Feature => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Full => "full",
            Profile::CheckoutCritical => "checkout-critical",
            Profile::Smoke => "smoke",
            Profile::Feature => "feature",
            Profile::Visual => "visual",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_join_handles_slashes() {
        let cfg = SuiteConfig {
            base_url: "https://shop.example.com/".to_string(),
            ..SuiteConfig::default()
        };
        assert_eq!(cfg.url("/login"), "https://shop.example.com/login");
        assert_eq!(cfg.url("cart"), "https://shop.example.com/cart");
    }

    #[test]
    fn retry_policy_per_profile() {
        assert_eq!(Profile::Full.retries(true), 2);
        assert_eq!(Profile::Full.retries(false), 0);
        assert_eq!(Profile::Smoke.retries(true), 0);
        assert_eq!(Profile::CheckoutCritical.retries(true), 0);
        assert_eq!(Profile::Feature.retries(true), 0);
        assert_eq!(Profile::Visual.retries(true), 2);
    }
}
