//! Storefront E2E Test Suite
//!
//! Browser-driven end-to-end tests for the commerce storefront, run over
//! the WebDriver protocol against a live deployment.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Suite Runner                           │
//! │    preflight() -> run(profile) -> JSON + JUnit reports       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Scenario groups (registry)                                  │
//! │    ├── smoke: login, forgot password, checkout, navigation   │
//! │    ├── feature: cart, category rules, search, saved cart,    │
//! │    │            quick order                                  │
//! │    └── visual: login snapshot comparisons                    │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Fixtures (Pages) -> page objects -> Session (thirtyfour)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scenarios inside a group run serially and may share one authenticated
//! browser session; groups run concurrently up to the worker limit. Each
//! run profile maps to a group selection plus a retry policy.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod locator;
pub mod pages;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod scenarios;
pub mod session;
pub mod visual;

pub use config::{Profile, SuiteConfig};
pub use error::{E2eError, E2eResult};
pub use runner::SuiteRunner;
pub use session::Session;
