//! Scenario registry: groups, tiers, session sharing and cleanup policy.
//!
//! A scenario is a plain async function over [`Ctx`]. Scenarios are
//! registered in groups; scenarios inside one group always run in order
//! (they may share cart and session state), while independent groups run
//! concurrently up to the configured worker count.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use storefront_common::testdata::Credentials;
use tracing::info;

use crate::config::{Profile, SuiteConfig};
use crate::error::{E2eError, E2eResult};
use crate::fixtures::Pages;
use crate::session::Session;
use crate::visual::SnapshotTester;

/// Everything a scenario needs, cloneable per retry attempt.
#[derive(Clone)]
pub struct Ctx {
    pub session: Session,
    pub pages: Arc<Pages>,
    pub cfg: Arc<SuiteConfig>,
    pub visual: Arc<SnapshotTester>,
}

impl Ctx {
    pub fn new(session: Session, cfg: Arc<SuiteConfig>, visual: Arc<SnapshotTester>) -> Self {
        let pages = Arc::new(Pages::new(&session));
        Self { session, pages, cfg, visual }
    }
}

pub type ScenarioFn = fn(Ctx) -> Pin<Box<dyn Future<Output = E2eResult<()>> + Send>>;

pub struct Scenario {
    pub name: &'static str,
    pub run: ScenarioFn,
}

/// Which run profiles pick the group up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Smoke,
    Feature,
    Visual,
}

/// How the group's browser session is provisioned.
#[derive(Clone, Copy)]
pub enum SessionMode {
    /// Fresh session per scenario.
    Isolated,
    /// One session for the whole group, logged in once before the first
    /// scenario. The function supplies the group's credentials.
    SharedAuthenticated(fn() -> Credentials),
}

/// Best-effort teardown after each scenario in the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleanup {
    None,
    /// Remove every cart item; failures are logged, never fatal.
    ClearCart,
}

pub struct Group {
    pub name: &'static str,
    pub tier: Tier,
    /// Part of the critical checkout path profile.
    pub critical: bool,
    pub session_mode: SessionMode,
    pub cleanup: Cleanup,
    pub scenarios: Vec<Scenario>,
}

/// Log a named step and wrap its failure with the step name, so a report
/// line reads "step `remove first item` failed: ...".
pub async fn step<T, F>(name: &str, fut: F) -> E2eResult<T>
where
    F: Future<Output = E2eResult<T>>,
{
    info!(step = name, "running");
    fut.await.map_err(|e| match e {
        err @ E2eError::StepFailed { .. } => err,
        err => E2eError::StepFailed {
            step: name.to_string(),
            reason: err.to_string(),
        },
    })
}

/// The full registry, in declaration order.
pub fn suite() -> Vec<Group> {
    let mut groups = Vec::new();
    groups.extend(crate::scenarios::smoke::groups());
    groups.extend(crate::scenarios::cart::groups());
    groups.extend(crate::scenarios::category_rules::groups());
    groups.extend(crate::scenarios::search::groups());
    groups.extend(crate::scenarios::saved_cart::groups());
    groups.extend(crate::scenarios::quick_order::groups());
    groups.extend(crate::scenarios::visual::groups());
    groups
}

/// Groups a profile selects, preserving registry order.
pub fn select(profile: Profile, groups: Vec<Group>) -> Vec<Group> {
    groups
        .into_iter()
        .filter(|g| match profile {
            Profile::Full => true,
            Profile::CheckoutCritical => g.critical,
            Profile::Smoke => g.tier == Tier::Smoke && !g.critical,
            Profile::Feature => g.tier == Tier::Feature,
            Profile::Visual => g.tier == Tier::Visual,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registry_has_no_duplicate_scenario_names() {
        let mut seen = HashSet::new();
        for group in suite() {
            for scenario in &group.scenarios {
                let key = format!("{}::{}", group.name, scenario.name);
                assert!(seen.insert(key.clone()), "duplicate scenario {key}");
            }
        }
    }

    #[test]
    fn every_group_has_scenarios() {
        for group in suite() {
            assert!(!group.scenarios.is_empty(), "group {} is empty", group.name);
        }
    }

    #[test]
    fn critical_profile_selects_only_critical_groups() {
        let selected = select(Profile::CheckoutCritical, suite());
        assert!(!selected.is_empty());
        assert!(selected.iter().all(|g| g.critical));
    }

    #[test]
    fn full_profile_selects_everything() {
        assert_eq!(select(Profile::Full, suite()).len(), suite().len());
    }

    #[test]
    fn smoke_profile_skips_the_critical_checkout_group() {
        let selected = select(Profile::Smoke, suite());
        assert!(!selected.is_empty());
        assert!(selected.iter().all(|g| !g.critical));
        assert!(selected.iter().all(|g| g.name != "checkout-critical"));
    }

    #[test]
    fn tier_profiles_and_critical_cover_the_registry() {
        let total = suite().len();
        let covered = select(Profile::Smoke, suite()).len()
            + select(Profile::Feature, suite()).len()
            + select(Profile::Visual, suite()).len()
            + select(Profile::CheckoutCritical, suite()).len();
        assert_eq!(covered, total);
    }
}
