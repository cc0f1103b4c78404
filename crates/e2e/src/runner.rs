//! Suite runner: group scheduling, session provisioning, retries,
//! best-effort cleanup and report emission.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::config::{Profile, SuiteConfig};
use crate::error::{E2eError, E2eResult};
use crate::report::{ScenarioResult, SuiteResult};
use crate::scenario::{self, Cleanup, Ctx, Group, Scenario, SessionMode};
use crate::session::Session;
use crate::visual::SnapshotTester;

pub struct SuiteRunner {
    cfg: Arc<SuiteConfig>,
    profile: Profile,
    /// Substring filter on `group::scenario` names.
    filter: Option<String>,
    visual: Arc<SnapshotTester>,
}

impl SuiteRunner {
    pub fn new(cfg: SuiteConfig, profile: Profile, filter: Option<String>) -> E2eResult<Self> {
        let visual = Arc::new(SnapshotTester::new(
            &cfg.output_dir,
            cfg.visual_threshold,
            cfg.update_baselines,
        )?);
        Ok(Self {
            cfg: Arc::new(cfg),
            profile,
            filter,
            visual,
        })
    }

    /// Confirm the WebDriver endpoint answers before opening any session.
    pub async fn preflight(&self) -> E2eResult<()> {
        let status_url = format!("{}/status", self.cfg.webdriver_url.trim_end_matches('/'));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        let response = client.get(&status_url).send().await.map_err(|e| {
            E2eError::WebDriverUnreachable {
                url: self.cfg.webdriver_url.clone(),
                reason: e.to_string(),
            }
        })?;
        if response.status().is_success() {
            info!(endpoint = %self.cfg.webdriver_url, "webdriver endpoint ready");
            Ok(())
        } else {
            Err(E2eError::WebDriverUnreachable {
                url: self.cfg.webdriver_url.clone(),
                reason: format!("status endpoint returned {}", response.status()),
            })
        }
    }

    /// Run the selected profile and write the JSON and JUnit reports.
    pub async fn run(&self) -> E2eResult<SuiteResult> {
        let started = Instant::now();
        let groups = self.selected_groups();
        let names: Vec<&str> = groups.iter().map(|g| g.name).collect();
        info!(
            profile = self.profile.as_str(),
            groups = ?names,
            workers = self.cfg.workers,
            "starting run"
        );

        let mut results: Vec<ScenarioResult> = stream::iter(groups)
            .map(|group| self.run_group(group))
            .buffer_unordered(self.cfg.workers.max(1))
            .collect::<Vec<Vec<ScenarioResult>>>()
            .await
            .into_iter()
            .flatten()
            .collect();
        results.sort_by(|a, b| (&a.group, &a.name).cmp(&(&b.group, &b.name)));

        let suite = SuiteResult::from_results(
            self.profile.as_str(),
            results,
            started.elapsed().as_millis() as u64,
        );
        suite.write_json(&self.cfg.output_dir)?;
        suite.write_junit(&self.cfg.output_dir)?;
        info!(
            total = suite.total,
            passed = suite.passed,
            failed = suite.failed,
            "run finished"
        );
        Ok(suite)
    }

    fn selected_groups(&self) -> Vec<Group> {
        let mut groups = scenario::select(self.profile, scenario::suite());
        if let Some(filter) = &self.filter {
            for group in &mut groups {
                group
                    .scenarios
                    .retain(|s| format!("{}::{}", group.name, s.name).contains(filter.as_str()));
            }
            groups.retain(|g| !g.scenarios.is_empty());
        }
        groups
    }

    /// Scenarios within a group run in order; groups run concurrently.
    async fn run_group(&self, group: Group) -> Vec<ScenarioResult> {
        info!(group = group.name, scenarios = group.scenarios.len(), "group starting");
        match group.session_mode {
            SessionMode::SharedAuthenticated(creds_fn) => {
                self.run_shared_group(&group, creds_fn).await
            }
            SessionMode::Isolated => self.run_isolated_group(&group).await,
        }
    }

    async fn run_shared_group(
        &self,
        group: &Group,
        creds_fn: fn() -> storefront_common::testdata::Credentials,
    ) -> Vec<ScenarioResult> {
        let ctx = match self.open_ctx().await {
            Ok(ctx) => ctx,
            Err(e) => return self.fail_whole_group(group, &format!("session setup: {e}")),
        };
        if let Err(e) = ctx.pages.authenticate(&creds_fn()).await {
            let results = self.fail_whole_group(group, &format!("authentication: {e}"));
            self.close(ctx.session.clone()).await;
            return results;
        }

        let mut results = Vec::with_capacity(group.scenarios.len());
        for scenario in &group.scenarios {
            results.push(self.run_scenario_shared(group, scenario, &ctx).await);
            self.cleanup(group, &ctx).await;
        }
        self.close(ctx.session.clone()).await;
        results
    }

    async fn run_isolated_group(&self, group: &Group) -> Vec<ScenarioResult> {
        let mut results = Vec::with_capacity(group.scenarios.len());
        for scenario in &group.scenarios {
            results.push(self.run_scenario_isolated(group, scenario).await);
        }
        results
    }

    /// One scenario on the group's shared session. A retry cannot get a
    /// fresh session without losing the group's authenticated state, so
    /// between attempts the cart is cleared and the browser returns to the
    /// homepage before the scenario starts over.
    async fn run_scenario_shared(
        &self,
        group: &Group,
        scenario: &Scenario,
        ctx: &Ctx,
    ) -> ScenarioResult {
        let retries = self.profile.retries(self.cfg.ci);
        let started = Instant::now();
        let mut last_error = String::new();

        for attempt in 0..=retries {
            if attempt > 0 {
                warn!(group = group.name, scenario = scenario.name, attempt, "retrying");
                self.reset_shared_session(group, ctx).await;
            }
            match self.attempt(group, scenario, ctx.clone(), attempt).await {
                Ok(()) => return self.passed(group, scenario, started, attempt),
                Err(e) => last_error = e,
            }
        }
        self.failed(group, scenario, started, retries, last_error)
    }

    /// One scenario with a fresh browser session per attempt, so a retry
    /// never resumes from the failed attempt's page or cart state.
    async fn run_scenario_isolated(&self, group: &Group, scenario: &Scenario) -> ScenarioResult {
        let retries = self.profile.retries(self.cfg.ci);
        let started = Instant::now();
        let mut last_error = String::new();

        for attempt in 0..=retries {
            if attempt > 0 {
                warn!(
                    group = group.name,
                    scenario = scenario.name,
                    attempt,
                    "retrying on a fresh session"
                );
            }
            let ctx = match self.open_ctx().await {
                Ok(ctx) => ctx,
                Err(e) => {
                    last_error = format!("session setup: {e}");
                    error!(
                        group = group.name,
                        scenario = scenario.name,
                        attempt,
                        error = %last_error,
                        "failed"
                    );
                    continue;
                }
            };
            let outcome = self.attempt(group, scenario, ctx.clone(), attempt).await;
            self.cleanup(group, &ctx).await;
            self.close(ctx.session.clone()).await;
            match outcome {
                Ok(()) => return self.passed(group, scenario, started, attempt),
                Err(e) => last_error = e,
            }
        }
        self.failed(group, scenario, started, retries, last_error)
    }

    /// A single timed attempt. Failure artifacts are captured per attempt.
    async fn attempt(
        &self,
        group: &Group,
        scenario: &Scenario,
        ctx: Ctx,
        attempt: u32,
    ) -> Result<(), String> {
        let outcome =
            tokio::time::timeout(self.cfg.test_timeout, (scenario.run)(ctx.clone())).await;
        let failure = match outcome {
            Ok(Ok(())) => {
                info!(group = group.name, scenario = scenario.name, "passed");
                return Ok(());
            }
            Ok(Err(e)) => e,
            Err(_) => E2eError::Timeout {
                what: format!("scenario `{}`", scenario.name),
                elapsed_ms: self.cfg.test_timeout.as_millis() as u64,
            },
        };
        let message = failure.to_string();
        error!(
            group = group.name,
            scenario = scenario.name,
            attempt,
            error = %message,
            "failed"
        );
        let artifact = format!("{}--{}-attempt{attempt}", group.name, slug(scenario.name));
        if let Err(e) = ctx.session.dump_failure(&artifact).await {
            warn!(error = %e, "failure artifact capture failed");
        }
        Err(message)
    }

    /// Return the shared session to a known state between retry attempts.
    async fn reset_shared_session(&self, group: &Group, ctx: &Ctx) {
        self.cleanup(group, ctx).await;
        if let Err(e) = ctx.pages.home.goto().await {
            warn!(group = group.name, error = %e, "homepage reset between attempts failed");
        }
    }

    fn passed(
        &self,
        group: &Group,
        scenario: &Scenario,
        started: Instant,
        attempt: u32,
    ) -> ScenarioResult {
        ScenarioResult {
            group: group.name.to_string(),
            name: scenario.name.to_string(),
            success: true,
            duration_ms: started.elapsed().as_millis() as u64,
            retries_used: attempt,
            error: None,
        }
    }

    fn failed(
        &self,
        group: &Group,
        scenario: &Scenario,
        started: Instant,
        retries: u32,
        error: String,
    ) -> ScenarioResult {
        ScenarioResult {
            group: group.name.to_string(),
            name: scenario.name.to_string(),
            success: false,
            duration_ms: started.elapsed().as_millis() as u64,
            retries_used: retries,
            error: Some(error),
        }
    }

    async fn open_ctx(&self) -> E2eResult<Ctx> {
        let session = Session::connect(self.cfg.clone()).await?;
        Ok(Ctx::new(session, self.cfg.clone(), self.visual.clone()))
    }

    /// Advisory teardown: failures are logged, never fatal.
    async fn cleanup(&self, group: &Group, ctx: &Ctx) {
        if group.cleanup != Cleanup::ClearCart {
            return;
        }
        let result = async {
            ctx.pages.cart.goto().await?;
            ctx.pages.cart.remove_all_items().await
        }
        .await;
        if let Err(e) = result {
            warn!(group = group.name, error = %e, "cart cleanup failed");
        }
    }

    async fn close(&self, session: Session) {
        if let Err(e) = session.quit().await {
            warn!(error = %e, "browser session close failed");
        }
    }

    fn fail_whole_group(&self, group: &Group, reason: &str) -> Vec<ScenarioResult> {
        error!(group = group.name, reason, "group setup failed");
        group
            .scenarios
            .iter()
            .map(|s| ScenarioResult {
                group: group.name.to_string(),
                name: s.name.to_string(),
                success: false,
                duration_ms: 0,
                retries_used: 0,
                error: Some(reason.to_string()),
            })
            .collect()
    }
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Tier;

    #[test]
    fn slug_replaces_non_alphanumerics() {
        assert_eq!(slug("add a product"), "add-a-product");
        assert_eq!(slug("sku `36A103`"), "sku--36A103-");
    }

    #[tokio::test]
    async fn isolated_retries_provision_a_session_per_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SuiteConfig {
            webdriver_url: "http://127.0.0.1:1".to_string(),
            ci: true,
            output_dir: dir.path().to_path_buf(),
            ..SuiteConfig::default()
        };
        let runner = SuiteRunner::new(cfg, Profile::Full, None).unwrap();
        let group = Group {
            name: "isolated-retry",
            tier: Tier::Feature,
            critical: false,
            session_mode: SessionMode::Isolated,
            cleanup: Cleanup::None,
            scenarios: vec![Scenario {
                name: "never reaches the scenario body",
                run: |_| Box::pin(async { Ok::<(), E2eError>(()) }),
            }],
        };

        let results = runner.run_isolated_group(&group).await;
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert!(!result.success);
        // Every attempt opens its own session, so the setup failure is
        // hit once per attempt rather than once for the whole scenario.
        assert_eq!(result.retries_used, Profile::Full.retries(true));
        assert!(result.error.as_deref().unwrap_or("").contains("session setup"));
    }
}
