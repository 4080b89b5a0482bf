//! Oracle-driven test case authoring.
//!
//! Snapshots the current screen, asks the oracle to write test cases for
//! it, and optionally crawls deeper by clicking through to unvisited
//! activities. The produced cases use the same document shape the case
//! runner consumes, so a generated file can be replayed directly.

use crate::context::RunContext;
use crate::prompt::generation_prompt;
use crate::rate_limit::Keepalive;
use crate::schema::parse_cases_response;
use crate::selector::oracle_call;
use crate::transport::OracleTransport;
use case_store::TestCase;
use droidscout_core_types::LocatorStrategy;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use ui_perceiver::extract_actionable;
use uia_adapter::UiDriver;

/// Crawl bounds and pacing.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Maximum number of screens visited during one crawl.
    pub max_screens: usize,
    /// Pause after a navigation click so the next screen can settle.
    pub settle_delay: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_screens: 10,
            settle_delay: Duration::from_secs(2),
        }
    }
}

impl GeneratorConfig {
    pub fn with_max_screens(mut self, max_screens: usize) -> Self {
        self.max_screens = max_screens;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }
}

/// Authors test cases by showing the oracle what is on screen.
pub struct CaseGenerator {
    driver: Arc<dyn UiDriver>,
    transport: Arc<dyn OracleTransport>,
    keepalive: Arc<dyn Keepalive>,
    config: GeneratorConfig,
}

impl CaseGenerator {
    pub fn new(
        driver: Arc<dyn UiDriver>,
        transport: Arc<dyn OracleTransport>,
        keepalive: Arc<dyn Keepalive>,
    ) -> Self {
        Self::with_config(driver, transport, keepalive, GeneratorConfig::default())
    }

    pub fn with_config(
        driver: Arc<dyn UiDriver>,
        transport: Arc<dyn OracleTransport>,
        keepalive: Arc<dyn Keepalive>,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            driver,
            transport,
            keepalive,
            config,
        }
    }

    /// Cases the oracle authors for the current screen. Empty on a blank
    /// snapshot or an exhausted oracle; the caller decides whether that is
    /// fatal.
    pub async fn generate_for_screen(&self, ctx: &RunContext) -> Vec<TestCase> {
        let source = match self.driver.page_source().await {
            Ok(source) => source,
            Err(error) => {
                warn!(%error, "page source unavailable, no cases generated");
                return Vec::new();
            }
        };
        let elements = extract_actionable(&source);
        if elements.is_empty() {
            warn!("no actionable elements on screen, no cases generated");
            return Vec::new();
        }

        let package = self.driver.current_package().await.unwrap_or_default();
        let activity = self.driver.current_activity().await.unwrap_or_default();
        let prompt = generation_prompt(&package, &activity, &elements);

        match oracle_call(
            self.transport.as_ref(),
            self.keepalive.as_ref(),
            ctx,
            &prompt,
            parse_cases_response,
        )
        .await
        {
            Some(cases) => {
                info!(activity = %activity, count = cases.len(), "oracle authored cases");
                cases
            }
            None => {
                warn!(activity = %activity, "oracle unavailable, no cases generated");
                Vec::new()
            }
        }
    }

    /// Crawl the app screen by screen: generate cases for the current
    /// screen, then click the first described clickable element to move
    /// on. Stops on a revisited activity, the screen cap, or when no
    /// onward click exists.
    pub async fn crawl(&self, ctx: &RunContext) -> Vec<TestCase> {
        let mut visited = HashSet::new();
        let mut cases = Vec::new();

        for screen in 0..self.config.max_screens {
            let activity = match self.driver.current_activity().await {
                Ok(activity) => activity,
                Err(error) => {
                    warn!(%error, "current activity unavailable, stopping crawl");
                    break;
                }
            };
            if !visited.insert(activity.clone()) {
                info!(activity = %activity, "revisited activity, stopping crawl");
                break;
            }

            info!(screen, activity = %activity, "generating cases for screen");
            cases.extend(self.generate_for_screen(ctx).await);

            if !self.advance_screen().await {
                break;
            }
        }

        info!(
            screens = visited.len(),
            cases = cases.len(),
            "crawl finished"
        );
        cases
    }

    /// Click the first clickable element carrying a content description.
    /// False when nothing qualifies or the click fails.
    async fn advance_screen(&self) -> bool {
        let source = match self.driver.page_source().await {
            Ok(source) => source,
            Err(error) => {
                warn!(%error, "page source unavailable, stopping crawl");
                return false;
            }
        };
        let elements = extract_actionable(&source);
        let Some(target) = elements
            .iter()
            .find(|e| e.clickable && !e.content_desc.is_empty())
        else {
            info!("no clickable element to advance with, stopping crawl");
            return false;
        };

        let handle = match self
            .driver
            .find_element(LocatorStrategy::AccessibilityId, &target.content_desc)
            .await
        {
            Ok(Some(handle)) => handle,
            Ok(None) => {
                warn!(target = %target.content_desc, "advance target vanished, stopping crawl");
                return false;
            }
            Err(error) => {
                warn!(%error, "advance lookup failed, stopping crawl");
                return false;
            }
        };
        if let Err(error) = self.driver.click(&handle).await {
            warn!(%error, "advance click failed, stopping crawl");
            return false;
        }

        tokio::time::sleep(self.config.settle_delay).await;
        true
    }
}
