//! Scroll-and-accumulate element resolution over a [`UiDriver`].

use crate::scoring::{best_fuzzy, exact_match};
use crate::types::{MatchKind, Resolution};
use droidscout_core_types::LocatorStrategy;
use std::sync::Arc;
use tracing::{debug, warn};
use uia_adapter::{DriverError, ElementHandle, UiDriver};

/// Tuning knobs for the resolution loop.
#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    /// Scroll sweeps attempted before falling back to the candidate pool.
    pub max_scroll_attempts: u32,
    /// Swipe gesture duration in milliseconds.
    pub swipe_duration_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_scroll_attempts: 5,
            swipe_duration_ms: 1000,
        }
    }
}

impl ResolverConfig {
    pub fn with_max_scroll_attempts(mut self, attempts: u32) -> Self {
        self.max_scroll_attempts = attempts;
        self
    }

    pub fn with_swipe_duration_ms(mut self, duration_ms: u64) -> Self {
        self.swipe_duration_ms = duration_ms;
        self
    }
}

/// Resolves locator directives to live element handles.
///
/// The resolver owns no screen state; every call starts from whatever the
/// device currently shows, scrolls as needed and remembers every identified
/// element it saw along the way as a fuzzy-match candidate.
pub struct ElementResolver {
    driver: Arc<dyn UiDriver>,
    config: ResolverConfig,
}

impl ElementResolver {
    pub fn new(driver: Arc<dyn UiDriver>) -> Self {
        Self::with_config(driver, ResolverConfig::default())
    }

    pub fn with_config(driver: Arc<dyn UiDriver>, config: ResolverConfig) -> Self {
        Self { driver, config }
    }

    /// Resolve `value` under `strategy` to an on-screen element.
    ///
    /// Errors only surface for device failures during the initial lookup;
    /// failures inside the scroll loop degrade to a smaller candidate pool
    /// rather than aborting the resolution.
    pub async fn resolve(
        &self,
        strategy: LocatorStrategy,
        value: &str,
    ) -> Result<Resolution, DriverError> {
        if let Some(handle) = self.lookup_displayed(strategy, value).await? {
            debug!(strategy = %strategy, value, "resolved immediately");
            return Ok(Resolution::found(handle, MatchKind::Immediate));
        }

        let mut pool: Vec<ElementHandle> = Vec::new();
        self.absorb_candidates(&mut pool).await;

        for attempt in 1..=self.config.max_scroll_attempts {
            if let Err(error) = self.scroll_down().await {
                warn!(attempt, %error, "scroll sweep failed");
                break;
            }

            match self.lookup_displayed(strategy, value).await {
                Ok(Some(handle)) => {
                    debug!(strategy = %strategy, value, attempt, "resolved after scroll");
                    return Ok(Resolution::found(handle, MatchKind::AfterScroll));
                }
                Ok(None) => {}
                Err(error) => {
                    warn!(attempt, %error, "lookup failed during scroll sweep");
                }
            }

            self.absorb_candidates(&mut pool).await;
        }

        if let Some(handle) = exact_match(strategy, value, &pool) {
            debug!(strategy = %strategy, value, "resolved from candidate pool");
            return Ok(Resolution::found(handle.clone(), MatchKind::ExactPool));
        }

        if let Some((handle, score)) = best_fuzzy(value, &pool) {
            debug!(strategy = %strategy, value, score, "resolved by fuzzy score");
            return Ok(Resolution::found(handle.clone(), MatchKind::Fuzzy { score }));
        }

        debug!(strategy = %strategy, value, pool = pool.len(), "element not found");
        Ok(Resolution::NotFound)
    }

    /// Exact driver lookup that only counts elements currently rendered.
    async fn lookup_displayed(
        &self,
        strategy: LocatorStrategy,
        value: &str,
    ) -> Result<Option<ElementHandle>, DriverError> {
        match self.driver.find_element(strategy, value).await? {
            Some(handle) if self.driver.is_displayed(&handle).await? => Ok(Some(handle)),
            _ => Ok(None),
        }
    }

    /// Extend the candidate pool with everything identified on screen. The
    /// pool only ever grows; elements scrolled out of view stay candidates.
    async fn absorb_candidates(&self, pool: &mut Vec<ElementHandle>) {
        match self.driver.collect_identified().await {
            Ok(handles) => {
                for handle in handles {
                    if handle.has_identifier() && !pool.contains(&handle) {
                        pool.push(handle);
                    }
                }
            }
            Err(error) => warn!(%error, "candidate collection failed"),
        }
    }

    /// Vertical swipe from 80% to 20% of screen height.
    async fn scroll_down(&self) -> Result<(), DriverError> {
        let size = self.driver.window_size().await?;
        let x = size.width / 2;
        let from = size.height * 4 / 5;
        let to = size.height / 5;
        self.driver
            .swipe(x, from, x, to, self.config.swipe_duration_ms)
            .await
    }
}
