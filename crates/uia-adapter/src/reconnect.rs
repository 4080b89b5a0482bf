//! Auto-reconnect wrapper for invalid-session signals.

use crate::driver::{ElementHandle, UiDriver, WindowSize};
use crate::errors::DriverError;
use async_trait::async_trait;
use droidscout_core_types::LocatorStrategy;
use tracing::warn;

/// Wraps a [`UiDriver`] and restarts the session whenever a command fails
/// with an invalid-session signal.
///
/// The original error is still surfaced: the step that hit it is discarded
/// and the orchestrator retries against the fresh session.
pub struct ReconnectingDriver<D: UiDriver> {
    inner: D,
}

impl<D: UiDriver> ReconnectingDriver<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    async fn recover<T>(&self, result: Result<T, DriverError>) -> Result<T, DriverError> {
        if let Err(error) = &result {
            if error.is_session_invalid() {
                warn!(%error, "session invalid, restarting driver session");
                if let Err(restart_error) = self.inner.restart_session().await {
                    warn!(%restart_error, "session restart failed");
                }
            }
        }
        result
    }
}

#[async_trait]
impl<D: UiDriver> UiDriver for ReconnectingDriver<D> {
    async fn page_source(&self) -> Result<String, DriverError> {
        let result = self.inner.page_source().await;
        self.recover(result).await
    }

    async fn find_element(
        &self,
        strategy: LocatorStrategy,
        value: &str,
    ) -> Result<Option<ElementHandle>, DriverError> {
        let result = self.inner.find_element(strategy, value).await;
        self.recover(result).await
    }

    async fn is_displayed(&self, handle: &ElementHandle) -> Result<bool, DriverError> {
        let result = self.inner.is_displayed(handle).await;
        self.recover(result).await
    }

    async fn collect_identified(&self) -> Result<Vec<ElementHandle>, DriverError> {
        let result = self.inner.collect_identified().await;
        self.recover(result).await
    }

    async fn click(&self, handle: &ElementHandle) -> Result<(), DriverError> {
        let result = self.inner.click(handle).await;
        self.recover(result).await
    }

    async fn set_text(&self, handle: &ElementHandle, text: &str) -> Result<(), DriverError> {
        let result = self.inner.set_text(handle, text).await;
        self.recover(result).await
    }

    async fn swipe(
        &self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        duration_ms: u64,
    ) -> Result<(), DriverError> {
        let result = self.inner.swipe(x1, y1, x2, y2, duration_ms).await;
        self.recover(result).await
    }

    async fn window_size(&self) -> Result<WindowSize, DriverError> {
        let result = self.inner.window_size().await;
        self.recover(result).await
    }

    async fn current_activity(&self) -> Result<String, DriverError> {
        // Keepalive path: never trigger a restart storm from pings.
        self.inner.current_activity().await
    }

    async fn current_package(&self) -> Result<String, DriverError> {
        self.inner.current_package().await
    }

    async fn restart_session(&self) -> Result<(), DriverError> {
        self.inner.restart_session().await
    }
}
