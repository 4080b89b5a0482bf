//! Stubbed driver for builds without a device attached.

use crate::driver::{ElementHandle, UiDriver, WindowSize};
use crate::errors::DriverError;
use async_trait::async_trait;
use droidscout_core_types::LocatorStrategy;

const STUB_REASON: &str =
    "UiAutomator2 adapter is stubbed; wire it to a real automation server and build without the 'stub' feature";

fn stubbed() -> DriverError {
    DriverError::Unavailable(STUB_REASON.to_string())
}

/// Placeholder [`UiDriver`] that fails every command with an explanatory
/// error.
#[derive(Debug, Default, Clone)]
pub struct StubDriver;

#[async_trait]
impl UiDriver for StubDriver {
    async fn page_source(&self) -> Result<String, DriverError> {
        Err(stubbed())
    }

    async fn find_element(
        &self,
        _strategy: LocatorStrategy,
        _value: &str,
    ) -> Result<Option<ElementHandle>, DriverError> {
        Err(stubbed())
    }

    async fn is_displayed(&self, _handle: &ElementHandle) -> Result<bool, DriverError> {
        Err(stubbed())
    }

    async fn collect_identified(&self) -> Result<Vec<ElementHandle>, DriverError> {
        Err(stubbed())
    }

    async fn click(&self, _handle: &ElementHandle) -> Result<(), DriverError> {
        Err(stubbed())
    }

    async fn set_text(&self, _handle: &ElementHandle, _text: &str) -> Result<(), DriverError> {
        Err(stubbed())
    }

    async fn swipe(
        &self,
        _x1: i32,
        _y1: i32,
        _x2: i32,
        _y2: i32,
        _duration_ms: u64,
    ) -> Result<(), DriverError> {
        Err(stubbed())
    }

    async fn window_size(&self) -> Result<WindowSize, DriverError> {
        Err(stubbed())
    }

    async fn current_activity(&self) -> Result<String, DriverError> {
        Err(stubbed())
    }

    async fn current_package(&self) -> Result<String, DriverError> {
        Err(stubbed())
    }

    async fn restart_session(&self) -> Result<(), DriverError> {
        Err(stubbed())
    }
}
