//! The device-session trait and its handle types.

use crate::errors::DriverError;
use async_trait::async_trait;
use droidscout_core_types::LocatorStrategy;
use serde::{Deserialize, Serialize};

/// Opaque reference to a live element, carrying the identifying attributes
/// observed at lookup time.
///
/// The attributes are snapshots: they feed the locator's exact and fuzzy
/// matching, while `id` addresses the element for subsequent commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Server-side element reference.
    pub id: String,
    pub text: String,
    pub content_desc: String,
    pub resource_id: String,
    pub class_name: String,
    pub enabled: bool,
    pub selected: bool,
}

impl ElementHandle {
    /// Whether the handle carries any attribute usable for matching.
    pub fn has_identifier(&self) -> bool {
        !self.text.is_empty() || !self.content_desc.is_empty() || !self.resource_id.is_empty()
    }
}

/// Device screen dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: i32,
    pub height: i32,
}

/// Contract for a UiAutomator2-style device session.
///
/// All operations are awaited to completion before the caller issues the
/// next one; the agent never overlaps device I/O.
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// XML snapshot of the current accessibility tree.
    async fn page_source(&self) -> Result<String, DriverError>;

    /// Exact lookup by locator strategy. `Ok(None)` is the normal
    /// not-found outcome, not an error.
    async fn find_element(
        &self,
        strategy: LocatorStrategy,
        value: &str,
    ) -> Result<Option<ElementHandle>, DriverError>;

    /// Whether the element is currently rendered on screen.
    async fn is_displayed(&self, handle: &ElementHandle) -> Result<bool, DriverError>;

    /// Every on-screen element carrying at least one identifying attribute.
    /// Feeds the locator's accumulating candidate pool during scroll sweeps.
    async fn collect_identified(&self) -> Result<Vec<ElementHandle>, DriverError>;

    async fn click(&self, handle: &ElementHandle) -> Result<(), DriverError>;

    async fn set_text(&self, handle: &ElementHandle, text: &str) -> Result<(), DriverError>;

    /// Swipe gesture between two points over `duration_ms`.
    async fn swipe(
        &self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        duration_ms: u64,
    ) -> Result<(), DriverError>;

    async fn window_size(&self) -> Result<WindowSize, DriverError>;

    /// Foreground activity name. Doubles as the lightweight keepalive ping
    /// during long oracle waits.
    async fn current_activity(&self) -> Result<String, DriverError>;

    async fn current_package(&self) -> Result<String, DriverError>;

    /// Tear down and re-establish the session after an invalid-session
    /// signal.
    async fn restart_session(&self) -> Result<(), DriverError>;
}
