//! In-memory scripted driver used by tests and dry runs.

use crate::driver::{ElementHandle, UiDriver, WindowSize};
use crate::errors::DriverError;
use async_trait::async_trait;
use droidscout_core_types::LocatorStrategy;
use parking_lot::Mutex;
use std::collections::VecDeque;

const SCRIPTED_ACTIVITY: &str = "com.example.clock/.MainActivity";
const SCRIPTED_PACKAGE: &str = "com.example.clock";

/// One scripted screen: a page-source snapshot plus the handles a lookup can
/// return on it. Swiping advances to the next screen, which models content
/// scrolling into view.
#[derive(Debug, Clone, Default)]
pub struct ScreenState {
    pub source: String,
    pub elements: Vec<ElementHandle>,
    /// Handle ids present in the tree but not currently rendered.
    pub hidden: Vec<String>,
}

impl ScreenState {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            elements: Vec::new(),
            hidden: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: ElementHandle) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_hidden(mut self, id: impl Into<String>) -> Self {
        self.hidden.push(id.into());
        self
    }
}

/// Interaction recorded by the scripted driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRecord {
    Click { target: String },
    SetText { target: String, text: String },
}

#[derive(Debug, Default)]
struct Inner {
    screens: Vec<ScreenState>,
    cursor: usize,
    actions: Vec<ActionRecord>,
    faults: VecDeque<DriverError>,
    pings: u32,
    swipes: u32,
    restarts: u32,
}

/// Deterministic [`UiDriver`] implementation over scripted screens.
///
/// Faults queued with [`ScriptedDriver::push_fault`] are surfaced by the next
/// command, which exercises the reconnect and retry paths.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    inner: Mutex<Inner>,
}

impl ScriptedDriver {
    pub fn new(screens: Vec<ScreenState>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                screens,
                ..Inner::default()
            }),
        }
    }

    /// Single-screen script.
    pub fn single(screen: ScreenState) -> Self {
        Self::new(vec![screen])
    }

    /// Queue an error to be returned by the next command.
    pub fn push_fault(&self, error: DriverError) {
        self.inner.lock().faults.push_back(error);
    }

    /// Interactions executed so far, in order.
    pub fn actions(&self) -> Vec<ActionRecord> {
        self.inner.lock().actions.clone()
    }

    /// Keepalive pings observed (current-activity reads).
    pub fn pings(&self) -> u32 {
        self.inner.lock().pings
    }

    pub fn swipes(&self) -> u32 {
        self.inner.lock().swipes
    }

    pub fn restarts(&self) -> u32 {
        self.inner.lock().restarts
    }

    fn take_fault(&self) -> Result<(), DriverError> {
        match self.inner.lock().faults.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn with_screen<T>(&self, f: impl FnOnce(&ScreenState) -> T) -> T {
        let inner = self.inner.lock();
        if inner.screens.is_empty() {
            return f(&ScreenState::default());
        }
        let cursor = inner.cursor.min(inner.screens.len() - 1);
        f(&inner.screens[cursor])
    }
}

#[async_trait]
impl UiDriver for ScriptedDriver {
    async fn page_source(&self) -> Result<String, DriverError> {
        self.take_fault()?;
        Ok(self.with_screen(|screen| screen.source.clone()))
    }

    async fn find_element(
        &self,
        strategy: LocatorStrategy,
        value: &str,
    ) -> Result<Option<ElementHandle>, DriverError> {
        self.take_fault()?;
        Ok(self.with_screen(|screen| {
            screen
                .elements
                .iter()
                .find(|element| matches_strategy(element, strategy, value))
                .cloned()
        }))
    }

    async fn is_displayed(&self, handle: &ElementHandle) -> Result<bool, DriverError> {
        Ok(self.with_screen(|screen| {
            screen.elements.iter().any(|e| e.id == handle.id)
                && !screen.hidden.iter().any(|id| *id == handle.id)
        }))
    }

    async fn collect_identified(&self) -> Result<Vec<ElementHandle>, DriverError> {
        self.take_fault()?;
        Ok(self.with_screen(|screen| {
            screen
                .elements
                .iter()
                .filter(|e| e.has_identifier())
                .cloned()
                .collect()
        }))
    }

    async fn click(&self, handle: &ElementHandle) -> Result<(), DriverError> {
        self.take_fault()?;
        self.inner.lock().actions.push(ActionRecord::Click {
            target: handle.id.clone(),
        });
        Ok(())
    }

    async fn set_text(&self, handle: &ElementHandle, text: &str) -> Result<(), DriverError> {
        self.take_fault()?;
        self.inner.lock().actions.push(ActionRecord::SetText {
            target: handle.id.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn swipe(
        &self,
        _x1: i32,
        _y1: i32,
        _x2: i32,
        _y2: i32,
        _duration_ms: u64,
    ) -> Result<(), DriverError> {
        self.take_fault()?;
        let mut inner = self.inner.lock();
        inner.swipes += 1;
        if inner.cursor + 1 < inner.screens.len() {
            inner.cursor += 1;
        }
        Ok(())
    }

    async fn window_size(&self) -> Result<WindowSize, DriverError> {
        Ok(WindowSize {
            width: 1080,
            height: 2220,
        })
    }

    async fn current_activity(&self) -> Result<String, DriverError> {
        self.inner.lock().pings += 1;
        Ok(SCRIPTED_ACTIVITY.to_string())
    }

    async fn current_package(&self) -> Result<String, DriverError> {
        Ok(SCRIPTED_PACKAGE.to_string())
    }

    async fn restart_session(&self) -> Result<(), DriverError> {
        let mut inner = self.inner.lock();
        inner.restarts += 1;
        inner.faults.clear();
        Ok(())
    }
}

fn matches_strategy(element: &ElementHandle, strategy: LocatorStrategy, value: &str) -> bool {
    match strategy {
        LocatorStrategy::AccessibilityId => element.content_desc == value,
        LocatorStrategy::Id => element.resource_id == value,
        LocatorStrategy::ClassName => element.class_name == value,
        // XPath-style queries match when they mention one of the element's
        // identifying attributes.
        LocatorStrategy::Xpath => {
            (!element.text.is_empty() && value.contains(&element.text))
                || (!element.content_desc.is_empty() && value.contains(&element.content_desc))
                || (!element.resource_id.is_empty() && value.contains(&element.resource_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(id: &str, content_desc: &str) -> ElementHandle {
        ElementHandle {
            id: id.to_string(),
            content_desc: content_desc.to_string(),
            enabled: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_find_and_click() {
        let driver = ScriptedDriver::single(
            ScreenState::new("<hierarchy/>").with_element(handle("e1", "Alarm")),
        );

        let found = driver
            .find_element(LocatorStrategy::AccessibilityId, "Alarm")
            .await
            .unwrap()
            .unwrap();
        assert!(driver.is_displayed(&found).await.unwrap());

        driver.click(&found).await.unwrap();
        assert_eq!(
            driver.actions(),
            vec![ActionRecord::Click {
                target: "e1".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_swipe_advances_screen() {
        let driver = ScriptedDriver::new(vec![
            ScreenState::new("first"),
            ScreenState::new("second").with_element(handle("e2", "Timer")),
        ]);

        assert!(driver
            .find_element(LocatorStrategy::AccessibilityId, "Timer")
            .await
            .unwrap()
            .is_none());

        driver.swipe(540, 1776, 540, 444, 1000).await.unwrap();
        assert_eq!(driver.page_source().await.unwrap(), "second");
        assert!(driver
            .find_element(LocatorStrategy::AccessibilityId, "Timer")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let driver = ScriptedDriver::single(ScreenState::new("ok"));
        driver.push_fault(DriverError::SessionInvalid("gone".to_string()));

        assert!(driver.page_source().await.is_err());
        assert_eq!(driver.page_source().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_xpath_containment() {
        let driver = ScriptedDriver::single(
            ScreenState::new("<hierarchy/>").with_element(ElementHandle {
                id: "e3".to_string(),
                text: "Clock".to_string(),
                ..Default::default()
            }),
        );

        let found = driver
            .find_element(LocatorStrategy::Xpath, "//*[@text='Clock']")
            .await
            .unwrap();
        assert!(found.is_some());
    }
}
