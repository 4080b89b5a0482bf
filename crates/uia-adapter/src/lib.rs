//! UiAutomator2 driver boundary.
//!
//! The wire protocol and session lifecycle of the real automation server are
//! external collaborators; this crate pins down the contract the agent
//! depends on:
//! - [`UiDriver`] - the async device-session trait (poll, find, click, type,
//!   swipe, window geometry, activity introspection, session restart)
//! - [`ReconnectingDriver`] - wrapper that restarts the session when an
//!   invalid-session signal surfaces, so the caller can discard the step and
//!   retry
//! - [`ScriptedDriver`] - in-memory implementation backing tests and dry runs
//! - a stubbed driver behind the default `stub` feature for builds without a
//!   device attached

pub mod driver;
pub mod errors;
pub mod reconnect;
pub mod scripted;
#[cfg(feature = "stub")]
pub mod stub;

pub use driver::{ElementHandle, UiDriver, WindowSize};
pub use errors::DriverError;
pub use reconnect::ReconnectingDriver;
pub use scripted::{ActionRecord, ScreenState, ScriptedDriver};
#[cfg(feature = "stub")]
pub use stub::StubDriver;

/// Returns `true` when the adapter is compiled in stub mode.
pub const fn is_stubbed() -> bool {
    cfg!(feature = "stub")
}
