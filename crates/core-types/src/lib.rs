//! Shared primitives for the droidscout agent stack.
//!
//! Everything that crosses a crate boundary lives here: per-poll UI element
//! snapshots, locator strategies, action directives produced by the decision
//! oracle, and goal state.

pub mod action;
pub mod element;
pub mod goal;

pub use action::{ActionDirective, ActionType, LocatorStrategy};
pub use element::{Bounds, UiElement};
pub use goal::{GoalState, GoalStatus};
