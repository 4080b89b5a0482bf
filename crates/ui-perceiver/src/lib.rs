//! Structural perception of the device UI.
//!
//! Turns a raw accessibility-tree XML snapshot into a deduplicated list of
//! actionable element records, and renders those records into the one-line
//! form the decision oracle consumes.
//!
//! Malformed snapshots degrade to an empty element list; callers treat an
//! empty list as "retry the poll", never as a fatal condition.

pub mod extract;
pub mod format;

pub use extract::extract_actionable;
pub use format::format_for_prompt;
