//! Resolution outcome types.

use serde::{Deserialize, Serialize};
use uia_adapter::ElementHandle;

/// How a resolved element was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Exact driver lookup before any scrolling.
    Immediate,
    /// Exact driver lookup after a scroll sweep.
    AfterScroll,
    /// Exact attribute match against the accumulated candidate pool.
    ExactPool,
    /// Best fuzzy score over the candidate pool.
    Fuzzy { score: u32 },
}

/// Result of a resolution attempt. `NotFound` is a normal outcome the caller
/// branches on; it never unwinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found {
        handle: ElementHandle,
        kind: MatchKind,
    },
    NotFound,
}

impl Resolution {
    pub fn found(handle: ElementHandle, kind: MatchKind) -> Self {
        Self::Found { handle, kind }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Consume into the handle, if any.
    pub fn into_handle(self) -> Option<ElementHandle> {
        match self {
            Self::Found { handle, .. } => Some(handle),
            Self::NotFound => None,
        }
    }
}
