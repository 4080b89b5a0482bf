//! Element resolution with automatic scroll sweeps and fuzzy fallback.
//!
//! Resolution order:
//! 1. Immediate exact lookup through the driver
//! 2. Bounded scroll loop, re-attempting the exact lookup while accumulating
//!    every identified element into a candidate pool
//! 3. Exact-match pass over the pool, keyed by locator strategy
//! 4. Weighted fuzzy scoring over the pool (resource id > description >
//!    visible text)
//!
//! Not finding an element is a normal outcome, surfaced as
//! [`Resolution::NotFound`]; only device failures are errors.

pub mod resolver;
pub mod scoring;
pub mod types;

pub use resolver::{ElementResolver, ResolverConfig};
pub use scoring::{best_fuzzy, exact_match, fuzzy_score};
pub use types::{MatchKind, Resolution};
