//! Persistence for generated test cases and their run results.
//!
//! Documents are plain JSON and round-trip unchanged: optional fields that
//! are absent on load stay absent on save.

pub mod model;
pub mod store;

pub use model::{
    ElementRef, Failure, RunRecord, RunStatus, StepRecord, TestCase, TestStep,
};
pub use store::{load_cases, save_cases, save_results, StoreError};
