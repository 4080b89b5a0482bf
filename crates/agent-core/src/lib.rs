//! The exploration agent: oracle-driven action selection, goal
//! verification, rate limiting and the bounded goal loop, plus a runner
//! and an oracle-backed generator for stored test cases.

pub mod case_runner;
pub mod context;
pub mod errors;
pub mod generator;
pub mod prompt;
pub mod rate_limit;
pub mod runner;
pub mod schema;
pub mod selector;
pub mod transport;
pub mod verifier;

pub use case_runner::{parse_assertion, AssertionCheck, AssertionKind, CaseRunner};
pub use context::{Memory, RunContext};
pub use errors::{OracleError, ParseErrorKind, ScenarioFailure};
pub use generator::{CaseGenerator, GeneratorConfig};
pub use rate_limit::{DriverKeepalive, Keepalive, NoopKeepalive, RateLimiter};
pub use runner::{GoalPhase, GoalReport, GoalRunner, RunnerConfig, StepTrace};
pub use schema::{
    parse_action_response, parse_cases_response, parse_verification_response, ActionBatch, Verdict,
};
pub use selector::{ActionSelector, DecisionAdapter, HeuristicSelector, OracleSelector};
pub use transport::{GeminiTransport, MockOracle, OracleTransport};
pub use verifier::{GoalVerifier, VerifyOutcome, VERIFICATION_UNAVAILABLE};
