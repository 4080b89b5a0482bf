pub mod cases;
pub mod dry_run;
pub mod generate;
pub mod run;

pub use cases::{cmd_cases, CasesArgs};
pub use generate::{cmd_generate, GenerateArgs};
pub use run::{cmd_run, RunArgs};
