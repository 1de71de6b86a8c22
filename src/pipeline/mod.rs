//! Response-to-action pipeline
//!
//! Model text goes in, executed commands come out:
//! extraction, privilege normalization, application lookup and execution.
//! The boundary with the model is untrusted free text; see `executor` for
//! what that means once it reaches a shell.

pub mod executor;
pub mod extractor;
pub mod intent;
pub mod locator;
pub mod privilege;
pub mod runner;
pub mod session;

pub use executor::{CommandExecutor, CommandKind};
pub use extractor::CommandExtractor;
pub use intent::PlannedAction;
pub use locator::AppLocator;
pub use privilege::PrivilegeNormalizer;
pub use runner::{CommandRunner, ExecutionResult, ShellRunner};
pub use session::Session;
