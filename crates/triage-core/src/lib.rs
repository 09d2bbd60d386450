pub mod config;
pub mod error;
pub mod input;
pub mod response;

pub use config::TriageConfig;
pub use error::{Result, TriageError};
pub use input::{InputManager, Mode, StagedInput, SubmitPayload};
pub use response::{Artifact, Outcome, ResponseState};
