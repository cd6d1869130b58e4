pub mod orchestrator;
pub mod submission;

pub use orchestrator::{RequestOrchestrator, SubmitOutcome};
pub use submission::{CyclePhase, SubmissionState};
