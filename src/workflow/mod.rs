pub mod controller;
pub mod state;
pub mod submission;

pub use controller::WorkflowController;
pub use state::{WorkflowPhase, WorkflowState};
pub use submission::{AddOutcome, PendingSubmission};
