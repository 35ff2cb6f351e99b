pub mod artifact;
pub mod candidate;
pub mod form;
pub mod loaders;
pub mod report;

pub use artifact::Artifact;
pub use candidate::CandidateFile;
pub use form::{FieldId, FieldValue, FormDraft, FormFields, FormSubmission};
pub use loaders::{load_candidate_file, load_candidates_from_folder, load_form_from_toml};
pub use report::{AnalyzeReply, Report, ScanStatus, SessionState, SessionStatus, Severity, StatusResponse, SubmissionResponse, UploadReply, Vulnerability};
