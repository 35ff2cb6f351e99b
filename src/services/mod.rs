pub mod acceptance;
pub mod field_rules;
pub mod report_renderer;
pub mod report_saver;

pub use acceptance::{AcceptancePolicy, RuleSet};
pub use report_saver::ReportSaver;
