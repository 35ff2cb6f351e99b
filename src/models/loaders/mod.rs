pub mod folder_loader;
pub mod toml_loader;

pub use folder_loader::{load_candidate_file, load_candidates_from_folder};
pub use toml_loader::load_form_from_toml;
