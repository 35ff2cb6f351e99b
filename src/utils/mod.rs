pub mod logging;

pub use logging::{format_file_size, truncate_text};
