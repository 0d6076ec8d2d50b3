mod walk;

pub use walk::{discover_source_files, Discovery};
