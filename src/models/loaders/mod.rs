pub mod toml_loader;
pub mod tsv_loader;

pub use toml_loader::{load_all_jobs, load_job};
pub use tsv_loader::load_lookup_table;
