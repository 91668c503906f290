pub mod card;
pub mod job;
pub mod loaders;
pub mod lookup;

pub use card::{BatchSummary, CardRecord, LintOutcome, PartialCard};
pub use job::CardJob;
pub use loaders::{load_all_jobs, load_job, load_lookup_table};
pub use lookup::{LookupEntry, LookupTable};
