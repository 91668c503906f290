pub mod card_pipeline;
pub mod lint_cycle;

pub use card_pipeline::{CardPipeline, SharedSender};
pub use lint_cycle::{LintCycle, LintReport};
