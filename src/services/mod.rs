pub mod card_editor;
pub mod card_sink;
pub mod lookup_reconciler;
pub mod prompts;
pub mod record_parser;
pub mod vocab_suggester;

pub use card_editor::CardEditor;
pub use card_sink::{export_selected, CardFileSink, CardSink, FieldMapping};
pub use record_parser::{parse, parse_partial, RecordParser};
pub use vocab_suggester::VocabSuggester;
