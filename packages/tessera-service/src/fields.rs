use tessera_domain::LanguageDirection;
use tessera_index::{FieldOptions, Schema};

pub(crate) const MEMORY: &str = "memory";
pub(crate) const HASH: &str = "hash";
pub(crate) const TARGET_HASH: &str = "target_hash";
pub(crate) const SOURCE_LANG: &str = "source_lang";
pub(crate) const TARGET_LANG: &str = "target_lang";
pub(crate) const SENTENCE: &str = "sentence";
pub(crate) const TRANSLATION: &str = "translation";
pub(crate) const TIMESTAMP: &str = "timestamp";
pub(crate) const CHANNEL: &str = "channel";
pub(crate) const OFFSET: &str = "offset";
pub(crate) const CORPUS: &str = "corpus";
pub(crate) const LANGUAGE: &str = "language";

const CONTENT_PREFIX: &str = "content_";

/// `content_<source>_<target>`: the source side of units written in this direction.
pub fn content_field(direction: &LanguageDirection) -> String {
	format!("{CONTENT_PREFIX}{}_{}", direction.source(), direction.target())
}

/// `content_<language>`: monolingual corpus text.
pub fn corpus_field(language: &str) -> String {
	format!("{CONTENT_PREFIX}{language}")
}

pub(crate) fn memory_schema() -> Schema {
	Schema::new()
		.field(MEMORY, FieldOptions::keyword())
		.field(HASH, FieldOptions::text().with_positions())
		.field(TARGET_HASH, FieldOptions::text().with_positions())
		.field(SOURCE_LANG, FieldOptions::keyword())
		.field(TARGET_LANG, FieldOptions::keyword())
		.field(SENTENCE, FieldOptions::stored())
		.field(TRANSLATION, FieldOptions::stored())
		.field(TIMESTAMP, FieldOptions::stored())
		.field(CHANNEL, FieldOptions::stored())
		.field(OFFSET, FieldOptions::stored())
		.prefix(CONTENT_PREFIX, FieldOptions::text())
}

pub(crate) fn context_schema() -> Schema {
	Schema::new()
		.field(CORPUS, FieldOptions::keyword())
		.field(MEMORY, FieldOptions::keyword())
		.field(LANGUAGE, FieldOptions::keyword())
		.prefix(CONTENT_PREFIX, FieldOptions::text().with_term_vectors())
}
