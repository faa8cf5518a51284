use std::{
	collections::{BTreeMap, HashSet},
	sync::Arc,
};

use crate::{
	stem::{SnowballStemmer, Stemmer},
	stopwords,
	tokens::{fold, is_punctuation, words},
};

const ELISIONS: &[&str] = &[
	"l", "m", "t", "qu", "n", "s", "j", "d", "c", "jusqu", "quoiqu", "lorsqu", "puisqu", "dell",
	"dall", "nell", "sull", "all", "un",
];

/// Per-language analysis chain used for context documents and more-like-this queries.
#[derive(Debug, Clone)]
pub struct LanguageAnalyzer {
	stop_words: HashSet<String>,
	stemmer: Option<Arc<dyn Stemmer>>,
	stem_exclusions: HashSet<String>,
	remove_elisions: bool,
}
impl LanguageAnalyzer {
	pub fn new(stop_words: impl IntoIterator<Item = String>) -> Self {
		Self {
			stop_words: stop_words.into_iter().collect(),
			stemmer: None,
			stem_exclusions: HashSet::new(),
			remove_elisions: true,
		}
	}

	/// Analyzer for languages without explicit configuration.
	pub fn generic() -> Self {
		Self::new(stopwords::generic().iter().map(|word| word.to_string()))
	}

	pub fn with_stemmer(mut self, stemmer: Arc<dyn Stemmer>) -> Self {
		self.stemmer = Some(stemmer);

		self
	}

	pub fn with_stem_exclusions(mut self, words: impl IntoIterator<Item = String>) -> Self {
		self.stem_exclusions = words.into_iter().collect();

		self
	}

	pub fn without_elision_removal(mut self) -> Self {
		self.remove_elisions = false;

		self
	}

	pub fn is_stop_word(&self, word: &str) -> bool {
		self.stop_words.contains(word)
	}

	pub fn analyze(&self, text: &str) -> Vec<String> {
		words(text)
			.into_iter()
			.filter(|token| !is_punctuation(token))
			.filter_map(|token| {
				let mut token = fold(&token);

				if self.remove_elisions {
					token = strip_elision(&token).to_string();
				}
				if token.is_empty() || self.stop_words.contains(&token) {
					return None;
				}

				match &self.stemmer {
					Some(stemmer) if !self.stem_exclusions.contains(&token) =>
						Some(stemmer.stem(&token)),
					_ => Some(token),
				}
			})
			.collect()
	}
}

/// Language code to analyzer registry.
#[derive(Debug, Clone)]
pub struct LanguageTable {
	languages: BTreeMap<String, Arc<LanguageAnalyzer>>,
	fallback: Arc<LanguageAnalyzer>,
}
impl LanguageTable {
	pub fn from_config(cfg: &tessera_config::Context) -> Self {
		let mut languages = BTreeMap::new();

		for (code, options) in &cfg.languages {
			let stop_words: Vec<String> = match &options.stop_words {
				Some(words) => words.clone(),
				None => stopwords::builtin_stop_words(code)
					.unwrap_or_default()
					.iter()
					.map(|word| word.to_string())
					.collect(),
			};
			let mut analyzer = LanguageAnalyzer::new(stop_words)
				.with_stem_exclusions(options.stem_exclusions.iter().cloned());

			if options.stemming {
				match stemmer_for(code) {
					Some(stemmer) => analyzer = analyzer.with_stemmer(stemmer),
					None => tracing::warn!(
						language = %code,
						"No stemmer is available for this language. Stemming is disabled."
					),
				}
			}

			languages.insert(code.clone(), Arc::new(analyzer));
		}

		Self { languages, fallback: Arc::new(LanguageAnalyzer::generic()) }
	}

	pub fn analyzer(&self, code: &str) -> Arc<LanguageAnalyzer> {
		self.languages.get(code).cloned().unwrap_or_else(|| self.fallback.clone())
	}

	pub fn is_configured(&self, code: &str) -> bool {
		self.languages.contains_key(code)
	}
}
impl Default for LanguageTable {
	fn default() -> Self {
		Self::from_config(&tessera_config::Context::default())
	}
}

/// Analyzes whole documents with the analyzer registered for their language.
#[derive(Debug, Clone, Default)]
pub struct DocumentAnalyzer {
	table: LanguageTable,
}
impl DocumentAnalyzer {
	pub fn new(table: LanguageTable) -> Self {
		Self { table }
	}

	pub fn from_config(cfg: &tessera_config::Context) -> Self {
		Self::new(LanguageTable::from_config(cfg))
	}

	pub fn table(&self) -> &LanguageTable {
		&self.table
	}

	pub fn analyze(&self, language: &str, text: &str) -> Vec<String> {
		self.table.analyzer(language).analyze(text)
	}
}

fn stemmer_for(code: &str) -> Option<Arc<dyn Stemmer>> {
	SnowballStemmer::for_language(code).map(|stemmer| Arc::new(stemmer) as Arc<dyn Stemmer>)
}

fn strip_elision(token: &str) -> &str {
	let Some((head, tail)) = token.split_once(['\'', '’']) else {
		return token;
	};

	if ELISIONS.contains(&head) { tail } else { token }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_elided_articles() {
		assert_eq!(strip_elision("l'homme"), "homme");
		assert_eq!(strip_elision("dell’arte"), "arte");
		assert_eq!(strip_elision("don't"), "don't");
	}

	#[test]
	fn generic_analyzer_drops_stop_words_and_punctuation() {
		let terms = LanguageAnalyzer::generic().analyze("The cats, and the dogs!");

		assert_eq!(terms, vec!["cats", "dogs"]);
	}

	#[test]
	fn stemming_respects_exclusions() {
		let analyzer = LanguageAnalyzer::new(Vec::new())
			.with_stemmer(Arc::new(SnowballStemmer::new(rust_stemmers::Algorithm::English)))
			.with_stem_exclusions(vec!["news".to_string()]);

		assert_eq!(analyzer.analyze("cats news"), vec!["cat", "news"]);
	}

	#[derive(Debug)]
	struct Truncate;
	impl Stemmer for Truncate {
		fn stem(&self, word: &str) -> String {
			word.chars().take(4).collect()
		}
	}

	#[test]
	fn any_stemmer_can_be_plugged_in() {
		let analyzer = LanguageAnalyzer::generic().with_stemmer(Arc::new(Truncate));

		assert_eq!(analyzer.analyze("The harbours and boats"), vec!["harb", "boat"]);
		assert!(stemmer_for("en").is_some());
		assert!(stemmer_for("xx").is_none());
	}
}
