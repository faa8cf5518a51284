use std::{collections::BTreeMap, path::PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	#[serde(default)]
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub analysis: Analysis,
	#[serde(default)]
	pub memory: Memory,
	#[serde(default)]
	pub context: Context,
	#[serde(default)]
	pub runtime: Runtime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	#[serde(default = "default_log_level")]
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { log_level: default_log_level() }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	/// Engine root. The translation memory lives in `<path>/memory`, the context index in
	/// `<path>/context`.
	pub path: PathBuf,
}
impl Storage {
	pub fn memory_path(&self) -> PathBuf {
		self.path.join("memory")
	}

	pub fn context_path(&self) -> PathBuf {
		self.path.join("context")
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Analysis {
	pub shingle_size: usize,
	/// Sentences with at most this many words are queried with unigrams and must match every term.
	pub short_query_max_terms: usize,
	pub lowercase: bool,
}
impl Default for Analysis {
	fn default() -> Self {
		Self { shingle_size: 2, short_query_max_terms: 4, lowercase: true }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Memory {
	pub min_query_size: usize,
	pub min_should_match_ratio: f32,
	pub context_weight: f32,
	pub ngram_order: usize,
	pub smoothing_epsilon: f64,
}
impl Default for Memory {
	fn default() -> Self {
		Self {
			min_query_size: 10,
			min_should_match_ratio: 0.5,
			context_weight: 0.5,
			ngram_order: 4,
			smoothing_epsilon: 0.1,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Context {
	pub min_result_batch: usize,
	pub max_query_terms: usize,
	pub min_word_len: usize,
	/// Keys are two-letter language codes. Languages missing here use the generic analyzer.
	pub languages: BTreeMap<String, LanguageAnalysis>,
}
impl Default for Context {
	fn default() -> Self {
		Self {
			min_result_batch: 20,
			max_query_terms: 25,
			min_word_len: 2,
			languages: BTreeMap::new(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LanguageAnalysis {
	pub stemming: bool,
	/// Replaces the built-in stop-word list when set.
	pub stop_words: Option<Vec<String>>,
	/// Words never passed to the stemmer.
	pub stem_exclusions: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Runtime {
	/// Rescoring worker count. Zero uses every available core.
	pub threads: usize,
}

fn default_log_level() -> String {
	"info".to_string()
}
