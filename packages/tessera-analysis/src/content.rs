use crate::tokens::{fold, is_punctuation, words};

/// Turns sentence text into index terms: unigrams, shingles of `shingle_size` words, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentAnalyzer {
	shingle_size: usize,
	unigrams: bool,
	shingles: bool,
	lowercase: bool,
}
impl ContentAnalyzer {
	/// Write-time analyzer: every unigram and every shingle.
	pub fn index(cfg: &tessera_config::Analysis) -> Self {
		Self {
			shingle_size: cfg.shingle_size,
			unigrams: true,
			shingles: true,
			lowercase: cfg.lowercase,
		}
	}

	pub fn short_query(cfg: &tessera_config::Analysis) -> Self {
		Self {
			shingle_size: cfg.shingle_size,
			unigrams: true,
			shingles: false,
			lowercase: cfg.lowercase,
		}
	}

	pub fn long_query(cfg: &tessera_config::Analysis) -> Self {
		Self {
			shingle_size: cfg.shingle_size,
			unigrams: false,
			shingles: true,
			lowercase: cfg.lowercase,
		}
	}

	pub fn tokens(&self, text: &str) -> Vec<String> {
		words(text)
			.into_iter()
			.filter(|token| !is_punctuation(token))
			.map(|token| if self.lowercase { fold(&token) } else { token })
			.collect()
	}

	pub fn analyze(&self, text: &str) -> Vec<String> {
		let tokens = self.tokens(text);

		self.terms(&tokens)
	}

	/// Terms for already-split tokens. A token list shorter than the shingle window yields its
	/// unigrams even when unigrams are off, so short inputs still produce terms.
	pub fn terms(&self, tokens: &[String]) -> Vec<String> {
		let window = self.shingle_size.max(2);
		let shingles = self.shingles && tokens.len() >= window;
		let unigrams = self.unigrams || !shingles;
		let mut out = Vec::new();

		for (idx, token) in tokens.iter().enumerate() {
			if unigrams {
				out.push(token.clone());
			}
			if shingles && idx + window <= tokens.len() {
				out.push(tokens[idx..idx + window].join(" "));
			}
		}

		out
	}
}
