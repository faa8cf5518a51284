use std::fmt::{self, Debug};

use rust_stemmers::{Algorithm, Stemmer as Snowball};

pub trait Stemmer
where
	Self: Debug + Send + Sync,
{
	fn stem(&self, word: &str) -> String;
}

/// Snowball stemmer for one language. Expects case-folded input.
pub struct SnowballStemmer {
	algorithm: Algorithm,
	inner: Snowball,
}
impl SnowballStemmer {
	pub fn new(algorithm: Algorithm) -> Self {
		Self { algorithm, inner: Snowball::create(algorithm) }
	}

	/// Stemmer for a two-letter language code, if Snowball ships one.
	pub fn for_language(code: &str) -> Option<Self> {
		let algorithm = match code {
			"ar" => Algorithm::Arabic,
			"da" => Algorithm::Danish,
			"de" => Algorithm::German,
			"el" => Algorithm::Greek,
			"en" => Algorithm::English,
			"es" => Algorithm::Spanish,
			"fi" => Algorithm::Finnish,
			"fr" => Algorithm::French,
			"hu" => Algorithm::Hungarian,
			"it" => Algorithm::Italian,
			"nl" => Algorithm::Dutch,
			"no" | "nb" | "nn" => Algorithm::Norwegian,
			"pt" => Algorithm::Portuguese,
			"ro" => Algorithm::Romanian,
			"ru" => Algorithm::Russian,
			"sv" => Algorithm::Swedish,
			"ta" => Algorithm::Tamil,
			"tr" => Algorithm::Turkish,
			_ => return None,
		};

		Some(Self::new(algorithm))
	}
}
impl Stemmer for SnowballStemmer {
	fn stem(&self, word: &str) -> String {
		self.inner.stem(word).into_owned()
	}
}
impl Debug for SnowballStemmer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SnowballStemmer").field("algorithm", &self.algorithm).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stems_by_language() {
		let english = SnowballStemmer::for_language("en").expect("English must be supported.");
		let spanish = SnowballStemmer::for_language("es").expect("Spanish must be supported.");

		assert_eq!(english.stem("sailing"), "sail");
		assert_eq!(english.stem("boats"), "boat");
		assert_eq!(english.stem("ponies"), "poni");
		assert_eq!(spanish.stem("gatos"), "gat");
	}

	#[test]
	fn unknown_codes_have_no_stemmer() {
		assert!(SnowballStemmer::for_language("nb").is_some());
		assert!(SnowballStemmer::for_language("zh").is_none());
		assert!(SnowballStemmer::for_language("english").is_none());
	}
}
