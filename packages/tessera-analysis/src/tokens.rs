use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Splits a sentence into words on Unicode word boundaries. Punctuation survives as separate
/// tokens, whitespace does not, and case is preserved.
pub fn words(text: &str) -> Vec<String> {
	text.split_word_bounds()
		.filter(|segment| !segment.chars().all(char::is_whitespace))
		.map(str::to_string)
		.collect()
}

pub fn is_punctuation(token: &str) -> bool {
	!token.chars().any(char::is_alphanumeric)
}

/// Compatibility-normalizes and lower-cases a token.
pub fn fold(token: &str) -> String {
	token.nfkc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_punctuation_tokens() {
		assert_eq!(words("Hello, world!"), vec!["Hello", ",", "world", "!"]);
		assert!(words("  \t ").is_empty());
	}

	#[test]
	fn detects_punctuation_only_tokens() {
		assert!(is_punctuation("..."));
		assert!(is_punctuation("«"));
		assert!(!is_punctuation("a1"));
	}

	#[test]
	fn folds_width_and_case() {
		assert_eq!(fold("ＣＡＴ"), "cat");
		assert_eq!(fold("Été"), "été");
	}
}
