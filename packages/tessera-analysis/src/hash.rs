/// Whitespace-only tokenizer for exact fingerprints: no case folding, no punctuation removal, so
/// two texts produce the same tokens iff they are token-identical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HashAnalyzer;
impl HashAnalyzer {
	pub fn analyze(&self, text: &str) -> Vec<String> {
		text.split_whitespace().map(str::to_string).collect()
	}
}
