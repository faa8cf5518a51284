use serde::{Deserialize, Serialize};

use crate::{LanguageDirection, MemoryId};

/// A retrieved translation unit, oriented to the direction it was queried in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
	pub memory: MemoryId,
	pub direction: LanguageDirection,
	pub source: Vec<String>,
	pub target: Vec<String>,
	pub score: f32,
}
impl ScoreEntry {
	pub fn source_text(&self) -> String {
		self.source.join(" ")
	}

	pub fn target_text(&self) -> String {
		self.target.join(" ")
	}
}
