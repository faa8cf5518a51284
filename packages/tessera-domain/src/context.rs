use std::collections::{HashMap, hash_map::Entry};

use serde::{Deserialize, Serialize};

use crate::MemoryId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
	pub memory: MemoryId,
	pub score: f32,
}

/// Memories relevant to an input text, best first, each memory at most once, scores in `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContextVector {
	entries: Vec<ContextEntry>,
}
impl ContextVector {
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn builder(limit: usize) -> ContextVectorBuilder {
		ContextVectorBuilder { limit, entries: Vec::new(), positions: HashMap::new() }
	}

	pub fn from_entries<I>(entries: I, limit: usize) -> Self
	where
		I: IntoIterator<Item = (MemoryId, f32)>,
	{
		let mut builder = Self::builder(limit);

		for (memory, score) in entries {
			builder.add(memory, score);
		}

		builder.build()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, ContextEntry> {
		self.entries.iter()
	}

	pub fn score_of(&self, memory: MemoryId) -> Option<f32> {
		self.entries.iter().find(|entry| entry.memory == memory).map(|entry| entry.score)
	}

	pub fn contains(&self, memory: MemoryId) -> bool {
		self.score_of(memory).is_some()
	}

	pub fn scores(&self) -> HashMap<MemoryId, f32> {
		self.entries.iter().map(|entry| (entry.memory, entry.score)).collect()
	}
}
impl<'a> IntoIterator for &'a ContextVector {
	type IntoIter = std::slice::Iter<'a, ContextEntry>;
	type Item = &'a ContextEntry;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}
impl<'de> Deserialize<'de> for ContextVector {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let entries = Vec::<ContextEntry>::deserialize(deserializer)?;
		let limit = entries.len();

		Ok(Self::from_entries(entries.into_iter().map(|entry| (entry.memory, entry.score)), limit))
	}
}

pub struct ContextVectorBuilder {
	limit: usize,
	entries: Vec<ContextEntry>,
	positions: HashMap<MemoryId, usize>,
}
impl ContextVectorBuilder {
	/// Non-finite scores count as zero; a repeated memory keeps its best score.
	pub fn add(&mut self, memory: MemoryId, score: f32) -> &mut Self {
		let score = if score.is_finite() { score.clamp(0.0, 1.0) } else { 0.0 };

		match self.positions.entry(memory) {
			Entry::Occupied(slot) => {
				let existing = &mut self.entries[*slot.get()];

				if score > existing.score {
					existing.score = score;
				}
			},
			Entry::Vacant(slot) => {
				slot.insert(self.entries.len());
				self.entries.push(ContextEntry { memory, score });
			},
		}

		self
	}

	pub fn build(self) -> ContextVector {
		let mut entries = self.entries;

		entries.sort_by(|a, b| b.score.total_cmp(&a.score));
		entries.truncate(self.limit);

		ContextVector { entries }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_best_score_per_memory() {
		let vector = ContextVector::from_entries(
			[(MemoryId(1), 0.2), (MemoryId(2), 0.9), (MemoryId(1), 0.6)],
			10,
		);

		assert_eq!(vector.len(), 2);
		assert_eq!(vector.iter().map(|entry| entry.memory).collect::<Vec<_>>(), vec![
			MemoryId(2),
			MemoryId(1)
		]);
		assert_eq!(vector.score_of(MemoryId(1)), Some(0.6));
	}

	#[test]
	fn truncates_and_clamps() {
		let vector = ContextVector::from_entries(
			[(MemoryId(1), 3.0), (MemoryId(2), f32::NAN), (MemoryId(3), 0.5)],
			2,
		);

		assert_eq!(vector.len(), 2);
		assert_eq!(vector.score_of(MemoryId(1)), Some(1.0));
		assert_eq!(vector.score_of(MemoryId(3)), Some(0.5));
		assert!(!vector.contains(MemoryId(2)));
	}

	#[test]
	fn equal_scores_keep_insertion_order() {
		let vector =
			ContextVector::from_entries([(MemoryId(7), 0.5), (MemoryId(3), 0.5)], 10);

		assert_eq!(vector.iter().map(|entry| entry.memory).collect::<Vec<_>>(), vec![
			MemoryId(7),
			MemoryId(3)
		]);
	}
}
