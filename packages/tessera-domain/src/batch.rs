use std::collections::{BTreeMap, btree_map};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{LanguageDirection, MemoryId};

pub type ChannelId = u16;
pub type ChannelOffset = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationUnit {
	pub memory: MemoryId,
	pub direction: LanguageDirection,
	pub source: String,
	pub target: String,
	#[serde(with = "crate::timestamp")]
	pub timestamp: OffsetDateTime,
	pub channel: ChannelId,
	pub offset: ChannelOffset,
	/// Set when the unit replaces an earlier version of itself.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub previous_source: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub previous_target: Option<String>,
}
impl TranslationUnit {
	pub fn replaced(&self) -> Option<(&str, &str)> {
		match (self.previous_source.as_deref(), self.previous_target.as_deref()) {
			(Some(source), Some(target)) => Some((source, target)),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
	pub memory: MemoryId,
	pub channel: ChannelId,
	pub offset: ChannelOffset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataBatch {
	#[serde(default)]
	pub units: Vec<TranslationUnit>,
	#[serde(default)]
	pub deletions: Vec<Deletion>,
}
impl DataBatch {
	pub fn is_empty(&self) -> bool {
		self.units.is_empty() && self.deletions.is_empty()
	}

	/// Highest offset per channel carried by the batch.
	pub fn channel_positions(&self) -> ChannelPositions {
		let mut positions = ChannelPositions::default();

		for unit in &self.units {
			positions.advance(unit.channel, unit.offset);
		}
		for deletion in &self.deletions {
			positions.advance(deletion.channel, deletion.offset);
		}

		positions
	}
}

/// Last applied offset per upstream channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelPositions(BTreeMap<ChannelId, ChannelOffset>);
impl ChannelPositions {
	pub fn get(&self, channel: ChannelId) -> Option<ChannelOffset> {
		self.0.get(&channel).copied()
	}

	pub fn is_applied(&self, channel: ChannelId, offset: ChannelOffset) -> bool {
		self.get(channel).is_some_and(|applied| offset <= applied)
	}

	/// Moves the channel forward; never backwards. Returns whether anything changed.
	pub fn advance(&mut self, channel: ChannelId, offset: ChannelOffset) -> bool {
		match self.0.entry(channel) {
			btree_map::Entry::Vacant(entry) => {
				entry.insert(offset);

				true
			},
			btree_map::Entry::Occupied(mut entry) if *entry.get() < offset => {
				entry.insert(offset);

				true
			},
			btree_map::Entry::Occupied(_) => false,
		}
	}

	pub fn merge(&mut self, other: &ChannelPositions) -> bool {
		let mut changed = false;

		for (channel, offset) in other.iter() {
			changed |= self.advance(channel, offset);
		}

		changed
	}

	/// Per channel, the lowest position of the two. A channel missing on either side is missing in
	/// the result, since that side has applied nothing from it.
	pub fn intersect_min(&self, other: &ChannelPositions) -> ChannelPositions {
		let mut out = BTreeMap::new();

		for (channel, offset) in self.iter() {
			if let Some(other_offset) = other.get(channel) {
				out.insert(channel, offset.min(other_offset));
			}
		}

		ChannelPositions(out)
	}

	pub fn iter(&self) -> impl Iterator<Item = (ChannelId, ChannelOffset)> + '_ {
		self.0.iter().map(|(channel, offset)| (*channel, *offset))
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl FromIterator<(ChannelId, ChannelOffset)> for ChannelPositions {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (ChannelId, ChannelOffset)>,
	{
		let mut positions = Self::default();

		for (channel, offset) in iter {
			positions.advance(channel, offset);
		}

		positions
	}
}
