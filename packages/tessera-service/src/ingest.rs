use tessera_domain::{ChannelPositions, DataBatch, Deletion, TranslationUnit};

use crate::Result;

/// Consumer of the upstream channel log. Each listener persists its own channel positions together
/// with its data, so replaying the log re-applies nothing already durable.
pub trait DataListener
where
	Self: Send + Sync,
{
	fn on_data_received(&self, batch: &DataBatch) -> Result<()>;

	fn on_delete(&self, deletion: &Deletion) -> Result<()> {
		self.on_data_received(&DataBatch { units: Vec::new(), deletions: vec![*deletion] })
	}

	fn latest_channel_positions(&self) -> ChannelPositions;
}

/// The part of a batch not yet applied, in log order: units first, then deletions.
#[derive(Debug, Default)]
pub(crate) struct FreshData<'a> {
	pub(crate) units: Vec<&'a TranslationUnit>,
	pub(crate) deletions: Vec<&'a Deletion>,
	pub(crate) skipped: usize,
}
impl FreshData<'_> {
	pub(crate) fn is_empty(&self) -> bool {
		self.units.is_empty() && self.deletions.is_empty()
	}
}

pub(crate) fn fresh_data<'a>(applied: &ChannelPositions, batch: &'a DataBatch) -> FreshData<'a> {
	let mut fresh = FreshData::default();

	for unit in &batch.units {
		if applied.is_applied(unit.channel, unit.offset) {
			fresh.skipped += 1;
		} else {
			fresh.units.push(unit);
		}
	}
	for deletion in &batch.deletions {
		if applied.is_applied(deletion.channel, deletion.offset) {
			fresh.skipped += 1;
		} else {
			fresh.deletions.push(deletion);
		}
	}

	fresh
}

#[cfg(test)]
mod tests {
	use tessera_domain::{LanguageDirection, MemoryId};
	use time::OffsetDateTime;

	use super::*;

	fn unit(channel: u16, offset: u64) -> TranslationUnit {
		TranslationUnit {
			memory: MemoryId(1),
			direction: LanguageDirection::new("en", "it"),
			source: "a".to_string(),
			target: "b".to_string(),
			timestamp: OffsetDateTime::UNIX_EPOCH,
			channel,
			offset,
			previous_source: None,
			previous_target: None,
		}
	}

	#[test]
	fn skips_offsets_at_or_below_the_applied_position() {
		let applied: ChannelPositions = [(0, 5)].into_iter().collect();
		let batch = DataBatch {
			units: vec![unit(0, 4), unit(0, 5), unit(0, 6), unit(1, 0)],
			deletions: vec![Deletion { memory: MemoryId(1), channel: 0, offset: 3 }],
		};
		let fresh = fresh_data(&applied, &batch);

		let kept: Vec<_> = fresh.units.iter().map(|unit| (unit.channel, unit.offset)).collect();

		assert_eq!(kept, vec![(0, 6), (1, 0)]);
		assert!(fresh.deletions.is_empty());
		assert_eq!(fresh.skipped, 3);
	}
}
