use std::{path::Path, sync::Arc};

use parking_lot::Mutex;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use tessera_analysis::{ContentAnalyzer, HashAnalyzer, words};
use tessera_domain::{
	ChannelPositions, ContextVector, DataBatch, LanguageDirection, MemoryId, ScoreEntry,
	TranslationUnit,
};
use tessera_index::{Document, DocumentStore, Query, Snapshot};

use crate::{
	DataListener, Error, QueryBuilder, Rescorer, Result, fields,
	ingest::{self, FreshData},
};

/// Bilingual segment store answering "which earlier translations look like this sentence".
pub struct TranslationMemory {
	store: DocumentStore,
	queries: QueryBuilder,
	index: ContentAnalyzer,
	rescorer: Arc<dyn Rescorer>,
	min_query_size: usize,
	writer: Mutex<()>,
}
impl TranslationMemory {
	pub fn open(
		path: impl AsRef<Path>,
		cfg: &tessera_config::Config,
		rescorer: Arc<dyn Rescorer>,
	) -> Result<Self> {
		let store = DocumentStore::open(path, fields::memory_schema())?;

		Ok(Self {
			store,
			queries: QueryBuilder::new(&cfg.analysis, &cfg.memory),
			index: ContentAnalyzer::index(&cfg.analysis),
			rescorer,
			min_query_size: cfg.memory.min_query_size,
			writer: Mutex::new(()),
		})
	}

	pub fn queries(&self) -> &QueryBuilder {
		&self.queries
	}

	pub fn size(&self) -> usize {
		self.store.len()
	}

	pub fn optimize(&self) -> Result<()> {
		let _writer = self.writer.lock();

		Ok(self.store.optimize()?)
	}

	/// Best `limit` earlier units for `sentence`, restricted to the memories of `context` when it
	/// is non-empty.
	pub fn suggestions(
		&self,
		direction: &LanguageDirection,
		sentence: &str,
		context: Option<&ContextVector>,
		limit: usize,
	) -> Result<Vec<ScoreEntry>> {
		if limit == 0 {
			return Ok(Vec::new());
		}

		let query = self.queries.best_matching_suggestion(direction, sentence, context);

		if query.is_match_none() {
			return Ok(Vec::new());
		}

		let snapshot = self.store.open_reader();
		let hits = snapshot.search(&query, self.min_query_size.max(limit.saturating_mul(2)))?;
		let mut entries = Vec::with_capacity(hits.len());

		for hit in hits {
			let Some(doc) = snapshot.doc(hit.address)? else {
				continue;
			};
			let unit = unit_from_document(&doc)?;

			entries.push(score_entry(direction, &unit, hit.score));
		}

		let candidates = entries.len();
		let mut entries = self.rescorer.rescore(&words(sentence), entries, context)?;

		entries.truncate(limit);

		tracing::debug!(%direction, candidates, returned = entries.len(), "Suggestions ranked.");

		Ok(entries)
	}

	/// Stored units of `memory` whose source is token-identical to `source`.
	pub fn lookup(&self, memory: MemoryId, source: &str) -> Result<Vec<TranslationUnit>> {
		let snapshot = self.store.open_reader();

		collect_units(&snapshot, &self.queries.by_hash(memory, source))
	}

	/// Every stored unit, optionally limited to one memory, in insertion order.
	pub fn dump(&self, memory: Option<MemoryId>) -> Result<Vec<TranslationUnit>> {
		let snapshot = self.store.open_reader();

		match memory {
			Some(memory) => collect_units(&snapshot, &self.queries.by_memory(memory)),
			None => snapshot
				.live_documents()?
				.iter()
				.map(|(_, doc)| unit_from_document(doc))
				.collect(),
		}
	}

	fn unit_document(&self, unit: &TranslationUnit) -> Result<Document> {
		let timestamp = unit.timestamp.format(&Rfc3339).map_err(|err| Error::InvalidInput {
			message: format!("Timestamp cannot be formatted: {err}."),
		})?;
		let direction = &unit.direction;

		Ok(Document::new()
			.keyword(fields::MEMORY, unit.memory.to_string())
			.text(fields::HASH, HashAnalyzer.analyze(&unit.source), None)
			.text(fields::TARGET_HASH, HashAnalyzer.analyze(&unit.target), None)
			.keyword(fields::SOURCE_LANG, direction.source())
			.keyword(fields::TARGET_LANG, direction.target())
			.text(fields::content_field(direction), self.index.analyze(&unit.source), None)
			.text(
				fields::content_field(&direction.reversed()),
				self.index.analyze(&unit.target),
				None,
			)
			.stored(fields::SENTENCE, &unit.source)
			.stored(fields::TRANSLATION, &unit.target)
			.stored(fields::TIMESTAMP, timestamp)
			.stored(fields::CHANNEL, unit.channel.to_string())
			.stored(fields::OFFSET, unit.offset.to_string()))
	}

	fn stage(&self, fresh: &FreshData<'_>) -> Result<()> {
		for unit in &fresh.units {
			if let Some((source, target)) = unit.replaced() {
				self.store.delete_query(self.queries.by_content(unit.memory, source, target));
			}

			self.store.put(self.unit_document(unit)?)?;
		}
		for deletion in &fresh.deletions {
			self.store.delete_query(self.queries.by_memory(deletion.memory));
		}

		Ok(())
	}
}
impl DataListener for TranslationMemory {
	fn on_data_received(&self, batch: &DataBatch) -> Result<()> {
		let _writer = self.writer.lock();
		let snapshot = self.store.open_reader();
		let fresh = ingest::fresh_data(snapshot.channel_positions(), batch);

		if fresh.skipped > 0 {
			tracing::debug!(skipped = fresh.skipped, "Already applied events skipped.");
		}
		if fresh.is_empty() {
			return Ok(());
		}

		let positions = batch.channel_positions();
		let result = self.stage(&fresh).and_then(|()| {
			self.store.commit_with_positions(Some(&positions)).map_err(Error::from)
		});

		if result.is_err() {
			self.store.rollback();
		}

		result
	}

	fn latest_channel_positions(&self) -> ChannelPositions {
		self.store.open_reader().channel_positions().clone()
	}
}

fn collect_units(snapshot: &Snapshot, query: &Query) -> Result<Vec<TranslationUnit>> {
	let mut units = Vec::new();

	for address in snapshot.matching(query)? {
		if let Some(doc) = snapshot.doc(address)? {
			units.push(unit_from_document(&doc)?);
		}
	}

	Ok(units)
}

fn score_entry(direction: &LanguageDirection, unit: &TranslationUnit, score: f32) -> ScoreEntry {
	let (source, target) = if unit.direction == *direction {
		(&unit.source, &unit.target)
	} else {
		(&unit.target, &unit.source)
	};

	ScoreEntry {
		memory: unit.memory,
		direction: direction.clone(),
		source: words(source),
		target: words(target),
		score,
	}
}

fn unit_from_document(doc: &Document) -> Result<TranslationUnit> {
	let field = |name: &str| {
		doc.get(name).ok_or_else(|| Error::IndexUnavailable {
			message: format!("Stored unit is missing field {name}."),
		})
	};
	let malformed = |name: &str| Error::IndexUnavailable {
		message: format!("Stored unit has a malformed {name} field."),
	};
	let timestamp = OffsetDateTime::parse(field(fields::TIMESTAMP)?, &Rfc3339)
		.map_err(|_| malformed(fields::TIMESTAMP))?;

	Ok(TranslationUnit {
		memory: field(fields::MEMORY)?.parse().map_err(|_| malformed(fields::MEMORY))?,
		direction: LanguageDirection::new(field(fields::SOURCE_LANG)?, field(fields::TARGET_LANG)?),
		source: field(fields::SENTENCE)?.to_string(),
		target: field(fields::TRANSLATION)?.to_string(),
		timestamp,
		channel: field(fields::CHANNEL)?.parse().map_err(|_| malformed(fields::CHANNEL))?,
		offset: field(fields::OFFSET)?.parse().map_err(|_| malformed(fields::OFFSET))?,
		previous_source: None,
		previous_target: None,
	})
}
