pub mod context;
pub mod ingest;
pub mod memory;
pub mod query;
pub mod rescoring;

mod error;
mod fields;

pub use context::ContextAnalyzer;
pub use error::{Error, Result};
pub use fields::{content_field, corpus_field};
pub use ingest::DataListener;
pub use memory::TranslationMemory;
pub use query::QueryBuilder;
pub use rescoring::{F1BleuRescorer, Rescorer};

use std::{path::Path, sync::Arc};

use rayon::{ThreadPool, ThreadPoolBuilder};

use tessera_config::Config;
use tessera_domain::{
	ChannelPositions, ContextVector, DataBatch, LanguageDirection, MemoryId, ScoreEntry,
};

/// Both retrieval stages over one storage root, sharing a worker pool.
pub struct Engine {
	cfg: Config,
	pool: Arc<ThreadPool>,
	memory: TranslationMemory,
	context: ContextAnalyzer,
}
impl Engine {
	pub fn open(cfg: Config) -> Result<Self> {
		let pool = Arc::new(
			ThreadPoolBuilder::new()
				.num_threads(cfg.runtime.threads)
				.thread_name(|idx| format!("tessera-worker-{idx}"))
				.build()?,
		);
		let rescorer = Arc::new(F1BleuRescorer::new(pool.clone(), &cfg.memory));
		let memory = TranslationMemory::open(cfg.storage.memory_path(), &cfg, rescorer)?;
		let context =
			ContextAnalyzer::open(cfg.storage.context_path(), &cfg.context, pool.clone())?;

		tracing::info!(
			path = %cfg.storage.path.display(),
			units = memory.size(),
			corpora = context.size()?,
			workers = pool.current_num_threads(),
			"Engine opened."
		);

		Ok(Self { cfg, pool, memory, context })
	}

	pub fn config(&self) -> &Config {
		&self.cfg
	}

	pub fn pool(&self) -> &ThreadPool {
		&self.pool
	}

	pub fn memory(&self) -> &TranslationMemory {
		&self.memory
	}

	pub fn context(&self) -> &ContextAnalyzer {
		&self.context
	}

	pub fn context_vector(
		&self,
		direction: &LanguageDirection,
		text: &str,
		limit: usize,
	) -> Result<ContextVector> {
		self.context.context_vector(direction, text, limit)
	}

	pub fn context_vector_from_file(
		&self,
		direction: &LanguageDirection,
		path: &Path,
		limit: usize,
	) -> Result<ContextVector> {
		self.context.context_vector_from_file(direction, path, limit)
	}

	/// Like `context_vector`, but a failure is logged and yields an empty vector.
	pub fn context_vector_or_empty(
		&self,
		direction: &LanguageDirection,
		text: &str,
		limit: usize,
	) -> ContextVector {
		self.context_vector(direction, text, limit).unwrap_or_else(|err| {
			tracing::warn!(
				error = %err,
				%direction,
				"Context analysis failed. Proceeding without context."
			);

			ContextVector::empty()
		})
	}

	pub fn suggestions(
		&self,
		direction: &LanguageDirection,
		sentence: &str,
		context: Option<&ContextVector>,
		limit: usize,
	) -> Result<Vec<ScoreEntry>> {
		self.memory.suggestions(direction, sentence, context, limit)
	}

	/// Like `suggestions`, but a failure is logged and yields no suggestions.
	pub fn suggestions_or_empty(
		&self,
		direction: &LanguageDirection,
		sentence: &str,
		context: Option<&ContextVector>,
		limit: usize,
	) -> Vec<ScoreEntry> {
		self.suggestions(direction, sentence, context, limit).unwrap_or_else(|err| {
			tracing::warn!(
				error = %err,
				%direction,
				"Memory lookup failed. Proceeding without suggestions."
			);

			Vec::new()
		})
	}

	pub fn add_corpus(&self, memory: MemoryId, language: &str, text: &str) -> Result<()> {
		self.context.add_corpus(memory, language, text)
	}

	pub fn optimize(&self) -> Result<()> {
		self.memory.optimize()?;
		self.context.optimize()
	}

	/// Per channel, the highest position any stage has applied. Offsets past it are unused by
	/// every stage, so new events can be numbered from there.
	pub fn furthest_channel_positions(&self) -> ChannelPositions {
		let mut positions = self.memory.latest_channel_positions();

		positions.merge(&self.context.latest_channel_positions());

		positions
	}
}
impl DataListener for Engine {
	/// Feeds both stages. Each keeps its own positions, so a stage that fails here catches up when
	/// the batch is replayed.
	fn on_data_received(&self, batch: &DataBatch) -> Result<()> {
		if batch.is_empty() {
			return Ok(());
		}

		let memory = self.memory.on_data_received(batch);
		let context = self.context.on_data_received(batch);

		tracing::debug!(
			units = batch.units.len(),
			deletions = batch.deletions.len(),
			"Batch delivered."
		);

		memory.and(context)
	}

	/// Per channel, the lowest position over both stages: the safe point to resume the log from.
	fn latest_channel_positions(&self) -> ChannelPositions {
		let memory = self.memory.latest_channel_positions();

		memory.intersect_min(&self.context.latest_channel_positions())
	}
}
