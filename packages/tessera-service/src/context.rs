use std::{
	collections::{BTreeMap, BTreeSet, HashMap},
	fs,
	path::Path,
	sync::Arc,
};

use parking_lot::Mutex;
use rayon::{ThreadPool, prelude::*};

use tessera_analysis::DocumentAnalyzer;
use tessera_domain::{ChannelPositions, ContextVector, DataBatch, LanguageDirection, MemoryId};
use tessera_index::{BooleanQuery, Document, DocumentStore, Query, Snapshot};

use crate::{
	DataListener, Error, Result, fields,
	ingest::{self, FreshData},
};

type TermCounts = HashMap<String, u32>;

/// Corpus text is appended in chunk documents of at most this many terms.
const CHUNK_TERMS: usize = 4_096;

/// Maps an input text to the memories whose corpora look most like it.
pub struct ContextAnalyzer {
	store: DocumentStore,
	analyzer: DocumentAnalyzer,
	pool: Arc<ThreadPool>,
	min_result_batch: usize,
	max_query_terms: usize,
	min_word_len: usize,
	writer: Mutex<()>,
}
impl ContextAnalyzer {
	pub fn open(
		path: impl AsRef<Path>,
		cfg: &tessera_config::Context,
		pool: Arc<ThreadPool>,
	) -> Result<Self> {
		let store = DocumentStore::open(path, fields::context_schema())?;

		Ok(Self {
			store,
			analyzer: DocumentAnalyzer::from_config(cfg),
			pool,
			min_result_batch: cfg.min_result_batch,
			max_query_terms: cfg.max_query_terms,
			min_word_len: cfg.min_word_len,
			writer: Mutex::new(()),
		})
	}

	/// Number of (memory, language) corpora.
	pub fn size(&self) -> Result<usize> {
		let snapshot = self.store.open_reader();
		let corpora: BTreeSet<String> = snapshot
			.live_documents()?
			.into_iter()
			.filter_map(|(_, doc)| doc.get(fields::CORPUS).map(str::to_string))
			.collect();

		Ok(corpora.len())
	}

	pub fn optimize(&self) -> Result<()> {
		let _writer = self.writer.lock();

		Ok(self.store.optimize()?)
	}

	pub fn context_vector(
		&self,
		direction: &LanguageDirection,
		text: &str,
		limit: usize,
	) -> Result<ContextVector> {
		let language = direction.source();
		let field = fields::corpus_field(language);
		let snapshot = self.store.open_reader();

		if limit == 0 || snapshot.num_docs_with_field(&field) == 0 {
			return Ok(ContextVector::empty());
		}

		let input = term_counts(self.analyzer.analyze(language, text));
		let Some(query) = self.more_like_this(&snapshot, language, &field, &input) else {
			return Ok(ContextVector::empty());
		};
		let hits = snapshot.search(&query, limit.max(self.min_result_batch))?;
		let mut corpora: Vec<String> = Vec::new();

		for hit in &hits {
			let doc = snapshot.doc(hit.address)?.ok_or_else(vanished)?;
			let id = doc.get(fields::CORPUS).ok_or_else(|| Error::IndexUnavailable {
				message: "Corpus chunk has no corpus id.".to_string(),
			})?;

			if !corpora.iter().any(|known| known == id) {
				corpora.push(id.to_string());
			}
		}

		let scored: Vec<(MemoryId, f32)> = self.pool.install(|| {
			corpora
				.par_iter()
				.map(|id| {
					let (memory, vector) = corpus_vector(&snapshot, id, &field)?;

					Ok((memory, cosine_similarity(&input, &vector)))
				})
				.collect::<Result<Vec<_>>>()
		})?;
		let candidates = scored.len();
		let vector = ContextVector::from_entries(scored, limit);

		tracing::debug!(
			%direction,
			candidates,
			returned = vector.len(),
			"Context vector computed."
		);

		Ok(vector)
	}

	pub fn context_vector_from_file(
		&self,
		direction: &LanguageDirection,
		path: &Path,
		limit: usize,
	) -> Result<ContextVector> {
		let text = fs::read_to_string(path).map_err(|err| Error::InvalidInput {
			message: format!("Failed to read {}: {err}.", path.display()),
		})?;

		self.context_vector(direction, &text, limit)
	}

	/// Appends monolingual text to the corpus of `memory` in `language`.
	pub fn add_corpus(&self, memory: MemoryId, language: &str, text: &str) -> Result<()> {
		let _writer = self.writer.lock();
		let mut additions = BTreeMap::new();

		additions.insert((memory, language.to_string()), vec![text]);

		let result = self.stage_corpora(additions).and_then(|()| self.commit(None));

		if result.is_err() {
			self.store.rollback();
		}

		result
	}

	/// Weighted should-clauses over the input's best terms, `tf * idf` relative to the best one.
	fn more_like_this(
		&self,
		snapshot: &Snapshot,
		language: &str,
		field: &str,
		input: &TermCounts,
	) -> Option<Query> {
		let mut weighted: Vec<(&str, f32)> = input
			.iter()
			.filter(|(term, _)| term.chars().count() >= self.min_word_len)
			.filter(|(term, _)| snapshot.doc_freq(field, term) > 0)
			.map(|(term, tf)| (term.as_str(), *tf as f32 * snapshot.idf(field, term)))
			.collect();

		weighted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
		weighted.truncate(self.max_query_terms);

		let best = weighted.first()?.1;

		if best <= 0.0 {
			return None;
		}

		let mut query = BooleanQuery::new()
			.filter(Query::term(fields::LANGUAGE, language))
			.min_should_match(1);

		for (term, weight) in weighted {
			query = query.should(Query::boosted_term(field, term, weight / best));
		}

		Some(query.into())
	}

	/// Appends new chunk documents; earlier chunks of the same corpus are never rewritten.
	fn stage_corpora(&self, additions: BTreeMap<(MemoryId, String), Vec<&str>>) -> Result<()> {
		for ((memory, language), texts) in additions {
			let id = corpus_id(memory, &language);
			let field = fields::corpus_field(&language);
			let terms: Vec<String> =
				texts.into_iter().flat_map(|text| self.analyzer.analyze(&language, text)).collect();

			for chunk in terms.chunks(CHUNK_TERMS) {
				self.store.put(
					Document::new()
						.keyword(fields::CORPUS, id.as_str())
						.keyword(fields::MEMORY, memory.to_string())
						.keyword(fields::LANGUAGE, language.as_str())
						.text(field.as_str(), chunk.to_vec(), None),
				)?;
			}
		}

		Ok(())
	}

	fn stage(&self, fresh: &FreshData<'_>) -> Result<()> {
		let mut additions: BTreeMap<(MemoryId, String), Vec<&str>> = BTreeMap::new();

		for unit in &fresh.units {
			let direction = &unit.direction;

			additions
				.entry((unit.memory, direction.source().to_string()))
				.or_default()
				.push(unit.source.as_str());
			additions
				.entry((unit.memory, direction.target().to_string()))
				.or_default()
				.push(unit.target.as_str());
		}

		self.stage_corpora(additions)?;

		for deletion in &fresh.deletions {
			self.store.delete_term(fields::MEMORY, deletion.memory.to_string());
		}

		Ok(())
	}

	fn commit(&self, positions: Option<&ChannelPositions>) -> Result<()> {
		Ok(self.store.commit_with_positions(positions)?)
	}
}
impl DataListener for ContextAnalyzer {
	fn on_data_received(&self, batch: &DataBatch) -> Result<()> {
		let _writer = self.writer.lock();
		let snapshot = self.store.open_reader();
		let fresh = ingest::fresh_data(snapshot.channel_positions(), batch);

		if fresh.is_empty() {
			return Ok(());
		}

		let positions = batch.channel_positions();
		let result = self.stage(&fresh).and_then(|()| self.commit(Some(&positions)));

		if result.is_err() {
			self.store.rollback();
		}

		result
	}

	fn latest_channel_positions(&self) -> ChannelPositions {
		self.store.open_reader().channel_positions().clone()
	}
}

pub fn cosine_similarity(input: &TermCounts, candidate: &BTreeMap<String, u32>) -> f32 {
	let dot: f64 = input
		.iter()
		.filter_map(|(term, count)| candidate.get(term).map(|other| *count as f64 * *other as f64))
		.sum();
	let input_norm = input.values().map(|count| (*count as f64).powi(2)).sum::<f64>().sqrt();
	let candidate_norm =
		candidate.values().map(|count| (*count as f64).powi(2)).sum::<f64>().sqrt();
	let score = dot / (input_norm * candidate_norm);

	if score.is_finite() { score.clamp(0.0, 1.0) as f32 } else { 0.0 }
}

fn term_counts(terms: Vec<String>) -> TermCounts {
	let mut counts = TermCounts::new();

	for term in terms {
		*counts.entry(term).or_insert(0) += 1;
	}

	counts
}

fn corpus_id(memory: MemoryId, language: &str) -> String {
	format!("{memory}/{language}")
}

fn corpus_memory(doc: &Document) -> Result<MemoryId> {
	doc.get(fields::MEMORY).and_then(|raw| raw.parse().ok()).ok_or_else(|| {
		Error::IndexUnavailable { message: "Corpus document has no memory id.".to_string() }
	})
}

/// Summed term frequencies over every chunk of one corpus.
fn corpus_vector(
	snapshot: &Snapshot,
	id: &str,
	field: &str,
) -> Result<(MemoryId, BTreeMap<String, u32>)> {
	let chunks = snapshot.matching(&Query::term(fields::CORPUS, id))?;
	let first = chunks.first().copied().ok_or_else(vanished)?;
	let memory = corpus_memory(&snapshot.doc(first)?.ok_or_else(vanished)?)?;
	let mut vector = BTreeMap::new();

	for address in chunks {
		let chunk = snapshot.term_vector(address, field)?.ok_or_else(|| {
			Error::IndexUnavailable { message: format!("Corpus {id} has no term vector.") }
		})?;

		for (term, count) in chunk {
			*vector.entry(term).or_insert(0) += count;
		}
	}

	Ok((memory, vector))
}

fn vanished() -> Error {
	Error::IndexUnavailable { message: "Corpus vanished from its snapshot.".to_string() }
}

#[cfg(test)]
mod tests {
	use rayon::ThreadPoolBuilder;

	use tessera_testkit::{TestDir, sample_config};

	use super::*;

	fn counts(terms: &[&str]) -> TermCounts {
		term_counts(terms.iter().map(|term| term.to_string()).collect())
	}

	#[test]
	fn cosine_is_one_for_parallel_vectors() {
		let input = counts(&["rome", "rome", "paris"]);
		let candidate: BTreeMap<String, u32> =
			[("rome".to_string(), 4), ("paris".to_string(), 2)].into_iter().collect();

		assert!((cosine_similarity(&input, &candidate) - 1.0).abs() < 1e-6);
	}

	#[test]
	fn cosine_is_zero_for_disjoint_or_empty_vectors() {
		let candidate: BTreeMap<String, u32> = [("oslo".to_string(), 1)].into_iter().collect();

		assert_eq!(cosine_similarity(&counts(&["rome"]), &candidate), 0.0);
		assert_eq!(cosine_similarity(&counts(&[]), &candidate), 0.0);
	}

	#[test]
	fn malformed_corpus_memory_fails_the_whole_vector() {
		let dir = TestDir::new("malformed_corpus").expect("Test dir must be created.");
		let config = sample_config(&dir.join("engine"));
		let pool = ThreadPoolBuilder::new().num_threads(2).build().expect("Pool must build.");
		let context = ContextAnalyzer::open(dir.join("context"), &config.context, Arc::new(pool))
			.expect("Context analyzer must open.");
		let direction = LanguageDirection::new("en", "it");

		context
			.add_corpus(MemoryId(1), "en", "Sailing boats leave the harbour at dawn.")
			.expect("Corpus must be added.");
		context
			.store
			.put(
				Document::new()
					.keyword(fields::CORPUS, "broken/en")
					.keyword(fields::MEMORY, "not-a-memory")
					.keyword(fields::LANGUAGE, "en")
					.text(
						fields::corpus_field("en"),
						context.analyzer.analyze("en", "sailing boats"),
						None,
					),
			)
			.expect("Put must succeed.");
		context.store.commit().expect("Commit must succeed.");

		let err = context
			.context_vector(&direction, "Sailing boats", 10)
			.expect_err("A malformed candidate must fail the call.");

		assert!(matches!(err, Error::IndexUnavailable { .. }), "unexpected error: {err}");

		let vector =
			context.context_vector(&direction, "The harbour", 10).expect("Vector must build.");

		assert_eq!(vector.len(), 1);
		assert!(vector.contains(MemoryId(1)));
	}
}
