use std::{
	collections::{BTreeMap, HashMap},
	fmt,
	sync::Arc,
};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tantivy::{
	DocId, DocSet, Searcher, SegmentReader, TERMINATED, TantivyDocument, TantivyError, Term,
	postings::Postings, schema::IndexRecordOption,
};

use tessera_domain::ChannelPositions;

use crate::{
	BooleanQuery, Document, Error, Query, Result, Schema,
	mapping::{FieldMap, SEQUENCE},
};

type Scored = HashMap<DocId, f32>;

/// Location of a document inside one snapshot. Only meaningful for the snapshot that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocAddress {
	pub segment: u32,
	pub doc: u32,
}
impl From<DocAddress> for tantivy::DocAddress {
	fn from(address: DocAddress) -> Self {
		Self::new(address.segment, address.doc)
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
	pub address: DocAddress,
	pub score: f32,
	/// Insertion order across the whole store.
	pub sequence: u64,
}

/// What a commit records next to its documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Payload {
	pub(crate) positions: ChannelPositions,
	pub(crate) next_sequence: u64,
}

/// Point-in-time view of a store, backed by one tantivy searcher. Never changes once published.
pub struct Snapshot {
	generation: u64,
	schema: Arc<Schema>,
	fields: Arc<FieldMap>,
	searcher: Searcher,
	payload: Payload,
	doc_freqs: Mutex<HashMap<Term, u64>>,
}
impl Snapshot {
	pub(crate) fn new(
		generation: u64,
		schema: Arc<Schema>,
		fields: Arc<FieldMap>,
		searcher: Searcher,
		payload: Payload,
	) -> Self {
		let doc_freqs = Mutex::new(HashMap::new());

		Self { generation, schema, fields, searcher, payload, doc_freqs }
	}

	pub(crate) fn payload(&self) -> &Payload {
		&self.payload
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	pub fn channel_positions(&self) -> &ChannelPositions {
		&self.payload.positions
	}

	pub fn num_docs(&self) -> usize {
		self.searcher.num_docs() as usize
	}

	pub fn segment_count(&self) -> usize {
		self.searcher.segment_readers().len()
	}

	pub fn num_docs_with_field(&self, field: &str) -> usize {
		self.live_doc_freq(&self.fields.presence(field)) as usize
	}

	/// Live documents containing `term` in `field`. Cached for the lifetime of the snapshot.
	pub fn doc_freq(&self, field: &str, term: &str) -> u64 {
		self.fields.term(field, term).map_or(0, |term| self.live_doc_freq(&term))
	}

	/// `1 + ln(N / (df + 1))`, never below zero.
	pub fn idf(&self, field: &str, term: &str) -> f32 {
		let df = self.doc_freq(field, term) as f64;
		let idf = 1.0 + (self.num_docs() as f64 / (df + 1.0)).ln();

		idf.max(0.0) as f32
	}

	/// The stored document, or `None` when the address is out of range or deleted.
	pub fn doc(&self, address: DocAddress) -> Result<Option<Document>> {
		let Some(segment) = self.searcher.segment_readers().get(address.segment as usize) else {
			return Ok(None);
		};

		if address.doc >= segment.max_doc() || !is_alive(segment, address.doc) {
			return Ok(None);
		}

		let stored: TantivyDocument = self.searcher.doc(address.into())?;

		self.fields.decode(&stored).map(Some)
	}

	/// Term frequencies of a live document's field. Only fields declared with term vectors have
	/// them.
	pub fn term_vector(
		&self,
		address: DocAddress,
		field: &str,
	) -> Result<Option<BTreeMap<String, u32>>> {
		if !self.schema.options(field).is_some_and(|options| options.term_vectors) {
			return Ok(None);
		}

		let Some(doc) = self.doc(address)? else {
			return Ok(None);
		};
		let mut vector = BTreeMap::new();

		for value in doc.fields().iter().filter(|candidate| candidate.name == field) {
			for term in value.value.terms() {
				*vector.entry(term.clone()).or_insert(0) += 1;
			}
		}

		Ok(Some(vector))
	}

	/// Every live document in insertion order.
	pub fn live_documents(&self) -> Result<Vec<(DocAddress, Document)>> {
		let mut out = Vec::new();

		for address in self.matching(&Query::MatchAll)? {
			if let Some(doc) = self.doc(address)? {
				out.push((address, doc));
			}
		}

		Ok(out)
	}

	/// Top `limit` hits by score, ties broken by insertion order.
	pub fn search(&self, query: &Query, limit: usize) -> Result<Vec<Hit>> {
		if limit == 0 || query.is_match_none() {
			return Ok(Vec::new());
		}

		let mut hits = self.collect(query)?;

		hits.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.sequence.cmp(&b.sequence)));
		hits.truncate(limit);

		tracing::debug!(generation = self.generation, hits = hits.len(), "Search completed.");

		Ok(hits)
	}

	pub fn count(&self, query: &Query) -> Result<usize> {
		Ok(self.collect(query)?.len())
	}

	/// Every matching address in insertion order.
	pub fn matching(&self, query: &Query) -> Result<Vec<DocAddress>> {
		Ok(self.matching_hits(query)?.into_iter().map(|hit| hit.address).collect())
	}

	pub(crate) fn matching_hits(&self, query: &Query) -> Result<Vec<Hit>> {
		let mut hits = self.collect(query)?;

		hits.sort_unstable_by_key(|hit| hit.sequence);

		Ok(hits)
	}

	fn live_doc_freq(&self, term: &Term) -> u64 {
		if let Some(df) = self.doc_freqs.lock().get(term) {
			return *df;
		}

		let mut df = 0;

		for segment in self.searcher.segment_readers() {
			match postings(segment, term) {
				Ok(docs) => df += docs.len() as u64,
				Err(err) => tracing::warn!(error = %err, "Postings could not be read."),
			}
		}

		self.doc_freqs.lock().insert(term.clone(), df);

		df
	}

	fn collect(&self, query: &Query) -> Result<Vec<Hit>> {
		self.check(query)?;

		let mut hits = Vec::new();

		for (ord, segment) in self.searcher.segment_readers().iter().enumerate() {
			let scored = self.eval(ord as u32, segment, query)?;

			if scored.is_empty() {
				continue;
			}

			let sequences = segment.fast_fields().u64(SEQUENCE)?;

			for (doc, score) in scored {
				let sequence = sequences.first(doc).unwrap_or(u64::MAX);

				let address = DocAddress { segment: ord as u32, doc };

				hits.push(Hit { address, score, sequence });
			}
		}

		Ok(hits)
	}

	fn check(&self, query: &Query) -> Result<()> {
		match query {
			Query::Phrase(phrase) => {
				let field = phrase.field.as_str();

				if !self.schema.options(field).is_some_and(|options| options.positions) {
					return Err(Error::InvalidQuery {
						message: format!("Field {field} has no positions for phrase matching."),
					});
				}

				Ok(())
			},
			Query::Boolean(boolean) => boolean
				.should
				.iter()
				.chain(&boolean.must)
				.chain(&boolean.filter)
				.try_for_each(|clause| self.check(clause)),
			Query::Term(_) | Query::MatchAll | Query::MatchNone => Ok(()),
		}
	}

	fn eval(&self, ord: u32, segment: &SegmentReader, query: &Query) -> Result<Scored> {
		match query {
			Query::MatchAll => Ok(segment.doc_ids_alive().map(|doc| (doc, 1.0)).collect()),
			Query::MatchNone => Ok(Scored::new()),
			Query::Term(term) => {
				let Some(indexed) = self.fields.term(&term.field, &term.term) else {
					return Ok(Scored::new());
				};
				let idf = self.idf(&term.field, &term.term);

				Ok(postings(segment, &indexed)?
					.into_iter()
					.map(|(doc, tf)| (doc, (tf as f32).sqrt() * idf * idf * term.boost))
					.collect())
			},
			Query::Phrase(phrase) => {
				let Some(first) = phrase.terms.first() else {
					return Ok(Scored::new());
				};
				let Some(indexed) = self.fields.term(&phrase.field, first) else {
					return Ok(Scored::new());
				};
				let score: f32 = phrase
					.terms
					.iter()
					.map(|term| {
						let idf = self.idf(&phrase.field, term);

						idf * idf
					})
					.sum();
				let mut out = Scored::new();

				for (doc, _) in postings(segment, &indexed)? {
					let stored = self.doc(DocAddress { segment: ord, doc })?;

					if stored.is_some_and(|stored| {
						stored.terms(&phrase.field) == Some(phrase.terms.as_slice())
					}) {
						out.insert(doc, score);
					}
				}

				Ok(out)
			},
			Query::Boolean(boolean) => self.eval_boolean(ord, segment, boolean),
		}
	}

	fn eval_boolean(
		&self,
		ord: u32,
		segment: &SegmentReader,
		query: &BooleanQuery,
	) -> Result<Scored> {
		let required = query.required_should_matches();

		if query.is_empty() || required > query.should.len() {
			return Ok(Scored::new());
		}

		let mut candidates: Option<Scored> = None;

		for clause in &query.must {
			let hits = self.eval(ord, segment, clause)?;

			candidates = Some(match candidates {
				None => hits,
				Some(mut acc) => {
					acc.retain(|doc, score| match hits.get(doc) {
						Some(extra) => {
							*score += extra;

							true
						},
						None => false,
					});

					acc
				},
			});
		}
		for clause in &query.filter {
			let hits = self.eval(ord, segment, clause)?;

			candidates = Some(match candidates {
				None => hits.into_keys().map(|doc| (doc, 0.0)).collect(),
				Some(mut acc) => {
					acc.retain(|doc, _| hits.contains_key(doc));

					acc
				},
			});
		}

		let mut should: HashMap<DocId, (f32, usize)> = HashMap::new();

		for clause in &query.should {
			for (doc, score) in self.eval(ord, segment, clause)? {
				let entry = should.entry(doc).or_insert((0.0, 0));

				entry.0 += score;
				entry.1 += 1;
			}
		}

		let total = query.should.len();
		let coord = |score: f32, matched: usize| {
			if total == 0 { score } else { score * matched as f32 / total as f32 }
		};
		let out = match candidates {
			Some(required_docs) => required_docs
				.into_iter()
				.filter_map(|(doc, score)| {
					let (extra, matched) = should.get(&doc).copied().unwrap_or((0.0, 0));

					(matched >= required).then(|| (doc, coord(score + extra, matched)))
				})
				.collect(),
			None => should
				.into_iter()
				.filter(|(_, (_, matched))| *matched >= required)
				.map(|(doc, (score, matched))| (doc, coord(score, matched)))
				.collect(),
		};

		Ok(out)
	}
}
impl fmt::Debug for Snapshot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Snapshot")
			.field("generation", &self.generation)
			.field("documents", &self.num_docs())
			.field("segments", &self.segment_count())
			.field("positions", &self.payload.positions)
			.finish()
	}
}

/// Live `(doc, term frequency)` pairs of one term inside one segment.
fn postings(segment: &SegmentReader, term: &Term) -> Result<Vec<(DocId, u32)>> {
	let inverted = segment.inverted_index(term.field())?;
	let Some(mut postings) =
		inverted.read_postings(term, IndexRecordOption::WithFreqs).map_err(TantivyError::from)?
	else {
		return Ok(Vec::new());
	};
	let mut out = Vec::new();
	let mut doc = postings.doc();

	while doc != TERMINATED {
		if is_alive(segment, doc) {
			out.push((doc, postings.term_freq()));
		}

		doc = postings.advance();
	}

	Ok(out)
}

fn is_alive(segment: &SegmentReader, doc: DocId) -> bool {
	segment.alive_bitset().is_none_or(|alive| alive.is_alive(doc))
}
