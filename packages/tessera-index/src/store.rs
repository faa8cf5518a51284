use std::{
	fmt, fs, mem,
	path::{Path, PathBuf},
	sync::Arc,
};

use parking_lot::{Mutex, RwLock};
use tantivy::{
	Index, IndexReader, IndexWriter, ReloadPolicy, SegmentMeta,
	directory::MmapDirectory, index::SegmentId, indexer::NoMergePolicy,
};

use tessera_domain::ChannelPositions;

use crate::{
	Document, Error, FieldValue, Query, Result, Schema, Snapshot, mapping::FieldMap,
	snapshot::Payload,
};

const WRITER_HEAP_BYTES: usize = 50_000_000;
/// A commit that leaves more searchable segments than this merges the smallest ones.
pub const MAX_SEGMENTS: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteTarget {
	Term { field: String, term: String },
	Query(Query),
}

#[derive(Debug)]
enum PendingOp {
	Put(Document),
	Delete(DeleteTarget),
}

/// Single-writer document index over one tantivy directory. Writes are buffered until `commit`,
/// which applies them in order and publishes a new snapshot; readers keep whatever snapshot they
/// opened.
pub struct DocumentStore {
	dir: PathBuf,
	schema: Arc<Schema>,
	fields: Arc<FieldMap>,
	index: Index,
	reader: IndexReader,
	writer: Mutex<IndexWriter>,
	pending: Mutex<Vec<PendingOp>>,
	published: RwLock<Arc<Snapshot>>,
}
impl DocumentStore {
	pub fn open(dir: impl AsRef<Path>, schema: Schema) -> Result<Self> {
		let dir = dir.as_ref().to_path_buf();

		fs::create_dir_all(&dir).map_err(|source| Error::io(&dir, source))?;

		let schema = Arc::new(schema);
		let fields = Arc::new(FieldMap::build(&schema));
		let index = Index::open_or_create(MmapDirectory::open(&dir)?, fields.schema().clone())?;
		let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_HEAP_BYTES)?;

		writer.set_merge_policy(Box::new(NoMergePolicy));

		let reader: IndexReader =
			index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		let snapshot = load_snapshot(&index, &reader, &schema, &fields)?;

		tracing::info!(
			dir = ?dir,
			generation = snapshot.generation(),
			documents = snapshot.num_docs(),
			segments = snapshot.segment_count(),
			"Document store opened."
		);

		Ok(Self {
			dir,
			schema,
			fields,
			index,
			reader,
			writer: Mutex::new(writer),
			pending: Mutex::new(Vec::new()),
			published: RwLock::new(Arc::new(snapshot)),
		})
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	pub fn put(&self, doc: Document) -> Result<()> {
		self.validate(&doc)?;
		self.pending.lock().push(PendingOp::Put(doc));

		Ok(())
	}

	pub fn delete_term(&self, field: impl Into<String>, term: impl Into<String>) {
		self.pending
			.lock()
			.push(PendingOp::Delete(DeleteTarget::Term { field: field.into(), term: term.into() }));
	}

	pub fn delete_query(&self, query: Query) {
		self.pending.lock().push(PendingOp::Delete(DeleteTarget::Query(query)));
	}

	/// Latest committed snapshot. The same `Arc` is handed out until the next commit.
	pub fn open_reader(&self) -> Arc<Snapshot> {
		self.published.read().clone()
	}

	pub fn len(&self) -> usize {
		self.open_reader().num_docs()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn has_pending(&self) -> bool {
		!self.pending.lock().is_empty()
	}

	/// Drops every write staged since the last commit.
	pub fn rollback(&self) {
		let dropped = mem::take(&mut *self.pending.lock()).len();

		if dropped > 0 {
			tracing::warn!(dir = ?self.dir, dropped, "Pending writes rolled back.");
		}
	}

	pub fn commit(&self) -> Result<()> {
		self.commit_with_positions(None)
	}

	/// Applies every pending write and, when given, advances the stored channel positions in the
	/// same tantivy commit. On failure the pending writes are dropped and the previous snapshot
	/// stays current.
	pub fn commit_with_positions(&self, positions: Option<&ChannelPositions>) -> Result<()> {
		let mut pending = self.pending.lock();
		let ops = mem::take(&mut *pending);
		let mut writer = self.writer.lock();
		let current = self.open_reader();
		let mut payload = current.payload().clone();
		let moved = positions.is_some_and(|positions| payload.positions.merge(positions));
		let changed = match self.stage(&mut writer, &current, ops, &mut payload) {
			Ok(changed) => changed,
			Err(err) => {
				discard(&mut writer, &self.dir);

				return Err(err);
			},
		};

		if !changed && !moved {
			return Ok(());
		}

		let generation = match write_commit(&mut writer, &payload) {
			Ok(generation) => generation,
			Err(err) => {
				discard(&mut writer, &self.dir);

				return Err(err);
			},
		};

		if let Err(err) = self.merge_small_segments(&mut writer) {
			tracing::warn!(dir = ?self.dir, error = %err, "Segment merge failed.");
		}

		let snapshot = self.reload()?;

		tracing::info!(
			generation,
			documents = snapshot.num_docs(),
			segments = snapshot.segment_count(),
			"Commit published."
		);

		Ok(())
	}

	/// Merges every searchable segment into one and purges deleted documents. Pending writes are
	/// left untouched.
	pub fn optimize(&self) -> Result<()> {
		let _pending = self.pending.lock();
		let mut writer = self.writer.lock();
		let metas = self.index.searchable_segment_metas()?;
		let fragmented = metas.len() > 1 || metas.iter().any(SegmentMeta::has_deletes);

		if !fragmented {
			tracing::debug!(dir = ?self.dir, "Store already optimized.");

			return Ok(());
		}

		let ids: Vec<SegmentId> = metas.iter().map(SegmentMeta::id).collect();

		writer.merge(&ids).wait()?;
		writer.garbage_collect_files().wait()?;

		let snapshot = self.reload()?;

		tracing::info!(
			generation = snapshot.generation(),
			documents = snapshot.num_docs(),
			"Store optimized."
		);

		Ok(())
	}

	/// Feeds the pending writes to tantivy in order. Returns whether anything visible changed.
	fn stage(
		&self,
		writer: &mut IndexWriter,
		snapshot: &Snapshot,
		ops: Vec<PendingOp>,
		payload: &mut Payload,
	) -> Result<bool> {
		let mut staged: Vec<(u64, Document)> = Vec::new();
		let mut changed = false;

		for op in ops {
			match op {
				PendingOp::Put(doc) => {
					let sequence = payload.next_sequence;

					writer.add_document(self.fields.encode(&self.schema, &doc, sequence)?)?;

					payload.next_sequence += 1;
					changed = true;

					staged.push((sequence, doc));
				},
				PendingOp::Delete(DeleteTarget::Term { field, term }) => {
					let Some(indexed) = self.fields.term(&field, &term) else {
						continue;
					};
					let committed = snapshot.doc_freq(&field, &term) > 0;
					let before = staged.len();

					staged.retain(|(_, doc)| !doc.has_term(&field, &term));

					if committed || staged.len() < before {
						writer.delete_term(indexed);

						changed = true;
					}
				},
				PendingOp::Delete(DeleteTarget::Query(query)) => {
					let mut targets: Vec<u64> =
						snapshot.matching_hits(&query)?.iter().map(|hit| hit.sequence).collect();

					staged.retain(|(sequence, doc)| {
						let hit = query.matches(doc);

						if hit {
							targets.push(*sequence);
						}

						!hit
					});

					changed |= !targets.is_empty();

					for sequence in targets {
						writer.delete_term(self.fields.sequence(sequence));
					}
				},
			}
		}

		Ok(changed)
	}

	/// Keeps the segment count bounded by folding the smallest segments together.
	fn merge_small_segments(&self, writer: &mut IndexWriter) -> Result<()> {
		let mut metas = self.index.searchable_segment_metas()?;

		if metas.len() <= MAX_SEGMENTS {
			return Ok(());
		}

		metas.sort_by_key(SegmentMeta::num_docs);

		let ids: Vec<SegmentId> =
			metas.iter().take(metas.len() - MAX_SEGMENTS / 2 + 1).map(SegmentMeta::id).collect();

		writer.merge(&ids).wait()?;

		tracing::debug!(dir = ?self.dir, merged = ids.len(), "Small segments merged.");

		Ok(())
	}

	fn reload(&self) -> Result<Arc<Snapshot>> {
		self.reader.reload()?;

		let snapshot = load_snapshot(&self.index, &self.reader, &self.schema, &self.fields)?;
		let snapshot = Arc::new(snapshot);

		*self.published.write() = snapshot.clone();

		Ok(snapshot)
	}

	fn validate(&self, doc: &Document) -> Result<()> {
		if doc.is_empty() {
			return Err(Error::InvalidDocument { message: "Document has no fields.".to_string() });
		}

		for field in doc.fields() {
			let Some(options) = self.schema.options(&field.name) else {
				return Err(Error::InvalidDocument {
					message: format!("Field {} is not declared by the schema.", field.name),
				});
			};
			let valid = match &field.value {
				FieldValue::Keyword { .. } => options.indexed,
				FieldValue::Text { stored, .. } =>
					options.indexed && (stored.is_none() || options.stored),
				FieldValue::Stored { .. } => options.stored,
			};

			if !valid {
				return Err(Error::InvalidDocument {
					message: format!("Field {} does not accept this kind of value.", field.name),
				});
			}
		}

		Ok(())
	}
}
impl fmt::Debug for DocumentStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DocumentStore")
			.field("dir", &self.dir)
			.field("snapshot", &self.open_reader())
			.finish()
	}
}

fn load_snapshot(
	index: &Index,
	reader: &IndexReader,
	schema: &Arc<Schema>,
	fields: &Arc<FieldMap>,
) -> Result<Snapshot> {
	let metas = index.load_metas()?;
	let payload = match metas.payload.as_deref() {
		Some(raw) => serde_json::from_str(raw).map_err(|err| {
			Error::corrupted(format!("Commit payload cannot be read: {err}."))
		})?,
		None => Payload::default(),
	};

	Ok(Snapshot::new(metas.opstamp, schema.clone(), fields.clone(), reader.searcher(), payload))
}

fn write_commit(writer: &mut IndexWriter, payload: &Payload) -> Result<u64> {
	let payload = serde_json::to_string(payload)?;
	let mut prepared = writer.prepare_commit()?;

	prepared.set_payload(&payload);

	Ok(prepared.commit()?)
}

fn discard(writer: &mut IndexWriter, dir: &Path) {
	match writer.rollback() {
		Ok(_) => tracing::warn!(dir = ?dir, "Staged writes discarded."),
		Err(err) => tracing::error!(dir = ?dir, error = %err, "Writer rollback failed."),
	}
}
