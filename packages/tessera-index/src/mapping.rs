use std::collections::HashMap;

use tantivy::{
	TantivyDocument, Term,
	schema::{
		self as tv, FAST, INDEXED, IndexRecordOption, STORED, TextFieldIndexing, TextOptions, Value,
	},
};

use crate::{Document, Error, FieldOptions, FieldValue, Result, Schema, document::Field};

pub(crate) const SEQUENCE: &str = "_seq";
const SOURCE: &str = "_source";
const PRESENT: &str = "_fields";
const FAMILY_SEPARATOR: char = '\u{1f}';

type Slot = Option<tv::Field>;

/// Tantivy layout of a [`Schema`].
///
/// Every exact field gets its own raw-tokenized tantivy field. A prefix family shares one tantivy
/// field whose terms are written as `<name suffix>\u{1f}<term>`, so new field names need no
/// schema change. Each document also carries an insertion sequence number, the names of the
/// fields it has, and its JSON source.
pub(crate) struct FieldMap {
	schema: tv::Schema,
	sequence: tv::Field,
	source: tv::Field,
	present: tv::Field,
	exact: HashMap<String, Slot>,
	families: Vec<(String, Slot)>,
}
impl FieldMap {
	pub(crate) fn build(schema: &Schema) -> Self {
		let mut builder = tv::Schema::builder();
		let sequence = builder.add_u64_field(SEQUENCE, INDEXED | STORED | FAST);
		let source = builder.add_text_field(SOURCE, STORED);
		let present = builder.add_text_field(PRESENT, indexing(false));
		let mut slot = |name: &str, options: FieldOptions| {
			options.indexed.then(|| builder.add_text_field(name, indexing(options.positions)))
		};
		let exact = schema
			.exact_fields()
			.map(|(name, options)| (name.to_string(), slot(name, options)))
			.collect();
		let families = schema
			.prefix_fields()
			.map(|(prefix, options)| (prefix.to_string(), slot(prefix, options)))
			.collect();

		Self { schema: builder.build(), sequence, source, present, exact, families }
	}

	pub(crate) fn schema(&self) -> &tv::Schema {
		&self.schema
	}

	/// The indexed term for `term` in the logical field `name`, if that field is indexed.
	pub(crate) fn term(&self, name: &str, term: &str) -> Option<Term> {
		let (field, suffix) = self.resolve(name)?;

		Some(Term::from_field_text(field, &indexed_text(suffix, term)))
	}

	pub(crate) fn presence(&self, name: &str) -> Term {
		Term::from_field_text(self.present, name)
	}

	pub(crate) fn sequence(&self, sequence: u64) -> Term {
		Term::from_field_u64(self.sequence, sequence)
	}

	pub(crate) fn encode(
		&self,
		schema: &Schema,
		doc: &Document,
		sequence: u64,
	) -> Result<TantivyDocument> {
		let mut out = TantivyDocument::new();
		let mut source = Vec::with_capacity(doc.fields().len());

		out.add_u64(self.sequence, sequence);

		for field in doc.fields() {
			let options = schema.options(&field.name).unwrap_or_default();

			out.add_text(self.present, &field.name);

			if let Some((indexed, suffix)) = self.resolve(&field.name) {
				for term in field.value.terms() {
					out.add_text(indexed, indexed_text(suffix, term));
				}
			}

			source.push(stored_form(field, options));
		}

		out.add_text(self.source, serde_json::to_string(&source)?);

		Ok(out)
	}

	pub(crate) fn decode(&self, stored: &TantivyDocument) -> Result<Document> {
		let source = stored
			.get_first(self.source)
			.and_then(|value| value.as_str())
			.ok_or_else(|| Error::corrupted("Stored document has no source."))?;

		Ok(serde_json::from_str(source)?)
	}

	/// Exact names shadow prefix families, as in [`Schema::options`].
	fn resolve<'a>(&self, name: &'a str) -> Option<(tv::Field, Option<&'a str>)> {
		if let Some(slot) = self.exact.get(name) {
			return slot.map(|field| (field, None));
		}

		let (prefix, slot) =
			self.families.iter().find(|(prefix, _)| name.starts_with(prefix.as_str()))?;

		slot.map(|field| (field, Some(&name[prefix.len()..])))
	}
}

fn indexed_text(suffix: Option<&str>, term: &str) -> String {
	match suffix {
		Some(suffix) => format!("{suffix}{FAMILY_SEPARATOR}{term}"),
		None => term.to_string(),
	}
}

fn indexing(positions: bool) -> TextOptions {
	let record = if positions {
		IndexRecordOption::WithFreqsAndPositions
	} else {
		IndexRecordOption::WithFreqs
	};

	TextOptions::default().set_indexing_options(
		TextFieldIndexing::default().set_tokenizer("raw").set_index_option(record),
	)
}

/// Analyzed terms are only kept in the source when phrases or term vectors read them back.
fn stored_form(field: &Field, options: FieldOptions) -> Field {
	match &field.value {
		FieldValue::Text { stored, .. } if !options.positions && !options.term_vectors => Field {
			name: field.name.clone(),
			value: FieldValue::Text { terms: Vec::new(), stored: stored.clone() },
		},
		_ => field.clone(),
	}
}
