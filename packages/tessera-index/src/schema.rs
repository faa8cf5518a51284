use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldOptions {
	pub indexed: bool,
	pub stored: bool,
	/// Keeps the term order so phrase queries can match the field.
	pub positions: bool,
	pub term_vectors: bool,
}
impl FieldOptions {
	pub const fn keyword() -> Self {
		Self { indexed: true, stored: true, positions: false, term_vectors: false }
	}

	pub const fn text() -> Self {
		Self { indexed: true, stored: false, positions: false, term_vectors: false }
	}

	pub const fn stored() -> Self {
		Self { indexed: false, stored: true, positions: false, term_vectors: false }
	}

	pub const fn with_stored(mut self) -> Self {
		self.stored = true;

		self
	}

	pub const fn with_positions(mut self) -> Self {
		self.positions = true;

		self
	}

	pub const fn with_term_vectors(mut self) -> Self {
		self.term_vectors = true;

		self
	}
}

/// Field declarations for one store. Fields are matched by exact name first, then by the longest
/// declared prefix.
#[derive(Debug, Clone, Default)]
pub struct Schema {
	fields: BTreeMap<String, FieldOptions>,
	prefixes: Vec<(String, FieldOptions)>,
}
impl Schema {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn field(mut self, name: impl Into<String>, options: FieldOptions) -> Self {
		self.fields.insert(name.into(), options);

		self
	}

	pub fn prefix(mut self, prefix: impl Into<String>, options: FieldOptions) -> Self {
		self.prefixes.push((prefix.into(), options));
		self.prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

		self
	}

	pub fn options(&self, name: &str) -> Option<FieldOptions> {
		if let Some(options) = self.fields.get(name) {
			return Some(*options);
		}

		self.prefixes
			.iter()
			.find(|(prefix, _)| name.starts_with(prefix.as_str()))
			.map(|(_, options)| *options)
	}

	pub(crate) fn exact_fields(&self) -> impl Iterator<Item = (&str, FieldOptions)> + '_ {
		self.fields.iter().map(|(name, options)| (name.as_str(), *options))
	}

	/// Longest prefix first.
	pub(crate) fn prefix_fields(&self) -> impl Iterator<Item = (&str, FieldOptions)> + '_ {
		self.prefixes.iter().map(|(prefix, options)| (prefix.as_str(), *options))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn exact_names_win_over_prefixes() {
		let schema = Schema::new()
			.prefix("content_", FieldOptions::text())
			.prefix("content_en", FieldOptions::text().with_term_vectors())
			.field("content_raw", FieldOptions::stored());

		assert_eq!(schema.options("content_raw"), Some(FieldOptions::stored()));
		assert!(schema.options("content_en_it").is_some_and(|options| options.term_vectors));
		assert!(schema.options("content_it_en").is_some_and(|options| !options.term_vectors));
		assert!(schema.options("memory").is_none());
	}
}
