use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldValue {
	/// One untokenized term.
	Keyword { value: String },
	/// Pre-analyzed terms in order, with the original text when the field is stored.
	Text {
		terms: Vec<String>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		stored: Option<String>,
	},
	Stored { value: String },
}
impl FieldValue {
	pub fn contains_term(&self, term: &str) -> bool {
		match self {
			Self::Keyword { value } => value == term,
			Self::Text { terms, .. } => terms.iter().any(|candidate| candidate == term),
			Self::Stored { .. } => false,
		}
	}

	pub fn terms(&self) -> &[String] {
		match self {
			Self::Keyword { value } => std::slice::from_ref(value),
			Self::Text { terms, .. } => terms,
			Self::Stored { .. } => &[],
		}
	}

	pub fn stored_text(&self) -> Option<&str> {
		match self {
			Self::Keyword { value } | Self::Stored { value } => Some(value),
			Self::Text { stored, .. } => stored.as_deref(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
	pub name: String,
	pub value: FieldValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
	fields: Vec<Field>,
}
impl Document {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn keyword(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		let value = FieldValue::Keyword { value: value.into() };

		self.fields.push(Field { name: name.into(), value });

		self
	}

	pub fn text(
		mut self,
		name: impl Into<String>,
		terms: Vec<String>,
		stored: Option<String>,
	) -> Self {
		self.fields.push(Field { name: name.into(), value: FieldValue::Text { terms, stored } });

		self
	}

	pub fn stored(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		let value = FieldValue::Stored { value: value.into() };

		self.fields.push(Field { name: name.into(), value });

		self
	}

	pub fn fields(&self) -> &[Field] {
		&self.fields
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn value(&self, name: &str) -> Option<&FieldValue> {
		self.fields.iter().find(|field| field.name == name).map(|field| &field.value)
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.value(name).and_then(FieldValue::stored_text)
	}

	/// Analyzed terms of the first value of `name`, in order.
	pub fn terms(&self, name: &str) -> Option<&[String]> {
		self.value(name).map(FieldValue::terms)
	}

	pub fn has_term(&self, name: &str, term: &str) -> bool {
		self.fields.iter().any(|field| field.name == name && field.value.contains_term(term))
	}
}
