use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// An ordered (source, target) pair of primary language subtags, e.g. `en` → `it`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LanguageDirection {
	source: String,
	target: String,
}
impl LanguageDirection {
	/// Region and script subtags are dropped: `en-US` and `en_GB` both become `en`.
	pub fn new(source: &str, target: &str) -> Self {
		Self { source: primary_subtag(source), target: primary_subtag(target) }
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	pub fn target(&self) -> &str {
		&self.target
	}

	pub fn reversed(&self) -> Self {
		Self { source: self.target.clone(), target: self.source.clone() }
	}
}
impl fmt::Display for LanguageDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} > {}", self.source, self.target)
	}
}
impl<'de> Deserialize<'de> for LanguageDirection {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		struct Raw {
			source: String,
			target: String,
		}

		let raw = Raw::deserialize(deserializer)?;

		if raw.source.trim().is_empty() || raw.target.trim().is_empty() {
			return Err(serde::de::Error::custom("language direction requires two languages"));
		}

		Ok(Self::new(&raw.source, &raw.target))
	}
}

pub fn primary_subtag(tag: &str) -> String {
	let tag = tag.trim();
	let end = tag.find(['-', '_']).unwrap_or(tag.len());

	tag[..end].to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn drops_region_subtags() {
		let direction = LanguageDirection::new("en-US", "pt_BR");

		assert_eq!(direction.source(), "en");
		assert_eq!(direction.target(), "pt");
		assert_eq!(direction.reversed(), LanguageDirection::new("pt", "en"));
	}
}
