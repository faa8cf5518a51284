use crate::Document;

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
	Term(TermQuery),
	/// Matches documents whose whole field equals the term sequence.
	Phrase(PhraseQuery),
	Boolean(BooleanQuery),
	MatchAll,
	MatchNone,
}
impl Query {
	pub fn term(field: impl Into<String>, term: impl Into<String>) -> Self {
		Self::boosted_term(field, term, 1.0)
	}

	pub fn boosted_term(field: impl Into<String>, term: impl Into<String>, boost: f32) -> Self {
		Self::Term(TermQuery { field: field.into(), term: term.into(), boost })
	}

	pub fn phrase(field: impl Into<String>, terms: Vec<String>) -> Self {
		Self::Phrase(PhraseQuery { field: field.into(), terms })
	}

	pub fn is_match_none(&self) -> bool {
		matches!(self, Self::MatchNone)
	}

	/// Evaluates the query against a single document without scoring.
	pub fn matches(&self, doc: &Document) -> bool {
		match self {
			Self::Term(query) => doc.has_term(&query.field, &query.term),
			Self::Phrase(query) =>
				!query.terms.is_empty() && doc.terms(&query.field) == Some(query.terms.as_slice()),
			Self::Boolean(query) => {
				if query.is_empty() {
					return false;
				}
				if !query.must.iter().chain(query.filter.iter()).all(|clause| clause.matches(doc)) {
					return false;
				}

				let matched = query.should.iter().filter(|clause| clause.matches(doc)).count();

				matched >= query.required_should_matches()
			},
			Self::MatchAll => true,
			Self::MatchNone => false,
		}
	}
}
impl From<BooleanQuery> for Query {
	fn from(query: BooleanQuery) -> Self {
		Self::Boolean(query)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
	pub field: String,
	pub term: String,
	pub boost: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhraseQuery {
	pub field: String,
	pub terms: Vec<String>,
}

/// `must` clauses are required and scored, `filter` clauses are required and unscored, and at
/// least `min_should_match` of the `should` clauses must match. With `min_should_match` left at
/// zero, one `should` clause is required when there are no required clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooleanQuery {
	pub should: Vec<Query>,
	pub must: Vec<Query>,
	pub filter: Vec<Query>,
	pub min_should_match: usize,
}
impl BooleanQuery {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn should(mut self, query: Query) -> Self {
		self.should.push(query);

		self
	}

	pub fn must(mut self, query: Query) -> Self {
		self.must.push(query);

		self
	}

	pub fn filter(mut self, query: Query) -> Self {
		self.filter.push(query);

		self
	}

	pub fn min_should_match(mut self, count: usize) -> Self {
		self.min_should_match = count;

		self
	}

	pub fn is_empty(&self) -> bool {
		self.should.is_empty() && self.must.is_empty() && self.filter.is_empty()
	}

	pub fn required_should_matches(&self) -> usize {
		if self.min_should_match > 0 {
			self.min_should_match
		} else if self.must.is_empty() && self.filter.is_empty() {
			1
		} else {
			0
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn doc() -> Document {
		Document::new()
			.keyword("memory", "1")
			.text("hash", vec!["the".into(), "cat".into()], None)
	}

	#[test]
	fn phrase_matches_whole_field_only() {
		assert!(Query::phrase("hash", vec!["the".into(), "cat".into()]).matches(&doc()));
		assert!(!Query::phrase("hash", vec!["the".into()]).matches(&doc()));
		assert!(!Query::phrase("hash", Vec::new()).matches(&doc()));
	}

	#[test]
	fn boolean_counts_should_clauses() {
		let two_of_three = BooleanQuery::new()
			.should(Query::term("hash", "the"))
			.should(Query::term("hash", "cat"))
			.should(Query::term("hash", "dog"))
			.min_should_match(2);
		let three_of_three = two_of_three.clone().min_should_match(3);

		assert!(Query::from(two_of_three).matches(&doc()));
		assert!(!Query::from(three_of_three).matches(&doc()));
	}

	#[test]
	fn filter_only_queries_need_no_should_clause() {
		let query = BooleanQuery::new().filter(Query::term("memory", "1"));

		assert!(Query::from(query).matches(&doc()));
		assert!(!Query::from(BooleanQuery::new()).matches(&doc()));
	}
}
