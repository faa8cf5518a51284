use std::collections::HashSet;

use tessera_analysis::{ContentAnalyzer, HashAnalyzer};
use tessera_domain::{ContextVector, LanguageDirection, MemoryId};
use tessera_index::{BooleanQuery, Query};

use crate::fields;

#[derive(Debug, Clone)]
pub struct QueryBuilder {
	short: ContentAnalyzer,
	long: ContentAnalyzer,
	short_query_max_terms: usize,
	min_should_match_ratio: f32,
}
impl QueryBuilder {
	pub fn new(analysis: &tessera_config::Analysis, memory: &tessera_config::Memory) -> Self {
		Self {
			short: ContentAnalyzer::short_query(analysis),
			long: ContentAnalyzer::long_query(analysis),
			short_query_max_terms: analysis.short_query_max_terms,
			min_should_match_ratio: memory.min_should_match_ratio,
		}
	}

	pub fn by_memory(&self, memory: MemoryId) -> Query {
		Query::term(fields::MEMORY, memory.to_string())
	}

	/// Units of `memory` whose source text is token-identical to `text`.
	pub fn by_hash(&self, memory: MemoryId, text: &str) -> Query {
		let tokens = HashAnalyzer.analyze(text);

		if tokens.is_empty() {
			return Query::MatchNone;
		}

		BooleanQuery::new()
			.filter(self.by_memory(memory))
			.filter(Query::phrase(fields::HASH, tokens))
			.into()
	}

	/// The unit a replacement event points at: same memory, same source and same target.
	pub fn by_content(&self, memory: MemoryId, source: &str, target: &str) -> Query {
		let target = HashAnalyzer.analyze(target);

		match self.by_hash(memory, source) {
			Query::Boolean(query) if !target.is_empty() =>
				query.filter(Query::phrase(fields::TARGET_HASH, target)).into(),
			_ => Query::MatchNone,
		}
	}

	pub fn best_matching_suggestion(
		&self,
		direction: &LanguageDirection,
		sentence: &str,
		context: Option<&ContextVector>,
	) -> Query {
		let tokens = self.short.tokens(sentence);

		if tokens.is_empty() {
			return Query::MatchNone;
		}

		let long = tokens.len() > self.short_query_max_terms;
		let analyzer = if long { &self.long } else { &self.short };
		let mut seen = HashSet::new();
		let terms: Vec<String> =
			analyzer.terms(&tokens).into_iter().filter(|term| seen.insert(term.clone())).collect();
		let min_should_match = if long {
			let wanted = (self.min_should_match_ratio * terms.len() as f32).round() as usize;

			wanted.clamp(1, terms.len())
		} else {
			terms.len()
		};
		let field = fields::content_field(direction);
		let mut query = BooleanQuery::new().min_should_match(min_should_match);

		for term in terms {
			query = query.should(Query::term(field.clone(), term));
		}

		if let Some(context) = context
			&& !context.is_empty()
		{
			let mut memories = BooleanQuery::new();

			for entry in context.iter().filter(|entry| entry.score > 0.0) {
				memories = memories.should(self.by_memory(entry.memory));
			}

			if memories.is_empty() {
				return Query::MatchNone;
			}

			query = query.filter(memories.into());
		}

		query.into()
	}
}
