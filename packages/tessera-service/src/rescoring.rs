use std::{collections::HashMap, sync::Arc};

use rayon::{ThreadPool, prelude::*};

use tessera_domain::{ContextVector, ScoreEntry};

use crate::{Error, Result};

pub trait Rescorer
where
	Self: Send + Sync,
{
	/// Rescores `entries` against the input tokens and returns them best first.
	fn rescore(
		&self,
		input: &[String],
		entries: Vec<ScoreEntry>,
		context: Option<&ContextVector>,
	) -> Result<Vec<ScoreEntry>>;
}

/// F1 of smoothed n-gram precision and recall, optionally blended with the context weight of the
/// entry's memory.
#[derive(Debug, Clone)]
pub struct F1BleuRescorer {
	pool: Arc<ThreadPool>,
	order: usize,
	epsilon: f64,
	context_weight: f32,
}
impl F1BleuRescorer {
	pub fn new(pool: Arc<ThreadPool>, cfg: &tessera_config::Memory) -> Self {
		Self {
			pool,
			order: cfg.ngram_order,
			epsilon: cfg.smoothing_epsilon,
			context_weight: cfg.context_weight,
		}
	}

	fn blend(&self, f1: f32, entry: &ScoreEntry, context: Option<&ContextVector>) -> f32 {
		let score = match context {
			Some(context) if !context.is_empty() => {
				let weight = context.score_of(entry.memory).unwrap_or(0.0);

				(1.0 - self.context_weight) * f1 + self.context_weight * weight
			},
			_ => f1,
		};

		if score.is_finite() { score.clamp(0.0, 1.0) } else { 0.0 }
	}
}
impl Rescorer for F1BleuRescorer {
	fn rescore(
		&self,
		input: &[String],
		mut entries: Vec<ScoreEntry>,
		context: Option<&ContextVector>,
	) -> Result<Vec<ScoreEntry>> {
		if self.order == 0 {
			return Err(Error::InvalidInput { message: "N-gram order must be positive.".to_string() });
		}

		let scores: Vec<f32> = self.pool.install(|| {
			entries
				.par_iter()
				.map(|entry| {
					let f1 = f1_bleu(input, &entry.source, self.order, self.epsilon);

					self.blend(f1, entry, context)
				})
				.collect()
		});

		for (entry, score) in entries.iter_mut().zip(scores) {
			entry.score = score;
		}

		entries.sort_by(|a, b| b.score.total_cmp(&a.score));

		Ok(entries)
	}
}

/// Harmonic mean of BLEU-style precision and recall over n-grams `1..=order`. Zero when either
/// side is empty.
pub fn f1_bleu(input: &[String], candidate: &[String], order: usize, epsilon: f64) -> f32 {
	if input.is_empty() || candidate.is_empty() || order == 0 {
		return 0.0;
	}

	let mut log_precision = 0.0;
	let mut log_recall = 0.0;

	for n in 1..=order {
		let input_counts = ngram_counts(input, n);
		let candidate_counts = ngram_counts(candidate, n);
		let overlap: u32 = input_counts
			.iter()
			.map(|(gram, count)| (*count).min(candidate_counts.get(gram).copied().unwrap_or(0)))
			.sum();
		let overlap = overlap as f64;

		log_precision += smooth(overlap, window_count(candidate.len(), n), epsilon).ln();
		log_recall += smooth(overlap, window_count(input.len(), n), epsilon).ln();
	}

	let precision = (log_precision / order as f64).exp();
	let recall = (log_recall / order as f64).exp();
	let f1 = 2.0 * precision * recall / (precision + recall);

	if f1.is_finite() { f1.clamp(0.0, 1.0) as f32 } else { 0.0 }
}

fn smooth(numerator: f64, denominator: f64, epsilon: f64) -> f64 {
	(numerator + epsilon) / (denominator + epsilon)
}

fn window_count(len: usize, n: usize) -> f64 {
	(len + 1).saturating_sub(n) as f64
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], u32> {
	let mut counts = HashMap::new();

	if tokens.len() < n {
		return counts;
	}

	for gram in tokens.windows(n) {
		*counts.entry(gram).or_insert(0) += 1;
	}

	counts
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(text: &str) -> Vec<String> {
		text.split_whitespace().map(str::to_string).collect()
	}

	#[test]
	fn identical_sentences_score_one() {
		let sentence = tokens("the cat sat on the mat");
		let score = f1_bleu(&sentence, &sentence, 4, 0.1);

		assert!((score - 1.0).abs() < 1e-6, "{score}");
	}

	#[test]
	fn empty_sides_score_zero() {
		assert_eq!(f1_bleu(&[], &tokens("a b"), 4, 0.1), 0.0);
		assert_eq!(f1_bleu(&tokens("a b"), &[], 4, 0.1), 0.0);
	}

	#[test]
	fn scores_stay_in_unit_range() {
		let input = tokens("the cat sat");
		let candidates =
			["the cat", "the dog ran", "cat cat cat cat", "x", "the cat sat down quickly"];

		for candidate in candidates {
			let score = f1_bleu(&input, &tokens(candidate), 4, 0.1);

			assert!((0.0..=1.0).contains(&score), "{candidate}: {score}");
		}
	}

	#[test]
	fn closer_candidates_rank_higher() {
		let input = tokens("the cat sat");

		assert!(
			f1_bleu(&input, &tokens("the cat sat"), 4, 0.1)
				> f1_bleu(&input, &tokens("the dog ran"), 4, 0.1)
		);
	}
}
