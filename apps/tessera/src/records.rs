use color_eyre::eyre;
use serde::{Deserialize, Serialize};

use tessera_domain::{DataBatch, Deletion, TranslationUnit};

/// One line of a channel log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogRecord {
	Unit(TranslationUnit),
	Deletion(Deletion),
}

/// `source<TAB>target` pairs. Blank lines and `#` comments are skipped.
pub fn parse_tsv(raw: &str) -> color_eyre::Result<Vec<(String, String)>> {
	let mut pairs = Vec::new();

	for (idx, line) in raw.lines().enumerate() {
		let line = line.trim_end_matches('\r');

		if line.trim().is_empty() || line.starts_with('#') {
			continue;
		}

		let Some((source, target)) = line.split_once('\t') else {
			return Err(eyre::eyre!("Line {} has no tab separator.", idx + 1));
		};

		if source.trim().is_empty() || target.trim().is_empty() {
			return Err(eyre::eyre!("Line {} has an empty side.", idx + 1));
		}

		pairs.push((source.to_string(), target.to_string()));
	}

	Ok(pairs)
}

pub fn parse_log(raw: &str) -> color_eyre::Result<Vec<LogRecord>> {
	raw.lines()
		.enumerate()
		.filter(|(_, line)| !line.trim().is_empty())
		.map(|(idx, line)| {
			serde_json::from_str(line)
				.map_err(|err| eyre::eyre!("Log line {} is not a valid record: {err}.", idx + 1))
		})
		.collect()
}

/// Groups records into batches of at most `size`. A batch applies its units before its
/// deletions, so a unit logged after a deletion opens a new batch to keep log order.
pub fn batches(records: Vec<LogRecord>, size: usize) -> Vec<DataBatch> {
	let size = size.max(1);
	let mut out = Vec::new();
	let mut current = DataBatch::default();
	let mut filled = 0;

	for record in records {
		match record {
			LogRecord::Unit(unit) => {
				if !current.deletions.is_empty() {
					out.push(std::mem::take(&mut current));

					filled = 0;
				}

				current.units.push(unit);
			},
			LogRecord::Deletion(deletion) => current.deletions.push(deletion),
		}

		filled += 1;

		if filled == size {
			out.push(std::mem::take(&mut current));

			filled = 0;
		}
	}

	if !current.is_empty() {
		out.push(current);
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tsv_skips_comments_and_blank_lines() {
		let raw = "# header\nthe cat\til gatto\r\n\n  \nthe dog\til cane\n";
		let pairs = parse_tsv(raw).expect("TSV must parse.");

		assert_eq!(
			pairs,
			vec![
				("the cat".to_string(), "il gatto".to_string()),
				("the dog".to_string(), "il cane".to_string()),
			]
		);
	}

	#[test]
	fn tsv_reports_the_offending_line() {
		let err = parse_tsv("a\tb\nmissing separator\n").expect_err("Line 2 must be rejected.");

		assert!(err.to_string().contains("Line 2"));
		assert!(parse_tsv("a\t \n").is_err());
	}

	#[test]
	fn log_records_are_externally_tagged() {
		let raw = r#"{"deletion":{"memory":4,"channel":1,"offset":9}}"#;
		let records = parse_log(raw).expect("Log must parse.");

		assert!(matches!(
			records.as_slice(),
			[LogRecord::Deletion(Deletion { channel: 1, offset: 9, .. })]
		));
		assert!(parse_log("{\"unit\":{}}").is_err());
	}

	#[test]
	fn batches_respect_size_and_order() {
		let records: Vec<LogRecord> = (0..5)
			.map(|offset| {
				LogRecord::Deletion(Deletion { memory: 1.into(), channel: 0, offset })
			})
			.collect();
		let batches = batches(records, 2);

		assert_eq!(batches.len(), 3);
		assert_eq!(batches[2].deletions.len(), 1);
		assert_eq!(batches[2].deletions[0].offset, 4);
	}

	#[test]
	fn units_after_deletions_open_a_new_batch() {
		let unit = |offset| {
			LogRecord::Unit(tessera_testkit::unit(1, "the cat sat", "il gatto", 0, offset))
		};
		let deletion = |offset| {
			LogRecord::Deletion(Deletion { memory: 1.into(), channel: 0, offset })
		};
		let batches = batches(vec![unit(1), deletion(2), unit(3), unit(4), deletion(5)], 10);

		assert_eq!(batches.len(), 2);
		assert_eq!(batches[0].units.len(), 1);
		assert_eq!(batches[0].deletions[0].offset, 2);
		assert_eq!(batches[1].units.iter().map(|unit| unit.offset).collect::<Vec<_>>(), [3, 4]);
		assert_eq!(batches[1].deletions[0].offset, 5);
	}
}
