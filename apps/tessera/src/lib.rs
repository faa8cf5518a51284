pub mod records;

use std::{fs, path::PathBuf};

use clap::{
	Parser, Subcommand,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};
use color_eyre::eyre;
use serde_json::{Value, json};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use tessera_domain::{ChannelId, DataBatch, LanguageDirection, MemoryId, TranslationUnit};
use tessera_service::{DataListener, Engine};

use crate::records::LogRecord;

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

/// Channel used by `import`. Upstream logs number their channels from zero.
pub const IMPORT_CHANNEL: ChannelId = ChannelId::MAX;

#[derive(Debug, Parser)]
#[command(
	version = VERSION,
	rename_all = "kebab",
	styles = styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab")]
pub enum Command {
	/// Ingest a `source<TAB>target` file into one memory.
	Import {
		#[arg(long, value_name = "ID")]
		memory: u64,
		#[arg(long, value_name = "LANG")]
		source_lang: String,
		#[arg(long, value_name = "LANG")]
		target_lang: String,
		#[arg(value_name = "FILE")]
		file: PathBuf,
	},
	/// Apply a JSON-lines channel log, skipping what was already applied.
	Replay {
		#[arg(long, value_name = "N", default_value_t = 100)]
		batch_size: usize,
		#[arg(value_name = "FILE")]
		file: PathBuf,
	},
	Suggest {
		#[arg(long, value_name = "LANG")]
		source_lang: String,
		#[arg(long, value_name = "LANG")]
		target_lang: String,
		#[arg(long, value_name = "N", default_value_t = 10)]
		limit: usize,
		/// Document whose context restricts and reranks the suggestions.
		#[arg(long, value_name = "FILE")]
		context_file: Option<PathBuf>,
		#[arg(long, value_name = "N", default_value_t = 10)]
		context_limit: usize,
		sentence: String,
	},
	Context {
		/// Detected from the text when omitted.
		#[arg(long, value_name = "LANG")]
		source_lang: Option<String>,
		#[arg(long, value_name = "LANG")]
		target_lang: String,
		#[arg(long, value_name = "N", default_value_t = 10)]
		limit: usize,
		#[arg(long, value_name = "FILE", conflicts_with = "text", required_unless_present = "text")]
		file: Option<PathBuf>,
		text: Option<String>,
	},
	/// Print the resume position of every channel.
	Channels,
	Dump {
		#[arg(long, value_name = "ID")]
		memory: Option<u64>,
	},
	Optimize,
}

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

pub fn run(args: Args) -> color_eyre::Result<()> {
	let config = tessera_config::load(&args.config)?;

	init_tracing(&config)?;

	let engine = Engine::open(config)?;
	let output = execute(&engine, args.command)?;
	let json = serde_json::to_string_pretty(&output)?;

	println!("{json}");

	Ok(())
}

pub fn execute(engine: &Engine, command: Command) -> color_eyre::Result<Value> {
	match command {
		Command::Import { memory, source_lang, target_lang, file } => {
			let direction = LanguageDirection::new(&source_lang, &target_lang);

			import(engine, MemoryId(memory), direction, &fs::read_to_string(&file)?)
		},
		Command::Replay { batch_size, file } =>
			replay(engine, records::parse_log(&fs::read_to_string(&file)?)?, batch_size),
		Command::Suggest {
			source_lang,
			target_lang,
			limit,
			context_file,
			context_limit,
			sentence,
		} => {
			let direction = LanguageDirection::new(&source_lang, &target_lang);
			let context = match context_file {
				Some(path) =>
					Some(engine.context_vector_from_file(&direction, &path, context_limit)?),
				None => None,
			};
			let suggestions = engine.suggestions(&direction, &sentence, context.as_ref(), limit)?;

			Ok(json!({ "context": context, "suggestions": suggestions }))
		},
		Command::Context { source_lang, target_lang, limit, file, text } => {
			let text = match (file, text) {
				(Some(path), _) => fs::read_to_string(path)?,
				(None, Some(text)) => text,
				(None, None) => return Err(eyre::eyre!("Either --file or a text is required.")),
			};
			let source = match source_lang {
				Some(source) => source,
				None => tessera_analysis::detect_language(&text)
					.ok_or_else(|| eyre::eyre!("Could not detect the input language."))?
					.to_string(),
			};
			let direction = LanguageDirection::new(&source, &target_lang);
			let vector = engine.context_vector(&direction, &text, limit)?;

			Ok(json!({ "direction": direction, "context": vector }))
		},
		Command::Channels => Ok(json!({
			"engine": engine.latest_channel_positions(),
			"memory": engine.memory().latest_channel_positions(),
			"context": engine.context().latest_channel_positions(),
		})),
		Command::Dump { memory } => {
			let units = engine.memory().dump(memory.map(MemoryId))?;

			Ok(serde_json::to_value(units)?)
		},
		Command::Optimize => {
			engine.optimize()?;

			Ok(json!({ "units": engine.memory().size(), "corpora": engine.context().size()? }))
		},
	}
}

fn import(
	engine: &Engine,
	memory: MemoryId,
	direction: LanguageDirection,
	raw: &str,
) -> color_eyre::Result<Value> {
	let pairs = records::parse_tsv(raw)?;
	// The engine-wide position is the minimum over stages; a stage that ran ahead would skip
	// offsets numbered from it.
	let first =
		engine.furthest_channel_positions().get(IMPORT_CHANNEL).map_or(0, |applied| applied + 1);
	let timestamp = OffsetDateTime::now_utc();
	let units: Vec<TranslationUnit> = pairs
		.into_iter()
		.zip(first..)
		.map(|((source, target), offset)| TranslationUnit {
			memory,
			direction: direction.clone(),
			source,
			target,
			timestamp,
			channel: IMPORT_CHANNEL,
			offset,
			previous_source: None,
			previous_target: None,
		})
		.collect();
	let imported = units.len();

	engine.on_data_received(&DataBatch { units, deletions: Vec::new() })?;

	tracing::info!(%memory, %direction, imported, "Import finished.");

	Ok(json!({ "memory": memory, "direction": direction, "imported": imported }))
}

fn replay(
	engine: &Engine,
	records: Vec<LogRecord>,
	batch_size: usize,
) -> color_eyre::Result<Value> {
	let resume = engine.latest_channel_positions();
	let total = records.len();
	let skipped = records
		.iter()
		.filter(|record| match record {
			LogRecord::Unit(unit) => resume.is_applied(unit.channel, unit.offset),
			LogRecord::Deletion(deletion) => resume.is_applied(deletion.channel, deletion.offset),
		})
		.count();

	for batch in records::batches(records, batch_size) {
		engine.on_data_received(&batch)?;
	}

	let positions = engine.latest_channel_positions();

	tracing::info!(records = total, skipped, "Replay finished.");

	Ok(json!({ "records": total, "skipped": skipped, "positions": positions }))
}

fn init_tracing(config: &tessera_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(filter).init();

	Ok(())
}
