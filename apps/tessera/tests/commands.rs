use std::fs;

use tessera::{Command, IMPORT_CHANNEL, execute, records::LogRecord};
use tessera_service::{DataListener, Engine};
use tessera_testkit::{TestDir, batch, deletion, sample_config, unit};

fn engine(dir: &TestDir) -> Engine {
	Engine::open(sample_config(&dir.join("engine"))).expect("Engine must open.")
}

fn import(engine: &Engine, dir: &TestDir, memory: u64, raw: &str) -> serde_json::Value {
	let file = dir.join(&format!("import_{memory}.tsv"));

	fs::write(&file, raw).expect("Import file must be written.");

	execute(
		engine,
		Command::Import {
			memory,
			source_lang: "en".to_string(),
			target_lang: "it".to_string(),
			file,
		},
	)
	.expect("Import must succeed.")
}

#[test]
fn import_then_suggest() {
	let dir = TestDir::new("cli_import").expect("Test dir must be created.");
	let engine = engine(&dir);
	let raw = "the cat sat\til gatto si è seduto\nthe dog ran\til cane corse\n";
	let imported = import(&engine, &dir, 3, raw);

	assert_eq!(imported["imported"], 2);
	assert_eq!(engine.latest_channel_positions().get(IMPORT_CHANNEL), Some(1));

	import(&engine, &dir, 3, "a bird sang\tun uccello cantò\n");

	assert_eq!(engine.memory().size(), 3);
	assert_eq!(engine.latest_channel_positions().get(IMPORT_CHANNEL), Some(2));

	let output = execute(
		&engine,
		Command::Suggest {
			source_lang: "en".to_string(),
			target_lang: "it".to_string(),
			limit: 5,
			context_file: None,
			context_limit: 5,
			sentence: "the cat sat".to_string(),
		},
	)
	.expect("Suggest must succeed.");

	assert_eq!(output["suggestions"][0]["memory"], 3);
	assert!(output["context"].is_null());
}

#[test]
fn import_numbers_past_every_stage() {
	let dir = TestDir::new("cli_import_ahead").expect("Test dir must be created.");
	let engine = engine(&dir);
	let ahead = (0..=2)
		.map(|offset| unit(1, &format!("unit {offset}"), "solo memoria", IMPORT_CHANNEL, offset))
		.collect();

	engine.memory().on_data_received(&batch(ahead)).expect("Memory stage must apply.");

	assert_eq!(engine.latest_channel_positions().get(IMPORT_CHANNEL), None);

	let raw = concat!(
		"the cat sat\til gatto si è seduto\n",
		"the dog ran\til cane corse\n",
		"a bird sang\tun uccello cantò\n",
	);

	assert_eq!(import(&engine, &dir, 2, raw)["imported"], 3);

	let dump = execute(&engine, Command::Dump { memory: Some(2) }).expect("Dump must succeed.");

	assert_eq!(dump.as_array().map(Vec::len), Some(3));
	assert_eq!(engine.memory().latest_channel_positions().get(IMPORT_CHANNEL), Some(5));
}

#[test]
fn replay_resumes_from_persisted_positions() {
	let dir = TestDir::new("cli_replay").expect("Test dir must be created.");
	let engine = engine(&dir);
	let log = dir.join("channel.jsonl");
	let records = [
		LogRecord::Unit(unit(1, "the cat sat", "il gatto si è seduto", 0, 1)),
		LogRecord::Unit(unit(2, "the dog ran", "il cane corse", 0, 2)),
		LogRecord::Deletion(deletion(2, 0, 3)),
	];
	let raw: Vec<String> = records
		.iter()
		.map(|record| serde_json::to_string(record).expect("Record must serialize."))
		.collect();

	fs::write(&log, raw.join("\n")).expect("Log must be written.");

	let replay = || {
		execute(&engine, Command::Replay { batch_size: 2, file: log.clone() })
			.expect("Replay must succeed.")
	};
	let first = replay();
	let second = replay();

	assert_eq!(first["skipped"], 0);
	assert_eq!(second["skipped"], 3);
	assert_eq!(second["positions"]["0"], 3);
	assert_eq!(engine.memory().size(), 1);

	let dump = execute(&engine, Command::Dump { memory: Some(1) }).expect("Dump must succeed.");

	assert_eq!(dump.as_array().map(Vec::len), Some(1));
}

#[test]
fn context_detects_the_source_language() {
	let dir = TestDir::new("cli_context").expect("Test dir must be created.");
	let engine = engine(&dir);

	import(
		&engine,
		&dir,
		5,
		"The harbour is full of sailing boats.\tIl porto è pieno di barche a vela.\n",
	);

	let output = execute(
		&engine,
		Command::Context {
			source_lang: None,
			target_lang: "it".to_string(),
			limit: 5,
			file: None,
			text: Some("Sailing boats leave the harbour early in the morning.".to_string()),
		},
	)
	.expect("Context must succeed.");

	assert_eq!(output["direction"]["source"], "en");
	assert_eq!(output["context"][0]["memory"], 5);

	let optimized = execute(&engine, Command::Optimize).expect("Optimize must succeed.");

	assert_eq!(optimized["units"], 1);
	assert_eq!(optimized["corpora"], 2);
}
