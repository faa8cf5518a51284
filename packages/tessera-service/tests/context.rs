use std::fs;

use tessera_domain::{LanguageDirection, MemoryId};
use tessera_service::{DataListener, Engine};
use tessera_testkit::{TestDir, batch, en_it, sample_config, unit};

fn engine(dir: &TestDir) -> Engine {
	Engine::open(sample_config(dir.path())).expect("Engine must open.")
}

fn seed(engine: &Engine) {
	engine
		.on_data_received(&batch(vec![
			unit(1, "The cat sleeps on the sofa.", "Il gatto dorme sul divano.", 0, 1),
			unit(1, "My cat chases the mouse.", "Il mio gatto insegue il topo.", 0, 2),
			unit(2, "The bank raised interest rates.", "La banca ha alzato i tassi.", 0, 3),
			unit(2, "Stock markets fell sharply.", "Le borse sono crollate.", 0, 4),
		]))
		.expect("Batch must apply.");
}

#[test]
fn closest_corpus_ranks_first() {
	let dir = TestDir::new("context_rank").expect("Test dir must be created.");
	let engine = engine(&dir);

	seed(&engine);

	let vector = engine
		.context_vector(&en_it(), "A cat and a mouse on the sofa", 10)
		.expect("Context must succeed.");
	let entries: Vec<_> = vector.iter().copied().collect();

	assert_eq!(entries[0].memory, MemoryId(1));
	assert!(entries.iter().all(|entry| (0.0..=1.0).contains(&entry.score)));
	assert!(entries.windows(2).all(|pair| pair[0].score >= pair[1].score));
	assert!(!vector.contains(MemoryId(2)));
}

#[test]
fn target_language_corpora_are_indexed_too() {
	let dir = TestDir::new("context_target").expect("Test dir must be created.");
	let engine = engine(&dir);

	seed(&engine);

	let vector = engine
		.context_vector(&LanguageDirection::new("it", "en"), "La banca e i tassi di interesse", 10)
		.expect("Context must succeed.");

	assert_eq!(vector.iter().next().map(|entry| entry.memory), Some(MemoryId(2)));
}

#[test]
fn limit_bounds_the_vector() {
	let dir = TestDir::new("context_limit").expect("Test dir must be created.");
	let engine = engine(&dir);

	for memory in 1..=5 {
		engine
			.add_corpus(MemoryId(memory), "en", "Rivers and mountains shape the valley.")
			.expect("Corpus must be added.");
	}

	let vector =
		engine.context_vector(&en_it(), "mountains and rivers", 3).expect("Context must succeed.");

	assert_eq!(vector.len(), 3);
}

#[test]
fn corpora_grow_by_appending() {
	let dir = TestDir::new("context_append").expect("Test dir must be created.");
	let engine = engine(&dir);

	engine.add_corpus(MemoryId(9), "en", "Sailing boats in the harbour.").expect("Corpus.");
	engine.add_corpus(MemoryId(9), "en", "Anchors and ropes on deck.").expect("Corpus.");
	engine.add_corpus(MemoryId(3), "en", "Tax forms and invoices.").expect("Corpus.");

	assert_eq!(engine.context().size().expect("Corpora must be counted."), 2);

	let vector = engine.context_vector(&en_it(), "ropes and boats", 5).expect("Context.");

	assert_eq!(vector.iter().next().map(|entry| entry.memory), Some(MemoryId(9)));
}

#[test]
fn unknown_input_or_empty_index_yields_empty_vectors() {
	let dir = TestDir::new("context_empty").expect("Test dir must be created.");
	let engine = engine(&dir);

	assert!(engine.context_vector(&en_it(), "anything at all", 5).expect("Empty.").is_empty());

	seed(&engine);

	let de_en = LanguageDirection::new("de", "en");

	assert!(engine.context_vector(&de_en, "Die Katze", 5).expect("No corpus.").is_empty());
	assert!(engine.context_vector(&en_it(), "the and of", 5).expect("Stop words.").is_empty());
	assert!(engine.context_vector_or_empty(&en_it(), "zebra", 5).is_empty());
}

#[test]
fn file_input_matches_text_input() {
	let dir = TestDir::new("context_file").expect("Test dir must be created.");
	let engine = engine(&dir);

	seed(&engine);

	let path = dir.join("input.txt");

	fs::write(&path, "Interest rates and the stock markets").expect("Input must be written.");

	let from_file =
		engine.context_vector_from_file(&en_it(), &path, 5).expect("Context must succeed.");
	let from_text = engine
		.context_vector(&en_it(), "Interest rates and the stock markets", 5)
		.expect("Context must succeed.");

	assert_eq!(from_file, from_text);
	assert!(engine.context_vector_from_file(&en_it(), &dir.join("missing.txt"), 5).is_err());
}
