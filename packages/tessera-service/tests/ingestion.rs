use tessera_domain::{ChannelPositions, DataBatch, MemoryId};
use tessera_service::{DataListener, Engine};
use tessera_testkit::{
	TestDir, batch, deletion, deletions, replacing, sample_config, unit, with_test_dir,
};

fn engine(dir: &TestDir) -> Engine {
	Engine::open(sample_config(dir.path())).expect("Engine must open.")
}

fn positions(entries: &[(u16, u64)]) -> ChannelPositions {
	entries.iter().copied().collect()
}

#[test]
fn replaying_a_batch_changes_nothing() {
	let dir = TestDir::new("idempotent").expect("Test dir must be created.");
	let engine = engine(&dir);
	let data = DataBatch {
		units: vec![
			unit(1, "the cat sat", "il gatto si è seduto", 0, 1),
			unit(2, "the dog ran", "il cane corse", 1, 1),
		],
		deletions: vec![deletion(3, 0, 2)],
	};

	engine.on_data_received(&data).expect("Batch must apply.");

	let dump = engine.memory().dump(None).expect("Dump must succeed.");
	let corpora = engine.context().size().expect("Corpora must be counted.");
	let after_first = engine.latest_channel_positions();

	engine.on_data_received(&data).expect("Replay must succeed.");

	assert_eq!(engine.memory().dump(None).expect("Dump must succeed."), dump);
	assert_eq!(engine.context().size().expect("Corpora must be counted."), corpora);
	assert_eq!(engine.latest_channel_positions(), after_first);
	assert_eq!(after_first, positions(&[(0, 2), (1, 1)]));
}

#[test]
fn older_offsets_are_skipped() {
	let dir = TestDir::new("offsets").expect("Test dir must be created.");
	let engine = engine(&dir);

	engine
		.on_data_received(&batch(vec![unit(1, "five", "cinque", 0, 5)]))
		.expect("Batch must apply.");

	let replay = (1..=5).map(|offset| unit(1, &format!("unit {offset}"), "x", 0, offset)).collect();

	engine.on_data_received(&batch(replay)).expect("Replay must succeed.");

	assert_eq!(engine.memory().size(), 1);
	assert_eq!(engine.latest_channel_positions(), positions(&[(0, 5)]));

	engine.on_delete(&deletion(1, 0, 4)).expect("Stale deletion must be ignored.");

	assert_eq!(engine.memory().size(), 1);
}

#[test]
fn positions_survive_restart() {
	with_test_dir("restart", |dir| {
		let data = batch(vec![unit(1, "the cat sat", "il gatto si è seduto", 4, 9)]);

		{
			let engine = engine(dir);

			engine.on_data_received(&data).expect("Batch must apply.");
		}

		let engine = engine(dir);

		assert_eq!(engine.latest_channel_positions(), positions(&[(4, 9)]));
		assert_eq!(engine.memory().latest_channel_positions(), positions(&[(4, 9)]));

		engine.on_data_received(&data).expect("Replay must succeed.");

		assert_eq!(engine.memory().size(), 1);

		Ok(())
	})
	.expect("Test dir must clean up.");
}

#[test]
fn previous_sentence_replaces_the_old_unit() {
	let dir = TestDir::new("replace").expect("Test dir must be created.");
	let engine = engine(&dir);

	engine
		.on_data_received(&batch(vec![
			unit(1, "the cat sat", "il gatto sedeva", 0, 1),
			unit(2, "the cat sat", "il gatto sedeva", 0, 2),
		]))
		.expect("Batch must apply.");
	engine
		.on_data_received(&batch(vec![replacing(
			unit(1, "the cat sat", "il gatto si è seduto", 0, 3),
			"the cat sat",
			"il gatto sedeva",
		)]))
		.expect("Replacement must apply.");

	let units = engine.memory().lookup(MemoryId(1), "the cat sat").expect("Lookup must succeed.");

	assert_eq!(units.len(), 1);
	assert_eq!(units[0].target, "il gatto si è seduto");
	assert_eq!(engine.memory().dump(Some(MemoryId(2))).expect("Dump must succeed.").len(), 1);
}

#[test]
fn deletion_after_units_in_one_batch_wins() {
	let dir = TestDir::new("order").expect("Test dir must be created.");
	let engine = engine(&dir);
	let data = DataBatch {
		units: vec![unit(1, "the cat sat", "il gatto si è seduto", 0, 1)],
		deletions: vec![deletion(1, 0, 2)],
	};

	engine.on_data_received(&data).expect("Batch must apply.");

	assert_eq!(engine.memory().size(), 0);
	assert_eq!(engine.context().size().expect("Corpora must be counted."), 0);
	assert_eq!(engine.latest_channel_positions(), positions(&[(0, 2)]));
}

#[test]
fn deletions_reach_both_stages() {
	let dir = TestDir::new("deletions").expect("Test dir must be created.");
	let engine = engine(&dir);

	engine
		.on_data_received(&batch(vec![
			unit(1, "the cat sat", "il gatto si è seduto", 0, 1),
			unit(2, "the dog ran", "il cane corse", 0, 2),
		]))
		.expect("Batch must apply.");

	assert_eq!(engine.context().size().expect("Corpora must be counted."), 4);

	engine.on_data_received(&deletions(vec![deletion(2, 0, 3)])).expect("Deletion must apply.");

	assert_eq!(engine.memory().size(), 1);
	assert_eq!(engine.context().size().expect("Corpora must be counted."), 2);
	assert_eq!(engine.context().latest_channel_positions(), positions(&[(0, 3)]));
}
