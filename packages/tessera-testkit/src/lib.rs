mod error;

pub use error::{Error, Result};

use std::{
	env, fs,
	path::{Path, PathBuf},
};

use time::{OffsetDateTime, macros::datetime};
use uuid::Uuid;

use tessera_config::{Config, Service, Storage};
use tessera_domain::{
	ChannelId, ChannelOffset, DataBatch, Deletion, LanguageDirection, MemoryId, TranslationUnit,
};

pub const INGESTED_AT: OffsetDateTime = datetime!(2024-03-01 10:00:00 UTC);

/// Throwaway directory under the system temp dir, removed on drop unless `TESSERA_KEEP_TEST_DIRS`
/// is set.
pub struct TestDir {
	path: PathBuf,
	cleaned: bool,
}
impl TestDir {
	pub fn new(prefix: &str) -> Result<Self> {
		let path = env::temp_dir().join(format!("tessera_{prefix}_{}", Uuid::new_v4().simple()));

		fs::create_dir_all(&path).map_err(|err| {
			Error::Message(format!("Failed to create test directory {}: {err}.", path.display()))
		})?;

		Ok(Self { path, cleaned: false })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn join(&self, child: &str) -> PathBuf {
		self.path.join(child)
	}

	pub fn cleanup(mut self) -> Result<()> {
		self.cleanup_inner()
	}

	fn cleanup_inner(&mut self) -> Result<()> {
		if self.cleaned {
			return Ok(());
		}

		self.cleaned = true;

		match fs::remove_dir_all(&self.path) {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(err) => Err(err.into()),
		}
	}
}
impl Drop for TestDir {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}
		if env::var_os("TESSERA_KEEP_TEST_DIRS").is_some() {
			eprintln!("Keeping test directory {}.", self.path.display());

			return;
		}
		if let Err(err) = self.cleanup_inner() {
			eprintln!("Test directory cleanup failed: {err}.");
		}
	}
}

pub fn with_test_dir<F, T>(prefix: &str, f: F) -> Result<T>
where
	F: FnOnce(&TestDir) -> Result<T>,
{
	let dir = TestDir::new(prefix)?;
	let result = f(&dir);

	if let Err(err) = dir.cleanup() {
		eprintln!("Test directory cleanup warning: {err}.");

		if result.is_ok() {
			return Err(err);
		}
	}

	result
}

/// Configuration rooted at `root` with every tunable at its default.
pub fn sample_config(root: &Path) -> Config {
	Config {
		service: Service { log_level: "debug".to_string() },
		storage: Storage { path: root.to_path_buf() },
		analysis: Default::default(),
		memory: Default::default(),
		context: Default::default(),
		runtime: tessera_config::Runtime { threads: 2 },
	}
}

pub fn en_it() -> LanguageDirection {
	LanguageDirection::new("en", "it")
}

pub fn unit(
	memory: u64,
	source: &str,
	target: &str,
	channel: ChannelId,
	offset: ChannelOffset,
) -> TranslationUnit {
	TranslationUnit {
		memory: MemoryId(memory),
		direction: en_it(),
		source: source.to_string(),
		target: target.to_string(),
		timestamp: INGESTED_AT,
		channel,
		offset,
		previous_source: None,
		previous_target: None,
	}
}

pub fn replacing(
	mut unit: TranslationUnit,
	previous_source: &str,
	previous_target: &str,
) -> TranslationUnit {
	unit.previous_source = Some(previous_source.to_string());
	unit.previous_target = Some(previous_target.to_string());

	unit
}

pub fn deletion(memory: u64, channel: ChannelId, offset: ChannelOffset) -> Deletion {
	Deletion { memory: MemoryId(memory), channel, offset }
}

pub fn batch(units: Vec<TranslationUnit>) -> DataBatch {
	DataBatch { units, deletions: Vec::new() }
}

pub fn deletions(deletions: Vec<Deletion>) -> DataBatch {
	DataBatch { units: Vec::new(), deletions }
}
