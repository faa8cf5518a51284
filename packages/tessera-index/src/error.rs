use std::path::PathBuf;

use tantivy::directory::error::OpenDirectoryError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("I/O failure at {path:?}.")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("Index is corrupted: {message}")]
	Corrupted { message: String },
	#[error("Invalid document: {message}")]
	InvalidDocument { message: String },
	#[error("Invalid query: {message}")]
	InvalidQuery { message: String },
	#[error("Tantivy error: {0}")]
	Tantivy(#[from] tantivy::TantivyError),
	#[error("Directory error: {0}")]
	Directory(#[from] OpenDirectoryError),
	#[error(transparent)]
	Json(#[from] serde_json::Error),
}
impl Error {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io { path: path.into(), source }
	}

	pub(crate) fn corrupted(message: impl Into<String>) -> Self {
		Self::Corrupted { message: message.into() }
	}
}
