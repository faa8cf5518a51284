pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Index unavailable: {message}")]
	IndexUnavailable { message: String },
	#[error("Invalid input: {message}")]
	InvalidInput { message: String },
	#[error("Worker pool error: {message}")]
	WorkerPool { message: String },
}
impl From<tessera_index::Error> for Error {
	fn from(err: tessera_index::Error) -> Self {
		match err {
			tessera_index::Error::InvalidDocument { message }
			| tessera_index::Error::InvalidQuery { message } => Self::InvalidInput { message },
			other => Self::IndexUnavailable { message: other.to_string() },
		}
	}
}
impl From<rayon::ThreadPoolBuildError> for Error {
	fn from(err: rayon::ThreadPoolBuildError) -> Self {
		Self::WorkerPool { message: err.to_string() }
	}
}
