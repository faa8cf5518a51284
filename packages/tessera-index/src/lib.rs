mod document;
mod error;
mod mapping;
mod query;
mod schema;
mod snapshot;
mod store;

pub use document::{Document, Field, FieldValue};
pub use error::Error;
pub use query::{BooleanQuery, PhraseQuery, Query, TermQuery};
pub use schema::{FieldOptions, Schema};
pub use snapshot::{DocAddress, Hit, Snapshot};
pub use store::{DeleteTarget, DocumentStore, MAX_SEGMENTS};

pub type Result<T, E = Error> = std::result::Result<T, E>;
