pub mod batch;
pub mod context;
pub mod language;
pub mod memory;
pub mod suggestion;
pub mod timestamp;

pub use batch::{ChannelId, ChannelOffset, ChannelPositions, DataBatch, Deletion, TranslationUnit};
pub use context::{ContextEntry, ContextVector, ContextVectorBuilder};
pub use language::LanguageDirection;
pub use memory::{Memory, MemoryId};
pub use suggestion::ScoreEntry;
