mod content;
mod detect;
mod document;
mod hash;
mod stem;
mod stopwords;
mod tokens;

pub use content::ContentAnalyzer;
pub use detect::detect_language;
pub use document::{DocumentAnalyzer, LanguageAnalyzer, LanguageTable};
pub use hash::HashAnalyzer;
pub use stem::{SnowballStemmer, Stemmer};
pub use stopwords::builtin_stop_words;
pub use tokens::{fold, is_punctuation, words};
