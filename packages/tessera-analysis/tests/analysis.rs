use std::collections::BTreeMap;

use tessera_analysis::{ContentAnalyzer, DocumentAnalyzer, HashAnalyzer, builtin_stop_words};
use tessera_config::{Analysis, Context, LanguageAnalysis};

fn context_config() -> Context {
	let mut languages = BTreeMap::new();

	languages.insert(
		"en".to_string(),
		LanguageAnalysis {
			stemming: true,
			stop_words: None,
			stem_exclusions: vec!["news".to_string()],
		},
	);
	languages.insert(
		"it".to_string(),
		LanguageAnalysis {
			stemming: false,
			stop_words: Some(vec!["il".to_string()]),
			stem_exclusions: Vec::new(),
		},
	);

	languages.insert(
		"de".to_string(),
		LanguageAnalysis { stemming: true, stop_words: None, stem_exclusions: Vec::new() },
	);

	Context { languages, ..Context::default() }
}

#[test]
fn configured_languages_use_their_own_chain() {
	let analyzer = DocumentAnalyzer::from_config(&context_config());

	assert_eq!(analyzer.analyze("en", "The ponies read the news."), vec!["poni", "read", "news"]);
	// Custom stop list replaces the built-in one.
	assert_eq!(analyzer.analyze("it", "Il gatto e i cani"), vec!["gatto", "e", "i", "cani"]);
	assert_eq!(analyzer.analyze("de", "Die Katzen und die Hunde"), vec!["katz", "hund"]);
}

#[test]
fn unknown_languages_fall_back_to_generic_chain() {
	let analyzer = DocumentAnalyzer::from_config(&context_config());

	assert!(!analyzer.table().is_configured("nl"));
	assert_eq!(analyzer.analyze("nl", "the cats of Amsterdam"), vec!["cats", "amsterdam"]);
}

#[test]
fn elisions_are_removed_before_stop_word_filtering() {
	let analyzer = DocumentAnalyzer::default();

	assert_eq!(analyzer.analyze("fr", "L'homme d'affaires"), vec!["homme", "affaires"]);
}

#[test]
fn builtin_lists_cover_shipped_languages() {
	let shipped =
		["en", "it", "fr", "de", "es", "pt", "nl", "da", "sv", "no", "fi", "ru", "ro", "tr"];

	for code in shipped {
		assert!(builtin_stop_words(code).is_some_and(|words| !words.is_empty()), "{code}");
	}

	assert!(builtin_stop_words("xx").is_none());
}

#[test]
fn index_and_query_terms_share_vocabulary() {
	let cfg = Analysis::default();
	let indexed = ContentAnalyzer::index(&cfg).analyze("The cat sat on the mat.");
	let short = ContentAnalyzer::short_query(&cfg).analyze("the cat sat");
	let long = ContentAnalyzer::long_query(&cfg).analyze("cat sat on the mat");

	for term in short.iter().chain(long.iter()) {
		assert!(indexed.contains(term), "missing {term}");
	}
}

#[test]
fn hash_tokens_are_exact() {
	assert_eq!(HashAnalyzer.analyze("Hello  world"), HashAnalyzer.analyze("Hello world"));
	assert_ne!(HashAnalyzer.analyze("Hello world"), HashAnalyzer.analyze("Hello world!"));
}
