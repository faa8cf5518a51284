use whatlang::Lang;

/// Best-effort two-letter language code for `text`. Returns `None` when the detector has no answer
/// or the language has no two-letter code we track.
pub fn detect_language(text: &str) -> Option<&'static str> {
	let info = whatlang::detect(text)?;
	let code = match info.lang() {
		Lang::Eng => "en",
		Lang::Ita => "it",
		Lang::Fra => "fr",
		Lang::Deu => "de",
		Lang::Spa => "es",
		Lang::Por => "pt",
		Lang::Nld => "nl",
		Lang::Rus => "ru",
		Lang::Ukr => "uk",
		Lang::Pol => "pl",
		Lang::Ces => "cs",
		Lang::Swe => "sv",
		Lang::Dan => "da",
		Lang::Fin => "fi",
		Lang::Ron => "ro",
		Lang::Hun => "hu",
		Lang::Tur => "tr",
		Lang::Ell => "el",
		Lang::Ara => "ar",
		Lang::Heb => "he",
		Lang::Cmn => "zh",
		Lang::Jpn => "ja",
		Lang::Kor => "ko",
		_ => return None,
	};

	if !info.is_reliable() {
		tracing::debug!(language = code, confidence = info.confidence(), "Low-confidence language guess.");
	}

	Some(code)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn detects_english_prose() {
		let text = "The quick brown fox jumps over the lazy dog while the farmer watches from the porch.";

		assert_eq!(detect_language(text), Some("en"));
	}

	#[test]
	fn empty_text_has_no_language() {
		assert_eq!(detect_language(""), None);
	}
}
