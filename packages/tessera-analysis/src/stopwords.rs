const EN: &[&str] = &[
	"a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
	"no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
	"they", "this", "to", "was", "will", "with",
];
const IT: &[&str] = &[
	"a", "ad", "al", "alla", "alle", "anche", "che", "chi", "con", "da", "dal", "dalla", "dei",
	"del", "della", "delle", "di", "e", "è", "gli", "i", "il", "in", "la", "le", "lo", "ma",
	"nel", "nella", "non", "o", "per", "più", "se", "si", "sono", "su", "sul", "tra", "un",
	"una", "uno",
];
const FR: &[&str] = &[
	"au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du", "elle", "en", "et", "il", "je",
	"la", "le", "les", "leur", "lui", "ma", "mais", "me", "même", "mes", "ne", "nous", "on", "ou",
	"par", "pas", "pour", "qu", "que", "qui", "sa", "se", "ses", "son", "sur", "ta", "te", "tu",
	"un", "une", "vous",
];
const DE: &[&str] = &[
	"aber", "als", "am", "an", "auch", "auf", "aus", "bei", "bin", "bis", "das", "dass", "dem",
	"den", "der", "des", "die", "du", "ein", "eine", "einem", "einen", "einer", "er", "es", "für",
	"hat", "ich", "ihr", "im", "in", "ist", "mit", "nicht", "noch", "oder", "sie", "sind", "und",
	"von", "war", "wie", "wir", "zu", "zum", "zur",
];
const ES: &[&str] = &[
	"a", "al", "como", "con", "de", "del", "el", "en", "es", "la", "las", "lo", "los", "más",
	"no", "o", "para", "pero", "por", "que", "se", "su", "sus", "un", "una", "y",
];
const PT: &[&str] = &[
	"a", "ao", "as", "com", "como", "da", "das", "de", "do", "dos", "e", "é", "em", "mas", "na",
	"nas", "no", "nos", "o", "os", "ou", "para", "por", "que", "se", "um", "uma",
];
const NL: &[&str] = &[
	"aan", "al", "als", "bij", "dan", "dat", "de", "die", "dit", "een", "en", "er", "het", "hij",
	"ik", "in", "is", "je", "maar", "met", "na", "naar", "niet", "nog", "of", "om", "ook", "op",
	"te", "tot", "uit", "van", "voor", "was", "wat", "we", "ze", "zich", "zij", "zijn",
];
const DA: &[&str] = &[
	"af", "alle", "at", "de", "den", "der", "det", "du", "efter", "eller", "en", "er", "et", "for",
	"fra", "har", "han", "hun", "i", "ikke", "jeg", "med", "men", "mig", "og", "om", "på", "sig",
	"som", "til", "var", "vi", "ved",
];
const SV: &[&str] = &[
	"att", "av", "de", "den", "det", "du", "efter", "en", "ett", "för", "från", "han", "har",
	"hon", "i", "inte", "jag", "med", "men", "och", "om", "på", "som", "till", "var", "vi", "är",
];
const NO: &[&str] = &[
	"av", "de", "den", "der", "det", "du", "eller", "en", "er", "et", "for", "fra", "han", "har",
	"hun", "i", "ikke", "jeg", "med", "men", "og", "om", "på", "seg", "som", "til", "var", "vi",
];
const FI: &[&str] = &[
	"ei", "ja", "jos", "kuin", "mutta", "me", "minä", "mitä", "ne", "niin", "oli", "on", "ovat",
	"se", "sekä", "sen", "siitä", "sinä", "tai", "te", "että", "hän", "he", "ole",
];
const RU: &[&str] = &[
	"а", "в", "во", "вы", "да", "для", "до", "же", "за", "и", "из", "к", "как", "мы", "на", "не",
	"но", "о", "он", "она", "они", "от", "по", "с", "так", "то", "у", "что", "это", "я",
];
const RO: &[&str] = &[
	"a", "al", "ale", "cu", "când", "ca", "care", "ce", "cel", "de", "din", "după", "e", "este",
	"în", "la", "mai", "nu", "o", "pe", "pentru", "sau", "să", "se", "și", "un", "una",
];
const TR: &[&str] = &[
	"ama", "bir", "bu", "da", "de", "diye", "en", "gibi", "için", "ile", "ki", "mi", "ne", "o",
	"olan", "olarak", "şu", "ve", "veya", "ya",
];

/// Stop words shipped for `code`, if any.
pub fn builtin_stop_words(code: &str) -> Option<&'static [&'static str]> {
	match code {
		"en" => Some(EN),
		"it" => Some(IT),
		"fr" => Some(FR),
		"de" => Some(DE),
		"es" => Some(ES),
		"pt" => Some(PT),
		"nl" => Some(NL),
		"da" => Some(DA),
		"sv" => Some(SV),
		"no" | "nb" | "nn" => Some(NO),
		"fi" => Some(FI),
		"ru" => Some(RU),
		"ro" => Some(RO),
		"tr" => Some(TR),
		_ => None,
	}
}

pub(crate) fn generic() -> &'static [&'static str] {
	EN
}
