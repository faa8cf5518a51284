mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Analysis, Config, Context, LanguageAnalysis, Memory, Runtime, Service, Storage};

use std::{collections::BTreeMap, fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } => {
			Error::ParseConfig { path: path.to_path_buf(), source }
		},
		other => other,
	})
}

pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg)?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.storage.path.as_os_str().is_empty() {
		return Err(Error::Validation { message: "storage.path must be non-empty.".to_string() });
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.analysis.shingle_size < 2 {
		return Err(Error::Validation {
			message: "analysis.shingle_size must be at least 2.".to_string(),
		});
	}
	if cfg.analysis.short_query_max_terms == 0 {
		return Err(Error::Validation {
			message: "analysis.short_query_max_terms must be greater than zero.".to_string(),
		});
	}
	if cfg.memory.min_query_size == 0 {
		return Err(Error::Validation {
			message: "memory.min_query_size must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("memory.min_should_match_ratio", cfg.memory.min_should_match_ratio),
		("memory.context_weight", cfg.memory.context_weight),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if !(0.0..=1.0).contains(&value) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-1.0."),
			});
		}
	}

	if cfg.memory.min_should_match_ratio == 0.0 {
		return Err(Error::Validation {
			message: "memory.min_should_match_ratio must be greater than zero.".to_string(),
		});
	}
	if cfg.memory.ngram_order == 0 {
		return Err(Error::Validation {
			message: "memory.ngram_order must be greater than zero.".to_string(),
		});
	}
	if !cfg.memory.smoothing_epsilon.is_finite() || cfg.memory.smoothing_epsilon <= 0.0 {
		return Err(Error::Validation {
			message: "memory.smoothing_epsilon must be a finite number greater than zero."
				.to_string(),
		});
	}
	if cfg.context.min_result_batch == 0 {
		return Err(Error::Validation {
			message: "context.min_result_batch must be greater than zero.".to_string(),
		});
	}
	if cfg.context.max_query_terms == 0 {
		return Err(Error::Validation {
			message: "context.max_query_terms must be greater than zero.".to_string(),
		});
	}

	for (code, language) in &cfg.context.languages {
		if !is_language_code(code) {
			return Err(Error::LanguageCode { code: code.clone() });
		}
		if let Some(stop_words) = language.stop_words.as_ref()
			&& stop_words.iter().any(|word| word.trim().is_empty())
		{
			return Err(Error::Validation {
				message: format!("context.languages.{code}.stop_words must not contain blanks."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) -> Result<()> {
	cfg.service.log_level = cfg.service.log_level.trim().to_string();

	let mut languages = BTreeMap::new();

	for (code, mut language) in std::mem::take(&mut cfg.context.languages) {
		let code = code.trim().to_ascii_lowercase();

		if let Some(stop_words) = language.stop_words.as_mut() {
			for word in stop_words.iter_mut() {
				*word = word.trim().to_lowercase();
			}
		}
		for word in language.stem_exclusions.iter_mut() {
			*word = word.trim().to_lowercase();
		}

		if languages.insert(code.clone(), language).is_some() {
			return Err(Error::Validation {
				message: format!("context.languages.{code} is declared more than once."),
			});
		}
	}

	cfg.context.languages = languages;

	Ok(())
}

fn is_language_code(code: &str) -> bool {
	code.len() == 2 && code.chars().all(|ch| ch.is_ascii_lowercase())
}
