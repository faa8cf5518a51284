use serde::{Deserialize, Deserializer, Serializer};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
	Rfc3339(String),
	UnixSeconds(i64),
}

pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let formatted = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;

	serializer.serialize_str(&formatted)
}

/// Accepts RFC 3339 strings and integer unix seconds, the two forms upstream logs carry.
pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	match RawTimestamp::deserialize(deserializer)? {
		RawTimestamp::Rfc3339(raw) =>
			OffsetDateTime::parse(&raw, &Rfc3339).map_err(serde::de::Error::custom),
		RawTimestamp::UnixSeconds(seconds) =>
			OffsetDateTime::from_unix_timestamp(seconds).map_err(serde::de::Error::custom),
	}
}
