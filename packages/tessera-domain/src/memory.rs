use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryId(pub u64);
impl MemoryId {
	pub fn get(self) -> u64 {
		self.0
	}
}
impl fmt::Display for MemoryId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}
impl FromStr for MemoryId {
	type Err = ParseIntError;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		raw.trim().parse().map(Self)
	}
}
impl From<u64> for MemoryId {
	fn from(value: u64) -> Self {
		Self(value)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
	pub id: MemoryId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}
impl Memory {
	pub fn new(id: MemoryId, name: Option<String>) -> Self {
		let name = name.map(|name| name.trim().to_string()).filter(|name| !name.is_empty());

		Self { id, name }
	}
}
