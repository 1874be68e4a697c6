//! Person record and its identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on `nome`, matching the `VARCHAR(255)` column.
pub const MAX_NAME_LEN: usize = 255;

/// Server-assigned identifier. Serialized as a bare JSON integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(i64);

impl PersonId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PersonId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    #[serde(rename = "nome")]
    pub name: String,
}

impl Person {
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Body of POST and PUT. Any `id` the client sends is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonInput {
    pub nome: String,
}

impl PersonInput {
    /// Trimmed name, or a description of why it is unacceptable.
    pub fn validated_name(&self) -> Result<String, String> {
        let name = self.nome.trim();
        if name.is_empty() {
            return Err("nome must not be empty".into());
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(format!("nome must be at most {} characters", MAX_NAME_LEN));
        }
        Ok(name.to_string())
    }
}
