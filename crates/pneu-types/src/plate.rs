//! Vehicle plate normalization

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Normalized vehicle plate: uppercase alphanumeric, no separators.
///
/// Accepts the two fleet formats `AAA9A99` and `AAA9999`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Plate(String);

impl Plate {
    pub const LEN: usize = 7;

    /// Strip separators and uppercase, without validating the format
    pub fn normalize(raw: &str) -> String {
        raw.chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }

    pub fn parse(raw: &str) -> Result<Self, Error> {
        let normalized = Self::normalize(raw);
        if Self::is_valid(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(Error::InvalidPlate(raw.to_string()))
        }
    }

    fn is_valid(normalized: &str) -> bool {
        let chars: Vec<char> = normalized.chars().collect();
        chars.len() == Self::LEN
            && chars[..3].iter().all(|c| c.is_ascii_uppercase())
            && chars[3].is_ascii_digit()
            && chars[4].is_ascii_alphanumeric()
            && chars[5..].iter().all(|c| c.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Plate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Plate::parse(s)
    }
}

impl TryFrom<String> for Plate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Plate::parse(&value)
    }
}

impl From<Plate> for String {
    fn from(value: Plate) -> Self {
        value.0
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
