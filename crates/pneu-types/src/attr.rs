//! Extracted attribute that may be illegible

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Strings the vision backend returns when a field could not be read
const UNKNOWN_SENTINELS: &[&str] = &["", "n/a", "na", "unknown", "?", "-", "erro", "error", "null"];

/// A single extracted attribute: either a readable value or unknown.
///
/// Serialized as the inner value, or `null` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Attr<T> {
    Known(T),
    Unknown,
}

impl<T> Default for Attr<T> {
    fn default() -> Self {
        Attr::Unknown
    }
}

impl<T> Attr<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Attr::Known(v) => Some(v),
            Attr::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Attr::Known(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Attr<U> {
        match self {
            Attr::Known(v) => Attr::Known(f(v)),
            Attr::Unknown => Attr::Unknown,
        }
    }
}

impl Attr<String> {
    /// Parse free text from the extractor, mapping sentinels to `Unknown`
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_unknown_sentinel(trimmed) {
            Attr::Unknown
        } else {
            Attr::Known(trimmed.to_string())
        }
    }
}

impl<T: std::str::FromStr> Attr<T> {
    /// Parse a typed value, treating sentinels and unparsable text as `Unknown`
    pub fn parse(raw: &str) -> Self {
        if is_unknown_sentinel(raw) {
            return Attr::Unknown;
        }
        raw.trim().parse().map(Attr::Known).unwrap_or(Attr::Unknown)
    }
}

impl<T> From<Option<T>> for Attr<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Attr::Known(v),
            None => Attr::Unknown,
        }
    }
}

impl<T> From<Attr<T>> for Option<T> {
    fn from(value: Attr<T>) -> Self {
        match value {
            Attr::Known(v) => Some(v),
            Attr::Unknown => None,
        }
    }
}

impl<T: Serialize> Serialize for Attr<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Attr::Known(v) => serializer.serialize_some(v),
            Attr::Unknown => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Attr<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Attr<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attr::Known(v) => write!(f, "{}", v),
            Attr::Unknown => write!(f, "unknown"),
        }
    }
}

/// Field deserializers that accept loosely typed extractor output.
///
/// Sentinels such as `"N/A"` become `Unknown` instead of a value.
pub mod lenient {
    use super::Attr;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(u64),
    }

    impl TextOrNumber {
        fn into_text(self) -> String {
            match self {
                TextOrNumber::Text(s) => s,
                TextOrNumber::Number(n) => n.to_string(),
            }
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Attr<String>, D::Error> {
        let raw = Option::<TextOrNumber>::deserialize(deserializer)?;
        Ok(raw
            .map(|r| Attr::from_text(&r.into_text()))
            .unwrap_or(Attr::Unknown))
    }

    pub fn parsed<'de, D, T>(deserializer: D) -> Result<Attr<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: std::str::FromStr,
    {
        let raw = Option::<TextOrNumber>::deserialize(deserializer)?;
        Ok(raw
            .map(|r| Attr::parse(&r.into_text()))
            .unwrap_or(Attr::Unknown))
    }
}

pub(crate) fn is_unknown_sentinel(raw: &str) -> bool {
    UNKNOWN_SENTINELS.contains(&raw.trim().to_lowercase().as_str())
}
