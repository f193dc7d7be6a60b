//! Tire observation types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attr::lenient;
use crate::{Attr, Error};

/// One of the five tire slots of a vehicle, in fixed slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TirePosition {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
    Spare,
}

impl TirePosition {
    pub const ALL: [TirePosition; 5] = [
        TirePosition::FrontLeft,
        TirePosition::FrontRight,
        TirePosition::RearLeft,
        TirePosition::RearRight,
        TirePosition::Spare,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TirePosition::FrontLeft => "front-left",
            TirePosition::FrontRight => "front-right",
            TirePosition::RearLeft => "rear-left",
            TirePosition::RearRight => "rear-right",
            TirePosition::Spare => "spare",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TirePosition::FrontLeft => "Front left",
            TirePosition::FrontRight => "Front right",
            TirePosition::RearLeft => "Rear left",
            TirePosition::RearRight => "Rear right",
            TirePosition::Spare => "Spare",
        }
    }
}

impl fmt::Display for TirePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TirePosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c })
            .collect();
        match key.as_str() {
            "front-left" | "fl" | "dianteiro-esquerdo" => Ok(TirePosition::FrontLeft),
            "front-right" | "fr" | "dianteiro-direito" => Ok(TirePosition::FrontRight),
            "rear-left" | "rl" | "traseiro-esquerdo" => Ok(TirePosition::RearLeft),
            "rear-right" | "rr" | "traseiro-direito" => Ok(TirePosition::RearRight),
            "spare" | "sp" | "estepe" => Ok(TirePosition::Spare),
            _ => Err(Error::InvalidField(format!("unknown tire position '{}'", s))),
        }
    }
}

/// Condition label reported by the vision backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TireCondition {
    New,
    Good,
    Worn,
    Damaged,
    #[default]
    Unknown,
}

impl TireCondition {
    /// Map a free-text label (English or Portuguese) to a condition
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "new" | "novo" => TireCondition::New,
            "good" | "bom" => TireCondition::Good,
            "worn" | "desgastado" => TireCondition::Worn,
            "damaged" | "danificado" => TireCondition::Damaged,
            _ => TireCondition::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TireCondition::New => "new",
            TireCondition::Good => "good",
            TireCondition::Worn => "worn",
            TireCondition::Damaged => "damaged",
            TireCondition::Unknown => "unknown",
        }
    }
}

fn deserialize_condition<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<TireCondition, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|r| TireCondition::from_label(&r))
        .unwrap_or_default())
}

impl fmt::Display for TireCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Manufacture week (01-53), stored as a two-digit code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ManufactureWeek(u8);

impl ManufactureWeek {
    pub fn new(week: u8) -> Result<Self, Error> {
        if (1..=53).contains(&week) {
            Ok(Self(week))
        } else {
            Err(Error::InvalidField(format!("manufacture week {} out of range", week)))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Manufacture year within the century (00-99), stored as a two-digit code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ManufactureYear(u8);

impl ManufactureYear {
    pub fn new(year: u8) -> Result<Self, Error> {
        if year <= 99 {
            Ok(Self(year))
        } else {
            Err(Error::InvalidField(format!("manufacture year {} out of range", year)))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

fn parse_two_digits(raw: &str, field: &str) -> Result<u8, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.len() > 2 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidField(format!(
            "{} must be a two-digit code, got '{}'",
            field, raw
        )));
    }
    trimmed
        .parse()
        .map_err(|_| Error::InvalidField(format!("{} '{}' is not a number", field, raw)))
}

macro_rules! two_digit_code {
    ($ty:ident, $field:literal) => {
        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::new(parse_two_digits(s, $field)?)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = Error;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:02}", self.0)
            }
        }
    };
}

two_digit_code!(ManufactureWeek, "manufacture week");
two_digit_code!(ManufactureYear, "manufacture year");

/// Derive (week, year) from the trailing four-digit date code of a DOT string
pub fn date_code_from_dot(dot: &str) -> Option<(ManufactureWeek, ManufactureYear)> {
    let digits: Vec<char> = dot
        .trim()
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.len() < 4 {
        return None;
    }
    let code: String = digits[..4].iter().rev().collect();
    let week = code[..2].parse().ok()?;
    let year = code[2..].parse().ok()?;
    Some((week, year))
}

/// Opaque reference to a stored tire photo
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a physical tire for matching purposes: manufacture week and year.
///
/// Two tires made in the same week of the same year are indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FingerprintKey {
    pub week: ManufactureWeek,
    pub year: ManufactureYear,
}

impl fmt::Display for FingerprintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.week, self.year)
    }
}

/// Attributes read from a single tire photo, before a position is assigned
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractedTire {
    #[serde(default, deserialize_with = "lenient::text")]
    pub dot: Attr<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub brand: Attr<String>,
    #[serde(default, deserialize_with = "deserialize_condition")]
    pub condition: TireCondition,
    #[serde(default, alias = "week", deserialize_with = "lenient::parsed")]
    pub manufacture_week: Attr<ManufactureWeek>,
    #[serde(default, alias = "year", deserialize_with = "lenient::parsed")]
    pub manufacture_year: Attr<ManufactureYear>,
}

impl ExtractedTire {
    pub fn into_observation(self, position: TirePosition, image_ref: Option<ImageRef>) -> TireObservation {
        TireObservation {
            position,
            dot: self.dot,
            brand: self.brand,
            condition: self.condition,
            manufacture_week: self.manufacture_week,
            manufacture_year: self.manufacture_year,
            image_ref,
        }
    }
}

/// One scanned or registered tire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TireObservation {
    pub position: TirePosition,
    #[serde(default, deserialize_with = "lenient::text")]
    pub dot: Attr<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub brand: Attr<String>,
    #[serde(default, deserialize_with = "deserialize_condition")]
    pub condition: TireCondition,
    #[serde(default, alias = "week", deserialize_with = "lenient::parsed")]
    pub manufacture_week: Attr<ManufactureWeek>,
    #[serde(default, alias = "year", deserialize_with = "lenient::parsed")]
    pub manufacture_year: Attr<ManufactureYear>,
    #[serde(default)]
    pub image_ref: Option<ImageRef>,
}

impl TireObservation {
    /// Observation with only a position and manufacture date set
    pub fn dated(position: TirePosition, week: ManufactureWeek, year: ManufactureYear) -> Self {
        Self {
            position,
            dot: Attr::Unknown,
            brand: Attr::Unknown,
            condition: TireCondition::Unknown,
            manufacture_week: Attr::Known(week),
            manufacture_year: Attr::Known(year),
            image_ref: None,
        }
    }

    /// Matching key, defined only when both week and year were read
    pub fn fingerprint(&self) -> Option<FingerprintKey> {
        match (&self.manufacture_week, &self.manufacture_year) {
            (Attr::Known(week), Attr::Known(year)) => Some(FingerprintKey {
                week: *week,
                year: *year,
            }),
            _ => None,
        }
    }

    /// Same tire placed at another slot
    pub fn at_position(mut self, position: TirePosition) -> Self {
        self.position = position;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parsing() {
        assert_eq!("front-left".parse::<TirePosition>().unwrap(), TirePosition::FrontLeft);
        assert_eq!("RR".parse::<TirePosition>().unwrap(), TirePosition::RearRight);
        assert_eq!("Dianteiro Direito".parse::<TirePosition>().unwrap(), TirePosition::FrontRight);
        assert_eq!("estepe".parse::<TirePosition>().unwrap(), TirePosition::Spare);
        assert!("roof".parse::<TirePosition>().is_err());
    }

    #[test]
    fn test_position_order_matches_slots() {
        for (i, pos) in TirePosition::ALL.iter().enumerate() {
            assert_eq!(pos.index(), i);
        }
    }

    #[test]
    fn test_week_year_codes() {
        assert_eq!("05".parse::<ManufactureWeek>().unwrap().to_string(), "05");
        assert_eq!("5".parse::<ManufactureWeek>().unwrap().to_string(), "05");
        assert!("54".parse::<ManufactureWeek>().is_err());
        assert!("00".parse::<ManufactureWeek>().is_err());
        assert!("123".parse::<ManufactureYear>().is_err());
        assert_eq!("00".parse::<ManufactureYear>().unwrap().value(), 0);
    }

    #[test]
    fn test_sentinel_week_is_unknown() {
        assert_eq!(Attr::<ManufactureWeek>::parse("N/A"), Attr::Unknown);
        assert_eq!(Attr::<ManufactureWeek>::parse("4x"), Attr::Unknown);
        assert!(Attr::<ManufactureWeek>::parse("41").is_known());
    }

    #[test]
    fn test_date_code_from_dot() {
        let (week, year) = date_code_from_dot("DOT XYZ 4119").unwrap();
        assert_eq!(week.value(), 41);
        assert_eq!(year.value(), 19);
        assert!(date_code_from_dot("DOT XYZ").is_none());
        assert!(date_code_from_dot("DOT 9919").is_none());
    }

    #[test]
    fn test_fingerprint_requires_both_parts() {
        let mut tire = TireObservation::dated(
            TirePosition::Spare,
            ManufactureWeek::new(22).unwrap(),
            ManufactureYear::new(22).unwrap(),
        );
        assert!(tire.fingerprint().is_some());
        tire.manufacture_year = Attr::Unknown;
        assert!(tire.fingerprint().is_none());
    }

    #[test]
    fn test_observation_round_trips_through_store_format() {
        let tire = TireObservation::dated(
            TirePosition::RearLeft,
            ManufactureWeek::new(5).unwrap(),
            ManufactureYear::new(20).unwrap(),
        );
        let json = serde_json::to_string(&tire).unwrap();
        assert!(json.contains("\"manufacture_week\":\"05\""));
        let back: TireObservation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tire);
    }

    #[test]
    fn test_observation_accepts_legacy_field_names() {
        let json = r#"{"position":"spare","dot":"N/A","brand":"Pirelli","condition":"Mystery","week":"41","year":19}"#;
        let tire: TireObservation = serde_json::from_str(json).unwrap();
        assert_eq!(tire.brand, Attr::Known("Pirelli".to_string()));
        assert_eq!(tire.dot, Attr::Unknown);
        assert_eq!(tire.condition, TireCondition::Unknown);
        assert_eq!(tire.fingerprint().unwrap().to_string(), "(41,19)");
    }
}
