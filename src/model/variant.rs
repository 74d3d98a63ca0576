//! Composite variant keys.
//!
//! A variant is one colour/size combination of a product. Stored documents key their
//! stock by the string `"<color>-<size>"`; inside the crate the key is always a parsed
//! [`VariantKey`], and parsing rejects anything that would not round-trip.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building or parsing a [`VariantKey`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VariantKeyError {
    #[error("Variant {0} is empty")]
    Empty(&'static str),

    #[error("Variant {part} '{value}' contains the separator '-'")]
    ContainsSeparator { part: &'static str, value: String },

    #[error("Variant key '{0}' has no separator")]
    MissingSeparator(String),

    #[error("Variant key '{0}' is ambiguous: more than one separator")]
    Ambiguous(String),
}

/// A colour + size pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantKey {
    color: String,
    size: String,
}

impl VariantKey {
    pub const SEPARATOR: char = '-';

    /// Builds a key from its parts. Surrounding whitespace is trimmed.
    pub fn new(color: impl AsRef<str>, size: impl AsRef<str>) -> Result<Self, VariantKeyError> {
        Ok(Self {
            color: Self::part("color", color.as_ref())?,
            size: Self::part("size", size.as_ref())?,
        })
    }

    /// The single variant stocked by products that declare no colours or sizes.
    pub fn default_variant() -> Self {
        Self {
            color: "Default".to_string(),
            size: "Free".to_string(),
        }
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    fn part(name: &'static str, value: &str) -> Result<String, VariantKeyError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(VariantKeyError::Empty(name));
        }
        if value.contains(Self::SEPARATOR) {
            return Err(VariantKeyError::ContainsSeparator {
                part: name,
                value: value.to_string(),
            });
        }
        Ok(value.to_string())
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.color, Self::SEPARATOR, self.size)
    }
}

impl FromStr for VariantKey {
    type Err = VariantKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (color, size) = s
            .split_once(Self::SEPARATOR)
            .ok_or_else(|| VariantKeyError::MissingSeparator(s.to_string()))?;
        if size.contains(Self::SEPARATOR) {
            return Err(VariantKeyError::Ambiguous(s.to_string()));
        }
        Self::new(color, size)
    }
}

impl Serialize for VariantKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VariantKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_display_and_parse() {
        let key = VariantKey::new("Black", "M").unwrap();
        assert_eq!(key.to_string(), "Black-M");
        assert_eq!("Black-M".parse::<VariantKey>().unwrap(), key);
    }

    #[test]
    fn test_parts_are_trimmed() {
        let key = VariantKey::new(" Navy ", "XL ").unwrap();
        assert_eq!(key.color(), "Navy");
        assert_eq!(key.size(), "XL");
    }

    #[test]
    fn test_rejects_separator_in_parts() {
        let err = VariantKey::new("Off-White", "M").unwrap_err();
        assert_eq!(
            err,
            VariantKeyError::ContainsSeparator {
                part: "color",
                value: "Off-White".into()
            }
        );
        assert_eq!(
            "Off-White-M".parse::<VariantKey>().unwrap_err(),
            VariantKeyError::Ambiguous("Off-White-M".into())
        );
    }

    #[test]
    fn test_rejects_empty_parts() {
        assert_eq!(VariantKey::new("", "M").unwrap_err(), VariantKeyError::Empty("color"));
        assert_eq!("Red-".parse::<VariantKey>().unwrap_err(), VariantKeyError::Empty("size"));
        assert!(matches!(
            "Red".parse::<VariantKey>(),
            Err(VariantKeyError::MissingSeparator(_))
        ));
    }

    #[test]
    fn test_serializes_as_map_key() {
        let mut stock = BTreeMap::new();
        stock.insert(VariantKey::new("Black", "M").unwrap(), 2u32);
        let json = serde_json::to_string(&stock).unwrap();
        assert_eq!(json, r#"{"Black-M":2}"#);

        let back: BTreeMap<VariantKey, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stock);

        let bad = serde_json::from_str::<BTreeMap<VariantKey, u32>>(r#"{"A-B-C":1}"#);
        assert!(bad.is_err());
    }
}
