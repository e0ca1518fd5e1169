//! Variation catalog
//!
//! Locale-independent metadata about the kinds of variation a table level can
//! carry, and the integer identities of number and gender categories. These
//! values are part of the wire format: a translated table stores category
//! values as stringified integers (`"4"` for ONE, `"2"` for FEMALE, ...).
//!
//! Number and gender values share one integer space and are told apart by
//! bitmask:
//!
//! ```text
//! NUMBER mask 0b11100   ZERO 16, ONE 4, TWO 8, FEW 20, MANY 12, OTHER 24
//! GENDER mask 0b00011   MALE 1, FEMALE 2, UNKNOWN 3
//! ```

use crate::error::{TableError, TableResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector key meaning "default / any value"
pub const WILDCARD: &str = "*";

/// Selector key for the exactly-one form of a plural.
///
/// Not a CLDR category: it exists so that singular phrases are never
/// overwritten by a multiplexed plural phrase that also has a singular entry.
pub const EXACTLY_ONE: &str = "_1";

/// Reserved token for the gender of the person reading the string
pub const VIEWING_USER: &str = "__viewing_user__";

/// Reserved token for the gender of the sentence subject
pub const SUBJECT: &str = "__subject__";

/// Bitmask shared by all number category values
pub const NUMBER_MASK: u8 = 0x1c;

/// Bitmask shared by all gender category values
pub const GENDER_MASK: u8 = 0x03;

/// Type tag of a metadata entry. Serialized as its integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum VariationKind {
    Gender = 1,
    Number = 2,
    Pronoun = 3,
}

impl From<VariationKind> for u8 {
    fn from(kind: VariationKind) -> u8 {
        kind as u8
    }
}

impl TryFrom<u8> for VariationKind {
    type Error = TableError;

    fn try_from(value: u8) -> TableResult<Self> {
        match value {
            1 => Ok(VariationKind::Gender),
            2 => Ok(VariationKind::Number),
            3 => Ok(VariationKind::Pronoun),
            other => Err(TableError::InvalidVariation(other.to_string())),
        }
    }
}

/// A dimension along which translations may vary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    Number,
    Gender,
}

impl Axis {
    pub fn mask(self) -> u8 {
        match self {
            Axis::Number => NUMBER_MASK,
            Axis::Gender => GENDER_MASK,
        }
    }
}

/// CLDR plural categories with their variation values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl NumberCategory {
    pub const ALL: [NumberCategory; 6] = [
        NumberCategory::Zero,
        NumberCategory::One,
        NumberCategory::Two,
        NumberCategory::Few,
        NumberCategory::Many,
        NumberCategory::Other,
    ];

    pub fn value(self) -> u8 {
        match self {
            NumberCategory::Zero => 16,
            NumberCategory::One => 4,
            NumberCategory::Two => 8,
            NumberCategory::Few => 20,
            NumberCategory::Many => 12,
            NumberCategory::Other => 24,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.value() == value)
    }
}

/// Grammatical gender categories with their variation values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenderCategory {
    Male,
    Female,
    Unknown,
}

impl GenderCategory {
    pub const ALL: [GenderCategory; 3] = [
        GenderCategory::Male,
        GenderCategory::Female,
        GenderCategory::Unknown,
    ];

    pub fn value(self) -> u8 {
        match self {
            GenderCategory::Male => 1,
            GenderCategory::Female => 2,
            GenderCategory::Unknown => 3,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.value() == value)
    }
}

/// A concrete value a table level can be keyed on for a given axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryValue {
    ExactlyOne,
    Number(NumberCategory),
    Gender(GenderCategory),
}

impl CategoryValue {
    /// The selector key under which this value is stored in a table
    pub fn key(&self) -> String {
        match self {
            CategoryValue::ExactlyOne => EXACTLY_ONE.to_string(),
            CategoryValue::Number(n) => n.value().to_string(),
            CategoryValue::Gender(g) => g.value().to_string(),
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            CategoryValue::ExactlyOne | CategoryValue::Number(_) => Axis::Number,
            CategoryValue::Gender(_) => Axis::Gender,
        }
    }

    /// Parse a selector key back into a category value
    pub fn from_key(key: &str) -> Option<Self> {
        if key == EXACTLY_ONE {
            return Some(CategoryValue::ExactlyOne);
        }
        let value: u8 = key.parse().ok()?;
        NumberCategory::from_value(value)
            .map(CategoryValue::Number)
            .or_else(|| GenderCategory::from_value(value).map(CategoryValue::Gender))
    }
}

impl fmt::Display for CategoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Stateless lookups over variation kinds and masks
pub struct VariationCatalog;

impl VariationCatalog {
    /// Bitmask for a variation kind; pronoun levels have none
    pub fn mask_of(kind: VariationKind) -> Option<u8> {
        match kind {
            VariationKind::Gender => Some(GENDER_MASK),
            VariationKind::Number => Some(NUMBER_MASK),
            VariationKind::Pronoun => None,
        }
    }

    /// Classify a mask (or any valid variation value) as number or gender
    pub fn axis_of_mask(mask: u8) -> TableResult<Axis> {
        if !Self::is_valid_value(&mask.to_string()) {
            return Err(TableError::InvalidVariation(mask.to_string()));
        }
        if mask & NUMBER_MASK != 0 {
            Ok(Axis::Number)
        } else {
            Ok(Axis::Gender)
        }
    }

    /// Whether a table key can stand for a variation value
    pub fn is_valid_value(key: &str) -> bool {
        if key == WILDCARD || key == EXACTLY_ONE {
            return true;
        }
        match key.parse::<u8>() {
            Ok(n) => [Axis::Number, Axis::Gender]
                .into_iter()
                .any(|axis| n & axis.mask() != 0 && n & !axis.mask() == 0),
            Err(_) => false,
        }
    }

    /// Axis a constraint value belongs to. `None` for the wildcard and for
    /// values that are not variation values at all.
    pub fn axis_of_value(key: &str) -> Option<Axis> {
        if key == WILDCARD || !Self::is_valid_value(key) {
            return None;
        }
        if key == EXACTLY_ONE {
            return Some(Axis::Number);
        }
        let n: u8 = key.parse().ok()?;
        Self::axis_of_mask(n).ok()
    }
}
