use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign},
};

use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::op;

pub const CENTS_PER_UNIT: i64 = 100;

//--------------------------------------       Price         ---------------------------------------------------------
/// A non-negative monetary amount, held in whole cents so that totals add up exactly.
///
/// On the wire a price is a plain JSON number (`12`, `12.5`, `12.99`). Fractions of a cent are rounded to the nearest
/// cent when parsing.
///
/// `+` and [`Sum`] saturate at the largest representable price. Use [`Price::checked_add`] where an overflowing total
/// must be rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

op!(binary Price, Add, add => saturating_add);
op!(inplace Price, AddAssign, add_assign => saturating_add);

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a Price> for Price {
    fn sum<I: Iterator<Item = &'a Price>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Value cannot be represented as a price: {0}")]
pub struct PriceConversionError(String);

impl Price {
    pub fn from_cents(cents: i64) -> Result<Self, PriceConversionError> {
        if cents < 0 {
            return Err(PriceConversionError(format!("{cents} cents is negative")));
        }
        Ok(Self(cents))
    }

    pub fn from_units(units: i64) -> Result<Self, PriceConversionError> {
        units
            .checked_mul(CENTS_PER_UNIT)
            .ok_or_else(|| PriceConversionError(format!("{units} is too large")))
            .and_then(Self::from_cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }
}

impl TryFrom<f64> for Price {
    type Error = PriceConversionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(PriceConversionError(format!("{value} is not a finite number")));
        }
        let cents = (value * CENTS_PER_UNIT as f64).round();
        if cents < 0.0 {
            return Err(PriceConversionError(format!("{value} is negative")));
        }
        if cents > i64::MAX as f64 {
            return Err(PriceConversionError(format!("{value} is too large")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(cents as i64))
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / CENTS_PER_UNIT, self.0 % CENTS_PER_UNIT)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Price::try_from(value).map_err(D::Error::custom)
    }
}
