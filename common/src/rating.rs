//! Review score definitions.

use std::fmt;

use derive_more::{Display, Error};
use rust_decimal::{prelude::ToPrimitive as _, Decimal};

/// Review score of a listing, from `0.0` to `5.0` with one decimal place.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct Rating(Decimal);

impl Rating {
    /// Maximum possible [`Rating`].
    pub const MAX: Self = Self(Decimal::from_parts(50, 0, 0, false, 1));

    /// Creates a new [`Rating`] if the given `value` has at most one decimal
    /// place and lies within the `0.0..=5.0` range.
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        (value.round_dp(1) == value
            && !value.is_sign_negative()
            && value <= Self::MAX.0)
            .then_some(Self(value))
    }

    /// Creates a new [`Rating`] by rounding the given `value` to one decimal
    /// place and clamping it into the `0.0..=5.0` range.
    #[must_use]
    pub fn saturating(value: Decimal) -> Self {
        Self(value.round_dp(1).clamp(Decimal::ZERO, Self::MAX.0))
    }

    /// Returns the value of this [`Rating`].
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the value of this [`Rating`] as an [`f64`].
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.round_dp(1))
    }
}

/// Whole number of stars of a single review, from 1 to 5 inclusive.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Stars(u8);

impl Stars {
    /// Minimum possible [`Stars`] value.
    pub const MIN: Self = Self(1);

    /// Maximum possible [`Stars`] value.
    pub const MAX: Self = Self(5);

    /// Creates a new [`Stars`] if the given `value` lies within the `1..=5`
    /// range.
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&value)
            .then_some(Self(value))
    }

    /// Returns the value of this [`Stars`].
    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Iterates over all possible [`Stars`] values in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN.0..=Self::MAX.0).map(Self)
    }
}

impl TryFrom<u8> for Stars {
    type Error = InvalidStars;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidStars)
    }
}

impl From<Stars> for Decimal {
    fn from(stars: Stars) -> Self {
        stars.0.into()
    }
}

/// Error of converting an out-of-range number into [`Stars`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Stars` value must lie within the 1..=5 range")]
pub struct InvalidStars;

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::Stars;

    impl serde::Serialize for Stars {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.serialize_u8(self.value())
        }
    }

    impl<'de> Deserialize<'de> for Stars {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            Self::new(u8::deserialize(deserializer)?)
                .ok_or_else(|| D::Error::custom("`Stars` out of 1..=5 range"))
        }
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::{Rating, Stars};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn rating_accepts_one_decimal_place_only() {
        assert_eq!(
            Rating::new(decimal("4.8")).unwrap().value(),
            decimal("4.8"),
        );
        assert_eq!(Rating::new(decimal("0")).unwrap().value(), decimal("0"));
        assert_eq!(Rating::new(decimal("5.0")).unwrap(), Rating::MAX);

        assert!(Rating::new(decimal("4.85")).is_none());
        assert!(Rating::new(decimal("5.1")).is_none());
        assert!(Rating::new(decimal("-0.1")).is_none());
    }

    #[test]
    fn rating_saturates() {
        assert_eq!(
            Rating::saturating(decimal("4.27")).value(),
            decimal("4.3"),
        );
        assert_eq!(Rating::saturating(decimal("5.19")), Rating::MAX);
        assert_eq!(
            Rating::saturating(decimal("-1")).value(),
            Decimal::ZERO,
        );
    }

    #[test]
    fn stars_enforce_range() {
        assert!(Stars::new(0).is_none());
        assert!(Stars::new(6).is_none());
        assert_eq!(Stars::new(1).unwrap(), Stars::MIN);
        assert_eq!(Stars::new(5).unwrap(), Stars::MAX);

        assert_eq!(
            Stars::all().map(|s| s.value()).collect::<Vec<_>>(),
            [1, 2, 3, 4, 5],
        );
    }
}
