//! [`Price`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{
    prelude::{FromPrimitive as _, ToPrimitive as _},
    Decimal,
};

/// Non-negative amount of money a listing costs, in US dollars.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct Price(Decimal);

impl Price {
    /// A zero [`Price`], meaning the listing is free to visit.
    pub const FREE: Self = Self(Decimal::ZERO);

    /// Creates a new [`Price`] if the given `amount` is non-negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (!amount.is_sign_negative()).then_some(Self(amount))
    }

    /// Creates a new [`Price`] from the given [`f64`] `amount`.
    ///
    /// [`None`] is returned if the `amount` is negative or not a finite
    /// number.
    #[must_use]
    pub fn from_f64(amount: f64) -> Option<Self> {
        Decimal::from_f64(amount).and_then(Self::new)
    }

    /// Returns the amount of this [`Price`].
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount of this [`Price`] as an [`f64`].
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Indicates whether this [`Price`] is zero.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(amount) = self;
        if amount.is_integer() {
            write!(f, "${}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "${amount}")
        }
    }
}

impl FromStr for Price {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = s.strip_prefix('$').unwrap_or(s);
        let amount =
            Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        Self::new(amount).ok_or("negative amount")
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use rust_decimal::prelude::ToPrimitive as _;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::Price;

    impl serde::Serialize for Price {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer
                .serialize_f64(self.amount().to_f64().unwrap_or_default())
        }
    }

    impl<'de> Deserialize<'de> for Price {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            let amount = f64::deserialize(deserializer)?;
            Self::from_f64(amount)
                .ok_or_else(|| D::Error::custom("negative `Price`"))
        }
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Non-negative price in US dollars.
    #[graphql_scalar(with = Self, parse_token(f64, i32))]
    type Price = super::Price;

    impl Price {
        fn to_output<S: ScalarValue>(p: &Price) -> Value<S> {
            Value::scalar(p.as_f64())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_float_value()
                .or_else(|| input.as_int_value().map(f64::from))
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Price` input scalar from non-numeric \
                         value: {input}",
                    )
                })
                .and_then(|v| {
                    Self::from_f64(v).ok_or_else(|| {
                        format!("Cannot parse `Price` input scalar: {v}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Price;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Price::from_str("450").unwrap(),
            Price::new(decimal("450")).unwrap(),
        );
        assert_eq!(
            Price::from_str("$123.45").unwrap(),
            Price::new(decimal("123.45")).unwrap(),
        );
        assert_eq!(Price::from_str("0").unwrap(), Price::FREE);

        assert!(Price::from_str("-15").is_err());
        assert!(Price::from_str("abc").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(Price::new(decimal("450")).unwrap().to_string(), "$450");
        assert_eq!(
            Price::new(decimal("123.45")).unwrap().to_string(),
            "$123.45",
        );
        assert_eq!(Price::FREE.to_string(), "$0");
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(Price::new(decimal("-0.01")).is_none());
        assert!(Price::from_f64(-1.0).is_none());
        assert!(Price::from_f64(f64::NAN).is_none());
    }
}
