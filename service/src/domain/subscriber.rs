//! Newsletter subscriber definitions.

use std::str::FromStr;

use derive_more::{AsRef, Display, Into};
use serde::{Deserialize, Serialize};

/// Email address of a newsletter subscriber.
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(forward)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `email` is valid.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Option<Self> {
        let email = email.into();
        Self::check(&email).then_some(Self(email))
    }

    /// Checks whether the given `email` is a valid [`Email`].
    fn check(email: impl AsRef<str>) -> bool {
        let email = email.as_ref();
        email.trim() == email
            && email.contains('@')
            && !email.is_empty()
            && email.len() <= 254
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

impl TryFrom<String> for Email {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("invalid `Email`")
    }
}

#[cfg(test)]
mod spec {
    use super::Email;

    #[test]
    fn requires_an_at_sign() {
        assert!(Email::new("traveler@example.com").is_some());
        assert!(Email::new("traveler.example.com").is_none());
        assert!(Email::new("").is_none());
        assert!(Email::new(" padded@example.com ").is_none());
    }
}
