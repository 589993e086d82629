//! Booking [`Inquiry`] definitions.

use common::Price;
use derive_more::{AsRef, Display, Into};
use url::Url;

use crate::domain::tour;

/// Booking inquiry handed off to the operator via a messaging deep link.
///
/// The hand-off is one-way and unauthenticated: the link opens the external
/// messaging app with a prefilled text, nothing is sent by this service.
#[derive(Clone, Debug)]
pub struct Inquiry {
    /// [`Title`] of the inquired tour.
    ///
    /// [`Title`]: tour::Title
    pub tour: tour::Title,

    /// [`Price`] of the inquired tour per person.
    pub price: Price,

    /// Desired [`TravelDate`].
    pub date: TravelDate,

    /// Number of [`Guests`] to book for.
    pub guests: Guests,
}

impl Inquiry {
    /// Builds the messaging deep link of this [`Inquiry`] for the given
    /// operator `phone`.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn deep_link(&self, phone: &Phone) -> Url {
        let Self {
            tour,
            price,
            date,
            guests,
        } = self;

        let message = format!(
            "Hi! I'd like to book {tour} on {date} for {guests} guest(s) \
             at {price} per person. Is it still available?",
        );
        Url::parse_with_params(
            &format!("https://wa.me/{phone}"),
            [("text", message.as_str())],
        )
        .expect("valid deep link")
    }

    /// Builds the general recommendations deep link for the given operator
    /// `phone`.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn general_deep_link(phone: &Phone) -> Url {
        Url::parse_with_params(
            &format!("https://wa.me/{phone}"),
            [(
                "text",
                "Hi! I'm looking for travel recommendations. \
                 Can you help me?",
            )],
        )
        .expect("valid deep link")
    }
}

/// [`Inquiry`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Operator [`Phone`] number the deep links lead to.
    pub phone: Phone,
}

/// Phone number of the tour operator, in international format without the
/// leading `+`.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(forward)]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        let number = number.as_ref();
        (6..=16).contains(&number.len())
            && number.chars().all(|c| c.is_ascii_digit())
    }
}

impl std::str::FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// Desired travel date of an [`Inquiry`], as entered by the visitor.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(forward)]
pub struct TravelDate(String);

impl TravelDate {
    /// Creates a new [`TravelDate`] if the given `date` is valid.
    #[must_use]
    pub fn new(date: impl Into<String>) -> Option<Self> {
        let date = date.into();
        Self::check(&date).then_some(Self(date))
    }

    /// Checks whether the given `date` is a valid [`TravelDate`].
    fn check(date: impl AsRef<str>) -> bool {
        let date = date.as_ref();
        date.trim() == date && !date.is_empty() && date.len() <= 64
    }
}

impl std::str::FromStr for TravelDate {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `TravelDate`")
    }
}

/// Number of guests of an [`Inquiry`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, PartialEq)]
pub struct Guests(u32);

impl Guests {
    /// Creates a new [`Guests`] if the given `num` is valid.
    #[must_use]
    pub fn new(num: u32) -> Option<Self> {
        (1..=100).contains(&num).then_some(Self(num))
    }
}

#[cfg(test)]
mod spec {
    use common::Price;

    use crate::domain::tour;

    use super::{Guests, Inquiry, Phone, TravelDate};

    #[test]
    fn deep_link_carries_booking_details() {
        let inquiry = Inquiry {
            tour: tour::Title::new("Tanah Lot Temple").unwrap(),
            price: Price::from_f64(15.0).unwrap(),
            date: TravelDate::new("2026-09-14").unwrap(),
            guests: Guests::new(2).unwrap(),
        };
        let phone = Phone::new("6281234567890").unwrap();

        let url = inquiry.deep_link(&phone);
        assert_eq!(url.host_str(), Some("wa.me"));
        assert_eq!(url.path(), "/6281234567890");

        let text = url
            .query_pairs()
            .find(|(k, _)| k == "text")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert!(text.contains("Tanah Lot Temple"));
        assert!(text.contains("2026-09-14"));
        assert!(text.contains("2 guest(s)"));
        assert!(text.contains("$15"));
    }

    #[test]
    fn general_deep_link_uses_default_message() {
        let phone = Phone::new("6281234567890").unwrap();
        let url = Inquiry::general_deep_link(&phone);

        assert!(url.as_str().starts_with("https://wa.me/6281234567890?text="));
        assert!(url.query().unwrap().contains("recommendations"));
    }

    #[test]
    fn phone_accepts_digits_only() {
        assert!(Phone::new("6281234567890").is_some());
        assert!(Phone::new("+62812345").is_none());
        assert!(Phone::new("123").is_none());
    }

    #[test]
    fn guests_must_be_positive() {
        assert!(Guests::new(0).is_none());
        assert!(Guests::new(1).is_some());
        assert!(Guests::new(101).is_none());
    }
}
