//! [`User`] definitions.

use derive_more::{AsRef, Display, FromStr, Into};
use serde::{Deserialize, Serialize};

use crate::domain::subscriber::Email;

/// Visitor identified through the third-party sign-in widget.
///
/// The profile is taken from a verified identity token, never persisted
/// locally beyond the [`Session`] it is embedded into.
///
/// [`Session`]: session::Session
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    /// Display name of this [`User`].
    pub name: Name,

    /// [`Email`] of this [`User`].
    pub email: Email,

    /// Avatar [`Picture`] of this [`User`], if any.
    pub picture: Option<Picture>,
}

/// Display name of a [`User`].
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
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

impl TryFrom<String> for Name {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("invalid `Name`")
    }
}

/// Avatar picture URL of a [`User`].
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
#[serde(transparent)]
pub struct Picture(String);

impl Picture {
    /// Creates a new [`Picture`] from the given `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }
}

/// Opaque identity credential issued by the third-party sign-in widget.
///
/// Must never be trusted before server-side verification.
#[derive(AsRef, Clone, Debug, Display, FromStr)]
pub struct IdToken(String);

pub use session::Session;

pub mod session {
    //! [`Session`] definitions.

    #[cfg(doc)]
    use common::DateTime;
    use common::{unit, DateTimeOf};
    use derive_more::{AsRef, Display, FromStr};
    use serde::{Deserialize, Serialize};

    use super::User;

    /// Authenticated [`User`] session.
    ///
    /// Serialized form doubles as the JWT claims of a [`Token`].
    #[derive(Clone, Debug, Deserialize, Serialize)]
    pub struct Session {
        /// [`User`] this [`Session`] belongs to.
        pub user: User,

        /// [`DateTime`] when this [`Session`] expires.
        #[serde(
            rename = "exp",
            with = "common::datetime::serde::unix_timestamp"
        )]
        pub expires_at: ExpirationDateTime,
    }

    /// Access token of a [`Session`].
    #[derive(AsRef, Clone, Debug, Display, FromStr)]
    pub struct Token(String);

    impl Token {
        /// Creates a new [`Token`] without checking its contents.
        ///
        /// # Safety
        ///
        /// The provided `token` must be a valid [`Token`] representation.
        #[expect(unsafe_code, reason = "bypass")]
        #[must_use]
        pub const unsafe fn new_unchecked(token: String) -> Self {
            Self(token)
        }
    }

    /// [`DateTime`] of a [`Session`] expiration.
    pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;

    #[cfg(test)]
    mod spec {
        use std::time::Duration;

        use common::DateTime;
        use jsonwebtoken::{DecodingKey, EncodingKey, Validation};

        use crate::domain::{subscriber::Email, user::Name, User};

        use super::Session;

        fn user() -> User {
            User {
                name: Name::new("Putu Ayu").unwrap(),
                email: Email::new("putu@example.com").unwrap(),
                picture: None,
            }
        }

        #[test]
        fn roundtrips_through_a_token_before_expiry() {
            let session = Session {
                user: user(),
                expires_at: (DateTime::now()
                    + Duration::from_secs(30 * 24 * 60 * 60))
                .coerce(),
            };

            let token = jsonwebtoken::encode(
                &jsonwebtoken::Header::default(),
                &session,
                &EncodingKey::from_secret(b"secret"),
            )
            .unwrap();

            let decoded = jsonwebtoken::decode::<Session>(
                &token,
                &DecodingKey::from_secret(b"secret"),
                &Validation::default(),
            )
            .unwrap()
            .claims;

            assert_eq!(decoded.user, session.user);
        }

        #[test]
        fn expired_token_is_treated_as_absent() {
            let session = Session {
                user: user(),
                expires_at: (DateTime::now()
                    - Duration::from_secs(24 * 60 * 60))
                .coerce(),
            };

            let token = jsonwebtoken::encode(
                &jsonwebtoken::Header::default(),
                &session,
                &EncodingKey::from_secret(b"secret"),
            )
            .unwrap();

            assert!(jsonwebtoken::decode::<Session>(
                &token,
                &DecodingKey::from_secret(b"secret"),
                &Validation::default(),
            )
            .is_err());
        }
    }
}
