//! Infrastructure layer.

#[cfg(feature = "email-octopus")]
pub mod email_octopus;
#[cfg(feature = "google")]
pub mod google;
#[cfg(feature = "strapi")]
pub mod strapi;

use derive_more::{Display, Error as StdError, From};

/// Headless CMS the tour and feedback records live in.
pub use common::Handler as Cms;

/// Third-party identity provider verifying sign-in credentials.
pub use common::Handler as Identity;

/// Mailing list provider the newsletter subscriptions go to.
pub use common::Handler as Mailer;

#[cfg(feature = "email-octopus")]
pub use self::email_octopus::EmailOctopus;
#[cfg(feature = "google")]
pub use self::google::Google;
#[cfg(feature = "strapi")]
pub use self::strapi::Strapi;

/// Infrastructure error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "email-octopus")]
    /// [`EmailOctopus`] error.
    EmailOctopus(email_octopus::Error),

    #[cfg(feature = "google")]
    /// [`Google`] error.
    Google(google::Error),

    #[cfg(feature = "strapi")]
    /// [`Strapi`] error.
    Strapi(strapi::Error),
}
