//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use common::operations::{By, Start};
use derive_more::{Debug, Error};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] encoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_encoding_key: jsonwebtoken::EncodingKey,

    /// [JWT] decoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// Image resolution configuration.
    pub images: read::tour::Images,

    /// Booking inquiry configuration.
    pub booking: domain::inquiry::Config,

    /// [`task::RefreshTours`] configuration.
    pub refresh_tours: task::refresh_tours::Config,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<C, M, I> {
    /// Configuration of this [`Service`].
    config: Config,

    /// CMS client of this [`Service`].
    cms: C,

    /// Mailing list client of this [`Service`].
    mailer: M,

    /// Identity verifier of this [`Service`].
    identity: I,

    /// Shared tour list snapshot of this [`Service`].
    tours: read::tour::list::Cache,
}

impl<C, M, I> Service<C, M, I> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(
        config: Config,
        cms: C,
        mailer: M,
        identity: I,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<task::RefreshTours<Self>, task::refresh_tours::Config>,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            cms,
            mailer,
            identity,
            tours: read::tour::list::Cache::default(),
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().refresh_tours))).await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the CMS client of this [`Service`].
    #[must_use]
    pub fn cms(&self) -> &C {
        &self.cms
    }

    /// Returns the mailing list client of this [`Service`].
    #[must_use]
    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Returns the identity verifier of this [`Service`].
    #[must_use]
    pub fn identity(&self) -> &I {
        &self.identity
    }

    /// Returns the shared tour list snapshot of this [`Service`].
    #[must_use]
    pub fn tours(&self) -> &read::tour::list::Cache {
        &self.tours
    }
}
