//! Google implementation of the third-party identity provider.

use std::{collections::HashMap, time::Duration};

use common::operations::{By, Select};
use derive_more::{Display, Error as StdError, From};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        user::{IdToken, Name, Picture},
        subscriber, User,
    },
    infra,
};

#[cfg(doc)]
use crate::infra::Identity;

/// Issuers a Google ID token is accepted from.
const ISSUERS: [&str; 2] =
    ["https://accounts.google.com", "accounts.google.com"];

/// [`Google`] verifier configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// OAuth client ID the tokens must be issued for.
    pub client_id: String,

    /// URL of the JSON Web Key Set the token signatures are verified
    /// against.
    pub certs_url: String,

    /// Timeout of a single key set request.
    pub timeout: Duration,
}

/// Google [`Identity`] verifier.
///
/// Verifies sign-in credentials server-side: signature against the
/// published key set, audience, issuer and expiry. Claims of an unverified
/// token are never trusted.
#[derive(Clone, Debug)]
pub struct Google {
    /// Configuration of this verifier.
    config: Config,

    /// Underlying HTTP client.
    http: reqwest::Client,

    /// Cached key set, fetched on first use.
    keys: OnceCell<HashMap<String, Jwk>>,
}

impl Google {
    /// Creates a new [`Google`] verifier with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the HTTP client cannot be initialized.
    pub fn new(config: Config) -> Result<Self, Traced<infra::Error>> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        Ok(Self {
            config,
            http,
            keys: OnceCell::new(),
        })
    }

    /// Returns the cached key set, fetching it on first use.
    async fn keys(&self) -> Result<&HashMap<String, Jwk>, Traced<Error>> {
        self.keys
            .get_or_try_init(|| async {
                let url = &self.config.certs_url;
                log::debug!("Google request: GET `{url}`");

                let response = self
                    .http
                    .get(url)
                    .send()
                    .await
                    .map_err(tracerr::from_and_wrap!(=> Error))?;

                let status = response.status();
                log::debug!("Google response: {status} for `{url}`");

                let key_set = response
                    .error_for_status()
                    .map_err(tracerr::from_and_wrap!(=> Error))?
                    .json::<KeySet>()
                    .await
                    .map_err(tracerr::from_and_wrap!(=> Error))?;

                Ok(key_set
                    .keys
                    .into_iter()
                    .map(|key| (key.kid.clone(), key))
                    .collect())
            })
            .await
    }
}

impl infra::Identity<Select<By<User, IdToken>>> for Google {
    type Ok = User;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<User, IdToken>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();

        let header = jsonwebtoken::decode_header(token.as_ref())
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        let kid = header.kid.ok_or_else(|| {
            tracerr::new!(infra::Error::from(Error::UnknownKey))
        })?;

        let keys =
            self.keys().await.map_err(tracerr::map_from_and_wrap!())?;
        let key = keys.get(&kid).ok_or_else(|| {
            tracerr::new!(infra::Error::from(Error::UnknownKey))
        })?;
        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.config.client_id]);
        validation.set_issuer(&ISSUERS);

        let claims = jsonwebtoken::decode::<Profile>(
            token.as_ref(),
            &decoding_key,
            &validation,
        )
        .map_err(tracerr::from_and_wrap!(=> Error))
        .map_err(tracerr::map_from)?
        .claims;

        let email = subscriber::Email::new(claims.email)
            .ok_or_else(|| {
                tracerr::new!(infra::Error::from(Error::MalformedProfile))
            })?;
        let name = claims
            .name
            .and_then(Name::new)
            .or_else(|| {
                AsRef::<str>::as_ref(&email)
                    .split('@')
                    .next()
                    .and_then(Name::new)
            })
            .ok_or_else(|| {
                tracerr::new!(infra::Error::from(Error::MalformedProfile))
            })?;

        Ok(User {
            name,
            email,
            picture: claims.picture.map(Picture::new),
        })
    }
}

/// Identity claims of a verified Google ID token.
#[derive(Debug, Deserialize)]
struct Profile {
    /// Email address of the signed-in account.
    email: String,

    /// Display name of the signed-in account.
    #[serde(default)]
    name: Option<String>,

    /// Avatar URL of the signed-in account.
    #[serde(default)]
    picture: Option<String>,
}

/// Published JSON Web Key Set.
#[derive(Debug, Deserialize)]
struct KeySet {
    /// Keys of this set.
    keys: Vec<Jwk>,
}

/// Single published JSON Web Key.
#[derive(Clone, Debug, Deserialize)]
struct Jwk {
    /// Identifier of this key.
    kid: String,

    /// RSA modulus of this key.
    n: String,

    /// RSA exponent of this key.
    e: String,
}

/// Google identity [`Error`].
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// HTTP transport error, including timeouts.
    #[display("HTTP request failed: {_0}")]
    Http(reqwest::Error),

    /// Token verification failed.
    #[display("failed to verify the ID token: {_0}")]
    Jwt(jsonwebtoken::errors::Error),

    /// Token is signed with a key absent from the published set.
    #[display("ID token is signed with an unknown key")]
    UnknownKey,

    /// Verified token carries an unusable profile.
    #[display("verified ID token carries a malformed profile")]
    MalformedProfile,
}
