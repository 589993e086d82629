//! EmailOctopus implementation of the mailing list provider.

use std::time::Duration;

use common::operations::Insert;
use derive_more::{Display, Error as StdError, From};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use tracerr::Traced;
use tracing as log;

use crate::{domain::subscriber, infra};

#[cfg(doc)]
use crate::infra::Mailer;

/// Provider error code meaning the address is already on the list.
const MEMBER_EXISTS_CODE: &str = "MEMBER_EXISTS_WITH_EMAIL_ADDRESS";

/// [`EmailOctopus`] client configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the provider API.
    pub api_url: String,

    /// Server-held API key authorizing the requests.
    pub api_key: SecretString,

    /// Identifier of the mailing list to subscribe to.
    pub list_id: String,

    /// Timeout of a single provider request.
    pub timeout: Duration,
}

/// EmailOctopus [`Mailer`] client.
#[derive(Clone, Debug)]
pub struct EmailOctopus {
    /// Configuration of this client.
    config: Config,

    /// Underlying HTTP client.
    http: reqwest::Client,
}

impl EmailOctopus {
    /// Creates a new [`EmailOctopus`] client with the provided [`Config`].
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

        Ok(Self { config, http })
    }
}

impl infra::Mailer<Insert<subscriber::Email>> for EmailOctopus {
    type Ok = ();
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Insert(email): Insert<subscriber::Email>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = format!(
            "{}/lists/{}/contacts",
            self.config.api_url.trim_end_matches('/'),
            self.config.list_id,
        );
        log::debug!("EmailOctopus request: POST `{url}`");

        let response = self
            .http
            .post(&url)
            .json(&ContactBody {
                api_key: self.config.api_key.expose_secret(),
                email_address: email.as_ref(),
                status: "SUBSCRIBED",
            })
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let status = response.status();
        log::debug!("EmailOctopus response: {status} for `{url}`");

        if status.is_success() {
            return Ok(());
        }

        let failure = response
            .json::<FailureEnvelope>()
            .await
            .map(|envelope| envelope.error)
            .unwrap_or_default();
        if failure.code.as_deref() == Some(MEMBER_EXISTS_CODE) {
            return Err(tracerr::new!(infra::Error::from(
                Error::AlreadySubscribed,
            )));
        }

        Err(tracerr::new!(infra::Error::from(Error::Provider {
            status: status.as_u16(),
            message: failure
                .message
                .unwrap_or_else(|| "Failed to subscribe".to_owned()),
        })))
    }
}

/// Request body of a subscription.
#[derive(Debug, Serialize)]
struct ContactBody<'a> {
    /// API key authorizing the request.
    api_key: &'a str,

    /// Address being subscribed.
    email_address: &'a str,

    /// Requested membership status.
    status: &'static str,
}

/// Error envelope of a failed provider response.
#[derive(Debug, Default, Deserialize)]
struct FailureEnvelope {
    /// Failure description.
    #[serde(default)]
    error: Failure,
}

/// Failure description of a provider response.
#[derive(Debug, Default, Deserialize)]
struct Failure {
    /// Provider-specific error code.
    #[serde(default)]
    code: Option<String>,

    /// Human-readable failure message.
    #[serde(default)]
    message: Option<String>,
}

/// EmailOctopus [`Error`].
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Address is already subscribed to the list.
    #[display("email is already subscribed")]
    AlreadySubscribed,

    /// HTTP transport error, including timeouts.
    #[display("HTTP request failed: {_0}")]
    Http(reqwest::Error),

    /// Provider answered with a failure.
    #[display("provider rejected the subscription ({status}): {message}")]
    Provider {
        /// HTTP status of the failure.
        status: u16,

        /// Human-readable failure message.
        message: String,
    },
}
