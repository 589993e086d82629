//! Strapi CMS implementation of the remote data source.

pub mod dto;

use std::time::Duration;

use common::operations::{By, Delete, Insert, Select, Update};
use derive_more::{Display, Error as StdError, From};
use reqwest::{header, StatusCode};
use secrecy::{ExposeSecret as _, SecretString};
use serde::de::DeserializeOwned;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{feedback, tour, Feedback, Tour},
    infra,
    read,
};

#[cfg(doc)]
use crate::infra::Cms;

/// [`Strapi`] client configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the CMS API, including the `/api` prefix.
    pub base_url: String,

    /// Bearer token authorizing the CMS requests.
    pub token: SecretString,

    /// Timeout of a single CMS request.
    pub timeout: Duration,
}

/// Strapi [`Cms`] client.
///
/// Thin HTTP wrapper: bearer-token auth, request/response logging and a
/// fixed timeout. Every operation is a single attempt, retrying is up to
/// the callers (which substitute fallback data instead, by design of the
/// upstream error handling).
#[derive(Clone, Debug)]
pub struct Strapi {
    /// Base URL of the CMS API.
    base_url: String,

    /// Underlying HTTP client.
    http: reqwest::Client,
}

impl Strapi {
    /// Creates a new [`Strapi`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the HTTP client cannot be initialized.
    pub fn new(config: &Config) -> Result<Self, Traced<infra::Error>> {
        let mut auth = header::HeaderValue::from_str(&format!(
            "Bearer {}",
            config.token.expose_secret(),
        ))
        .map_err(tracerr::from_and_wrap!(=> Error))
        .map_err(tracerr::map_from)?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        drop(headers.insert(header::AUTHORIZATION, auth));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            http,
        })
    }

    /// Performs a `GET` request to the provided `path`, decoding the
    /// response as `T`.
    ///
    /// [`None`] is returned for a `404 Not Found` response.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, Traced<Error>> {
        let url = format!("{}/{path}", self.base_url);
        log::debug!("Strapi request: GET `{url}`");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        let status = response.status();
        log::debug!("Strapi response: {status} for `{url}`");

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(tracerr::new!(Error::UnexpectedStatus(status)));
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(tracerr::from_and_wrap!(=> Error))
    }

    /// Performs a mutating request via the provided `method` to the given
    /// `path`, decoding the response as `T`.
    async fn send<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, Traced<Error>> {
        let url = format!("{}/{path}", self.base_url);
        log::debug!("Strapi request: {method} `{url}`");

        let response = self
            .http
            .request(method, &url)
            .json(body)
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        let status = response.status();
        log::debug!("Strapi response: {status} for `{url}`");

        if !status.is_success() {
            return Err(tracerr::new!(Error::UnexpectedStatus(status)));
        }

        response
            .json::<T>()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
    }
}

impl infra::Cms<Select<By<Vec<Tour>, read::tour::list::Fetch>>> for Strapi {
    type Ok = Vec<Tour>;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Tour>, read::tour::list::Fetch>>,
    ) -> Result<Self::Ok, Self::Err> {
        use read::tour::list::Sort;

        let fetch = by.into_inner();

        let mut query = vec![("populate", "*".to_owned())];
        if let Some(sort) = fetch.sort {
            let order = match sort {
                Sort::PriceAscending => "price:asc",
                Sort::PriceDescending => "price:desc",
            };
            query.push(("sort", order.to_owned()));
        }

        self.get::<dto::Envelope<Vec<dto::TourDto>>>("tours", &query)
            .await
            .map_err(tracerr::map_from_and_wrap!())?
            .map_or_else(Vec::new, |envelope| envelope.data)
            .into_iter()
            .map(|dto| {
                Tour::try_from(dto)
                    .map_err(tracerr::from_and_wrap!(=> Error))
                    .map_err(tracerr::map_from)
            })
            .collect()
    }
}

impl infra::Cms<Select<By<Option<Tour>, tour::Id>>> for Strapi {
    type Ok = Option<Tour>;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Tour>, tour::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.get::<dto::Envelope<dto::TourDto>>(
            &format!("tours/{id}"),
            &[("populate", "*".to_owned())],
        )
        .await
        .map_err(tracerr::map_from_and_wrap!())?
        .map(|envelope| {
            Tour::try_from(envelope.data)
                .map_err(tracerr::from_and_wrap!(=> Error))
                .map_err(tracerr::map_from)
        })
        .transpose()
    }
}

impl infra::Cms<Select<By<Option<Tour>, tour::DocumentId>>> for Strapi {
    type Ok = Option<Tour>;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Tour>, tour::DocumentId>>,
    ) -> Result<Self::Ok, Self::Err> {
        let document_id = by.into_inner();
        self.get::<dto::Envelope<dto::TourDto>>(
            &format!("tours/{document_id}"),
            &[("populate", "*".to_owned())],
        )
        .await
        .map_err(tracerr::map_from_and_wrap!())?
        .map(|envelope| {
            Tour::try_from(envelope.data)
                .map_err(tracerr::from_and_wrap!(=> Error))
                .map_err(tracerr::map_from)
        })
        .transpose()
    }
}

impl infra::Cms<Select<By<Vec<Feedback>, read::feedback::list::Fetch>>>
    for Strapi
{
    type Ok = Vec<Feedback>;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Feedback>, read::feedback::list::Fetch>>,
    ) -> Result<Self::Ok, Self::Err> {
        let fetch = by.into_inner();

        let mut query = vec![
            ("populate", "*".to_owned()),
            ("sort[0]", "createdAt:desc".to_owned()),
        ];
        match &fetch.tour {
            Some(feedback::TourRef::Id(id)) => {
                query.push(("filters[tour][id][$eq]", id.to_string()));
            }
            Some(feedback::TourRef::DocumentId(document_id)) => {
                query.push((
                    "filters[tour][documentId][$eq]",
                    document_id.to_string(),
                ));
            }
            None => {}
        }

        self.get::<dto::Envelope<Vec<dto::FeedbackDto>>>("feedbacks", &query)
            .await
            .map_err(tracerr::map_from_and_wrap!())?
            .map_or_else(Vec::new, |envelope| envelope.data)
            .into_iter()
            .map(|dto| {
                Feedback::try_from(dto)
                    .map_err(tracerr::from_and_wrap!(=> Error))
                    .map_err(tracerr::map_from)
            })
            .collect()
    }
}

impl infra::Cms<Insert<feedback::Draft>> for Strapi {
    type Ok = Feedback;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<feedback::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let body = dto::Envelope {
            data: dto::FeedbackBody::from(&draft),
        };
        let envelope = self
            .send::<dto::Envelope<dto::FeedbackDto>>(
                reqwest::Method::POST,
                "feedbacks",
                &body,
            )
            .await
            .map_err(tracerr::map_from_and_wrap!())?;

        Feedback::try_from(envelope.data)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

impl infra::Cms<Update<feedback::Change>> for Strapi {
    type Ok = Feedback;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Update(change): Update<feedback::Change>,
    ) -> Result<Self::Ok, Self::Err> {
        let body = dto::Envelope {
            data: dto::FeedbackBody::from(&change),
        };
        let envelope = self
            .send::<dto::Envelope<dto::FeedbackDto>>(
                reqwest::Method::PUT,
                &format!("feedbacks/{}", change.document_id),
                &body,
            )
            .await
            .map_err(tracerr::map_from_and_wrap!())?;

        Feedback::try_from(envelope.data)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

impl infra::Cms<Delete<By<Feedback, feedback::DocumentId>>> for Strapi {
    type Ok = ();
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Feedback, feedback::DocumentId>>,
    ) -> Result<Self::Ok, Self::Err> {
        let document_id = by.into_inner();
        let url = format!("{}/feedbacks/{document_id}", self.base_url);
        log::debug!("Strapi request: DELETE `{url}`");

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let status = response.status();
        log::debug!("Strapi response: {status} for `{url}`");

        if !status.is_success() {
            return Err(tracerr::new!(infra::Error::from(
                Error::UnexpectedStatus(status),
            )));
        }

        Ok(())
    }
}

/// Strapi CMS [`Error`].
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// HTTP transport error, including timeouts.
    #[display("HTTP request failed: {_0}")]
    Http(reqwest::Error),

    /// Malformed CMS record.
    #[display("malformed CMS record: {_0}")]
    MalformedRecord(dto::MalformedRecord),

    /// CMS answered with an unexpected HTTP status.
    #[display("unexpected HTTP status: {_0}")]
    UnexpectedStatus(#[error(not(source))] StatusCode),

    /// Configured bearer token cannot form a valid HTTP header.
    #[display("invalid bearer token: {_0}")]
    InvalidToken(header::InvalidHeaderValue),
}
