//! Application provides API for interacting with the [`Service`].

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

pub mod api;
pub mod args;
pub mod config;
mod context;
pub mod error;

use axum::{
    response::{IntoResponse, Response},
    Extension, Json,
};
use derive_more::Debug;
use juniper::{http::GraphQLBatchResponse, DefaultScalarValue, ScalarValue};
use juniper_axum::extract::JuniperRequest;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, subscribe_newsletter, Command as _},
    domain::subscriber,
};
use tracing as log;
// Used in binary.
use axum_client_ip as _;
use futures as _;
use jsonwebtoken as _;
use tower_http as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    context::{Context, Session},
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<
    service::infra::Strapi,
    service::infra::EmailOctopus,
    service::infra::Google,
>;

/// [`juniper`] GraphQL response.
#[derive(Debug)]
pub struct JuniperResponse<S = DefaultScalarValue>
where
    S: ScalarValue,
{
    /// Status code of the response.
    pub status_code: http::StatusCode,

    /// Underlying GraphQL response.
    #[debug(skip)]
    pub response: GraphQLBatchResponse<S>,
}

impl<S> IntoResponse for JuniperResponse<S>
where
    S: ScalarValue,
{
    fn into_response(self) -> Response {
        let Self {
            status_code,
            response,
        } = self;

        if response.is_ok() {
            Json(response).into_response()
        } else {
            (status_code, Json(response)).into_response()
        }
    }
}

/// GraphQL API handler.
pub async fn graphql(
    Extension(schema): Extension<std::sync::Arc<api::Schema>>,
    context: Context,
    JuniperRequest(gql_request): JuniperRequest,
) -> JuniperResponse {
    JuniperResponse {
        status_code: context.error_status_code(),
        response: gql_request.execute(&*schema, &context).await,
    }
}

/// Newsletter subscription request.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    /// Email address to subscribe.
    pub email: String,
}

/// Successful newsletter subscription response.
#[derive(Clone, Copy, Debug, Serialize)]
struct SubscribeSuccess {
    /// Indicator that the subscription succeeded.
    success: bool,

    /// User-facing message.
    message: &'static str,
}

/// Failed newsletter subscription response.
#[derive(Clone, Copy, Debug, Serialize)]
struct SubscribeFailure {
    /// User-facing error message.
    error: &'static str,
}

/// Newsletter subscription handler.
///
/// Validates the address, forwards it to the mailing list provider with
/// server-held credentials, and maps the provider's "member exists" failure
/// to a distinct user-facing message.
pub async fn subscribe(
    Extension(service): Extension<Service>,
    Json(request): Json<SubscribeRequest>,
) -> Response {
    use subscribe_newsletter::ExecutionError as E;

    let Some(email) = subscriber::Email::new(request.email) else {
        return (
            http::StatusCode::BAD_REQUEST,
            Json(SubscribeFailure {
                error: "Invalid email address",
            }),
        )
            .into_response();
    };

    match service
        .execute(command::SubscribeNewsletter { email })
        .await
    {
        Ok(()) => (
            http::StatusCode::OK,
            Json(SubscribeSuccess {
                success: true,
                message: "Successfully subscribed!",
            }),
        )
            .into_response(),
        Err(e) => match e.as_ref() {
            E::AlreadySubscribed => (
                http::StatusCode::BAD_REQUEST,
                Json(SubscribeFailure {
                    error: "This email is already subscribed!",
                }),
            )
                .into_response(),
            E::Mailer(_) => {
                log::error!("newsletter subscription failed: {e}");
                (
                    http::StatusCode::BAD_GATEWAY,
                    Json(SubscribeFailure {
                        error: "Failed to subscribe",
                    }),
                )
                    .into_response()
            }
        },
    }
}
