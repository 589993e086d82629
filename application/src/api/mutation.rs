//! GraphQL [`Mutation`]s definitions.

use common::Stars;
use juniper::graphql_object;
use service::{
    command::{self, Command as _},
    domain::{feedback, user},
};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new session out of a third-party sign-in credential.
    ///
    /// The credential is verified server-side before any claimed identity
    /// is trusted.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_CREDENTIAL` - the provided credential cannot be verified.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createSession",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_session(
        id_token: String,
        ctx: &Context,
    ) -> Result<api::user::SessionPayload, Error> {
        let id_token = id_token
            .parse::<user::IdToken>()
            .map_err(|_| Error::from(SessionError::InvalidCredential))
            .map_err(ctx.error())?;

        let output = ctx
            .service()
            .execute(command::CreateUserSession { id_token })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        Ok(api::user::SessionPayload {
            token: output.token.to_string(),
            user: output.user.into(),
            expires_at: output.expires_at.coerce(),
        })
    }

    /// Submits a new `Review` of a tour.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_INPUT` - the provided name, stars, comment or tour
    ///                     selector is invalid;
    /// - `UPSTREAM_UNAVAILABLE` - the remote data source is unavailable.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createFeedback",
            otel.name = Self::SPAN_NAME,
            stars = %stars,
        ),
    )]
    pub async fn create_feedback(
        name: String,
        stars: i32,
        comment: String,
        tour: Option<api::feedback::TourSelector>,
        ctx: &Context,
    ) -> Result<api::Review, Error> {
        let author = feedback::Author::new(name)
            .ok_or_else(|| api::ValidationError::InvalidInput.into())
            .map_err(ctx.error())?;
        let stars = u8::try_from(stars)
            .ok()
            .and_then(Stars::new)
            .ok_or_else(|| api::ValidationError::InvalidInput.into())
            .map_err(ctx.error())?;
        let comment = feedback::Comment::new(comment)
            .ok_or_else(|| api::ValidationError::InvalidInput.into())
            .map_err(ctx.error())?;
        let tour = tour
            .map(api::feedback::TourSelector::into_ref)
            .transpose()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateFeedback {
                draft: feedback::Draft {
                    author,
                    stars,
                    comment,
                    tour,
                },
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|created| {
                service::read::feedback::Review::new(&created).into()
            })
    }

    /// Updates an existing `Review`, for moderation.
    ///
    /// Requires an authenticated session.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
    /// - `INVALID_INPUT` - the provided identifier, stars or comment is
    ///                     invalid;
    /// - `UPSTREAM_UNAVAILABLE` - the remote data source is unavailable.
    #[tracing::instrument(
        skip_all,
        fields(
            document_id = %document_id,
            gql.name = "updateFeedback",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_feedback(
        document_id: String,
        stars: Option<i32>,
        comment: Option<String>,
        ctx: &Context,
    ) -> Result<api::Review, Error> {
        drop(ctx.current_session().await?);

        let document_id = feedback::DocumentId::new(document_id)
            .ok_or_else(|| api::ValidationError::InvalidInput.into())
            .map_err(ctx.error())?;
        let stars = stars
            .map(|s| u8::try_from(s).ok().and_then(Stars::new))
            .map(|s| {
                s.ok_or_else(|| {
                    Error::from(api::ValidationError::InvalidInput)
                })
            })
            .transpose()
            .map_err(ctx.error())?;
        let comment = comment
            .map(|c| {
                feedback::Comment::new(c).ok_or_else(|| {
                    Error::from(api::ValidationError::InvalidInput)
                })
            })
            .transpose()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdateFeedback {
                change: feedback::Change {
                    document_id,
                    stars,
                    comment,
                },
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|updated| {
                service::read::feedback::Review::new(&updated).into()
            })
    }

    /// Deletes an existing `Review`, for moderation.
    ///
    /// Requires an authenticated session.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
    /// - `INVALID_INPUT` - the provided identifier is invalid;
    /// - `UPSTREAM_UNAVAILABLE` - the remote data source is unavailable.
    #[tracing::instrument(
        skip_all,
        fields(
            document_id = %document_id,
            gql.name = "deleteFeedback",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_feedback(
        document_id: String,
        ctx: &Context,
    ) -> Result<bool, Error> {
        drop(ctx.current_session().await?);

        let document_id = feedback::DocumentId::new(document_id)
            .ok_or_else(|| api::ValidationError::InvalidInput.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::DeleteFeedback { document_id })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Identity(_) => {
                Some(SessionError::InvalidCredential.into())
            }
            Self::JsonWebTokenEncodeError(_) => None,
        }
    }
}

define_error! {
    enum SessionError {
        #[code = "INVALID_CREDENTIAL"]
        #[status = UNAUTHORIZED]
        #[message = "Provided sign-in credential cannot be verified"]
        InvalidCredential,
    }
}
