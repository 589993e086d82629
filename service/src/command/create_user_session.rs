//! [`Command`] for creating a [`Session`].
//!
//! [`Session`]: session::Session

use std::time::Duration;

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        user::{session, IdToken, Session},
        User,
    },
    infra::{self, Identity},
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`] out of a verified third-party
/// sign-in credential.
#[derive(Clone, Debug, From)]
pub struct CreateUserSession {
    /// [`IdToken`] to verify and build the [`Session`] from.
    pub id_token: IdToken,
}

impl CreateUserSession {
    /// [`Duration`] of [`Session`] expiration.
    ///
    /// A [`Session`] older than this is treated as absent.
    const EXPIRATION_DURATION: Duration =
        Duration::from_secs(30 * 24 * 60 * 60);
}

/// Output of [`CreateUserSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Token`] of the created [`Session`].
    ///
    /// [`Token`]: session::Token
    pub token: session::Token,

    /// [`User`] whose [`Session`] has been created.
    pub user: User,

    /// [`DateTime`] when the [`Session`] expires.
    pub expires_at: session::ExpirationDateTime,
}

impl<C, M, I> Command<CreateUserSession> for Service<C, M, I>
where
    I: Identity<
        Select<By<User, IdToken>>,
        Ok = User,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use CreateUserSession as Cmd;
        use ExecutionError as E;

        let Cmd { id_token } = cmd;

        let user = self
            .identity()
            .execute(Select(By::new(id_token)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let expires_at =
            (DateTime::now() + Cmd::EXPIRATION_DURATION).coerce();
        let token = jsonwebtoken::encode::<Session>(
            &jsonwebtoken::Header::default(),
            &Session {
                user: user.clone(),
                expires_at,
            },
            &self.config().jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `session::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        Ok(Output {
            token,
            user,
            expires_at,
        })
    }
}

/// Error of [`CreateUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Identity provider rejected the credential.
    #[display("`Identity` verification failed: {_0}")]
    Identity(infra::Error),

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),
}
