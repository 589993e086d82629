//! [`Command`] for subscribing to the newsletter.

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::subscriber,
    infra::{self, Mailer},
    Service,
};

#[cfg(feature = "email-octopus")]
use crate::infra::email_octopus;

use super::Command;

/// [`Command`] for subscribing an email address to the newsletter.
#[derive(Clone, Debug, From)]
pub struct SubscribeNewsletter {
    /// [`subscriber::Email`] to subscribe.
    pub email: subscriber::Email,
}

impl<C, M, I> Command<SubscribeNewsletter> for Service<C, M, I>
where
    M: Mailer<
        Insert<subscriber::Email>,
        Ok = (),
        Err = Traced<infra::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SubscribeNewsletter,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SubscribeNewsletter { email } = cmd;

        match self.mailer().execute(Insert(email)).await {
            Ok(()) => Ok(()),
            Err(e) => {
                #[cfg(feature = "email-octopus")]
                if matches!(
                    e.as_ref(),
                    infra::Error::EmailOctopus(
                        email_octopus::Error::AlreadySubscribed,
                    ),
                ) {
                    return Err(tracerr::new!(E::AlreadySubscribed));
                }
                Err(e).map_err(tracerr::map_from_and_wrap!(=> E))
            }
        }
    }
}

/// Error of [`SubscribeNewsletter`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Email address is already subscribed.
    #[display("email is already subscribed")]
    AlreadySubscribed,

    /// Mailing list provider operation failed.
    #[display("`Mailer` operation failed: {_0}")]
    Mailer(infra::Error),
}
