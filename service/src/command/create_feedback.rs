//! [`Command`] for submitting a new [`Feedback`].

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{feedback, Feedback},
    infra::{self, Cms},
    Service,
};

use super::Command;

/// [`Command`] for submitting a new [`Feedback`].
#[derive(Clone, Debug, From)]
pub struct CreateFeedback {
    /// [`feedback::Draft`] to submit.
    pub draft: feedback::Draft,
}

impl<C, M, I> Command<CreateFeedback> for Service<C, M, I>
where
    C: Cms<
        Insert<feedback::Draft>,
        Ok = Feedback,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Feedback;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateFeedback,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateFeedback { draft } = cmd;

        self.cms()
            .execute(Insert(draft))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`CreateFeedback`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// CMS operation failed.
    #[display("CMS operation failed: {_0}")]
    Cms(infra::Error),
}
