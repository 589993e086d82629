//! [`Command`] for updating an existing [`Feedback`].

use common::operations::Update;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{feedback, Feedback},
    infra::{self, Cms},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Feedback`], used for moderation.
#[derive(Clone, Debug, From)]
pub struct UpdateFeedback {
    /// [`feedback::Change`] to apply.
    pub change: feedback::Change,
}

impl<C, M, I> Command<UpdateFeedback> for Service<C, M, I>
where
    C: Cms<
        Update<feedback::Change>,
        Ok = Feedback,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Feedback;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateFeedback,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateFeedback { change } = cmd;

        self.cms()
            .execute(Update(change))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`UpdateFeedback`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// CMS operation failed.
    #[display("CMS operation failed: {_0}")]
    Cms(infra::Error),
}
