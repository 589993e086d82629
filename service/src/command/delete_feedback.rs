//! [`Command`] for deleting a [`Feedback`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{feedback, Feedback},
    infra::{self, Cms},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Feedback`], used for moderation.
#[derive(Clone, Debug, From)]
pub struct DeleteFeedback {
    /// [`feedback::DocumentId`] of the [`Feedback`] to delete.
    pub document_id: feedback::DocumentId,
}

impl<C, M, I> Command<DeleteFeedback> for Service<C, M, I>
where
    C: Cms<
        Delete<By<Feedback, feedback::DocumentId>>,
        Ok = (),
        Err = Traced<infra::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteFeedback,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteFeedback { document_id } = cmd;

        self.cms()
            .execute(Delete(By::new(document_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`DeleteFeedback`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// CMS operation failed.
    #[display("CMS operation failed: {_0}")]
    Cms(infra::Error),
}
