//! [`Query`] collection related to a single [`Tour`].
//!
//! [`Tour`]: crate::domain::Tour

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{tour, Tour},
    infra::{self, Cms},
    read,
    Service,
};

use super::Query;

/// Queries a single [`Tour`] [`Card`] by its numeric [`tour::Id`].
///
/// An absent record is surfaced as [`None`] so the caller can render a
/// distinct not-found state: substituting an unrelated default record here
/// would mask genuine not-found conditions.
///
/// [`Card`]: read::tour::Card
/// [`Tour`]: crate::domain::Tour
#[derive(Clone, Copy, Debug, derive_more::From)]
pub struct ById(pub tour::Id);

impl<C, M, I> Query<ById> for Service<C, M, I>
where
    C: Cms<
        Select<By<Option<Tour>, tour::Id>>,
        Ok = Option<Tour>,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Option<read::tour::Card>;
    type Err = Traced<infra::Error>;

    async fn execute(&self, ById(id): ById) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .cms()
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::wrap!())?
            .map(|tour| read::tour::Card::new(&tour, &self.config().images)))
    }
}

/// Queries a single [`Tour`] [`Card`] by its [`tour::DocumentId`].
///
/// Follows the same not-found contract as [`ById`].
///
/// [`Card`]: read::tour::Card
/// [`Tour`]: crate::domain::Tour
#[derive(Clone, Debug, derive_more::From)]
pub struct ByDocumentId(pub tour::DocumentId);

impl<C, M, I> Query<ByDocumentId> for Service<C, M, I>
where
    C: Cms<
        Select<By<Option<Tour>, tour::DocumentId>>,
        Ok = Option<Tour>,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Option<read::tour::Card>;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        ByDocumentId(document_id): ByDocumentId,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .cms()
            .execute(Select(By::new(document_id)))
            .await
            .map_err(tracerr::wrap!())?
            .map(|tour| read::tour::Card::new(&tour, &self.config().images)))
    }
}
