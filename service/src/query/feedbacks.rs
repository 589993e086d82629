//! [`Query`] collection related to the multiple [`Feedback`]s.
//!
//! [`Feedback`]: crate::domain::Feedback

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{feedback, Feedback},
    infra::{self, Cms},
    read,
    Service,
};

use super::Query;

/// Queries the [`Review`]s of a single tour, newest first.
///
/// Scoping happens at the data source via the tour reference filter.
///
/// [`Review`]: read::feedback::Review
#[derive(Clone, Debug, Default, derive_more::From)]
pub struct ForTour(pub Option<feedback::TourRef>);

impl<C, M, I> Query<ForTour> for Service<C, M, I>
where
    C: Cms<
        Select<By<Vec<Feedback>, read::feedback::list::Fetch>>,
        Ok = Vec<Feedback>,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Vec<read::feedback::Review>;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        ForTour(tour): ForTour,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .cms()
            .execute(Select(By::new(read::feedback::list::Fetch { tour })))
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(read::feedback::Review::new)
            .collect())
    }
}
