//! [`Query`] collection related to the [`Feedback`] statistics.
//!
//! [`Feedback`]: crate::domain::Feedback

use std::convert::Infallible;

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{feedback, Feedback},
    infra::{self, Cms},
    read,
    Service,
};

use super::Query;

/// Queries the aggregated [`Stats`] of a single tour.
///
/// The [`Feedback`] collection is scoped by the tour reference at the data
/// source first, then aggregated locally. A fetch failure is answered with
/// zero [`Stats`] so the rating widget stays renderable — which is why this
/// [`Query`] never fails.
///
/// [`Feedback`]: crate::domain::Feedback
/// [`Stats`]: read::feedback::Stats
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
    type Ok = read::feedback::Stats;
    type Err = Infallible;

    async fn execute(
        &self,
        ForTour(tour): ForTour,
    ) -> Result<Self::Ok, Self::Err> {
        let fetched = self
            .cms()
            .execute(Select(By::new(read::feedback::list::Fetch { tour })))
            .await;

        Ok(match fetched {
            Ok(feedbacks) => read::feedback::Stats::of(&feedbacks),
            Err(e) => {
                log::warn!(
                    "failed to fetch feedback for aggregation, substituting \
                     zero statistics: {e}",
                );
                read::feedback::Stats::default()
            }
        })
    }
}
