//! [`Query`] collection related to the multiple [`Tour`]s.
//!
//! [`Tour`]: crate::domain::Tour

use std::convert::Infallible;

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::Tour,
    infra::{self, Cms},
    read,
    Service,
};

use super::Query;

/// Queries the displayed list of [`Tour`] [`Card`]s.
///
/// The list is fetched from the CMS with the requested sort order, projected
/// into [`Card`]s and narrowed by the [`Filter`] locally. A fetch failure is
/// answered with the most recent snapshot (or the built-in catalog when none
/// exists yet), so the listing stays usable — which is why this [`Query`]
/// never fails.
///
/// [`Card`]: read::tour::Card
/// [`Filter`]: read::tour::list::Filter
/// [`Tour`]: crate::domain::Tour
#[derive(Clone, Debug, Default)]
pub struct List {
    /// [`Filter`] to narrow the fetched list with.
    ///
    /// [`Filter`]: read::tour::list::Filter
    pub filter: read::tour::list::Filter,

    /// [`Sort`] order the CMS is asked to return the list in.
    ///
    /// [`Sort`]: read::tour::list::Sort
    pub sort: Option<read::tour::list::Sort>,
}

impl<C, M, I> Query<List> for Service<C, M, I>
where
    C: Cms<
        Select<By<Vec<Tour>, read::tour::list::Fetch>>,
        Ok = Vec<Tour>,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Vec<read::tour::Card>;
    type Err = Infallible;

    async fn execute(&self, query: List) -> Result<Self::Ok, Self::Err> {
        let List { filter, sort } = query;

        let generation = self.tours().begin();
        let fetched = self
            .cms()
            .execute(Select(By::new(read::tour::list::Fetch { sort })))
            .await;

        let cards = match fetched {
            Ok(tours) => {
                let cards = tours
                    .iter()
                    .map(|tour| {
                        read::tour::Card::new(tour, &self.config().images)
                    })
                    .collect::<Vec<_>>();
                if !self.tours().store(generation, cards.clone()) {
                    log::debug!(
                        "discarding stale tour list fetch superseded by a \
                         newer one",
                    );
                }
                cards
            }
            Err(e) => {
                log::warn!(
                    "failed to fetch the tour list, substituting the \
                     fallback catalog: {e}",
                );
                self.tours()
                    .snapshot()
                    .map_or_else(read::tour::fallback::catalog, |snapshot| {
                        snapshot.as_ref().clone()
                    })
            }
        };

        Ok(filter.apply(&cards))
    }
}
