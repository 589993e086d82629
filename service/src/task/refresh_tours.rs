//! [`RefreshTours`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Perform, Select, Start};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::Tour,
    infra::{self, Cms},
    read,
    Service,
};

use super::Task;

/// Configuration for [`RefreshTours`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between tour list refreshes.
    pub interval: time::Duration,
}

/// [`Task`] keeping the shared tour list snapshot warm.
///
/// Each refresh takes a generation ticket before the fetch is issued, so a
/// slow stale response never clobbers a fresher snapshot when responses
/// arrive out of order. A failed refresh is logged and skipped, leaving the
/// previous snapshot in place.
#[derive(Clone, Debug)]
pub struct RefreshTours<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<C, M, I> Task<Start<By<RefreshTours<Self>, Config>>>
    for Service<C, M, I>
where
    RefreshTours<Service<C, M, I>>:
        Task<Perform<()>, Ok = (), Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<RefreshTours<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = RefreshTours {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::warn!("`task::RefreshTours` failed: {e}");
            });
        }
    }
}

impl<C, M, I> Task<Perform<()>> for RefreshTours<Service<C, M, I>>
where
    C: Cms<
        Select<By<Vec<Tour>, read::tour::list::Fetch>>,
        Ok = Vec<Tour>,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let generation = self.service.tours().begin();

        let tours = self
            .service
            .cms()
            .execute(Select(By::new(read::tour::list::Fetch::default())))
            .await
            .map_err(tracerr::map_from_and_wrap!())?;

        let cards = tours
            .iter()
            .map(|tour| {
                read::tour::Card::new(tour, &self.service.config().images)
            })
            .collect();
        if !self.service.tours().store(generation, cards) {
            log::debug!(
                "discarding stale tour list refresh superseded by a newer \
                 one",
            );
        }

        Ok(())
    }
}

/// Error of [`RefreshTours`] execution.
pub type ExecutionError = Traced<infra::Error>;
