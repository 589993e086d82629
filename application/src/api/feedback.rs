//! [`Feedback`]-related definitions.
//!
//! [`Feedback`]: service::domain::Feedback

use derive_more::From;
use juniper::{graphql_object, GraphQLInputObject, GraphQLObject};
use service::{command, domain::feedback, read};

use crate::{api, AsError, Context, Error};

/// A single tour review.
#[derive(Clone, Debug, From)]
pub struct Review(read::feedback::Review);

/// A single tour review.
#[graphql_object(context = Context)]
impl Review {
    /// Unique numeric identifier of this `Review`.
    pub fn id(&self) -> i32 {
        self.0.id.into()
    }

    /// Stable string identifier of this `Review`.
    pub fn document_id(&self) -> String {
        self.0.document_id.to_string()
    }

    /// Display name of the reviewer.
    pub fn author(&self) -> &str {
        &self.0.author
    }

    /// Uppercase initial of the reviewer, shown when no avatar exists.
    pub fn initial(&self) -> String {
        self.0.initial.to_string()
    }

    /// Avatar background color class of the reviewer.
    pub fn avatar_color(&self) -> &str {
        self.0.avatar_color
    }

    /// Stars the reviewer gave, from 1 to 5.
    pub fn stars(&self) -> i32 {
        i32::from(self.0.stars.value())
    }

    /// Free-text comment of the reviewer.
    pub fn comment(&self) -> &str {
        &self.0.comment
    }

    /// Review date in `MM-DD-YYYY` format.
    pub fn date(&self) -> &str {
        &self.0.date
    }
}

/// Aggregated review statistics of a single tour.
#[derive(Clone, Copy, Debug, From)]
pub struct Stats(read::feedback::Stats);

/// Aggregated review statistics of a single tour.
#[graphql_object(context = Context)]
impl Stats {
    /// Total number of aggregated reviews.
    pub fn total(&self) -> i32 {
        i32::try_from(self.0.total).unwrap_or(i32::MAX)
    }

    /// Mean rating, rounded to one decimal place.
    ///
    /// Zero when nothing was aggregated.
    pub fn average_rating(&self) -> f64 {
        self.0.average_rating.as_f64()
    }

    /// Review counts per star value, in ascending star order.
    pub fn histogram(&self) -> Vec<HistogramBucket> {
        self.0
            .histogram
            .iter()
            .map(|(stars, count)| HistogramBucket {
                stars: i32::from(stars.value()),
                count: i32::try_from(count).unwrap_or(i32::MAX),
            })
            .collect()
    }
}

/// Review count of a single star value.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "StatsHistogramBucket")]
pub struct HistogramBucket {
    /// Star value of this bucket, from 1 to 5.
    pub stars: i32,

    /// Number of reviews with this star value.
    pub count: i32,
}

/// Selector of the tour a review-related operation is scoped by.
#[derive(Clone, Debug, GraphQLInputObject)]
pub struct TourSelector {
    /// Numeric identifier of the tour.
    pub id: Option<i32>,

    /// Stable string identifier of the tour.
    pub document_id: Option<String>,
}

impl TourSelector {
    /// Converts this [`TourSelector`] into a [`feedback::TourRef`],
    /// preferring the numeric identifier.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_INPUT` - neither identifier is provided, or the provided
    ///                     one is invalid.
    pub fn into_ref(self) -> Result<feedback::TourRef, Error> {
        use service::domain::tour;

        if let Some(id) = self.id {
            return Ok(feedback::TourRef::Id(tour::Id::from(id)));
        }
        self.document_id
            .and_then(tour::DocumentId::new)
            .map(feedback::TourRef::DocumentId)
            .ok_or_else(|| api::ValidationError::InvalidInput.into())
    }
}

impl AsError for command::create_feedback::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Cms(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_feedback::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Cms(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_feedback::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Cms(e) => e.try_as_error(),
        }
    }
}
