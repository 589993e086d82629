//! GraphQL [`Query`]s definitions.

use common::Price;
use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Fetches the displayed list of `Tour`s.
    ///
    /// The list is fetched from the remote data source in the requested
    /// sort order and narrowed by the provided filters locally. When the
    /// remote fetch fails, a built-in fallback catalog is substituted, so
    /// this query always yields a usable listing.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_INPUT` - the provided price range is inverted.
    #[tracing::instrument(
        skip_all,
        fields(
            category = ?category,
            gql.name = "tours",
            location = ?location,
            otel.name = Self::SPAN_NAME,
            price_max = ?price_max,
            price_min = ?price_min,
            search = ?search,
            sort = ?sort,
        ),
    )]
    pub async fn tours(
        search: Option<String>,
        category: Option<String>,
        location: Option<String>,
        price_min: Option<Price>,
        price_max: Option<Price>,
        sort: Option<api::tour::Sort>,
        ctx: &Context,
    ) -> Result<Vec<api::Tour>, Error> {
        use service::domain::tour::Category;

        let price = read::tour::list::PriceRange::new(
            price_min.unwrap_or(Price::FREE),
            price_max
                .unwrap_or_else(|| Price::from_f64(1000.0).expect("valid")),
        )
        .ok_or_else(|| api::ValidationError::InvalidInput.into())
        .map_err(ctx.error())?;

        let filter = read::tour::list::Filter {
            search: search.unwrap_or_default(),
            category: category
                .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
                .and_then(Category::new),
            location: location
                .filter(|l| !l.is_empty() && !l.eq_ignore_ascii_case("all")),
            price,
        };

        let cards = ctx
            .service()
            .execute(query::tours::List {
                filter,
                sort: sort.map(Into::into),
            })
            .await
            .unwrap_or_else(|e| match e {});

        Ok(cards.into_iter().map(Into::into).collect())
    }

    /// Returns the `Tour` with the specified numeric identifier.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `TOUR_NOT_EXISTS` - the `Tour` with the specified identifier does
    ///                       not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "tour",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn tour(id: i32, ctx: &Context) -> Result<api::Tour, Error> {
        ctx.service()
            .execute(query::tour::ById::from(
                service::domain::tour::Id::from(id),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| TourError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Tour` with the specified document identifier.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_INPUT` - the provided document identifier is invalid;
    /// - `TOUR_NOT_EXISTS` - the `Tour` with the specified identifier does
    ///                       not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            document_id = %document_id,
            gql.name = "tourByDocumentId",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn tour_by_document_id(
        document_id: String,
        ctx: &Context,
    ) -> Result<api::Tour, Error> {
        let document_id =
            service::domain::tour::DocumentId::new(document_id)
                .ok_or_else(|| api::ValidationError::InvalidInput.into())
                .map_err(ctx.error())?;

        ctx.service()
            .execute(query::tour::ByDocumentId::from(document_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| TourError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the `Review`s of the specified tour, newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_INPUT` - the provided tour selector is invalid;
    /// - `UPSTREAM_UNAVAILABLE` - the remote data source is unavailable.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "feedbacks",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn feedbacks(
        tour: Option<api::feedback::TourSelector>,
        ctx: &Context,
    ) -> Result<Vec<api::Review>, Error> {
        let tour = tour
            .map(api::feedback::TourSelector::into_ref)
            .transpose()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::feedbacks::ForTour(tour))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|reviews| reviews.into_iter().map(Into::into).collect())
    }

    /// Returns the aggregated review statistics of the specified tour.
    ///
    /// A remote fetch failure yields zero statistics rather than an error,
    /// so the rating widget stays renderable.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_INPUT` - the provided tour selector is invalid.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "feedbackStats",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn feedback_stats(
        tour: Option<api::feedback::TourSelector>,
        ctx: &Context,
    ) -> Result<api::Stats, Error> {
        let tour = tour
            .map(api::feedback::TourSelector::into_ref)
            .transpose()
            .map_err(ctx.error())?;

        Ok(ctx
            .service()
            .execute(query::feedback_stats::ForTour(tour))
            .await
            .unwrap_or_else(|e| match e {})
            .into())
    }

    /// Returns the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        Ok(ctx.current_session().await?.user.into())
    }

    /// Returns the general messaging deep link of the tour operator.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "contactLink",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub fn contact_link(ctx: &Context) -> String {
        service::domain::Inquiry::general_deep_link(
            &ctx.service().config().booking.phone,
        )
        .to_string()
    }
}

define_error! {
    enum TourError {
        #[code = "TOUR_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Tour` with the specified identifier does not exist"]
        NotExists,
    }
}
