//! [`Tour`]-related definitions.

use common::Price;
use derive_more::From;
use juniper::{graphql_object, GraphQLEnum, GraphQLObject};
use service::{domain, read};

use crate::{api, Context, Error};

/// A tour listing.
#[derive(Clone, Debug, From)]
pub struct Tour(read::tour::Card);

/// A tour listing.
#[graphql_object(context = Context)]
impl Tour {
    /// Unique numeric identifier of this `Tour`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Tour.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> i32 {
        self.0.id.into()
    }

    /// Stable string identifier of this `Tour`, used for record addressing.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Tour.documentId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn document_id(&self) -> String {
        self.0.document_id.to_string()
    }

    /// Display name of this `Tour`.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Location this `Tour` takes place at.
    pub fn location(&self) -> &str {
        &self.0.location
    }

    /// Category this `Tour` is displayed under.
    pub fn category(&self) -> String {
        self.0.category.to_string()
    }

    /// Price of this `Tour` per person.
    pub fn price(&self) -> Price {
        self.0.price
    }

    /// Derived rating of this `Tour`.
    pub fn rating(&self) -> f64 {
        self.0.rating.as_f64()
    }

    /// Derived review count of this `Tour`.
    pub fn review_count(&self) -> i32 {
        i32::try_from(self.0.review_count).unwrap_or(i32::MAX)
    }

    /// Ordered image URLs of this `Tour`, the first one being primary.
    pub fn images(&self) -> Vec<String> {
        self.0.images.clone()
    }

    /// Primary image URL of this `Tour`.
    pub fn image(&self) -> String {
        self.0.primary_image().to_owned()
    }

    /// Short description of this `Tour`.
    pub fn description(&self) -> &str {
        &self.0.description
    }

    /// Full description of this `Tour`.
    pub fn full_description(&self) -> &str {
        &self.0.full_description
    }

    /// Amenities of this `Tour`, at most 6 entries.
    pub fn amenities(&self) -> Vec<String> {
        self.0.amenities.clone()
    }

    /// Plain texts of what the `Tour` price includes.
    pub fn includes(&self) -> Vec<String> {
        self.0.includes.clone()
    }

    /// Plain texts of what to bring to this `Tour`.
    pub fn what_to_bring(&self) -> Vec<String> {
        self.0.what_to_bring.clone()
    }

    /// Plain texts with additional information about this `Tour`.
    pub fn additional_information(&self) -> Vec<String> {
        self.0.additional_information.clone()
    }

    /// Day-by-day itinerary of this `Tour`.
    pub fn itinerary(&self) -> Vec<ItineraryEntry> {
        self.0
            .itinerary
            .iter()
            .map(|entry| ItineraryEntry {
                caption: entry.caption.clone(),
            })
            .collect()
    }

    /// Frequently asked questions about this `Tour`.
    pub fn faqs(&self) -> Vec<FaqEntry> {
        self.0
            .faqs
            .iter()
            .map(|entry| FaqEntry {
                caption: entry.caption.clone(),
                description: entry.description.clone(),
            })
            .collect()
    }

    /// Notes a visitor of this `Tour` should be aware of.
    pub fn notes(&self) -> Vec<Note> {
        self.0
            .notes
            .iter()
            .map(|note| Note {
                title: note.title.clone(),
                description: note.description.clone(),
                kind: note.kind.into(),
            })
            .collect()
    }

    /// Highlighted note of this `Tour`, if any.
    pub fn important_note(&self) -> Option<ImportantNote> {
        self.0.important_note.as_ref().map(|note| ImportantNote {
            caption: note.caption.clone(),
            description: note.description.clone(),
        })
    }

    /// Messaging deep link carrying the booking details of this `Tour`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_INPUT` - the provided date or guest count is invalid.
    #[tracing::instrument(
        skip_all,
        fields(
            date = %date,
            gql.name = "Tour.inquiryLink",
            guests = %guests,
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn inquiry_link(
        &self,
        date: String,
        guests: i32,
        ctx: &Context,
    ) -> Result<String, Error> {
        use domain::inquiry;

        let date = inquiry::TravelDate::new(date)
            .ok_or_else(|| api::ValidationError::InvalidInput.into())
            .map_err(ctx.error())?;
        let guests = u32::try_from(guests)
            .ok()
            .and_then(inquiry::Guests::new)
            .ok_or_else(|| api::ValidationError::InvalidInput.into())
            .map_err(ctx.error())?;
        let tour = domain::tour::Title::new(self.0.name.clone())
            .ok_or_else(|| api::ValidationError::InvalidInput.into())
            .map_err(ctx.error())?;

        let inquiry = inquiry::Inquiry {
            tour,
            price: self.0.price,
            date,
            guests,
        };
        Ok(inquiry
            .deep_link(&ctx.service().config().booking.phone)
            .to_string())
    }
}

/// Day-by-day itinerary entry of a `Tour`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "TourItineraryEntry")]
pub struct ItineraryEntry {
    /// Caption of this entry.
    pub caption: String,
}

/// Frequently asked question about a `Tour`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "TourFaqEntry")]
pub struct FaqEntry {
    /// Question of this entry.
    pub caption: String,

    /// Answer of this entry.
    pub description: String,
}

/// Note a visitor of a `Tour` should be aware of.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "TourNote")]
pub struct Note {
    /// Title of this note.
    pub title: String,

    /// Description of this note.
    pub description: String,

    /// Kind of this note.
    pub kind: NoteKind,
}

/// Kind of a `TourNote`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "TourNoteKind")]
pub enum NoteKind {
    /// A warning the visitor must heed.
    Warning,

    /// A reassuring note.
    Calm,

    /// A positive note.
    Good,

    /// An emergency instruction.
    Emergency,

    /// A note about destructive behavior.
    Destroy,
}

impl From<domain::tour::NoteKind> for NoteKind {
    fn from(kind: domain::tour::NoteKind) -> Self {
        use domain::tour::NoteKind as K;
        match kind {
            K::Warning => Self::Warning,
            K::Calm => Self::Calm,
            K::Good => Self::Good,
            K::Emergency => Self::Emergency,
            K::Destroy => Self::Destroy,
        }
    }
}

/// Highlighted note of a `Tour`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "TourImportantNote")]
pub struct ImportantNote {
    /// Caption of this note.
    pub caption: String,

    /// Description of this note.
    pub description: String,
}

/// Order the remote data source returns `Tour`s in.
///
/// Changing the sort triggers a new fetch from the data source rather than
/// a local re-sort.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "TourSort")]
pub enum Sort {
    /// Cheapest `Tour`s first.
    PriceAscending,

    /// Most expensive `Tour`s first.
    PriceDescending,
}

impl From<Sort> for read::tour::list::Sort {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::PriceAscending => Self::PriceAscending,
            Sort::PriceDescending => Self::PriceDescending,
        }
    }
}
