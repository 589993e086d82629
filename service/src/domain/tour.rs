//! [`Tour`] definitions.

use common::{define_kind, unit, DateTimeOf, Price};
#[cfg(doc)]
use common::DateTime;
use derive_more::{AsRef, Display, From, FromStr, Into};

use crate::domain::content;

/// Bookable tour listing served by the CMS.
#[derive(Clone, Debug)]
pub struct Tour {
    /// ID of this [`Tour`].
    pub id: Id,

    /// [`DocumentId`] of this [`Tour`].
    pub document_id: DocumentId,

    /// [`Title`] of this [`Tour`].
    pub title: Title,

    /// [`Location`] this [`Tour`] takes place at.
    pub location: Location,

    /// [`Price`] of this [`Tour`] per person.
    pub price: Price,

    /// Full description of this [`Tour`].
    pub description: String,

    /// Short introduction text of this [`Tour`].
    pub introduction: String,

    /// Label this [`Tour`] is categorized with, if any.
    pub label: Option<Category>,

    /// Amenity source collection of this [`Tour`], if any.
    pub features: Option<Features>,

    /// Rich-content tree describing what the [`Tour`] price includes.
    pub includes: Vec<content::Node>,

    /// Rich-content tree describing what to bring to this [`Tour`].
    pub what_to_bring: Vec<content::Node>,

    /// Rich-content tree with additional information about this [`Tour`].
    pub additional_information: Vec<content::Node>,

    /// Direct image URLs of this [`Tour`], taking precedence over
    /// [`Tour::media_gallery`].
    pub direct_gallery: Vec<String>,

    /// [`Media`] gallery of this [`Tour`].
    pub media_gallery: Vec<Media>,

    /// Featured [`Media`] image of this [`Tour`], if any.
    pub featured_image: Option<Media>,

    /// Day-by-day [`ItineraryEntry`]s of this [`Tour`].
    pub itinerary: Vec<ItineraryEntry>,

    /// Frequently asked questions about this [`Tour`].
    pub faqs: Vec<FaqEntry>,

    /// [`Note`]s a visitor should be aware of.
    pub notes: Vec<Note>,

    /// Highlighted [`ImportantNote`] of this [`Tour`], if any.
    pub important_note: Option<ImportantNote>,

    /// [`DateTime`] when this [`Tour`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Tour`] was published, if it was.
    pub published_at: Option<PublicationDateTime>,
}

/// ID of a [`Tour`].
#[derive(
    Clone, Copy, Debug, Display, Eq, From, FromStr, Hash, Into, PartialEq,
)]
pub struct Id(i32);

/// Stable string identifier of a [`Tour`], assigned by the CMS and used for
/// record addressing alongside the numeric [`Id`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(forward)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new [`DocumentId`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        Self::check(&id).then_some(Self(id))
    }

    /// Checks whether the given `id` is a valid [`DocumentId`].
    fn check(id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        id.trim() == id && !id.is_empty() && id.len() <= 255
    }
}

impl FromStr for DocumentId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `DocumentId`")
    }
}

/// Title of a [`Tour`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(forward)]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 512
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Location a [`Tour`] takes place at.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(forward)]
pub struct Location(String);

impl Location {
    /// Creates a new [`Location`] if the given `location` is valid.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Option<Self> {
        let location = location.into();
        Self::check(&location).then_some(Self(location))
    }

    /// Checks whether the given `location` is a valid [`Location`].
    fn check(location: impl AsRef<str>) -> bool {
        let location = location.as_ref();
        location.trim() == location
            && !location.is_empty()
            && location.len() <= 512
    }
}

impl FromStr for Location {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Location`")
    }
}

/// Category a [`Tour`] is displayed under.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(forward)]
pub struct Category(String);

impl Category {
    /// Creates a new [`Category`] if the given `category` is non-empty.
    #[must_use]
    pub fn new(category: impl Into<String>) -> Option<Self> {
        let category = category.into();
        let trimmed = category.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Returns the [`Category`] used when a [`Tour`] carries no label.
    #[must_use]
    pub fn fallback() -> Self {
        Self("Tour Experience".to_owned())
    }
}

impl FromStr for Category {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Category`")
    }
}

/// Source collection the [`Tour`] amenities are derived from.
#[derive(Clone, Debug)]
pub enum Features {
    /// Entries tagged with a plain amenity string.
    Tagged(Vec<String>),

    /// Rich-content tree the amenities are extracted from.
    Rich(Vec<content::Node>),
}

/// Media record of a [`Tour`] image.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Media {
    /// URL of this [`Media`], either absolute or relative to the CMS origin.
    pub url: String,

    /// Alternative text of this [`Media`], if any.
    pub alt: Option<String>,
}

/// Single day entry of a [`Tour`] itinerary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ItineraryEntry {
    /// Caption of this [`ItineraryEntry`].
    pub caption: String,
}

/// Frequently asked question about a [`Tour`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FaqEntry {
    /// Question of this [`FaqEntry`].
    pub caption: String,

    /// Answer of this [`FaqEntry`].
    pub description: String,
}

/// Note a visitor of a [`Tour`] should be aware of.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Note {
    /// Title of this [`Note`].
    pub title: String,

    /// Description of this [`Note`].
    pub description: String,

    /// [`NoteKind`] of this [`Note`].
    pub kind: NoteKind,
}

/// Highlighted note of a [`Tour`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImportantNote {
    /// Caption of this [`ImportantNote`].
    pub caption: String,

    /// Description of this [`ImportantNote`].
    pub description: String,
}

define_kind! {
    #[doc = "Kind of a [`Note`]."]
    enum NoteKind {
        #[doc = "A warning the visitor must heed."]
        Warning = 1,

        #[doc = "A reassuring note."]
        Calm = 2,

        #[doc = "A positive note."]
        Good = 3,

        #[doc = "An emergency instruction."]
        Emergency = 4,

        #[doc = "A note about destructive behavior."]
        Destroy = 5,
    }
}

/// [`DateTime`] when a [`Tour`] was created.
pub type CreationDateTime = DateTimeOf<(Tour, unit::Creation)>;

/// [`DateTime`] when a [`Tour`] was published.
pub type PublicationDateTime = DateTimeOf<(Tour, unit::Publication)>;

#[cfg(test)]
mod spec {
    use super::{Category, DocumentId, Location, Title};

    #[test]
    fn title_rejects_blank_and_padded_input() {
        assert!(Title::new("Tanah Lot Temple").is_some());
        assert!(Title::new("").is_none());
        assert!(Title::new(" padded ").is_none());
    }

    #[test]
    fn location_rejects_blank_input() {
        assert!(Location::new("Nusa Dua, Bali").is_some());
        assert!(Location::new("").is_none());
    }

    #[test]
    fn document_id_rejects_blank_input() {
        assert!(DocumentId::new("abc123xyz").is_some());
        assert!(DocumentId::new("").is_none());
    }

    #[test]
    fn category_trims_and_falls_back() {
        assert_eq!(Category::new("  Temple ").unwrap().to_string(), "Temple");
        assert!(Category::new("   ").is_none());
        assert_eq!(Category::fallback().to_string(), "Tour Experience");
    }
}
