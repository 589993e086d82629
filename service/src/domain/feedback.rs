//! [`Feedback`] definitions.

use common::{unit, DateTimeOf, Stars};
#[cfg(doc)]
use common::DateTime;
use derive_more::{AsRef, Display, From, FromStr, Into};

use crate::domain::tour;

/// Single review of a [`Tour`]: a star rating with a free-text comment.
///
/// [`Tour`]: tour::Tour
#[derive(Clone, Debug)]
pub struct Feedback {
    /// ID of this [`Feedback`].
    pub id: Id,

    /// [`DocumentId`] of this [`Feedback`].
    pub document_id: DocumentId,

    /// Display name of the reviewer.
    pub author: Author,

    /// [`Stars`] the reviewer gave.
    pub stars: Stars,

    /// Free-text [`Comment`] of the reviewer.
    pub comment: Comment,

    /// [`DateTime`] when this [`Feedback`] was created.
    pub created_at: CreationDateTime,

    /// Reference to the [`Tour`] this [`Feedback`] is about, if any.
    ///
    /// [`Tour`]: tour::Tour
    pub tour: Option<TourRef>,
}

/// ID of a [`Feedback`].
#[derive(
    Clone, Copy, Debug, Display, Eq, From, FromStr, Hash, Into, PartialEq,
)]
pub struct Id(i32);

/// Stable string identifier of a [`Feedback`], assigned by the CMS.
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

/// Display name of a [`Feedback`] author.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(forward)]
pub struct Author(String);

impl Author {
    /// Creates a new [`Author`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Author`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 128
    }
}

impl FromStr for Author {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Author`")
    }
}

/// Free-text comment of a [`Feedback`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(forward)]
pub struct Comment(String);

impl Comment {
    /// Creates a new [`Comment`] if the given `comment` is valid.
    #[must_use]
    pub fn new(comment: impl Into<String>) -> Option<Self> {
        let comment = comment.into();
        Self::check(&comment).then_some(Self(comment))
    }

    /// Checks whether the given `comment` is a valid [`Comment`].
    fn check(comment: impl AsRef<str>) -> bool {
        let comment = comment.as_ref();
        !comment.trim().is_empty() && comment.len() <= 4096
    }
}

impl FromStr for Comment {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Comment`")
    }
}

/// Reference to the [`Tour`] a [`Feedback`] belongs to.
///
/// [`Tour`]: tour::Tour
#[derive(Clone, Debug, Eq, From, PartialEq)]
pub enum TourRef {
    /// Reference by the numeric [`tour::Id`].
    Id(tour::Id),

    /// Reference by the stable [`tour::DocumentId`].
    DocumentId(tour::DocumentId),
}

/// New [`Feedback`] to be submitted to the CMS.
#[derive(Clone, Debug)]
pub struct Draft {
    /// Display name of the reviewer.
    pub author: Author,

    /// [`Stars`] the reviewer gives.
    pub stars: Stars,

    /// Free-text [`Comment`] of the reviewer.
    pub comment: Comment,

    /// Reference to the [`Tour`] being reviewed, if any.
    ///
    /// [`Tour`]: tour::Tour
    pub tour: Option<TourRef>,
}

/// Partial update of an existing [`Feedback`].
#[derive(Clone, Debug)]
pub struct Change {
    /// [`DocumentId`] of the [`Feedback`] to update.
    pub document_id: DocumentId,

    /// New [`Stars`] value, if changed.
    pub stars: Option<Stars>,

    /// New [`Comment`], if changed.
    pub comment: Option<Comment>,
}

/// [`DateTime`] when a [`Feedback`] was created.
pub type CreationDateTime = DateTimeOf<(Feedback, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Author, Comment};

    #[test]
    fn author_rejects_blank_names() {
        assert!(Author::new("Putu").is_some());
        assert!(Author::new("").is_none());
        assert!(Author::new(" padded ").is_none());
    }

    #[test]
    fn comment_requires_content() {
        assert!(Comment::new("Great sunset views!").is_some());
        assert!(Comment::new("   ").is_none());
    }
}
