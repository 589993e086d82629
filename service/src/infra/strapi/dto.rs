//! Wire representation of the Strapi CMS records.

use common::{DateTime, Price, Stars};
use derive_more::{Display, Error as StdError};
use serde::{Deserialize, Serialize};

use crate::domain::{
    content, feedback,
    tour::{
        self, Category, FaqEntry, Features, ImportantNote, ItineraryEntry,
        Media, Note, NoteKind, Title,
    },
    Feedback, Tour,
};

/// Standard `{data}` envelope the CMS wraps both requests and responses in.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Envelope<T> {
    /// Payload of this [`Envelope`].
    pub data: T,
}

/// Raw [`Tour`] record, as served by the CMS.
#[derive(Clone, Debug, Deserialize)]
pub struct TourDto {
    /// Numeric primary key.
    pub id: i32,

    /// Stable string identifier.
    #[serde(rename = "documentId")]
    pub document_id: String,

    /// Title of the tour.
    #[serde(default)]
    pub title: Option<String>,

    /// Location of the tour.
    #[serde(default)]
    pub location: Option<String>,

    /// Price of the tour per person.
    #[serde(default)]
    pub price: Option<Price>,

    /// Full description text.
    #[serde(default)]
    pub description: Option<String>,

    /// Short introduction text.
    #[serde(default)]
    pub introduction_text: Option<String>,

    /// Label the tour is categorized with.
    #[serde(default)]
    pub post_label: Option<String>,

    /// Featured image media record.
    #[serde(default)]
    pub featured_image: Option<MediaDto>,

    /// Media gallery.
    #[serde(default)]
    pub gallery: Option<Vec<MediaDto>>,

    /// Amenity source collection.
    #[serde(default)]
    pub features_main: Option<Vec<FeatureDto>>,

    /// Rich-content tree of what the price includes.
    #[serde(default)]
    pub includes: Vec<NodeDto>,

    /// Rich-content tree of what to bring.
    #[serde(default)]
    pub what_to_bring: Vec<NodeDto>,

    /// Rich-content tree of additional information.
    #[serde(default)]
    pub additional_information: Vec<NodeDto>,

    /// Direct-URL image gallery, taking precedence over `gallery`.
    #[serde(default)]
    pub gallery_main: Option<Vec<DirectImageDto>>,

    /// Day-by-day itinerary entries.
    ///
    /// The CMS schema misspells the field name, so it's pinned here.
    #[serde(default, rename = "itenary")]
    pub itinerary: Option<Vec<ItineraryDto>>,

    /// Frequently asked questions.
    #[serde(default)]
    pub faq_main: Option<Vec<FaqDto>>,

    /// Typed notes.
    #[serde(default)]
    pub notes_main: Option<Vec<NoteDto>>,

    /// Highlighted note.
    #[serde(default)]
    pub main_important_notes: Option<ImportantNoteDto>,

    /// Creation timestamp.
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,

    /// Publication timestamp.
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<String>,
}

impl TryFrom<TourDto> for Tour {
    type Error = MalformedRecord;

    fn try_from(dto: TourDto) -> Result<Self, Self::Error> {
        use MalformedRecord as E;

        let id = tour::Id::from(dto.id);
        let document_id = tour::DocumentId::new(dto.document_id)
            .ok_or(E::InvalidDocumentId)?;

        let title = dto
            .title
            .map(|t| t.trim().to_owned())
            .and_then(Title::new)
            .ok_or(E::TourWithoutTitle(id))?;
        let location = dto
            .location
            .map(|l| l.trim().to_owned())
            .and_then(tour::Location::new)
            .ok_or(E::TourWithoutLocation(id))?;

        let features = dto.features_main.and_then(convert_features);

        Ok(Self {
            id,
            document_id,
            title,
            location,
            price: dto.price.unwrap_or(Price::FREE),
            description: dto.description.unwrap_or_default(),
            introduction: dto.introduction_text.unwrap_or_default(),
            label: dto.post_label.and_then(Category::new),
            features,
            includes: convert_nodes(dto.includes),
            what_to_bring: convert_nodes(dto.what_to_bring),
            additional_information: convert_nodes(
                dto.additional_information,
            ),
            direct_gallery: dto
                .gallery_main
                .unwrap_or_default()
                .into_iter()
                .map(|image| image.url)
                .collect(),
            media_gallery: dto
                .gallery
                .unwrap_or_default()
                .into_iter()
                .filter_map(MediaDto::into_media)
                .collect(),
            featured_image: dto
                .featured_image
                .and_then(MediaDto::into_media),
            itinerary: dto
                .itinerary
                .unwrap_or_default()
                .into_iter()
                .map(|entry| ItineraryEntry {
                    caption: entry.caption,
                })
                .collect(),
            faqs: dto
                .faq_main
                .unwrap_or_default()
                .into_iter()
                .map(|entry| FaqEntry {
                    caption: entry.caption,
                    description: entry.description,
                })
                .collect(),
            notes: dto
                .notes_main
                .unwrap_or_default()
                .into_iter()
                .filter_map(NoteDto::into_note)
                .collect(),
            important_note: dto.main_important_notes.map(|note| {
                ImportantNote {
                    caption: note.caption,
                    description: note.description,
                }
            }),
            created_at: parse_timestamp(dto.created_at.as_deref()).coerce(),
            published_at: dto
                .published_at
                .as_deref()
                .and_then(|ts| DateTime::from_rfc3339(ts).ok())
                .map(DateTime::coerce),
        })
    }
}

/// Raw media record.
#[derive(Clone, Debug, Deserialize)]
pub struct MediaDto {
    /// URL of the media, absolute or CMS-relative.
    #[serde(default)]
    pub url: Option<String>,

    /// Alternative text of the media.
    #[serde(default, rename = "alternativeText")]
    pub alternative_text: Option<String>,
}

impl MediaDto {
    /// Converts this [`MediaDto`] into a [`Media`], treating a missing or
    /// empty URL as an absent record.
    fn into_media(self) -> Option<Media> {
        let url = self.url.filter(|url| !url.trim().is_empty())?;
        Some(Media {
            url,
            alt: self.alternative_text,
        })
    }
}

/// Raw rich-content node.
#[derive(Clone, Debug, Deserialize)]
pub struct NodeDto {
    /// Kind tag of the node.
    #[serde(rename = "type")]
    pub kind: String,

    /// Contained text, for text leaves.
    #[serde(default)]
    pub text: Option<String>,

    /// Boldness flag, for text leaves.
    #[serde(default)]
    pub bold: Option<bool>,

    /// Nested child nodes.
    #[serde(default)]
    pub children: Option<Vec<NodeDto>>,
}

impl From<NodeDto> for content::Node {
    fn from(dto: NodeDto) -> Self {
        let children =
            || convert_nodes(dto.children.clone().unwrap_or_default());
        match dto.kind.as_str() {
            "paragraph" => Self::Paragraph {
                children: children(),
            },
            "list" => Self::List {
                children: children(),
            },
            "list-item" => Self::ListItem {
                children: children(),
            },
            "text" => Self::Text {
                text: dto.text.unwrap_or_default(),
                bold: dto.bold.unwrap_or_default(),
            },
            _ => Self::Other,
        }
    }
}

/// Converts raw nodes into domain rich-content [`Node`]s.
///
/// [`Node`]: content::Node
fn convert_nodes(nodes: Vec<NodeDto>) -> Vec<content::Node> {
    nodes.into_iter().map(Into::into).collect()
}

/// Raw amenity source entry: either a tagged `{features}` object or a
/// rich-content node.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum FeatureDto {
    /// Entry tagged with a plain amenity string.
    Tagged {
        /// Amenity string of this entry.
        features: String,
    },

    /// Rich-content node entry.
    Node(NodeDto),

    /// Entry of a shape this application doesn't interpret.
    Other(serde_json::Value),
}

/// Converts raw amenity source entries into [`Features`].
fn convert_features(entries: Vec<FeatureDto>) -> Option<Features> {
    if entries.is_empty() {
        return None;
    }

    let tagged = entries
        .iter()
        .filter_map(|entry| match entry {
            FeatureDto::Tagged { features } => Some(features.clone()),
            FeatureDto::Node(_) | FeatureDto::Other(_) => None,
        })
        .filter(|f| !f.trim().is_empty())
        .collect::<Vec<_>>();
    if !tagged.is_empty() {
        return Some(Features::Tagged(tagged));
    }

    let nodes = entries
        .into_iter()
        .filter_map(|entry| match entry {
            FeatureDto::Node(node) => Some(node.into()),
            FeatureDto::Tagged { .. } | FeatureDto::Other(_) => None,
        })
        .collect::<Vec<_>>();
    (!nodes.is_empty()).then_some(Features::Rich(nodes))
}

/// Raw direct-URL gallery entry.
#[derive(Clone, Debug, Deserialize)]
pub struct DirectImageDto {
    /// Direct image URL.
    pub url: String,
}

/// Raw itinerary entry.
#[derive(Clone, Debug, Deserialize)]
pub struct ItineraryDto {
    /// Caption of the entry.
    #[serde(default, rename = "itenary_caption")]
    pub caption: String,
}

/// Raw FAQ entry.
#[derive(Clone, Debug, Deserialize)]
pub struct FaqDto {
    /// Question of the entry.
    #[serde(default)]
    pub caption: String,

    /// Answer of the entry.
    #[serde(default, rename = "faq_desc")]
    pub description: String,
}

/// Raw note entry.
#[derive(Clone, Debug, Deserialize)]
pub struct NoteDto {
    /// Title of the note.
    #[serde(default)]
    pub title: String,

    /// Description of the note.
    #[serde(default, rename = "desc")]
    pub description: String,

    /// Kind tag of the note.
    #[serde(default)]
    pub notes_type: String,
}

impl NoteDto {
    /// Converts this [`NoteDto`] into a [`Note`], dropping entries of
    /// unknown kinds.
    fn into_note(self) -> Option<Note> {
        let kind = match self.notes_type.as_str() {
            "warning" => NoteKind::Warning,
            "calm" => NoteKind::Calm,
            "good" => NoteKind::Good,
            "emergency" => NoteKind::Emergency,
            "destroy" => NoteKind::Destroy,
            _ => return None,
        };
        Some(Note {
            title: self.title,
            description: self.description,
            kind,
        })
    }
}

/// Raw highlighted note.
#[derive(Clone, Debug, Deserialize)]
pub struct ImportantNoteDto {
    /// Caption of the note.
    #[serde(default)]
    pub caption: String,

    /// Description of the note.
    #[serde(default)]
    pub description: String,
}

/// Raw [`Feedback`] record, as served by the CMS.
#[derive(Clone, Debug, Deserialize)]
pub struct FeedbackDto {
    /// Numeric primary key.
    pub id: i32,

    /// Stable string identifier.
    #[serde(rename = "documentId")]
    pub document_id: String,

    /// Display name of the reviewer.
    #[serde(default)]
    pub name: Option<String>,

    /// Star rating the reviewer gave.
    #[serde(default)]
    pub rating_star: Option<i64>,

    /// Free-text comment of the reviewer.
    #[serde(default)]
    pub comment: Option<String>,

    /// Creation timestamp.
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,

    /// Back-reference to the reviewed tour, when populated.
    #[serde(default)]
    pub tour: Option<TourRefDto>,
}

impl TryFrom<FeedbackDto> for Feedback {
    type Error = MalformedRecord;

    fn try_from(dto: FeedbackDto) -> Result<Self, Self::Error> {
        use MalformedRecord as E;

        let id = feedback::Id::from(dto.id);
        let document_id = feedback::DocumentId::new(dto.document_id)
            .ok_or(E::InvalidDocumentId)?;

        let author = dto
            .name
            .map(|n| n.trim().to_owned())
            .and_then(feedback::Author::new)
            .ok_or(E::FeedbackWithoutAuthor(id))?;
        let stars = dto
            .rating_star
            .and_then(|s| u8::try_from(s).ok())
            .and_then(Stars::new)
            .ok_or(E::FeedbackWithInvalidStars(id))?;
        let comment = dto
            .comment
            .and_then(feedback::Comment::new)
            .ok_or(E::FeedbackWithoutComment(id))?;

        Ok(Self {
            id,
            document_id,
            author,
            stars,
            comment,
            created_at: parse_timestamp(dto.created_at.as_deref()).coerce(),
            tour: dto.tour.and_then(TourRefDto::into_ref),
        })
    }
}

/// Raw back-reference to a tour.
#[derive(Clone, Debug, Deserialize)]
pub struct TourRefDto {
    /// Numeric primary key of the tour.
    #[serde(default)]
    pub id: Option<i32>,

    /// Stable string identifier of the tour.
    #[serde(default, rename = "documentId")]
    pub document_id: Option<String>,
}

impl TourRefDto {
    /// Converts this [`TourRefDto`] into a [`feedback::TourRef`], preferring
    /// the numeric key.
    fn into_ref(self) -> Option<feedback::TourRef> {
        if let Some(id) = self.id {
            return Some(feedback::TourRef::Id(tour::Id::from(id)));
        }
        self.document_id
            .and_then(tour::DocumentId::new)
            .map(feedback::TourRef::DocumentId)
    }
}

/// Request body of a [`Feedback`] mutation.
#[derive(Clone, Debug, Serialize)]
pub struct FeedbackBody {
    /// Display name of the reviewer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Star rating the reviewer gives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_star: Option<u8>,

    /// Free-text comment of the reviewer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Reference to the reviewed tour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tour: Option<TourRefBody>,
}

impl From<&feedback::Draft> for FeedbackBody {
    fn from(draft: &feedback::Draft) -> Self {
        Self {
            name: Some(draft.author.to_string()),
            rating_star: Some(draft.stars.value()),
            comment: Some(draft.comment.to_string()),
            tour: draft.tour.as_ref().map(Into::into),
        }
    }
}

impl From<&feedback::Change> for FeedbackBody {
    fn from(change: &feedback::Change) -> Self {
        Self {
            name: None,
            rating_star: change.stars.map(|s| s.value()),
            comment: change.comment.as_ref().map(ToString::to_string),
            tour: None,
        }
    }
}

/// Request representation of a tour reference.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum TourRefBody {
    /// Reference by the numeric primary key.
    Id(i32),

    /// Reference by the stable string identifier.
    DocumentId(String),
}

impl From<&feedback::TourRef> for TourRefBody {
    fn from(tour: &feedback::TourRef) -> Self {
        match tour {
            feedback::TourRef::Id(id) => Self::Id((*id).into()),
            feedback::TourRef::DocumentId(document_id) => {
                Self::DocumentId(document_id.to_string())
            }
        }
    }
}

/// Parses an optional CMS timestamp, substituting the Unix epoch for
/// missing or unparseable values.
fn parse_timestamp(timestamp: Option<&str>) -> DateTime {
    timestamp
        .and_then(|ts| DateTime::from_rfc3339(ts).ok())
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Malformed CMS record error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum MalformedRecord {
    /// Record carries an invalid document ID.
    #[display("record carries an invalid document ID")]
    InvalidDocumentId,

    /// Tour record misses the required title.
    #[display("`Tour(id: {_0})` has no title")]
    TourWithoutTitle(#[error(not(source))] tour::Id),

    /// Tour record misses the required location.
    #[display("`Tour(id: {_0})` has no location")]
    TourWithoutLocation(#[error(not(source))] tour::Id),

    /// Feedback record misses the reviewer name.
    #[display("`Feedback(id: {_0})` has no author name")]
    FeedbackWithoutAuthor(#[error(not(source))] feedback::Id),

    /// Feedback record carries an out-of-range star rating.
    #[display("`Feedback(id: {_0})` has an out-of-range star rating")]
    FeedbackWithInvalidStars(#[error(not(source))] feedback::Id),

    /// Feedback record misses the comment.
    #[display("`Feedback(id: {_0})` has no comment")]
    FeedbackWithoutComment(#[error(not(source))] feedback::Id),
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::domain::{content, tour::Features, Feedback, Tour};

    use super::{Envelope, FeedbackDto, MalformedRecord, TourDto};

    fn tour_json() -> serde_json::Value {
        json!({
            "id": 7,
            "documentId": "abc123",
            "title": "Tanah Lot Temple",
            "location": "Tabanan, Bali",
            "price": 15.0,
            "description": "Ancient Hindu temple.",
            "introduction_text": "Famous for its sunset views.",
            "post_label": "Temple",
            "featured_image": { "url": "/uploads/tanah-lot.jpg" },
            "features_main": [
                { "id": 1, "features": "Free parking" },
                { "id": 2, "features": "Gift shop" },
            ],
            "includes": [{
                "type": "paragraph",
                "children": [{ "type": "text", "text": "Entrance fees" }],
            }],
            "notes_main": [
                {
                    "title": "Dress code",
                    "desc": "Sarong required.",
                    "notes_type": "warning",
                },
                {
                    "title": "Unknown",
                    "desc": "Dropped.",
                    "notes_type": "mystery",
                },
            ],
            "createdAt": "2024-05-01T10:30:00.000Z",
        })
    }

    #[test]
    fn decodes_and_converts_a_tour() {
        let envelope: Envelope<TourDto> =
            serde_json::from_value(json!({ "data": tour_json() })).unwrap();
        let tour = Tour::try_from(envelope.data).unwrap();

        assert_eq!(i32::from(tour.id), 7);
        assert_eq!(tour.title.to_string(), "Tanah Lot Temple");
        assert_eq!(tour.label.as_ref().unwrap().to_string(), "Temple");
        assert_eq!(
            tour.featured_image.unwrap().url,
            "/uploads/tanah-lot.jpg",
        );
        assert!(matches!(
            &tour.features,
            Some(Features::Tagged(features)) if features.len() == 2
        ));
        assert_eq!(tour.notes.len(), 1);
        assert_eq!(
            tour.includes,
            [content::Node::Paragraph {
                children: vec![content::Node::Text {
                    text: "Entrance fees".to_owned(),
                    bold: false,
                }],
            }],
        );
    }

    #[test]
    fn missing_title_is_a_malformed_record() {
        let mut value = tour_json();
        drop(value.as_object_mut().unwrap().remove("title"));

        let dto: TourDto = serde_json::from_value(value).unwrap();

        assert!(matches!(
            Tour::try_from(dto),
            Err(MalformedRecord::TourWithoutTitle(_)),
        ));
    }

    #[test]
    fn missing_location_is_a_malformed_record() {
        let mut value = tour_json();
        drop(value.as_object_mut().unwrap().remove("location"));

        let dto: TourDto = serde_json::from_value(value).unwrap();

        assert!(matches!(
            Tour::try_from(dto),
            Err(MalformedRecord::TourWithoutLocation(_)),
        ));
    }

    #[test]
    fn rich_features_fall_back_to_extraction_shape() {
        let mut value = tour_json();
        value["features_main"] = json!([{
            "type": "list",
            "children": [{
                "type": "list-item",
                "children": [{ "type": "text", "text": "Guided tour" }],
            }],
        }]);

        let dto: TourDto = serde_json::from_value(value).unwrap();
        let tour = Tour::try_from(dto).unwrap();

        assert!(matches!(&tour.features, Some(Features::Rich(_))));
    }

    #[test]
    fn decodes_and_converts_feedback() {
        let dto: FeedbackDto = serde_json::from_value(json!({
            "id": 3,
            "documentId": "fb-3",
            "name": "Putu Ayu",
            "rating_star": 5,
            "comment": "Wonderful sunset!",
            "createdAt": "2024-05-01T10:30:00.000Z",
            "tour": { "id": 7, "documentId": "abc123" },
        }))
        .unwrap();

        let feedback = Feedback::try_from(dto).unwrap();

        assert_eq!(feedback.stars.value(), 5);
        assert!(feedback.tour.is_some());
    }

    #[test]
    fn out_of_range_stars_are_a_malformed_record() {
        let dto: FeedbackDto = serde_json::from_value(json!({
            "id": 3,
            "documentId": "fb-3",
            "name": "Putu Ayu",
            "rating_star": 9,
            "comment": "Wonderful sunset!",
        }))
        .unwrap();

        assert!(matches!(
            Feedback::try_from(dto),
            Err(MalformedRecord::FeedbackWithInvalidStars(_)),
        ));
    }
}
