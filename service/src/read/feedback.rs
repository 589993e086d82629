//! [`Feedback`]-related read definitions.

use common::{Rating, Stars};
use rust_decimal::Decimal;

use crate::domain::{feedback, Feedback};

/// Avatar background palette, keyed deterministically by the author name.
const AVATAR_PALETTE: [&str; 10] = [
    "bg-red-500",
    "bg-blue-500",
    "bg-green-500",
    "bg-yellow-500",
    "bg-purple-500",
    "bg-pink-500",
    "bg-indigo-500",
    "bg-orange-500",
    "bg-teal-500",
    "bg-cyan-500",
];

/// Denormalized, UI-ready projection of a [`Feedback`].
#[derive(Clone, Debug)]
pub struct Review {
    /// ID of the projected [`Feedback`].
    pub id: feedback::Id,

    /// [`feedback::DocumentId`] of the projected [`Feedback`].
    pub document_id: feedback::DocumentId,

    /// Display name of the reviewer.
    pub author: String,

    /// Uppercase initial of the reviewer, shown when no avatar exists.
    pub initial: char,

    /// Avatar background color class of the reviewer.
    pub avatar_color: &'static str,

    /// [`Stars`] the reviewer gave.
    pub stars: Stars,

    /// Free-text comment of the reviewer.
    pub comment: String,

    /// Review date in `MM-DD-YYYY` format.
    pub date: String,
}

impl Review {
    /// Projects the given [`Feedback`] record into a [`Review`].
    #[must_use]
    pub fn new(feedback: &Feedback) -> Self {
        let author = feedback.author.to_string();
        let initial = author
            .chars()
            .next()
            .map_or('?', |c| c.to_ascii_uppercase());

        let iso = feedback.created_at.to_calendar_date();
        let parts = iso.split('-').collect::<Vec<_>>();
        let date = if let [year, month, day] = parts[..] {
            format!("{month}-{day}-{year}")
        } else {
            iso.clone()
        };

        Self {
            id: feedback.id,
            document_id: feedback.document_id.clone(),
            initial,
            avatar_color: avatar_color(&author),
            author,
            stars: feedback.stars,
            comment: feedback.comment.to_string(),
            date,
        }
    }
}

/// Picks the avatar background color for the given author `name`.
///
/// Same name always maps to the same palette entry.
fn avatar_color(name: &str) -> &'static str {
    let sum = name.chars().fold(0_usize, |acc, c| acc + c as usize);
    AVATAR_PALETTE[sum % AVATAR_PALETTE.len()]
}

/// Aggregated review statistics of a single [`Tour`].
///
/// The aggregation itself performs no filtering: callers scope the
/// [`Feedback`] collection by tour reference beforehand.
///
/// [`Tour`]: crate::domain::Tour
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Total number of aggregated [`Feedback`]s.
    pub total: u32,

    /// Mean [`Rating`], rounded to one decimal place.
    ///
    /// Zero when nothing was aggregated.
    pub average_rating: Rating,

    /// Per-star [`Histogram`] of the aggregated [`Feedback`]s.
    pub histogram: Histogram,
}

impl Stats {
    /// Aggregates the given [`Feedback`]s.
    #[must_use]
    pub fn of(feedbacks: &[Feedback]) -> Self {
        if feedbacks.is_empty() {
            return Self::default();
        }

        let mut histogram = Histogram::default();
        let mut sum = 0_u32;
        for feedback in feedbacks {
            histogram.bump(feedback.stars);
            sum += u32::from(feedback.stars.value());
        }

        let total = u32::try_from(feedbacks.len()).unwrap_or(u32::MAX);
        let average = Decimal::from(sum) / Decimal::from(total);

        Self {
            total,
            average_rating: Rating::saturating(average),
            histogram,
        }
    }
}

pub mod list {
    //! [`Feedback`] list definitions.

    use crate::domain::feedback::TourRef;
    #[cfg(doc)]
    use crate::domain::Feedback;

    /// Selector of a remote [`Feedback`] list fetch.
    ///
    /// Scoping by [`TourRef`] happens at the data source, so the local
    /// aggregation never has to filter.
    #[derive(Clone, Debug, Default)]
    pub struct Fetch {
        /// Reference of the tour to scope by, if any.
        pub tour: Option<TourRef>,
    }
}

/// Count of [`Feedback`]s per [`Stars`] value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Histogram([u32; 5]);

impl Histogram {
    /// Returns the count of [`Feedback`]s with the given [`Stars`] value.
    #[must_use]
    pub fn get(&self, stars: Stars) -> u32 {
        self.0[usize::from(stars.value() - 1)]
    }

    /// Iterates over all [`Stars`] paired with their counts, in ascending
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (Stars, u32)> + '_ {
        Stars::all().map(|s| (s, self.get(s)))
    }

    /// Returns the sum of all counts of this [`Histogram`].
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Increments the count of the given [`Stars`] value.
    fn bump(&mut self, stars: Stars) {
        self.0[usize::from(stars.value() - 1)] += 1;
    }
}

#[cfg(test)]
mod spec {
    use common::{Rating, Stars};

    use crate::domain::feedback::{
        Author, Comment, CreationDateTime, DocumentId, Feedback, Id,
    };

    use super::{Review, Stats};

    fn feedback(id: i32, stars: u8) -> Feedback {
        Feedback {
            id: Id::from(id),
            document_id: DocumentId::new(format!("doc-{id}")).unwrap(),
            author: Author::new("Putu Ayu").unwrap(),
            stars: Stars::new(stars).unwrap(),
            comment: Comment::new("Wonderful experience").unwrap(),
            created_at: CreationDateTime::from_rfc3339(
                "2024-05-01T10:30:00Z",
            )
            .unwrap(),
            tour: None,
        }
    }

    #[test]
    fn empty_aggregation_is_all_zero() {
        let stats = Stats::of(&[]);

        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_rating, Rating::default());
        assert!(stats.histogram.iter().all(|(_, count)| count == 0));
    }

    #[test]
    fn aggregates_mean_and_histogram() {
        let stats = Stats::of(&[feedback(1, 5), feedback(2, 3)]);

        assert_eq!(stats.total, 2);
        assert_eq!(
            stats.average_rating,
            Rating::new("4.0".parse().unwrap()).unwrap(),
        );
        assert_eq!(stats.histogram.get(Stars::new(5).unwrap()), 1);
        assert_eq!(stats.histogram.get(Stars::new(3).unwrap()), 1);
        assert_eq!(stats.histogram.get(Stars::new(1).unwrap()), 0);
    }

    #[test]
    fn histogram_counts_sum_to_total() {
        let feedbacks = [
            feedback(1, 5),
            feedback(2, 5),
            feedback(3, 4),
            feedback(4, 1),
            feedback(5, 3),
        ];

        let stats = Stats::of(&feedbacks);

        assert_eq!(stats.histogram.total(), stats.total);
    }

    #[test]
    fn mean_rounds_to_one_decimal() {
        let stats = Stats::of(&[feedback(1, 5), feedback(2, 5), feedback(3, 4)]);

        // 14 / 3 = 4.666... rounds to 4.7.
        assert_eq!(
            stats.average_rating,
            Rating::new("4.7".parse().unwrap()).unwrap(),
        );
    }

    #[test]
    fn review_projection_is_deterministic() {
        let a = Review::new(&feedback(1, 4));
        let b = Review::new(&feedback(1, 4));

        assert_eq!(a.initial, 'P');
        assert_eq!(a.avatar_color, b.avatar_color);
        assert_eq!(a.date, "05-01-2024");
    }
}
