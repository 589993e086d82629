//! [`Tour`]-related read definitions.

use common::{Price, Rating};
use rust_decimal::Decimal;
use xxhash_rust::xxh3;

#[cfg(doc)]
use crate::domain::Tour;
use crate::domain::{
    content,
    tour::{
        self, Category, FaqEntry, Features, ImportantNote, ItineraryEntry,
        Media, Note,
    },
};

/// Category-keyed fallback image table used when a [`Tour`] carries no media
/// at all.
const FALLBACK_IMAGES: &[(&str, &str)] = &[
    (
        "best seller",
        "https://images.unsplash.com/photo-1566073771259-6a8506099945?w=400&h=300&fit=crop",
    ),
    (
        "hotel",
        "https://images.unsplash.com/photo-1571003123894-1f0594d2b5d9?w=400&h=300&fit=crop",
    ),
    (
        "resort",
        "https://images.unsplash.com/photo-1571896349842-33c89424de2d?w=400&h=300&fit=crop",
    ),
    (
        "temple",
        "https://images.unsplash.com/photo-1537953773345-d172ccf13cf1?w=400&h=300&fit=crop",
    ),
    (
        "beach",
        "https://images.unsplash.com/photo-1559827260-dc66d52bef19?w=400&h=300&fit=crop",
    ),
    (
        "tour",
        "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=400&h=300&fit=crop",
    ),
    (
        "spa",
        "https://images.unsplash.com/photo-1544161515-4ab6ce6db874?w=400&h=300&fit=crop",
    ),
];

/// Fallback image URL for categories absent from [`FALLBACK_IMAGES`].
const DEFAULT_IMAGE: &str =
    "https://images.unsplash.com/photo-1552733407-5d5c46c3bb3b?w=400&h=300&fit=crop";

/// Amenities substituted when a [`Tour`] record yields none.
const DEFAULT_AMENITIES: [&str; 3] =
    ["Professional Guide", "Transportation", "Entrance Fees"];

/// Maximum number of amenities a [`Card`] carries.
const MAX_AMENITIES: usize = 6;

/// Image resolution configuration.
#[derive(Clone, Debug)]
pub struct Images {
    /// Origin prepended to CMS-relative media URLs.
    pub origin: String,
}

impl Images {
    /// Resolves the URL of the given `media`, falling back to the
    /// category-keyed table when the `media` is absent.
    ///
    /// Absolute URLs pass through unchanged, `/`-relative ones get the CMS
    /// origin prepended.
    #[must_use]
    pub fn resolve(&self, media: Option<&Media>, category: &Category) -> String {
        match media {
            Some(media) if media.url.starts_with('/') => {
                format!("{}{}", self.origin.trim_end_matches('/'), media.url)
            }
            Some(media) => media.url.clone(),
            None => fallback_image(category).to_owned(),
        }
    }
}

/// Returns the fallback image URL for the given `category`.
fn fallback_image(category: &Category) -> &'static str {
    let key = category.to_string().to_lowercase();
    FALLBACK_IMAGES
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(DEFAULT_IMAGE, |&(_, url)| url)
}

/// Denormalized, UI-ready projection of a [`Tour`].
#[derive(Clone, Debug)]
pub struct Card {
    /// ID of the projected [`Tour`].
    pub id: tour::Id,

    /// [`tour::DocumentId`] of the projected [`Tour`].
    pub document_id: tour::DocumentId,

    /// Display name of the [`Tour`].
    pub name: String,

    /// Location of the [`Tour`].
    pub location: String,

    /// [`Category`] the [`Tour`] is displayed under.
    pub category: Category,

    /// [`Price`] of the [`Tour`] per person.
    pub price: Price,

    /// Derived [`Rating`] of the [`Tour`].
    pub rating: Rating,

    /// Derived review count of the [`Tour`].
    pub review_count: u32,

    /// Ordered image URLs of the [`Tour`], the first one being primary.
    pub images: Vec<String>,

    /// Short description shown on the [`Card`].
    pub description: String,

    /// Full description shown on the detail page.
    pub full_description: String,

    /// Amenity list of the [`Tour`], at most [`MAX_AMENITIES`] entries.
    pub amenities: Vec<String>,

    /// Plain texts extracted from the includes rich-content tree.
    pub includes: Vec<String>,

    /// Plain texts extracted from the what-to-bring rich-content tree.
    pub what_to_bring: Vec<String>,

    /// Plain texts extracted from the additional information rich-content
    /// tree.
    pub additional_information: Vec<String>,

    /// Day-by-day [`ItineraryEntry`]s of the [`Tour`].
    pub itinerary: Vec<ItineraryEntry>,

    /// Frequently asked questions about the [`Tour`].
    pub faqs: Vec<FaqEntry>,

    /// [`Note`]s of the [`Tour`].
    pub notes: Vec<Note>,

    /// Highlighted [`ImportantNote`] of the [`Tour`], if any.
    pub important_note: Option<ImportantNote>,
}

impl Card {
    /// Projects the given [`Tour`] record into a [`Card`].
    ///
    /// The projection is a pure function of the record: the derived rating
    /// and review count are seeded by a hash of the [`tour::DocumentId`], so
    /// repeated projections of the same record always agree.
    #[must_use]
    pub fn new(tour: &tour::Tour, images: &Images) -> Self {
        let category = tour
            .label
            .clone()
            .unwrap_or_else(Category::fallback);

        let image_urls = resolve_images(tour, &category, images);
        let amenities = resolve_amenities(tour);

        let seed = xxh3::xxh3_64(tour.document_id.as_ref());
        let rating = synthesize_rating(tour.price, seed);
        let review_count = synthesize_review_count(rating, seed);

        let description = if tour.introduction.trim().is_empty() {
            tour.description.clone()
        } else {
            tour.introduction.clone()
        };

        Self {
            id: tour.id,
            document_id: tour.document_id.clone(),
            name: tour.title.to_string(),
            location: tour.location.to_string(),
            category,
            price: tour.price,
            rating,
            review_count,
            images: image_urls,
            description,
            full_description: tour.description.clone(),
            amenities,
            includes: content::extract_texts(&tour.includes),
            what_to_bring: content::extract_texts(&tour.what_to_bring),
            additional_information: content::extract_texts(
                &tour.additional_information,
            ),
            itinerary: tour.itinerary.clone(),
            faqs: tour.faqs.clone(),
            notes: tour.notes.clone(),
            important_note: tour.important_note.clone(),
        }
    }

    /// Returns the primary image URL of this [`Card`].
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or(DEFAULT_IMAGE, String::as_str)
    }
}

/// Resolves the ordered image URL list of the given `tour`.
///
/// Priority: direct-URL gallery, then media gallery, then the featured
/// image, then the category fallback.
fn resolve_images(
    tour: &tour::Tour,
    category: &Category,
    images: &Images,
) -> Vec<String> {
    if !tour.direct_gallery.is_empty() {
        return tour.direct_gallery.clone();
    }
    if !tour.media_gallery.is_empty() {
        return tour
            .media_gallery
            .iter()
            .map(|m| images.resolve(Some(m), category))
            .collect();
    }
    vec![images.resolve(tour.featured_image.as_ref(), category)]
}

/// Resolves the amenity list of the given `tour`.
///
/// Tagged feature entries map directly, rich-content features run the
/// extractor, and an absent features collection falls back to extracting
/// from the includes tree. The result is capped at [`MAX_AMENITIES`] and
/// substituted with [`DEFAULT_AMENITIES`] when empty.
fn resolve_amenities(tour: &tour::Tour) -> Vec<String> {
    let mut amenities = match &tour.features {
        Some(Features::Tagged(features)) => features.clone(),
        Some(Features::Rich(nodes)) => content::extract_texts(nodes),
        None => content::extract_texts(&tour.includes),
    };
    amenities.truncate(MAX_AMENITIES);
    if amenities.is_empty() {
        amenities = DEFAULT_AMENITIES.map(str::to_owned).into();
    }
    amenities
}

/// Derives the displayed [`Rating`] from the `price` and the hash `seed`.
///
/// The base grows with the price and saturates at 4.9, the seed contributes
/// an increment within `[0, 0.3)`.
fn synthesize_rating(price: Price, seed: u64) -> Rating {
    let base = (Decimal::new(42, 1) + price.amount() / Decimal::from(200))
        .min(Decimal::new(49, 1));
    let jitter = Decimal::from(seed % 300) / Decimal::from(1000);
    Rating::saturating(base + jitter)
}

/// Derives the displayed review count from the `rating` and the hash `seed`.
fn synthesize_review_count(rating: Rating, seed: u64) -> u32 {
    use rust_decimal::prelude::ToPrimitive as _;

    let from_rating = (rating.value() * Decimal::from(500))
        .floor()
        .to_u32()
        .unwrap_or_default();
    let jitter = u32::try_from((seed >> 32) % 2000).expect("fits into `u32`");
    1000 + from_rating + jitter
}

pub mod list {
    //! [`Tour`] list definitions.
    //!
    //! [`Tour`]: crate::domain::Tour

    use std::sync::{Arc, Mutex};

    use common::Price;
    use smart_default::SmartDefault;

    use crate::domain::tour::Category;

    use super::Card;

    /// Client-side filter applied to a fetched [`Card`] list.
    ///
    /// All predicates are pure and independent, so their application order
    /// doesn't affect the result. The default filter passes every [`Card`]
    /// through.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// Text to search for in names, locations and descriptions.
        pub search: String,

        /// [`Category`] to select, if narrowed.
        pub category: Option<Category>,

        /// Location token to select, if narrowed.
        pub location: Option<String>,

        /// Inclusive [`PriceRange`] to select within.
        pub price: PriceRange,
    }

    impl Filter {
        /// Checks whether the given [`Card`] passes this [`Filter`].
        #[must_use]
        pub fn matches(&self, card: &Card) -> bool {
            self.matches_search(card)
                && self
                    .category
                    .as_ref()
                    .map_or(true, |c| card.category == *c)
                && self.location.as_ref().map_or(true, |l| {
                    card.location
                        .to_lowercase()
                        .contains(&l.to_lowercase())
                })
                && self.price.contains(card.price)
        }

        /// Applies this [`Filter`] to the given [`Card`]s.
        #[must_use]
        pub fn apply(&self, cards: &[Card]) -> Vec<Card> {
            cards
                .iter()
                .filter(|c| self.matches(c))
                .cloned()
                .collect()
        }

        /// Checks the search predicate: a [`Card`] passes if any of its
        /// name, location or description contains the searched text,
        /// case-insensitively.
        fn matches_search(&self, card: &Card) -> bool {
            let needle = self.search.trim().to_lowercase();
            if needle.is_empty() {
                return true;
            }
            card.name.to_lowercase().contains(&needle)
                || card.location.to_lowercase().contains(&needle)
                || card.description.to_lowercase().contains(&needle)
        }
    }

    /// Inclusive price range of a [`Filter`].
    #[derive(Clone, Copy, Debug, SmartDefault)]
    pub struct PriceRange {
        /// Minimum [`Price`] to pass.
        min: Price,

        /// Maximum [`Price`] to pass.
        #[default(_code = "Price::from_f64(1000.0).expect(\"non-negative\")")]
        max: Price,
    }

    impl PriceRange {
        /// Creates a new [`PriceRange`] if `min` doesn't exceed `max`.
        #[must_use]
        pub fn new(min: Price, max: Price) -> Option<Self> {
            (min <= max).then_some(Self { min, max })
        }

        /// Checks whether the given `price` lies within this [`PriceRange`].
        #[must_use]
        pub fn contains(&self, price: Price) -> bool {
            self.min <= price && price <= self.max
        }
    }

    /// Order the remote data source is asked to return [`Card`]s in.
    ///
    /// Sorting is delegated to the data source as a request parameter:
    /// changing it means issuing a new fetch, never re-sorting locally.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum Sort {
        /// Cheapest [`Card`]s first.
        PriceAscending,

        /// Most expensive [`Card`]s first.
        PriceDescending,
    }

    /// Selector of a remote [`Card`] list fetch.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Fetch {
        /// Requested [`Sort`] order, if any.
        pub sort: Option<Sort>,
    }

    /// Generation ticket of a [`Cache`] refresh.
    ///
    /// Taken before the fetch is issued, so that a slow stale response can
    /// be told apart from a fresher one.
    #[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
    pub struct Generation(u64);

    /// Shared snapshot of the most recently fetched [`Card`] list.
    #[derive(Clone, Debug, Default)]
    pub struct Cache {
        /// State shared between all clones of this [`Cache`].
        state: Arc<Mutex<State>>,
    }

    /// Inner state of a [`Cache`].
    #[derive(Debug, Default)]
    struct State {
        /// Next [`Generation`] to hand out.
        next: u64,

        /// [`Generation`] of the applied snapshot, if any.
        applied: Option<u64>,

        /// Applied snapshot, if any.
        cards: Option<Arc<Vec<Card>>>,
    }

    impl Cache {
        /// Takes a new [`Generation`] ticket for an upcoming fetch.
        #[expect(clippy::missing_panics_doc, reason = "infallible")]
        #[must_use]
        pub fn begin(&self) -> Generation {
            let mut state = self.state.lock().expect("non-poisoned");
            state.next += 1;
            Generation(state.next)
        }

        /// Stores the given `cards` as the snapshot of the provided
        /// `generation`.
        ///
        /// Returns `false` without touching the snapshot if a newer
        /// generation has already been applied, which happens when responses
        /// arrive out of order.
        #[expect(clippy::missing_panics_doc, reason = "infallible")]
        pub fn store(&self, generation: Generation, cards: Vec<Card>) -> bool {
            let mut state = self.state.lock().expect("non-poisoned");
            if state.applied.is_some_and(|applied| applied > generation.0) {
                return false;
            }
            state.applied = Some(generation.0);
            state.cards = Some(Arc::new(cards));
            true
        }

        /// Returns the most recently applied snapshot, if any.
        #[expect(clippy::missing_panics_doc, reason = "infallible")]
        #[must_use]
        pub fn snapshot(&self) -> Option<Arc<Vec<Card>>> {
            self.state.lock().expect("non-poisoned").cards.clone()
        }
    }
}

pub mod fallback {
    //! Built-in destination catalog substituted when the remote list fetch
    //! fails, so the page stays usable offline.

    use common::{Price, Rating};
    use rust_decimal::Decimal;

    use crate::domain::tour::{Category, DocumentId, Id, Title, Location};

    use super::Card;

    /// Single [`fallback`](self) destination blueprint.
    struct Blueprint {
        id: i32,
        document_id: &'static str,
        name: &'static str,
        location: &'static str,
        rating: &'static str,
        reviews: u32,
        price: f64,
        image: &'static str,
        category: &'static str,
        description: &'static str,
        amenities: [&'static str; 4],
    }

    /// Blueprints of the built-in destinations.
    const CATALOG: [Blueprint; 6] = [
        Blueprint {
            id: 1,
            document_id: "fallback-ritz-carlton-bali",
            name: "The Ritz-Carlton, Bali",
            location: "Nusa Dua, Bali",
            rating: "4.8",
            reviews: 2847,
            price: 450.0,
            image: "https://images.unsplash.com/photo-1566073771259-6a8506099945?w=400&h=300&fit=crop",
            category: "Luxury Hotel",
            description: "Experience ultimate luxury at this clifftop resort \
                          with stunning ocean views and world-class \
                          amenities.",
            amenities: ["Pool", "Spa", "Restaurant", "Beach Access"],
        },
        Blueprint {
            id: 2,
            document_id: "fallback-tanah-lot-temple",
            name: "Tanah Lot Temple",
            location: "Tabanan, Bali",
            rating: "4.6",
            reviews: 5432,
            price: 15.0,
            image: "https://images.unsplash.com/photo-1537953773345-d172ccf13cf1?w=400&h=300&fit=crop",
            category: "Temple",
            description: "Ancient Hindu temple perched on a rock formation, \
                          famous for its sunset views.",
            amenities: ["Parking", "Gift Shop", "Restaurant", "Photography"],
        },
        Blueprint {
            id: 3,
            document_id: "fallback-ubud-monkey-forest",
            name: "Ubud Monkey Forest Sanctuary",
            location: "Ubud, Bali",
            rating: "4.3",
            reviews: 3921,
            price: 8.0,
            image: "https://images.unsplash.com/photo-1582662167791-74d9b17e7210?w=400&h=300&fit=crop",
            category: "Nature Reserve",
            description: "Sacred sanctuary home to hundreds of long-tailed \
                          macaques in their natural habitat.",
            amenities: [
                "Guided Tours",
                "Walking Trails",
                "Gift Shop",
                "Educational Center",
            ],
        },
        Blueprint {
            id: 4,
            document_id: "fallback-kuta-beach",
            name: "Kuta Beach",
            location: "Kuta, Bali",
            rating: "4.2",
            reviews: 8765,
            price: 0.0,
            image: "https://images.unsplash.com/photo-1559827260-dc66d52bef19?w=400&h=300&fit=crop",
            category: "Beach",
            description: "Popular beach destination known for surfing, \
                          golden sand, and vibrant nightlife.",
            amenities: ["Surfing", "Beach Clubs", "Restaurants", "Shopping"],
        },
        Blueprint {
            id: 5,
            document_id: "fallback-tegallalang-terraces",
            name: "Tegallalang Rice Terraces",
            location: "Ubud, Bali",
            rating: "4.7",
            reviews: 2156,
            price: 10.0,
            image: "https://images.unsplash.com/photo-1552733407-5d5c46c3bb3b?w=400&h=300&fit=crop",
            category: "Cultural Site",
            description: "Spectacular terraced rice fields offering \
                          breathtaking views and traditional Balinese \
                          agriculture.",
            amenities: ["Photography", "Cafe", "Swing", "Walking Trails"],
        },
        Blueprint {
            id: 6,
            document_id: "fallback-four-seasons-sayan",
            name: "Four Seasons Resort Bali at Sayan",
            location: "Ubud, Bali",
            rating: "4.9",
            reviews: 1432,
            price: 650.0,
            image: "https://images.unsplash.com/photo-1571896349842-33c89424de2d?w=400&h=300&fit=crop",
            category: "Luxury Resort",
            description: "Jungle luxury resort surrounded by tropical \
                          rainforest with award-winning spa.",
            amenities: ["Spa", "Infinity Pool", "Yoga", "Fine Dining"],
        },
    ];

    /// Returns the built-in destination catalog.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn catalog() -> Vec<Card> {
        CATALOG
            .iter()
            .map(|b| Card {
                id: Id::from(b.id),
                document_id: DocumentId::new(b.document_id)
                    .expect("valid blueprint"),
                name: Title::new(b.name).expect("valid blueprint").into(),
                location: Location::new(b.location)
                    .expect("valid blueprint")
                    .into(),
                category: Category::new(b.category)
                    .expect("valid blueprint"),
                price: Price::from_f64(b.price).expect("valid blueprint"),
                rating: Rating::new(
                    b.rating.parse::<Decimal>().expect("valid blueprint"),
                )
                .expect("valid blueprint"),
                review_count: b.reviews,
                images: vec![b.image.to_owned()],
                description: b.description.to_owned(),
                full_description: b.description.to_owned(),
                amenities: b.amenities.map(str::to_owned).into(),
                includes: Vec::new(),
                what_to_bring: Vec::new(),
                additional_information: Vec::new(),
                itinerary: Vec::new(),
                faqs: Vec::new(),
                notes: Vec::new(),
                important_note: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod spec {
    use common::Price;

    use crate::domain::tour::{Category, Media};

    use super::{
        fallback,
        list::{Cache, Filter, PriceRange},
        synthesize_rating, synthesize_review_count, Images,
    };

    fn images() -> Images {
        Images {
            origin: "http://host:1337".to_owned(),
        }
    }

    #[test]
    fn resolver_prepends_origin_to_relative_urls() {
        let media = Media {
            url: "/uploads/x.jpg".to_owned(),
            alt: None,
        };

        assert_eq!(
            images().resolve(Some(&media), &Category::fallback()),
            "http://host:1337/uploads/x.jpg",
        );
    }

    #[test]
    fn resolver_passes_absolute_urls_through() {
        let media = Media {
            url: "https://cdn.example.com/x.jpg".to_owned(),
            alt: None,
        };

        assert_eq!(
            images().resolve(Some(&media), &Category::fallback()),
            "https://cdn.example.com/x.jpg",
        );
    }

    #[test]
    fn resolver_falls_back_by_category() {
        let temple = images()
            .resolve(None, &Category::new("Temple").unwrap());
        assert!(temple.contains("photo-1537953773345"));

        let unknown = images()
            .resolve(None, &Category::new("Submarine").unwrap());
        assert!(unknown.contains("photo-1552733407"));
    }

    #[test]
    fn rating_synthesis_is_deterministic() {
        let price = Price::from_f64(450.0).unwrap();

        let a = synthesize_rating(price, 42);
        let b = synthesize_rating(price, 42);
        assert_eq!(a, b);

        // Base is min(4.2 + 450/200, 4.9) = 4.9, jitter stays below 0.3.
        assert!(a.as_f64() >= 4.9);
        assert!(a.as_f64() <= 5.0);
    }

    #[test]
    fn review_count_synthesis_is_deterministic() {
        let rating = synthesize_rating(Price::FREE, 7);

        let a = synthesize_review_count(rating, 7);
        let b = synthesize_review_count(rating, 7);
        assert_eq!(a, b);
        assert!(a >= 1000);
    }

    #[test]
    fn default_filter_is_identity() {
        let cards = fallback::catalog();

        let filtered = Filter::default().apply(&cards);

        assert_eq!(filtered.len(), cards.len());
        assert!(filtered
            .iter()
            .zip(&cards)
            .all(|(a, b)| a.id == b.id));
    }

    #[test]
    fn search_is_case_insensitive() {
        let cards = fallback::catalog();

        let filter = Filter {
            search: "BALI".to_owned(),
            ..Filter::default()
        };

        // Every built-in destination is located in Bali.
        assert_eq!(filter.apply(&cards).len(), cards.len());
    }

    #[test]
    fn category_filter_selects_exact_matches() {
        let cards = fallback::catalog();

        let filter = Filter {
            category: Some(Category::new("Temple").unwrap()),
            ..Filter::default()
        };
        let filtered = filter.apply(&cards);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Tanah Lot Temple");
    }

    #[test]
    fn price_range_is_inclusive() {
        let cards = fallback::catalog();

        let filter = Filter {
            price: PriceRange::new(
                Price::from_f64(15.0).unwrap(),
                Price::from_f64(450.0).unwrap(),
            )
            .unwrap(),
            ..Filter::default()
        };
        let filtered = filter.apply(&cards);

        assert!(filtered.iter().any(|c| c.name == "Tanah Lot Temple"));
        assert!(filtered
            .iter()
            .any(|c| c.name == "The Ritz-Carlton, Bali"));
        assert!(!filtered.iter().any(|c| c.name == "Kuta Beach"));
    }

    #[test]
    fn price_range_requires_ordered_bounds() {
        assert!(PriceRange::new(
            Price::from_f64(100.0).unwrap(),
            Price::from_f64(10.0).unwrap(),
        )
        .is_none());
    }

    #[test]
    fn cache_discards_stale_generations() {
        let cache = Cache::default();

        let older = cache.begin();
        let newer = cache.begin();

        assert!(cache.store(newer, fallback::catalog()));
        assert!(!cache.store(older, Vec::new()));

        let snapshot = cache.snapshot().unwrap();
        assert_eq!(snapshot.len(), 6);
    }
}
