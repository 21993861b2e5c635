use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Default type tag carried by ambiguous sightings
pub const AMBIGUOUS_TYPENAME: &str = "SightingCantDecideWhichBird";

// ===== TRAITS =====
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

// ===== LEAF ENTITIES =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Postcard {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feeder {
    pub id: Uuid,
    pub name: String,
    pub state: String,
}

/// A still image or video captured by the feeder.
///
/// Images and videos share this shape; only their position in the event tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: Uuid,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "thumbnailUrl")]
    pub thumbnail_url: Url,
    #[serde(alias = "contentUrl")]
    pub content_url: Url,
}

pub type ImageMedia = Media;
pub type VideoMedia = Media;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub id: Uuid,
    #[serde(alias = "iconUrl")]
    pub icon_url: Url,
    pub name: String,
    #[serde(alias = "isUnofficialName")]
    pub is_unofficial_name: bool,
    #[serde(alias = "mapUrl")]
    pub map_url: Url,
}

// ===== SIGHTINGS =====

/// A bird the identification service recognized with confidence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognizedSighting {
    pub id: Uuid,
    pub match_tokens: Vec<Uuid>,
    pub color: String,
    pub text: String,
    pub count: i64,
    pub icon: String,
    pub shareable_match_tokens: Vec<Uuid>,
    pub species: Species,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub is_collected: bool,
    pub species: Species,
    pub media: Option<ImageMedia>,
}

/// A sighting the identification service could not pin to a single species.
/// Suggestions are ordered best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbiguousSighting {
    pub id: Uuid,
    pub match_tokens: Vec<Uuid>,
    pub suggestions: Vec<Suggestion>,
    pub typename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Sighting {
    Recognized(RecognizedSighting),
    Ambiguous(AmbiguousSighting),
}

impl Sighting {
    pub fn match_tokens(&self) -> &[Uuid] {
        match self {
            Sighting::Recognized(s) => &s.match_tokens,
            Sighting::Ambiguous(s) => &s.match_tokens,
        }
    }

    /// True when `media` is evidence for this sighting
    pub fn matches(&self, media: &Media) -> bool {
        self.match_tokens().contains(&media.id)
    }

    /// The species this sighting is reported as.
    ///
    /// Ambiguous sightings take their first suggestion, whatever its `is_collected` flag.
    /// An ambiguous sighting without suggestions has no species.
    pub fn best_guess_species(&self) -> Option<&Species> {
        match self {
            Sighting::Recognized(s) => Some(&s.species),
            Sighting::Ambiguous(s) => s.suggestions.first().map(|suggestion| &suggestion.species),
        }
    }
}

// ===== AGGREGATES =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SightingReport {
    /// The signed token exactly as received
    pub report_token: String,
    /// JSON carried inside the token's `reportToken` claim
    pub identity: serde_json::Value,
    pub sightings: Vec<Sighting>,
}

/// Everything captured alongside a postcard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostcardSighting {
    pub feeder: Feeder,
    pub medias: Vec<ImageMedia>,
    pub sighting_report: SightingReport,
    pub video_media: VideoMedia,
}

/// Root of an inbound feeder event. Read-only once parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SightingEvent {
    pub postcard: Postcard,
    pub sighting: PostcardSighting,
}

impl SightingEvent {
    /// Content URLs of the event's images that evidence `sighting`, in event media order
    pub fn evidence_urls(&self, sighting: &Sighting) -> Vec<Url> {
        self.sighting
            .medias
            .iter()
            .filter(|media| sighting.matches(media))
            .map(|media| media.content_url.clone())
            .collect()
    }
}

impl Identifiable for Postcard {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Identifiable for Feeder {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Identifiable for Media {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Identifiable for Species {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Identifiable for Sighting {
    fn id(&self) -> Uuid {
        match self {
            Sighting::Recognized(s) => s.id,
            Sighting::Ambiguous(s) => s.id,
        }
    }
}
