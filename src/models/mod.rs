pub mod event;
pub mod report;
pub mod serde_helpers;

// Inbound event entities
pub use event::{
    AmbiguousSighting, Feeder, Identifiable, ImageMedia, Media, Postcard, PostcardSighting,
    RecognizedSighting, Sighting, SightingEvent, SightingReport, Species, Suggestion, VideoMedia,
    AMBIGUOUS_TYPENAME,
};

// Derived output entities
pub use report::{AutomationReport, SightedBird};
