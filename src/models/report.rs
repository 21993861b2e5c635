use serde::{Deserialize, Serialize};
use url::Url;

use super::event::{Feeder, Species, VideoMedia};
use super::serde_helpers::deserialize_url_list;

/// A bird as it appears in the automation report, with the media that shows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SightedBird {
    pub species: Species,
    #[serde(default, deserialize_with = "deserialize_url_list")]
    pub image_urls: Vec<Url>,
    pub video_media: VideoMedia,
}

impl SightedBird {
    pub fn new(species: Species, image_urls: Vec<Url>, video_media: VideoMedia) -> Self {
        Self {
            species,
            image_urls,
            video_media,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationReport {
    pub feeder: Feeder,
    #[serde(default)]
    pub birds_sighted: Vec<SightedBird>,
}

impl AutomationReport {
    /// Creates an empty report for `feeder`
    pub fn new(feeder: Feeder) -> Self {
        Self {
            feeder,
            birds_sighted: Vec::new(),
        }
    }

    pub fn bird_count(&self) -> usize {
        self.birds_sighted.len()
    }
}
