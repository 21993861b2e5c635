//! Renders an [`AutomationReport`] as chat message blocks.
//!
//! Layout: a header counting the birds, a divider, then for every bird a context block
//! (icon and name), a section block (encyclopedia summary, range map accessory) and one
//! image block per evidence photo.

use crate::blocks::{Block, Element, Text, VideoBlock, VIDEO_PROVIDER_ICON_URL};
use crate::lookup::SpeciesLookup;
use crate::models::{AutomationReport, SightedBird, Species};

pub fn header_text(bird_count: usize) -> String {
    let noun = if bird_count == 1 { "bird" } else { "birds" };
    format!("New Bird Sighting! {} {} sighted!", bird_count, noun)
}

fn sighted_text(species: &Species) -> String {
    format!("{} was sighted!", species.name)
}

pub struct MessageRenderer<'a> {
    lookup: &'a dyn SpeciesLookup,
    include_video_block: bool,
}

impl<'a> MessageRenderer<'a> {
    pub fn new(lookup: &'a dyn SpeciesLookup) -> Self {
        Self {
            lookup,
            include_video_block: false,
        }
    }

    /// Appends a video block after each bird's images
    pub fn with_video_block(mut self, include: bool) -> Self {
        self.include_video_block = include;
        self
    }

    pub fn render(&self, report: &AutomationReport) -> Vec<Block> {
        let mut blocks = vec![
            Block::header(header_text(report.bird_count())),
            Block::divider(),
        ];
        for bird in &report.birds_sighted {
            blocks.extend(self.bird_blocks(bird, &report.feeder.name));
        }
        blocks
    }

    pub fn bird_blocks(&self, bird: &SightedBird, feeder_name: &str) -> Vec<Block> {
        let species = &bird.species;
        let mut blocks = Vec::with_capacity(bird.image_urls.len() + 3);

        blocks.push(Block::context(vec![
            Element::image(species.icon_url.clone(), species.name.clone()),
            Element::mrkdwn(format!("*{}*", species.name)),
        ]));

        blocks.push(Block::section(
            Text::mrkdwn(self.summary(species)),
            Some(Element::image(
                species.map_url.clone(),
                format!("You can spot {} in the highlighted area.", species.name),
            )),
        ));

        for (i, url) in bird.image_urls.iter().enumerate() {
            blocks.push(Block::image(
                url.clone(),
                format!("{}-{}", species.name, i + 1),
                sighted_text(species),
            ));
        }

        if self.include_video_block {
            blocks.push(video_block(bird, feeder_name));
        }

        blocks
    }

    /// Section body for a species. One lookup per call, never retried.
    fn summary(&self, species: &Species) -> String {
        match self.lookup.search(&species.name) {
            Ok(Some(page)) if !page.is_empty() => {
                format!("*<{}|{}>*\n{}", page.url, page.title, page.summary)
            }
            Ok(_) => sighted_text(species),
            Err(e) => {
                tracing::warn!("Species lookup failed for {}: {}", species.name, e);
                sighted_text(species)
            }
        }
    }
}

pub fn video_block(bird: &SightedBird, feeder_name: &str) -> Block {
    let name = &bird.species.name;
    let video = &bird.video_media;
    Block::Video(VideoBlock {
        title: Text::plain(format!("Watch the video of {}", name)),
        title_url: video.content_url.clone(),
        description: Text::plain(format!(
            "Here is a video of {} captured during the sighting.",
            name
        )),
        video_url: video.content_url.clone(),
        alt_text: format!("Video of {} sighted at {}.", name, feeder_name),
        thumbnail_url: video.thumbnail_url.clone(),
        author_name: format!("{} bird feeder", feeder_name),
        provider_icon_url: VIDEO_PROVIDER_ICON_URL.to_string(),
    })
}
