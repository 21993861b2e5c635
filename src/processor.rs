//! Entry point for the automation host.
//!
//! The host delivers `birdbuddy_new_postcard_sighting` payloads and fires whatever comes back
//! as `birdbuddy_new_postcard_sighting_report`, with two named outputs: `report` and
//! `slack_message`.

use anyhow::Result as AnyResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::blocks::Block;
use crate::config::ProcessorConfig;
use crate::error::Result;
use crate::formatter::ReportFormatter;
use crate::lookup::{NoLookup, SpeciesLookup, WikipediaClient};
use crate::models::{AutomationReport, SightingEvent};
use crate::render::MessageRenderer;

pub const LISTEN_EVENT_NAME: &str = "birdbuddy_new_postcard_sighting";
pub const EMIT_EVENT_NAME: &str = "birdbuddy_new_postcard_sighting_report";

/// What is handed back to the host for one inbound event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedEvent {
    pub report: AutomationReport,
    pub slack_message: Vec<Block>,
}

impl ProcessedEvent {
    /// Event name the host should fire these outputs under
    pub fn event_name(&self) -> &'static str {
        EMIT_EVENT_NAME
    }

    /// The outputs as event data: `{"report": ..., "slack_message": [...]}`
    pub fn to_event_data(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

pub struct EventProcessor {
    lookup: Box<dyn SpeciesLookup>,
    include_video_block: bool,
}

impl EventProcessor {
    pub fn new(lookup: Box<dyn SpeciesLookup>) -> Self {
        Self {
            lookup,
            include_video_block: false,
        }
    }

    /// Creates a processor backed by Wikipedia, or by no lookup when enrichment is off
    pub fn from_config(config: &ProcessorConfig) -> AnyResult<Self> {
        let lookup: Box<dyn SpeciesLookup> = if config.enrichment_enabled {
            Box::new(WikipediaClient::new(
                config.wikipedia_url()?,
                config.lookup_timeout(),
            )?)
        } else {
            Box::new(NoLookup)
        };
        Ok(Self::new(lookup).with_video_block(config.include_video_block))
    }

    pub fn with_video_block(mut self, include: bool) -> Self {
        self.include_video_block = include;
        self
    }

    /// Processes one raw payload delivered by the host.
    ///
    /// Validation and token errors are returned as-is for the host to surface; nothing
    /// is produced for that event.
    pub fn process_event(&self, event_name: &str, data: &Value) -> Result<ProcessedEvent> {
        info!("Processing the incoming event {}", event_name);
        let event = SightingEvent::from_value(data)?;
        Ok(self.process(event))
    }

    pub fn process(&self, event: SightingEvent) -> ProcessedEvent {
        let formatter = ReportFormatter::new(event);
        let report = formatter.report();
        debug!("Report to send: {:?}", report);

        let slack_message = MessageRenderer::new(self.lookup.as_ref())
            .with_video_block(self.include_video_block)
            .render(report);
        info!(
            "Rendered {} block(s) for {} bird(s) at {}",
            slack_message.len(),
            report.bird_count(),
            report.feeder.name
        );

        ProcessedEvent {
            report: report.clone(),
            slack_message,
        }
    }
}
