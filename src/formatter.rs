//! Reconciles an event's media with its sightings and builds the automation report.

use std::path::Path;

use anyhow::anyhow;
use once_cell::unsync::OnceCell;
use serde_json::Value;

use crate::blocks::Block;
use crate::error::Result;
use crate::lookup::SpeciesLookup;
use crate::models::{AutomationReport, Identifiable, SightedBird, SightingEvent};
use crate::render::MessageRenderer;

/// Builds the report for an event.
///
/// Each sighting, in order, becomes one bird carrying the content URLs of the event images
/// named in its match tokens (event media order) and the event's video. Tokens naming no
/// image are ignored. Ambiguous sightings without suggestions produce no bird.
pub fn build_report(event: &SightingEvent) -> AutomationReport {
    let sighting = &event.sighting;
    let mut report = AutomationReport::new(sighting.feeder.clone());

    for entry in &sighting.sighting_report.sightings {
        let Some(species) = entry.best_guess_species() else {
            tracing::debug!("Skipping sighting {} with no suggestions", entry.id());
            continue;
        };
        report.birds_sighted.push(SightedBird::new(
            species.clone(),
            event.evidence_urls(entry),
            sighting.video_media.clone(),
        ));
    }

    report
}

/// Formats one event. The report is built on first use and reused afterwards.
#[derive(Debug)]
pub struct ReportFormatter {
    model: SightingEvent,
    report: OnceCell<AutomationReport>,
}

impl ReportFormatter {
    pub fn new(model: SightingEvent) -> Self {
        Self {
            model,
            report: OnceCell::new(),
        }
    }

    pub fn from_value(raw: &Value) -> Result<Self> {
        SightingEvent::from_value(raw).map(Self::new)
    }

    /// Loads an event from a YAML file (JSON files parse too, JSON being valid YAML)
    pub fn from_yaml(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read event file {}: {}", path.display(), e))?;
        Ok(Self::new(SightingEvent::from_yaml_str(&text)?))
    }

    pub fn model(&self) -> &SightingEvent {
        &self.model
    }

    pub fn into_model(self) -> SightingEvent {
        self.model
    }

    pub fn report(&self) -> &AutomationReport {
        self.report.get_or_init(|| build_report(&self.model))
    }

    /// Renders the report with default settings: no video blocks
    pub fn format_slack_message(&self, lookup: &dyn SpeciesLookup) -> Vec<Block> {
        MessageRenderer::new(lookup).render(self.report())
    }
}
