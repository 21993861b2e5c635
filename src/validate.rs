//! Parsing of raw event payloads into a validated [`SightingEvent`].
//!
//! The payload is walked field by field and every problem is recorded with its path
//! (`sighting.medias[1].contentUrl`) before the event is rejected, so a single error
//! lists everything wrong with the payload.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use url::Url;
use uuid::Uuid;

use crate::error::{FieldIssue, IssueKind, Result, TokenDecodeError, ValidationError};
use crate::models::{
    AmbiguousSighting, Feeder, Media, Postcard, PostcardSighting, RecognizedSighting, Sighting,
    SightingEvent, SightingReport, Species, Suggestion, AMBIGUOUS_TYPENAME,
};
use crate::token::decode_report_token;

impl SightingEvent {
    /// Parses and validates an already-decoded payload
    pub fn from_value(raw: &Value) -> Result<Self> {
        let mut validator = Validator::default();
        let event = validator.event(raw);
        validator.finish(event)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(text).map_err(unparseable)?;
        Self::from_value(&raw)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let raw: Value = serde_yaml::from_str(text).map_err(unparseable)?;
        Self::from_value(&raw)
    }
}

fn unparseable(e: impl std::fmt::Display) -> ValidationError {
    ValidationError::new(vec![FieldIssue {
        path: String::new(),
        kind: IssueKind::Unparseable,
        detail: e.to_string(),
    }])
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn index(path: &str, i: usize) -> String {
    format!("{}[{}]", path, i)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// True when a `suggestions` value would count as present and non-empty
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
    }
}

#[derive(Default)]
struct Validator {
    issues: Vec<FieldIssue>,
    token_error: Option<TokenDecodeError>,
}

impl Validator {
    fn finish(self, event: Option<SightingEvent>) -> Result<SightingEvent> {
        if !self.issues.is_empty() {
            return Err(ValidationError::new(self.issues).into());
        }
        if let Some(e) = self.token_error {
            return Err(e.into());
        }
        event.ok_or_else(|| {
            ValidationError::new(vec![FieldIssue {
                path: String::new(),
                kind: IssueKind::Invalid,
                detail: "event could not be assembled".to_string(),
            }])
            .into()
        })
    }

    fn issue(&mut self, path: String, kind: IssueKind, detail: impl Into<String>) {
        self.issues.push(FieldIssue {
            path,
            kind,
            detail: detail.into(),
        });
    }

    fn mismatch(&mut self, path: String, expected: &str, found: &Value) {
        let detail = format!("expected {}, found {}", expected, type_name(found));
        self.issue(path, IssueKind::TypeMismatch, detail);
    }

    // ===== PRIMITIVES =====

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        match value.as_object() {
            Some(obj) => Some(obj),
            None => {
                self.mismatch(path.to_string(), "object", value);
                None
            }
        }
    }

    fn field<'v>(&mut self, obj: &'v Map<String, Value>, path: &str, key: &str) -> Option<&'v Value> {
        let value = obj.get(key);
        if value.is_none() {
            self.issue(join(path, key), IssueKind::Missing, "");
        }
        value
    }

    fn string(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<String> {
        let value = self.field(obj, path, key)?;
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                self.mismatch(join(path, key), "string", value);
                None
            }
        }
    }

    fn boolean(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<bool> {
        let value = self.field(obj, path, key)?;
        match value.as_bool() {
            Some(b) => Some(b),
            None => {
                self.mismatch(join(path, key), "boolean", value);
                None
            }
        }
    }

    fn integer(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<i64> {
        let value = self.field(obj, path, key)?;
        match value.as_i64() {
            Some(n) => Some(n),
            None => {
                self.mismatch(join(path, key), "integer", value);
                None
            }
        }
    }

    fn uuid_value(&mut self, value: &Value, path: String) -> Option<Uuid> {
        let Some(text) = value.as_str() else {
            self.mismatch(path, "UUID string", value);
            return None;
        };
        match Uuid::parse_str(text) {
            Ok(id) => Some(id),
            Err(e) => {
                self.issue(path, IssueKind::MalformedUuid, e.to_string());
                None
            }
        }
    }

    fn uuid(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<Uuid> {
        let value = self.field(obj, path, key)?;
        self.uuid_value(value, join(path, key))
    }

    fn uuid_list(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<Vec<Uuid>> {
        let items = self.array(obj, path, key)?;
        let list_path = join(path, key);
        let ids: Vec<Option<Uuid>> = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.uuid_value(item, index(&list_path, i)))
            .collect();
        ids.into_iter().collect()
    }

    fn timestamp(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<DateTime<Utc>> {
        let value = self.field(obj, path, key)?;
        let Some(text) = value.as_str() else {
            self.mismatch(join(path, key), "timestamp string", value);
            return None;
        };
        // Timestamps without an offset are taken as UTC
        let parsed = DateTime::parse_from_rfc3339(text)
            .map(|ts| ts.with_timezone(&Utc))
            .or_else(|e| {
                NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|ts| Utc.from_utc_datetime(&ts))
                    .map_err(|_| e)
            });
        match parsed {
            Ok(ts) => Some(ts),
            Err(e) => {
                self.issue(join(path, key), IssueKind::MalformedTimestamp, e.to_string());
                None
            }
        }
    }

    /// Absolute http(s) URL
    fn url(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<Url> {
        let value = self.field(obj, path, key)?;
        let Some(text) = value.as_str() else {
            self.mismatch(join(path, key), "URL string", value);
            return None;
        };
        match Url::parse(text) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Some(url),
            Ok(url) => {
                let detail = format!("unsupported scheme {}", url.scheme());
                self.issue(join(path, key), IssueKind::MalformedUrl, detail);
                None
            }
            Err(e) => {
                self.issue(join(path, key), IssueKind::MalformedUrl, e.to_string());
                None
            }
        }
    }

    fn array<'v>(&mut self, obj: &'v Map<String, Value>, path: &str, key: &str) -> Option<&'v Vec<Value>> {
        let value = self.field(obj, path, key)?;
        match value.as_array() {
            Some(items) => Some(items),
            None => {
                self.mismatch(join(path, key), "array", value);
                None
            }
        }
    }

    // ===== ENTITIES =====

    fn event(&mut self, raw: &Value) -> Option<SightingEvent> {
        let obj = self.object(raw, "")?;
        let postcard = self
            .field(obj, "", "postcard")
            .and_then(|v| self.postcard(v, "postcard"));
        let sighting = self
            .field(obj, "", "sighting")
            .and_then(|v| self.postcard_sighting(v, "sighting"));

        Some(SightingEvent {
            postcard: postcard?,
            sighting: sighting?,
        })
    }

    fn postcard(&mut self, value: &Value, path: &str) -> Option<Postcard> {
        let obj = self.object(value, path)?;
        let id = self.uuid(obj, path, "id");
        let created_at = self.timestamp(obj, path, "createdAt");

        Some(Postcard {
            id: id?,
            created_at: created_at?,
        })
    }

    fn postcard_sighting(&mut self, value: &Value, path: &str) -> Option<PostcardSighting> {
        let obj = self.object(value, path)?;
        let feeder = self
            .field(obj, path, "feeder")
            .and_then(|v| self.feeder(v, &join(path, "feeder")));
        let medias = self.media_list(obj, path, "medias");
        let sighting_report = self
            .field(obj, path, "sightingReport")
            .and_then(|v| self.sighting_report(v, &join(path, "sightingReport")));
        let video_media = self
            .field(obj, path, "videoMedia")
            .and_then(|v| self.media(v, &join(path, "videoMedia")));

        Some(PostcardSighting {
            feeder: feeder?,
            medias: medias?,
            sighting_report: sighting_report?,
            video_media: video_media?,
        })
    }

    fn feeder(&mut self, value: &Value, path: &str) -> Option<Feeder> {
        let obj = self.object(value, path)?;
        let id = self.uuid(obj, path, "id");
        let name = self.string(obj, path, "name");
        let state = self.string(obj, path, "state");

        Some(Feeder {
            id: id?,
            name: name?,
            state: state?,
        })
    }

    fn media(&mut self, value: &Value, path: &str) -> Option<Media> {
        let obj = self.object(value, path)?;
        let id = self.uuid(obj, path, "id");
        let created_at = self.timestamp(obj, path, "createdAt");
        let thumbnail_url = self.url(obj, path, "thumbnailUrl");
        let content_url = self.url(obj, path, "contentUrl");

        Some(Media {
            id: id?,
            created_at: created_at?,
            thumbnail_url: thumbnail_url?,
            content_url: content_url?,
        })
    }

    fn media_list(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<Vec<Media>> {
        let items = self.array(obj, path, key)?;
        let list_path = join(path, key);
        let medias: Vec<Option<Media>> = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.media(item, &index(&list_path, i)))
            .collect();
        medias.into_iter().collect()
    }

    fn species(&mut self, value: &Value, path: &str) -> Option<Species> {
        let obj = self.object(value, path)?;
        let id = self.uuid(obj, path, "id");
        let icon_url = self.url(obj, path, "iconUrl");
        let name = self.string(obj, path, "name");
        let is_unofficial_name = self.boolean(obj, path, "isUnofficialName");
        let map_url = self.url(obj, path, "mapUrl");

        Some(Species {
            id: id?,
            icon_url: icon_url?,
            name: name?,
            is_unofficial_name: is_unofficial_name?,
            map_url: map_url?,
        })
    }

    fn sighting_report(&mut self, value: &Value, path: &str) -> Option<SightingReport> {
        let obj = self.object(value, path)?;
        let report_token = self.string(obj, path, "reportToken");
        let identity = report_token.as_deref().and_then(|token| match decode_report_token(token) {
            Ok(identity) => Some(identity),
            Err(e) => {
                self.token_error = Some(e);
                None
            }
        });

        let sightings = self.array(obj, path, "sightings").and_then(|items| {
            let list_path = join(path, "sightings");
            let sightings: Vec<Option<Sighting>> = items
                .iter()
                .enumerate()
                .map(|(i, item)| self.sighting(item, &index(&list_path, i)))
                .collect();
            sightings.into_iter().collect::<Option<Vec<_>>>()
        });

        Some(SightingReport {
            report_token: report_token?,
            identity: identity?,
            sightings: sightings?,
        })
    }

    /// Ambiguous when `suggestions` is present and non-empty, whatever the type tag says.
    /// Otherwise the `__typename` tag decides, then a bare `suggestions` list without a
    /// `species`, and anything left is a recognized sighting.
    fn sighting(&mut self, value: &Value, path: &str) -> Option<Sighting> {
        let obj = self.object(value, path)?;
        let suggestions = obj.get("suggestions");
        let tagged_ambiguous = obj.get("__typename").and_then(Value::as_str) == Some(AMBIGUOUS_TYPENAME);
        let is_ambiguous = suggestions.map_or(false, is_truthy)
            || tagged_ambiguous
            || (suggestions.is_some() && !obj.contains_key("species"));

        if is_ambiguous {
            self.ambiguous_sighting(obj, path).map(Sighting::Ambiguous)
        } else {
            self.recognized_sighting(obj, path).map(Sighting::Recognized)
        }
    }

    fn recognized_sighting(&mut self, obj: &Map<String, Value>, path: &str) -> Option<RecognizedSighting> {
        let id = self.uuid(obj, path, "id");
        let match_tokens = self.uuid_list(obj, path, "matchTokens");
        let color = self.string(obj, path, "color");
        let text = self.string(obj, path, "text");
        let count = self.integer(obj, path, "count");
        let icon = self.string(obj, path, "icon");
        let shareable_match_tokens = self.uuid_list(obj, path, "shareableMatchTokens");
        let species = self
            .field(obj, path, "species")
            .and_then(|v| self.species(v, &join(path, "species")));

        Some(RecognizedSighting {
            id: id?,
            match_tokens: match_tokens?,
            color: color?,
            text: text?,
            count: count?,
            icon: icon?,
            shareable_match_tokens: shareable_match_tokens?,
            species: species?,
        })
    }

    fn ambiguous_sighting(&mut self, obj: &Map<String, Value>, path: &str) -> Option<AmbiguousSighting> {
        let id = self.uuid(obj, path, "id");
        let match_tokens = self.uuid_list(obj, path, "matchTokens");
        let suggestions = self.array(obj, path, "suggestions").and_then(|items| {
            let list_path = join(path, "suggestions");
            let suggestions: Vec<Option<Suggestion>> = items
                .iter()
                .enumerate()
                .map(|(i, item)| self.suggestion(item, &index(&list_path, i)))
                .collect();
            suggestions.into_iter().collect::<Option<Vec<_>>>()
        });
        let typename = match obj.get("__typename") {
            None | Some(Value::Null) => Some(AMBIGUOUS_TYPENAME.to_string()),
            Some(Value::String(tag)) => Some(tag.clone()),
            Some(other) => {
                self.mismatch(join(path, "__typename"), "string", other);
                None
            }
        };

        Some(AmbiguousSighting {
            id: id?,
            match_tokens: match_tokens?,
            suggestions: suggestions?,
            typename: typename?,
        })
    }

    fn suggestion(&mut self, value: &Value, path: &str) -> Option<Suggestion> {
        let obj = self.object(value, path)?;
        let is_collected = self.boolean(obj, path, "isCollected");
        let species = self
            .field(obj, path, "species")
            .and_then(|v| self.species(v, &join(path, "species")));
        // Optional: absent and null both mean no media
        let media = match obj.get("media") {
            None | Some(Value::Null) => Some(None),
            Some(v) => self.media(v, &join(path, "media")).map(Some),
        };

        Some(Suggestion {
            is_collected: is_collected?,
            species: species?,
            media: media?,
        })
    }
}
