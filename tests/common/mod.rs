// Shared fixtures for the integration tests.
#![allow(dead_code)]

use serde_json::{json, Value};
use uuid::Uuid;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Builds an HS256-shaped JWT. The signature is filler; nothing verifies it.
pub fn make_token(claims: &Value) -> String {
    let encode = |value: &Value| base64::encode_config(value.to_string(), base64::URL_SAFE_NO_PAD);
    format!(
        "{}.{}.{}",
        encode(&json!({"alg": "HS256", "typ": "JWT"})),
        encode(claims),
        base64::encode_config("not-a-real-signature", base64::URL_SAFE_NO_PAD)
    )
}

pub fn dummy_token() -> String {
    make_token(&json!({"reportToken": "{\"dummy\": \"value\"}"}))
}

pub fn species(name: &str, slug: &str) -> Value {
    json!({
        "id": new_id(),
        "iconUrl": format!("http://example.com/{}_icon.jpg", slug),
        "name": name,
        "isUnofficialName": false,
        "mapUrl": format!("http://example.com/{}_map.jpg", slug),
    })
}

pub fn media(id: &str, n: usize) -> Value {
    json!({
        "id": id,
        "createdAt": "2024-04-06T08:08:36.208Z",
        "thumbnailUrl": format!("http://example.com/thumb{}.jpg", n),
        "contentUrl": format!("http://example.com/content{}.jpg", n),
    })
}

pub fn recognized(match_tokens: &[&str], species: Value) -> Value {
    json!({
        "id": new_id(),
        "matchTokens": match_tokens,
        "color": "YELLOW",
        "text": "Test sighting",
        "count": 1,
        "icon": "HEART",
        "shareableMatchTokens": match_tokens,
        "species": species,
    })
}

pub fn cant_decide(match_tokens: &[&str], suggestions: Vec<Value>) -> Value {
    json!({
        "id": new_id(),
        "matchTokens": match_tokens,
        "__typename": "SightingCantDecideWhichBird",
        "suggestions": suggestions,
    })
}

pub fn suggestion(is_collected: bool, species: Value) -> Value {
    json!({"isCollected": is_collected, "species": species, "media": null})
}

/// Event with two images and no sightings yet; ids are returned for wiring sightings up
pub struct EventFixture {
    pub event: Value,
    pub media1_id: String,
    pub media2_id: String,
    pub feeder_id: String,
}

impl EventFixture {
    pub fn new() -> Self {
        let media1_id = new_id();
        let media2_id = new_id();
        let feeder_id = new_id();
        let event = json!({
            "postcard": {"id": new_id(), "createdAt": "2024-04-06T08:08:38.055Z"},
            "sighting": {
                "feeder": {"id": feeder_id, "name": "Test Feeder", "state": "READY"},
                "medias": [media(&media1_id, 1), media(&media2_id, 2)],
                "sightingReport": {
                    "reportToken": dummy_token(),
                    "sightings": [],
                },
                "videoMedia": {
                    "id": new_id(),
                    "createdAt": "2024-04-06T08:08:36.208Z",
                    "thumbnailUrl": "http://example.com/vthumb.jpg",
                    "contentUrl": "http://example.com/vcontent.mp4",
                },
            },
        });
        Self {
            event,
            media1_id,
            media2_id,
            feeder_id,
        }
    }

    pub fn push_sighting(&mut self, sighting: Value) -> &mut Self {
        self.event["sighting"]["sightingReport"]["sightings"]
            .as_array_mut()
            .expect("sightings is an array")
            .push(sighting);
        self
    }

    /// The single-bird event: one recognized bird matched to the first image
    pub fn single_bird() -> Self {
        let mut fixture = Self::new();
        let sighting = recognized(&[fixture.media1_id.as_str()], species("Test Bird", "species"));
        fixture.push_sighting(sighting);
        fixture
    }

    /// The single-bird event plus a second recognized bird on the second image
    pub fn two_birds() -> Self {
        let mut fixture = Self::single_bird();
        let sighting = recognized(
            &[fixture.media2_id.as_str()],
            species("Another Test Bird", "species2"),
        );
        fixture.push_sighting(sighting);
        fixture
    }
}
