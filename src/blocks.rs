//! Message blocks in the chat platform's Block Kit JSON shape

use serde::{Deserialize, Serialize};
use url::Url;

/// Icon shown as the provider of embedded feeder videos
pub const VIDEO_PROVIDER_ICON_URL: &str =
    "https://mybirdbuddy.com/wp-content/uploads/2023/06/cropped-Birdbuddy_favicon_64x64-32x32.png";

/// A text object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    PlainText {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        emoji: Option<bool>,
    },
    Mrkdwn {
        text: String,
    },
}

impl Text {
    pub fn plain(text: impl Into<String>) -> Self {
        Text::PlainText {
            text: text.into(),
            emoji: Some(true),
        }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Text::Mrkdwn { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Text::PlainText { text, .. } | Text::Mrkdwn { text } => text,
        }
    }
}

/// An element inside a context block, or a section accessory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Image {
        image_url: Url,
        alt_text: String,
    },
    PlainText {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        emoji: Option<bool>,
    },
    Mrkdwn {
        text: String,
    },
}

impl Element {
    pub fn image(image_url: Url, alt_text: impl Into<String>) -> Self {
        Element::Image {
            image_url,
            alt_text: alt_text.into(),
        }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Element::Mrkdwn { text: text.into() }
    }
}

/// Embedded video. Not every workspace accepts these, so rendering them is opt-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoBlock {
    pub title: Text,
    pub title_url: Url,
    pub description: Text,
    pub video_url: Url,
    pub alt_text: String,
    pub thumbnail_url: Url,
    pub author_name: String,
    pub provider_icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: Text,
    },
    Divider,
    Context {
        elements: Vec<Element>,
    },
    Section {
        text: Text,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accessory: Option<Element>,
    },
    Image {
        image_url: Url,
        alt_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<Text>,
    },
    Video(VideoBlock),
}

impl Block {
    pub fn header(text: impl Into<String>) -> Self {
        Block::Header {
            text: Text::plain(text),
        }
    }

    pub fn divider() -> Self {
        Block::Divider
    }

    pub fn context(elements: Vec<Element>) -> Self {
        Block::Context { elements }
    }

    pub fn section(text: Text, accessory: Option<Element>) -> Self {
        Block::Section { text, accessory }
    }

    pub fn image(image_url: Url, alt_text: impl Into<String>, title: impl Into<String>) -> Self {
        Block::Image {
            image_url,
            alt_text: alt_text.into(),
            title: Some(Text::plain(title)),
        }
    }

    /// The block's `type` tag as the platform names it
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Header { .. } => "header",
            Block::Divider => "divider",
            Block::Context { .. } => "context",
            Block::Section { .. } => "section",
            Block::Image { .. } => "image",
            Block::Video(_) => "video",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_header_and_divider_shape() {
        let blocks = vec![Block::header("New Bird Sighting! 1 bird sighted!"), Block::divider()];
        let value = serde_json::to_value(&blocks).unwrap();
        assert_eq!(
            value,
            json!([
                {"type": "header", "text": {"type": "plain_text", "text": "New Bird Sighting! 1 bird sighted!", "emoji": true}},
                {"type": "divider"}
            ])
        );
    }

    #[test]
    fn test_context_and_section_shape() {
        let context = Block::context(vec![
            Element::image(url("http://example.com/icon.jpg"), "Robin"),
            Element::mrkdwn("*Robin*"),
        ]);
        let section = Block::section(
            Text::mrkdwn("Robin was sighted!"),
            Some(Element::image(url("http://example.com/map.jpg"), "map")),
        );

        assert_eq!(
            serde_json::to_value(&context).unwrap(),
            json!({"type": "context", "elements": [
                {"type": "image", "image_url": "http://example.com/icon.jpg", "alt_text": "Robin"},
                {"type": "mrkdwn", "text": "*Robin*"}
            ]})
        );
        assert_eq!(
            serde_json::to_value(&section).unwrap(),
            json!({"type": "section",
                "text": {"type": "mrkdwn", "text": "Robin was sighted!"},
                "accessory": {"type": "image", "image_url": "http://example.com/map.jpg", "alt_text": "map"}})
        );
    }

    #[test]
    fn test_image_block_reads_back() {
        let block = Block::image(url("http://example.com/a.jpg"), "Robin-1", "Robin was sighted!");
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "image");
        assert_eq!(value["title"]["text"], "Robin was sighted!");

        let back: Block = serde_json::from_value(value).unwrap();
        assert_eq!(back, block);
        assert_eq!(back.kind(), "image");
    }
}
