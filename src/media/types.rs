use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a post, taken from the path segment after `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostIdentifier(String);

impl PostIdentifier {
    /// Returns `None` for an empty token.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }
}

impl fmt::Display for PostIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One upstream rendition entry. Nothing is guaranteed to be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVariant {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub container: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub bitrate: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub width: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub height: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoInfo {
    #[serde(default, deserialize_with = "lenient_list")]
    pub variants: Option<Vec<RawVariant>>,
}

/// A single attachment on a post, as described by the lookup service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub width: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub height: Option<u64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub variants: Option<Vec<RawVariant>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub formats: Option<Vec<RawVariant>>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub video_info: Option<VideoInfo>,
}

impl MediaItem {
    pub fn is_video(&self) -> bool {
        matches!(
            self.media_type.as_deref(),
            Some("video") | Some("animated_gif")
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub screen_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostMedia {
    #[serde(default, deserialize_with = "lenient_list")]
    pub all: Option<Vec<MediaItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Post {
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub likes: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub retweets: Option<u64>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub author: Option<Author>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub media: Option<PostMedia>,
}

impl Post {
    pub fn media_items(&self) -> &[MediaItem] {
        self.media
            .as_ref()
            .and_then(|media| media.all.as_deref())
            .unwrap_or(&[])
    }
}

/// Top-level body returned by the lookup service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupResponse {
    #[serde(default, deserialize_with = "lenient_object")]
    pub tweet: Option<Post>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalVariant {
    pub quality: String,
    pub url: String,
    pub bitrate: u64,
    pub width: u64,
    pub height: u64,
    pub content_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostInfo {
    pub text: String,
    pub author_name: String,
    pub author_handle: String,
    pub date: String,
    pub likes: u64,
    pub retweets: u64,
    pub thumbnail: Option<String>,
    #[serde(rename = "type")]
    pub media_type: String,
    pub variants: Vec<CanonicalVariant>,
}

// Upstream payloads drift between API versions, so the helpers below
// coerce what they can and treat everything else as absent.

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_u64(&Value::deserialize(deserializer)?))
}

fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_identifier_rejects_empty() {
        assert!(PostIdentifier::new("").is_none());
        assert_eq!(PostIdentifier::new("42").unwrap().to_string(), "42");
    }

    #[test]
    fn test_raw_variant_coerces_numbers() {
        let variant: RawVariant = serde_json::from_value(json!({
            "url": "https://video.example/a.mp4",
            "bitrate": "832000",
            "width": 1280.0,
            "height": -5,
            "content_type": 7
        }))
        .unwrap();

        assert_eq!(variant.bitrate, Some(832_000));
        assert_eq!(variant.width, Some(1280));
        assert_eq!(variant.height, None);
        assert_eq!(variant.content_type, None);
    }

    #[test]
    fn test_variant_list_drops_non_objects() {
        let media: MediaItem = serde_json::from_value(json!({
            "type": "video",
            "variants": ["junk", 3, {"container": "mp4"}],
            "formats": "not a list"
        }))
        .unwrap();

        assert_eq!(media.variants.as_ref().map(Vec::len), Some(1));
        assert!(media.formats.is_none());
        assert!(media.is_video());
    }

    #[test]
    fn test_null_variants_are_absent() {
        let media: MediaItem = serde_json::from_value(json!({
            "type": "photo",
            "variants": null,
            "video_info": {"variants": []}
        }))
        .unwrap();

        assert!(media.variants.is_none());
        assert_eq!(
            media.video_info.and_then(|info| info.variants).map(|v| v.len()),
            Some(0)
        );
    }

    #[test]
    fn test_lookup_response_without_post() {
        let response: LookupResponse =
            serde_json::from_value(json!({"code": 404, "tweet": null})).unwrap();
        assert!(response.tweet.is_none());
    }

    #[test]
    fn test_post_info_serializes_type_field() {
        let info = PostInfo {
            text: "hi".to_string(),
            author_name: "A".to_string(),
            author_handle: "a".to_string(),
            date: String::new(),
            likes: 1,
            retweets: 2,
            thumbnail: None,
            media_type: "animated_gif".to_string(),
            variants: Vec::new(),
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["type"], "animated_gif");
        assert!(value["variants"].as_array().unwrap().is_empty());
    }
}
