//! Normalization of upstream video renditions.
//!
//! Turns whatever rendition list a media item carries into a ranked list of
//! MP4 variants with a uniform shape and a quality label. Every step degrades
//! to a default instead of failing.

use super::types::{CanonicalVariant, MediaItem, RawVariant};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

pub const DEFAULT_CONTENT_TYPE: &str = "video/mp4";

type SourceLookup = fn(&MediaItem) -> Option<&[RawVariant]>;

/// Where raw renditions may live on a media item, in lookup order.
const VARIANT_SOURCES: &[(&str, SourceLookup)] = &[
    ("variants", from_variants),
    ("formats", from_formats),
    ("video_info.variants", from_video_info),
];

fn from_variants(media: &MediaItem) -> Option<&[RawVariant]> {
    media.variants.as_deref()
}

fn from_formats(media: &MediaItem) -> Option<&[RawVariant]> {
    media.formats.as_deref()
}

fn from_video_info(media: &MediaItem) -> Option<&[RawVariant]> {
    media
        .video_info
        .as_ref()
        .and_then(|info| info.variants.as_deref())
}

/// CDN URL shapes that embed `<width>x<height>`, highest priority first.
const DIMENSION_PATTERNS: &[(&str, &str)] = &[
    ("vid", r"/vid/([0-9]+)x([0-9]+)/"),
    ("vid-avc1", r"/vid/avc1/([0-9]+)x([0-9]+)/"),
    ("anywhere", r"([0-9]{3,4})x([0-9]{3,4})"),
];

/// `(min_dim, max_dim, label)`: a tier matches when either threshold is met.
const QUALITY_TIERS: &[(u64, u64, &str)] = &[
    (1080, 1920, "1080p"),
    (720, 1280, "720p"),
    (480, 854, "480p"),
    (360, 640, "360p"),
];

fn dimension_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DIMENSION_PATTERNS
            .iter()
            .map(|(name, pattern)| {
                (
                    *name,
                    Regex::new(pattern).expect("dimension pattern should compile"),
                )
            })
            .collect()
    })
}

/// Picks the first rendition list present on the media item.
///
/// A present-but-empty list still wins; lists are never merged.
pub fn select_source(media: &MediaItem) -> &[RawVariant] {
    VARIANT_SOURCES
        .iter()
        .find_map(|(name, lookup)| {
            lookup(media).inspect(|variants| {
                debug!("Using {} rendition(s) from '{}'", variants.len(), name)
            })
        })
        .unwrap_or(&[])
}

fn is_mp4(variant: &RawVariant) -> bool {
    variant.content_type.as_deref() == Some(DEFAULT_CONTENT_TYPE)
        || variant.container.as_deref() == Some("mp4")
}

/// Reads `<width>x<height>` out of a rendition URL.
///
/// The first pattern that matches decides; numbers too large for `u64`
/// abandon recovery rather than trying a later pattern.
pub fn dimensions_from_url(url: &str) -> Option<(u64, u64)> {
    let (name, captures) = dimension_patterns()
        .iter()
        .find_map(|(name, re)| re.captures(url).map(|captures| (name, captures)))?;

    let width = captures.get(1)?.as_str().parse().ok()?;
    let height = captures.get(2)?.as_str().parse().ok()?;
    debug!("Recovered {}x{} from URL via '{}' pattern", width, height, name);
    Some((width, height))
}

fn resolve_dimensions(variant: &RawVariant) -> (u64, u64) {
    let width = variant.width.unwrap_or(0);
    let height = variant.height.unwrap_or(0);

    if width > 0 && height > 0 {
        return (width, height);
    }

    variant
        .url
        .as_deref()
        .and_then(dimensions_from_url)
        .unwrap_or((width, height))
}

/// Labels a rendition from its dimensions, falling back to bitrate.
///
/// Either dimension can satisfy a tier, so very wide but short frames land
/// in a higher tier than their height alone suggests.
pub fn classify_quality(width: u64, height: u64, bitrate: u64) -> String {
    let max_dim = width.max(height);
    let min_dim = width.min(height);

    if let Some((_, _, label)) = QUALITY_TIERS
        .iter()
        .find(|(min_req, max_req, _)| min_dim >= *min_req || max_dim >= *max_req)
    {
        return label.to_string();
    }

    if bitrate > 0 {
        return format!("{}k", bitrate / 1000 + u64::from(bitrate % 1000 >= 500));
    }

    "SD".to_string()
}

/// Removes the `tag` query parameter. Unparseable input is returned as-is.
pub fn clean_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };

    if url.query_pairs().any(|(key, _)| key == "tag") {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "tag")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    url.to_string()
}

/// Produces MP4 renditions ordered by bitrate, highest first.
pub fn normalize(media: &MediaItem) -> Vec<CanonicalVariant> {
    let mut retained: Vec<&RawVariant> = select_source(media)
        .iter()
        .filter(|variant| is_mp4(variant))
        .collect();

    // stable: equal bitrates keep upstream order
    retained.sort_by(|a, b| b.bitrate.unwrap_or(0).cmp(&a.bitrate.unwrap_or(0)));

    retained
        .into_iter()
        .map(|variant| {
            let (width, height) = resolve_dimensions(variant);
            let bitrate = variant.bitrate.unwrap_or(0);

            CanonicalVariant {
                quality: classify_quality(width, height, bitrate),
                url: variant.url.as_deref().map(clean_url).unwrap_or_default(),
                bitrate,
                width,
                height,
                content_type: variant
                    .content_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            }
        })
        .collect()
}
