mod error;
mod link;
mod lookup;
mod types;
mod variants;

pub use error::FetchError;
pub use link::extract_post_id;
pub use types::{CanonicalVariant, PostInfo};

use crate::config::ApiConfig;
use lookup::{Lookup, StatusApiLookup};
use tracing::{info, warn};
use types::{LookupResponse, MediaItem, Post, PostIdentifier};
use variants::{clean_url, normalize, DEFAULT_CONTENT_TYPE};

/// Resolves a post id into its playable video renditions.
pub struct PostFetcher {
    lookup: Box<dyn Lookup>,
}

impl PostFetcher {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        info!("Post fetcher initialized - using {}", config.base_url);
        Ok(Self::with_lookup(Box::new(StatusApiLookup::new(config)?)))
    }

    pub fn with_lookup(lookup: Box<dyn Lookup>) -> Self {
        Self { lookup }
    }

    pub async fn fetch(&self, id: &PostIdentifier) -> Result<PostInfo, FetchError> {
        info!("Fetching post {} with {}", id, self.lookup.name());

        let raw = self.lookup.lookup(id).await?;
        let response: LookupResponse = serde_json::from_value(raw)?;
        let post = response.tweet.ok_or(FetchError::NotFound)?;

        let media = post
            .media_items()
            .iter()
            .find(|item| item.is_video())
            .ok_or(FetchError::NoVideoFound)?;

        let mut variants = normalize(media);
        if variants.is_empty() {
            if let Some(fallback) = fallback_variant(media) {
                warn!("No usable renditions for post {}, using direct media URL", id);
                variants.push(fallback);
            } else {
                warn!("Post {} has no playable asset", id);
            }
        }

        info!(
            "Found {} variant(s) for {} media in post {}",
            variants.len(),
            media.media_type.as_deref().unwrap_or("unknown"),
            id
        );

        Ok(assemble(&post, media, variants))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn fallback_variant(media: &MediaItem) -> Option<CanonicalVariant> {
    let url = non_empty(&media.url)?;
    Some(CanonicalVariant {
        quality: "Default".to_string(),
        url: clean_url(url),
        bitrate: 0,
        width: media.width.unwrap_or(0),
        height: media.height.unwrap_or(0),
        content_type: DEFAULT_CONTENT_TYPE.to_string(),
    })
}

fn assemble(post: &Post, media: &MediaItem, variants: Vec<CanonicalVariant>) -> PostInfo {
    let author = post.author.clone().unwrap_or_default();

    PostInfo {
        text: post.text.clone().unwrap_or_default(),
        author_name: author.name.unwrap_or_default(),
        author_handle: author.screen_name.unwrap_or_default(),
        date: post.created_at.clone().unwrap_or_default(),
        likes: post.likes.unwrap_or(0),
        retweets: post.retweets.unwrap_or(0),
        thumbnail: non_empty(&media.thumbnail_url)
            .or_else(|| non_empty(&media.url))
            .map(str::to_string),
        media_type: media.media_type.clone().unwrap_or_default(),
        variants,
    }
}
