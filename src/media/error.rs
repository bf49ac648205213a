/// Failures surfaced while turning a link into post info.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid link: {0} (expected https://x.com/<user>/status/<id>)")]
    InvalidUrl(String),

    #[error("API error: HTTP {0}")]
    Http(u16),

    #[error("Post not found")]
    NotFound,

    #[error("No video found in this post")]
    NoVideoFound,

    #[error("Lookup request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse lookup response: {0}")]
    Decode(#[from] serde_json::Error),
}
