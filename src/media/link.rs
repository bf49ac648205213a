use super::types::PostIdentifier;
use url::Url;

/// Hosts a post link may point at, before any configured extras.
pub const DEFAULT_HOSTS: &[&str] = &["x.com", "www.x.com", "twitter.com", "www.twitter.com"];

/// Pulls the post id out of a `.../status/<id>` link.
///
/// `extra_hosts` extends [`DEFAULT_HOSTS`]. Anything unparseable, on another
/// host, or without a non-empty segment after `status` yields `None`.
pub fn extract_post_id(url: &str, extra_hosts: &[String]) -> Option<PostIdentifier> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();

    let allowed = DEFAULT_HOSTS.contains(&host.as_str())
        || extra_hosts
            .iter()
            .any(|extra| extra.eq_ignore_ascii_case(&host));
    if !allowed {
        return None;
    }

    let mut segments = parsed.path_segments()?;
    segments.find(|segment| *segment == "status")?;
    PostIdentifier::new(segments.next()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(url: &str) -> Option<String> {
        extract_post_id(url, &[]).map(|id| id.to_string())
    }

    #[test]
    fn test_extracts_from_allowed_hosts() {
        for host in DEFAULT_HOSTS {
            let url = format!("https://{}/someone/status/123456", host);
            assert_eq!(extract(&url).as_deref(), Some("123456"), "{}", url);
        }
    }

    #[test]
    fn test_trailing_parts_are_ignored() {
        assert_eq!(
            extract("https://x.com/someone/status/123456/photo/1?s=20").as_deref(),
            Some("123456")
        );
        assert_eq!(
            extract("https://TWITTER.com/i/web/status/987#frag").as_deref(),
            Some("987")
        );
    }

    #[test]
    fn test_rejects_other_hosts() {
        assert_eq!(extract("https://example.com/someone/status/123456"), None);
        assert_eq!(extract("https://mobile.twitter.com/someone/status/123456"), None);
        assert_eq!(extract("https://x.com.evil.io/someone/status/123456"), None);
    }

    #[test]
    fn test_rejects_missing_status() {
        assert_eq!(extract("https://x.com/someone"), None);
        assert_eq!(extract("https://x.com/someone/status"), None);
        assert_eq!(extract("https://x.com/someone/status/"), None);
        assert_eq!(extract("https://x.com/someone/statuses/1"), None);
    }

    #[test]
    fn test_rejects_unparseable() {
        assert_eq!(extract(""), None);
        assert_eq!(extract("x.com/someone/status/1"), None);
        assert_eq!(extract("not a url"), None);
    }

    #[test]
    fn test_extra_hosts_extend_allowlist() {
        let extra = vec!["Mobile.Twitter.com".to_string()];
        let id = extract_post_id("https://mobile.twitter.com/a/status/55", &extra);
        assert_eq!(id.map(|id| id.to_string()).as_deref(), Some("55"));
    }
}
