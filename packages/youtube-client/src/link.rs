//! Parsing of user-supplied video links into canonical video ids.

use url::Url;

fn is_video_id(s: &str) -> bool {
    s.len() == 11
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Extract an 11-character video id from user input.
///
/// Accepts a bare id, a `youtu.be/<id>` short link, a
/// `youtube.com/watch?v=<id>` URL, or a `youtube.com/shorts/<id>` URL.
/// Anything else yields `None`.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if is_video_id(input) {
        return Some(input.to_owned());
    }

    let parsed = Url::parse(input).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let path = parsed.path();

    if host == "youtu.be" {
        let id = path.trim_matches('/');
        return is_video_id(id).then(|| id.to_owned());
    }

    if host == "youtube.com" || host.ends_with(".youtube.com") {
        if path == "/watch" {
            let id = parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())?;
            return is_video_id(&id).then_some(id);
        }
        if let Some(rest) = path.strip_prefix("/shorts/") {
            let id = rest.split('/').next().unwrap_or_default();
            return is_video_id(id).then(|| id.to_owned());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_id() {
        assert_eq!(
            extract_video_id("dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_owned())
        );
    }

    #[test]
    fn accepts_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            Some("dQw4w9WgXcQ".to_owned())
        );
    }

    #[test]
    fn accepts_short_link() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_owned())
        );
    }

    #[test]
    fn accepts_shorts_url() {
        assert_eq!(
            extract_video_id("https://youtube.com/shorts/dQw4w9WgXcQ/extra"),
            Some("dQw4w9WgXcQ".to_owned())
        );
    }

    #[test]
    fn rejects_other_input() {
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("not a link"), None);
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("https://youtube.com/watch?v=tooshort"), None);
    }
}
