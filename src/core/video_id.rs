use crate::error::{Error, Result};

const MAX_VIDEO_ID_LEN: usize = 128;

/// Resolve a bare video ID or a YouTube watch/short/shorts URL into a sanitized ID.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    let raw_id = if let Some(v_param) = input.split("v=").nth(1) {
        v_param.split('&').next().unwrap_or(v_param)
    } else if let Some(short) = input.split("youtu.be/").nth(1) {
        short.split(['?', '/']).next().unwrap_or(short)
    } else if let Some(shorts) = input.split("/shorts/").nth(1) {
        shorts.split(['?', '/']).next().unwrap_or(shorts)
    } else {
        input
    };

    sanitize_video_id(raw_id.split('#').next().unwrap_or(raw_id)).ok()
}

/// Ensure a video identifier is safe for use in file names and query strings.
/// Only ASCII alphanumeric characters plus `_` and `-` are allowed.
pub fn sanitize_video_id(raw: &str) -> Result<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(Error::validation("video ID cannot be empty"));
    }

    if trimmed.len() > MAX_VIDEO_ID_LEN {
        return Err(Error::validation("video ID is unexpectedly long"));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        return Err(Error::validation(
            "video ID contains unsupported characters; expected only letters, numbers, '-' or '_'",
        ));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{MAX_VIDEO_ID_LEN, extract_video_id, sanitize_video_id};

    #[test]
    fn allows_expected_characters() {
        let id = sanitize_video_id("abcDEF123-_x").expect("valid ID");
        assert_eq!(id, "abcDEF123-_x");
    }

    #[test]
    fn rejects_empty() {
        let err = sanitize_video_id("   ").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn rejects_invalid_chars() {
        assert!(sanitize_video_id("abc/../../etc").is_err());
    }

    #[test]
    fn rejects_too_long() {
        let long = "a".repeat(MAX_VIDEO_ID_LEN + 1);
        assert!(sanitize_video_id(&long).is_err());
    }

    #[test]
    fn extracts_from_url_forms() {
        for input in [
            "dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "  https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ#comments ",
        ] {
            assert_eq!(
                extract_video_id(input).as_deref(),
                Some("dQw4w9WgXcQ"),
                "input {input}"
            );
        }
    }

    #[test]
    fn rejects_unparseable_input() {
        assert!(extract_video_id("https://example.com/some path").is_none());
        assert!(extract_video_id("").is_none());
    }
}
