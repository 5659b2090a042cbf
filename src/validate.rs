//! URL validation for the download entry field.

use thiserror::Error;
use url::Url;

pub const MAX_URL_LENGTH: usize = 2048;

const DANGEROUS_CHARS: [char; 9] = ['<', '>', '"', '{', '}', '|', '\\', '^', '`'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    #[error("Please enter a URL")]
    Empty,
    #[error("URL is too long")]
    TooLong,
    #[error("Please enter a valid YouTube URL")]
    Malformed,
    #[error("URL must use http or https")]
    BadScheme,
    #[error("URL contains invalid characters")]
    DangerousChars,
    #[error("Not a YouTube URL")]
    NotYouTube,
    #[error("Not a valid YouTube playlist URL. Playlist URLs must contain 'list=' parameter.")]
    NotPlaylist,
}

/// Validate that the input is a well-formed http(s) YouTube URL.
///
/// Length and character checks run before parsing so oversized or hostile
/// input is rejected cheaply.
pub fn validate_url(raw: &str) -> Result<Url, ValidateError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidateError::Empty);
    }
    if raw.len() > MAX_URL_LENGTH {
        tracing::warn!(len = raw.len(), "url exceeds maximum length");
        return Err(ValidateError::TooLong);
    }
    if raw.chars().any(|c| DANGEROUS_CHARS.contains(&c)) {
        tracing::warn!("url contains dangerous characters");
        return Err(ValidateError::DangerousChars);
    }

    let url = Url::parse(raw).map_err(|e| {
        tracing::warn!(error = %e, "url parsing failed");
        ValidateError::Malformed
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            tracing::warn!(scheme = other, "invalid url scheme");
            return Err(ValidateError::BadScheme);
        }
    }

    let host = url.host_str().ok_or(ValidateError::Malformed)?;
    if !is_youtube_host(host) {
        return Err(ValidateError::NotYouTube);
    }

    tracing::info!(domain = host, "url validation passed");
    Ok(url)
}

/// Additionally require a playlist id when playlist mode is enabled.
pub fn validate_playlist_url(url: &Url) -> Result<(), ValidateError> {
    let has_list = url.query_pairs().any(|(k, _)| k == "list");
    if !has_list {
        tracing::warn!("playlist mode enabled but url is not a playlist");
        return Err(ValidateError::NotPlaylist);
    }
    Ok(())
}

fn is_youtube_host(host: &str) -> bool {
    host == "youtube.com"
        || host.ends_with(".youtube.com")
        || host == "youtu.be"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_watch_urls() {
        assert!(validate_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").is_ok());
        assert!(validate_url("http://youtube.com/watch?v=abc123").is_ok());
        assert!(validate_url("https://youtu.be/dQw4w9WgXcQ").is_ok());
        assert!(validate_url("https://music.youtube.com/watch?v=abc").is_ok());
    }

    #[test]
    fn trims_whitespace() {
        assert!(validate_url("  https://youtu.be/dQw4w9WgXcQ \n").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(validate_url(""), Err(ValidateError::Empty));
        assert_eq!(validate_url("   "), Err(ValidateError::Empty));
    }

    #[test]
    fn rejects_overlong() {
        let url = format!("https://youtube.com/watch?v={}", "a".repeat(MAX_URL_LENGTH));
        assert_eq!(validate_url(&url), Err(ValidateError::TooLong));
    }

    #[test]
    fn rejects_non_youtube_hosts() {
        assert_eq!(
            validate_url("https://vimeo.com/12345"),
            Err(ValidateError::NotYouTube)
        );
        // Suffix tricks must not pass the host check.
        assert_eq!(
            validate_url("https://notyoutube.com/watch?v=abc"),
            Err(ValidateError::NotYouTube)
        );
        assert_eq!(
            validate_url("https://youtube.com.evil.org/watch?v=abc"),
            Err(ValidateError::NotYouTube)
        );
    }

    #[test]
    fn rejects_bad_schemes() {
        assert_eq!(
            validate_url("ftp://youtube.com/watch?v=abc"),
            Err(ValidateError::BadScheme)
        );
        assert_eq!(
            validate_url("file:///etc/passwd"),
            Err(ValidateError::BadScheme)
        );
    }

    #[test]
    fn rejects_dangerous_characters() {
        assert_eq!(
            validate_url("https://youtube.com/watch?v=a<b>"),
            Err(ValidateError::DangerousChars)
        );
        assert_eq!(
            validate_url("https://youtube.com/watch?v=a`rm`"),
            Err(ValidateError::DangerousChars)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(validate_url("not a url"), Err(ValidateError::Malformed));
    }

    #[test]
    fn playlist_requires_list_param() {
        let plain = validate_url("https://www.youtube.com/watch?v=abc").unwrap();
        assert_eq!(validate_playlist_url(&plain), Err(ValidateError::NotPlaylist));

        let playlist =
            validate_url("https://www.youtube.com/playlist?list=PLabcdef").unwrap();
        assert!(validate_playlist_url(&playlist).is_ok());

        let watch_in_list =
            validate_url("https://www.youtube.com/watch?v=abc&list=PLxyz").unwrap();
        assert!(validate_playlist_url(&watch_in_list).is_ok());
    }
}
