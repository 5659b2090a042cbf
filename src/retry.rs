//! Retry policy and failure classification for yt-dlp runs.

use std::time::Duration;

/// Classification of a failed yt-dlp run, derived from its stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Video unavailable, private, or removed.
    Unavailable,
    /// Age-restricted content.
    AgeRestricted,
    /// Invalid or unsupported URL.
    BadUrl,
    /// No write access to the output directory.
    Permission,
    /// Output disk is full.
    DiskSpace,
    /// ffmpeg missing or failed.
    Ffmpeg,
    /// Network-level failure (timeout, reset, DNS).
    Network,
    /// Anything else; retried in case it is transient.
    Other,
}

impl FailureKind {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureKind::Network | FailureKind::Other)
    }

    /// User-facing message for the error dialog. Raw stderr stays in the
    /// log only.
    pub fn friendly_message(&self) -> &'static str {
        match self {
            FailureKind::Unavailable => {
                "Video is unavailable or private. Please check the URL."
            }
            FailureKind::AgeRestricted => {
                "Video is age-restricted and cannot be downloaded."
            }
            FailureKind::BadUrl => "Download failed. Please check the URL and try again.",
            FailureKind::Permission => {
                "Permission error. Please check that you have write access to the output directory."
            }
            FailureKind::DiskSpace => {
                "Insufficient disk space. Please free up space and try again."
            }
            FailureKind::Ffmpeg => "FFmpeg error. Please ensure FFmpeg is properly installed.",
            FailureKind::Network => {
                "Network error occurred. Please check your internet connection and try again."
            }
            FailureKind::Other => "Download failed. Please check the URL and try again.",
        }
    }
}

/// Map yt-dlp stderr onto a [`FailureKind`].
pub fn classify(stderr: &str) -> FailureKind {
    let text = stderr.to_lowercase();

    if text.contains("video unavailable") || text.contains("private video") {
        FailureKind::Unavailable
    } else if text.contains("age-restricted") || text.contains("age restricted") {
        FailureKind::AgeRestricted
    } else if text.contains("is not a valid url") || text.contains("unsupported url") {
        FailureKind::BadUrl
    } else if text.contains("permission") || text.contains("access denied") {
        FailureKind::Permission
    } else if text.contains("no space")
        || text.contains("disk full")
        || text.contains("insufficient disk space")
    {
        FailureKind::DiskSpace
    } else if text.contains("ffmpeg") {
        FailureKind::Ffmpeg
    } else if text.contains("timed out")
        || text.contains("timeout")
        || text.contains("connection")
        || text.contains("network")
        || text.contains("temporary failure")
    {
        FailureKind::Network
    } else {
        FailureKind::Other
    }
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Exponential backoff with a fixed attempt cap.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay; doubles per attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Decide what to do after attempt `attempt` (1-based) failed with
    /// `kind`.
    pub fn decide(&self, attempt: u32, kind: FailureKind) -> RetryDecision {
        if attempt >= self.max_attempts || !kind.is_retryable() {
            return RetryDecision::NoRetry;
        }
        // 2s, 4s, 8s, ...
        let exp = 1u32 << attempt.saturating_sub(1).min(8);
        RetryDecision::RetryAfter(self.base_delay.saturating_mul(exp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_do_not_retry() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(1, FailureKind::Unavailable), RetryDecision::NoRetry);
        assert_eq!(p.decide(1, FailureKind::AgeRestricted), RetryDecision::NoRetry);
        assert_eq!(p.decide(1, FailureKind::Permission), RetryDecision::NoRetry);
        assert_eq!(p.decide(1, FailureKind::DiskSpace), RetryDecision::NoRetry);
    }

    #[test]
    fn transient_errors_back_off_exponentially() {
        let p = RetryPolicy::default();
        assert_eq!(
            p.decide(1, FailureKind::Network),
            RetryDecision::RetryAfter(Duration::from_secs(2))
        );
        assert_eq!(
            p.decide(2, FailureKind::Other),
            RetryDecision::RetryAfter(Duration::from_secs(4))
        );
    }

    #[test]
    fn respects_max_attempts() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(3, FailureKind::Network), RetryDecision::NoRetry);
        assert_eq!(p.decide(4, FailureKind::Network), RetryDecision::NoRetry);
    }

    #[test]
    fn classifies_stderr() {
        assert_eq!(
            classify("ERROR: [youtube] abc: Video unavailable"),
            FailureKind::Unavailable
        );
        assert_eq!(
            classify("ERROR: Sign in to confirm your age. This video is age-restricted"),
            FailureKind::AgeRestricted
        );
        assert_eq!(
            classify("ERROR: 'htp://x' is not a valid URL"),
            FailureKind::BadUrl
        );
        assert_eq!(classify("OSError: [Errno 28] No space left"), FailureKind::DiskSpace);
        assert_eq!(classify("ffmpeg not found"), FailureKind::Ffmpeg);
        assert_eq!(
            classify("urlopen error: The read operation timed out"),
            FailureKind::Network
        );
        assert_eq!(classify("something novel went wrong"), FailureKind::Other);
    }

    #[test]
    fn friendly_messages_hide_internals() {
        let msg = classify("Traceback ... OSError no space").friendly_message();
        assert!(!msg.to_lowercase().contains("traceback"));
        assert!(msg.contains("disk space"));
    }
}
