//! Error classification for the sync pipeline.
//!
//! Every failure in the application is folded into [`SyncError`], a tagged
//! union carrying a [`ErrorKind`] discriminator, an optional HTTP status code
//! and the boxed original cause. The kind decides retry eligibility (only
//! transport-level API errors are retried by default) and the status decides
//! severity at the top level: API errors with status >= 500 and configuration
//! errors are fatal, everything else is reported as a warning. Either way a
//! classified failure terminates the run with a non-zero exit code.

use thiserror::Error;

use crate::warning;

/// Discriminator for [`SyncError`] variants.
///
/// Retry eligibility is checked by value equality against a caller-supplied
/// set of kinds, see [`SyncError::is_retryable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport or remote-service failure, carries an HTTP status.
    Api,
    /// Missing or invalid setup (environment variables, flags).
    Config,
    /// Token refresh or code exchange failure.
    Auth,
    /// Playlist fetch or mutation failure, wraps an underlying API error.
    Playlist,
    /// Saved-tracks fetch failure, wraps an underlying API error.
    Track,
    /// Follow/unfollow failure, wraps an underlying API error.
    Follow,
}

/// How a classified error should be reported before the process exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Warning,
}

/// A classified failure.
///
/// The three resource variants (`Playlist`, `Track`, `Follow`) wrap the
/// underlying error with contextual detail instead of replacing it; the
/// original cause stays reachable through `std::error::Error::source`.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("spotify api error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("authentication error: {message}")]
    Auth {
        message: String,
        #[source]
        source: Option<Box<SyncError>>,
    },

    #[error("playlist error: {message}")]
    Playlist {
        message: String,
        #[source]
        source: Box<SyncError>,
    },

    #[error("track error: {message}")]
    Track {
        message: String,
        #[source]
        source: Box<SyncError>,
    },

    #[error("follow error: {message}")]
    Follow {
        message: String,
        #[source]
        source: Box<SyncError>,
    },
}

impl SyncError {
    /// API-kind error with an explicit status code and no further cause.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        SyncError::Api {
            status,
            message: message.into(),
            source: None,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        SyncError::Config {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>, cause: SyncError) -> Self {
        SyncError::Auth {
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }

    pub fn playlist(message: impl Into<String>, cause: SyncError) -> Self {
        SyncError::Playlist {
            message: message.into(),
            source: Box::new(cause),
        }
    }

    pub fn track(message: impl Into<String>, cause: SyncError) -> Self {
        SyncError::Track {
            message: message.into(),
            source: Box::new(cause),
        }
    }

    pub fn follow(message: impl Into<String>, cause: SyncError) -> Self {
        SyncError::Follow {
            message: message.into(),
            source: Box::new(cause),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::Api { .. } => ErrorKind::Api,
            SyncError::Config { .. } => ErrorKind::Config,
            SyncError::Auth { .. } => ErrorKind::Auth,
            SyncError::Playlist { .. } => ErrorKind::Playlist,
            SyncError::Track { .. } => ErrorKind::Track,
            SyncError::Follow { .. } => ErrorKind::Follow,
        }
    }

    /// HTTP status code for API-kind errors, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True iff this error's kind is a member of `kinds`.
    pub fn is_retryable(&self, kinds: &[ErrorKind]) -> bool {
        kinds.contains(&self.kind())
    }

    /// API errors with status >= 500 and configuration errors are fatal;
    /// everything else is a warning. Both still end the run non-zero.
    pub fn severity(&self) -> Severity {
        match self {
            SyncError::Api { status, .. } if *status >= 500 => Severity::Fatal,
            SyncError::Config { .. } => Severity::Fatal,
            _ => Severity::Warning,
        }
    }
}

/// Classifies a raw transport error.
///
/// A recognized HTTP status is preserved; failures without one (connect
/// errors, decode errors, timeouts) are assigned status 500.
impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16()).unwrap_or(500);
        SyncError::Api {
            status,
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Top-level failure handler: logs the classified error with its full cause
/// chain at the level its severity dictates, then exits non-zero.
pub fn exit_with(err: &SyncError) -> ! {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(&format!("\n    caused by: {}", cause));
        source = cause.source();
    }

    match err.severity() {
        Severity::Fatal => crate::error!("{}", message),
        Severity::Warning => warning!("{}", message),
    }

    std::process::exit(1)
}
