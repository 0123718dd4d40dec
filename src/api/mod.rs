//! # API Module
//!
//! HTTP endpoints for the temporary local server that backs the
//! `spotsync auth` flow.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the authorization code from Spotify's consent
//!   page, verifies the CSRF state parameter and exchanges the code for a
//!   token pair. The resulting refresh token is what the user copies into
//!   their environment.
//! - [`health`] - Health check returning application status and version.
//!
//! The server only runs for the duration of one auth flow; it shares state
//! with the CLI through an `Arc<Mutex<Option<AuthFlow>>>`.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
