// Flashcard generation: prompt construction, the provider client, and
// response normalization.

pub mod client;
pub mod prompt;
pub mod response;

use thiserror::Error;

/// The one message shown to the user for any generation failure. The
/// underlying cause is logged, never surfaced, so provider-internal error
/// text cannot leak into the UI.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate flashcards. Please try again.";

/// Failure of one generation round trip. Network trouble, authentication
/// rejection, a non-JSON payload, and a schema-mismatched payload all land
/// here; the variants exist for the log, not for the user.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured")]
    NotConfigured,

    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider response carried no text payload")]
    MissingPayload,

    #[error("failed to parse payload: {reason}")]
    Parse { reason: String },

    #[error("payload element {index} is malformed: {reason}")]
    Schema { index: usize, reason: String },
}

impl GenerationError {
    /// The user-safe message for this error. Always the same text; the
    /// distinction between causes stays in the log.
    pub fn user_message(&self) -> &'static str {
        GENERATION_FAILED_MESSAGE
    }
}
