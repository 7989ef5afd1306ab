// Flashcard domain types: the card entity, locally generated card ids,
// and the ephemeral generation request.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Card count bounds
// ---------------------------------------------------------------------------

/// Smallest deck a user can request.
pub const MIN_CARD_COUNT: u8 = 3;

/// Largest deck a user can request.
pub const MAX_CARD_COUNT: u8 = 20;

/// Count pre-selected before the user touches the selector.
pub const DEFAULT_CARD_COUNT: u8 = 6;

/// Clamp a requested count into the supported range.
pub fn clamp_count(count: u8) -> u8 {
    count.clamp(MIN_CARD_COUNT, MAX_CARD_COUNT)
}

// ---------------------------------------------------------------------------
// Flashcard
// ---------------------------------------------------------------------------

/// A term/definition pair shown to the learner.
///
/// Cards are created in a batch when a generation request succeeds and are
/// immutable thereafter; the whole deck is replaced on the next successful
/// generation or reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Locally assigned id, unique across batches within the process.
    pub id: String,
    pub term: String,
    pub definition: String,
}

/// Process-wide batch counter. Two batches minted in the same millisecond
/// still get distinct ids because the counter is part of every id.
static BATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Reserve a batch number for one normalization pass.
pub fn next_batch() -> u64 {
    BATCH_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Format a card id from its batch number and position within the batch.
pub fn card_id(batch: u64, index: usize) -> String {
    let ts = chrono::Utc::now().timestamp_millis();
    format!("card-{ts}-{batch}-{index}")
}

// ---------------------------------------------------------------------------
// GenerationRequest
// ---------------------------------------------------------------------------

/// One user-initiated generate action. Exists only for the duration of the
/// provider call; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
    pub count: u8,
}

impl GenerationRequest {
    /// Build a request from raw form input.
    ///
    /// The topic is trimmed; an empty or whitespace-only topic yields `None`.
    /// The count is stored as given — bounds are the caller's job (the UI
    /// selector saturates at the supported range).
    pub fn new(topic: &str, count: u8) -> Option<Self> {
        let topic = topic.trim();
        if topic.is_empty() {
            return None;
        }
        Some(GenerationRequest {
            topic: topic.to_string(),
            count,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
