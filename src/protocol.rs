// Message types exchanged between the TUI, the app orchestrator, and the
// spawned generation task.

use crate::deck::Flashcard;

// ---------------------------------------------------------------------------
// TUI -> app
// ---------------------------------------------------------------------------

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Request a new deck for the given topic and card count.
    Generate { topic: String, count: u8 },
    /// Discard the current deck and any error, returning to the empty state.
    Reset,
    /// Shut down the application.
    Quit,
}

// ---------------------------------------------------------------------------
// Generation task -> app
// ---------------------------------------------------------------------------

/// Outcome of one provider round trip, reported by the spawned generation
/// task. The `generation` counter identifies which submit the event belongs
/// to; events from superseded submits are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmEvent {
    DeckReady {
        cards: Vec<Flashcard>,
        generation: u64,
    },
    Failed {
        message: String,
        generation: u64,
    },
}

impl LlmEvent {
    pub fn generation(&self) -> u64 {
        match self {
            LlmEvent::DeckReady { generation, .. } => *generation,
            LlmEvent::Failed { generation, .. } => *generation,
        }
    }
}

// ---------------------------------------------------------------------------
// App -> TUI
// ---------------------------------------------------------------------------

/// State changes pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    /// A generation round trip started; the TUI shows the skeleton grid
    /// sized to `count` and clears any previous deck or error.
    GenerationStarted { topic: String, count: u8 },
    /// The provider returned a deck.
    DeckReady { topic: String, cards: Vec<Flashcard> },
    /// The round trip failed; `message` is the user-safe text.
    GenerationFailed { message: String },
    /// The deck and error were cleared (user reset).
    DeckCleared,
}

/// Where the current generation cycle stands, for widget display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    Idle,
    Generating,
    Complete,
    Error,
}
