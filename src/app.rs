// App orchestrator: owns the generation state machine and reconciles
// user commands and provider outcomes into state + UI updates.
//
// The four logical states are a tagged union, so "generating while holding
// a stale error" or "cards alongside an error" cannot be represented.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::deck::{Flashcard, GenerationRequest};
use crate::llm::client::LlmClient;
use crate::protocol::{LlmEvent, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where the generation cycle stands. Exactly one of these holds at any
/// time; entering `Generating` discards any previous deck or error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No deck, no error, nothing in flight.
    Idle,
    /// One provider round trip in flight.
    Generating { topic: String, count: u8 },
    /// The last round trip succeeded.
    Ready { topic: String, cards: Vec<Flashcard> },
    /// The last round trip failed; `message` is the user-safe text.
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub phase: Phase,
    /// Provider client, shared with spawned generation tasks.
    pub llm_client: Arc<LlmClient>,
    /// Sender cloned into each spawned task so outcomes flow back into the
    /// main event loop.
    pub llm_tx: mpsc::Sender<LlmEvent>,
    pub current_llm_task: Option<tokio::task::JoinHandle<()>>,
    /// Monotonically increasing counter identifying the current generation
    /// task. Bumped on every submit; events carrying an older value are
    /// discarded in `handle_llm_event`.
    pub llm_generation: u64,
}

impl AppState {
    pub fn new(config: Config, llm_client: LlmClient, llm_tx: mpsc::Sender<LlmEvent>) -> Self {
        AppState {
            config,
            phase: Phase::Idle,
            llm_client: Arc::new(llm_client),
            llm_tx,
            current_llm_task: None,
            llm_generation: 0,
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.phase, Phase::Generating { .. })
    }

    /// Handle a submit.
    ///
    /// Returns the started request when a round trip was actually kicked
    /// off. An empty/whitespace topic and a submit while one is already in
    /// flight are both no-ops (the TUI disables the control too; this guard
    /// holds even if that is bypassed).
    pub fn submit(&mut self, topic: &str, count: u8) -> Option<GenerationRequest> {
        let request = match GenerationRequest::new(topic, count) {
            Some(r) => r,
            None => {
                debug!("ignoring submit with empty topic");
                return None;
            }
        };

        if self.is_generating() {
            debug!("ignoring submit while a generation is in flight");
            return None;
        }

        // Entering Generating discards the previous deck or error, and any
        // lingering task from a superseded request.
        self.cancel_llm_task();
        self.llm_generation += 1;
        let generation = self.llm_generation;

        self.phase = Phase::Generating {
            topic: request.topic.clone(),
            count: request.count,
        };

        let client = Arc::clone(&self.llm_client);
        let tx = self.llm_tx.clone();
        let task_request = request.clone();

        let handle = tokio::spawn(async move {
            client.generate_deck(task_request, tx, generation).await;
        });
        self.current_llm_task = Some(handle);

        info!(
            "generation started: topic=\"{}\", count={}, gen={}",
            request.topic, request.count, generation
        );
        Some(request)
    }

    /// Drop the deck and any error, returning to the empty state.
    pub fn reset(&mut self) {
        self.cancel_llm_task();
        self.phase = Phase::Idle;
    }

    /// Abort the in-flight generation task, if any. The aborted task may
    /// already have sent an event; the generation counter makes it inert.
    pub fn cancel_llm_task(&mut self) {
        if let Some(handle) = self.current_llm_task.take() {
            handle.abort();
            info!("cancelled previous generation task");
        }
    }

    /// Reconcile a provider outcome into state.
    ///
    /// Returns the `UiUpdate` to push, or `None` when the event was stale
    /// and discarded.
    pub fn handle_llm_event(&mut self, event: LlmEvent) -> Option<UiUpdate> {
        if event.generation() != self.llm_generation {
            debug!(
                "discarding stale generation event (event gen: {}, current gen: {})",
                event.generation(),
                self.llm_generation
            );
            return None;
        }

        let topic = match &self.phase {
            Phase::Generating { topic, .. } => topic.clone(),
            _ => {
                // A current-generation event can only arrive while
                // Generating; anything else means the task outlived a reset.
                debug!("received generation event outside Generating, discarding");
                return None;
            }
        };

        self.current_llm_task = None;

        match event {
            LlmEvent::DeckReady { cards, .. } => {
                info!("deck ready: {} cards for \"{}\"", cards.len(), topic);
                self.phase = Phase::Ready {
                    topic: topic.clone(),
                    cards: cards.clone(),
                };
                Some(UiUpdate::DeckReady { topic, cards })
            }
            LlmEvent::Failed { message, .. } => {
                warn!("generation failed for \"{topic}\"");
                self.phase = Phase::Failed {
                    message: message.clone(),
                };
                Some(UiUpdate::GenerationFailed { message })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the app event loop: user commands in, provider outcomes in, UI
/// updates out. Returns when the user quits or both channels close.
pub async fn run(
    mut llm_rx: mpsc::Receiver<LlmEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("application event loop started");

    // Track whether the LLM channel is still open. When it closes we stop
    // polling it so tokio::select! never spins on a closed receiver.
    let mut llm_open = true;

    loop {
        tokio::select! {
            // --- Provider outcomes (only poll while the channel is open) ---
            llm_event = llm_rx.recv(), if llm_open => {
                match llm_event {
                    Some(event) => {
                        if let Some(update) = state.handle_llm_event(event) {
                            let _ = ui_tx.send(update).await;
                        }
                    }
                    None => {
                        info!("LLM channel closed");
                        llm_open = false;
                    }
                }
            }

            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Generate { topic, count }) => {
                        if let Some(request) = state.submit(&topic, count) {
                            let _ = ui_tx
                                .send(UiUpdate::GenerationStarted {
                                    topic: request.topic,
                                    count: request.count,
                                })
                                .await;
                        }
                    }
                    Some(UserCommand::Reset) => {
                        state.reset();
                        let _ = ui_tx.send(UiUpdate::DeckCleared).await;
                    }
                    Some(UserCommand::Quit) => {
                        info!("quit command received, shutting down");
                        break;
                    }
                    None => {
                        info!("command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    state.cancel_llm_task();
    info!("application event loop exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
