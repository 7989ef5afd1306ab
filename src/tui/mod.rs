// TUI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the app state for rendering. The
// app orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::deck::{Flashcard, DEFAULT_CARD_COUNT};
use crate::protocol::{GenerationStatus, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator
/// and directly by local key handling (topic editing, count adjustment,
/// card selection and flipping).
pub struct ViewState {
    /// Topic text as typed into the form.
    pub topic_input: String,
    /// Whether keystrokes currently edit the topic field.
    pub editing_topic: bool,
    /// Requested card count (3–20).
    pub card_count: u8,
    /// Where the generation cycle stands.
    pub status: GenerationStatus,
    /// Topic of the deck currently displayed (may differ from the input
    /// once the user starts typing the next topic).
    pub deck_topic: String,
    /// The displayed deck.
    pub cards: Vec<Flashcard>,
    /// Per-card flipped flag, parallel to `cards`. Flipped shows the
    /// definition face.
    pub flipped: Vec<bool>,
    /// Index of the selected card.
    pub selected: usize,
    /// User-safe error text from the last failed generation.
    pub error: Option<String>,
    /// How many skeleton placeholders to draw while generating.
    pub skeleton_count: u8,
    /// Whether a provider API key is configured (status bar display only).
    pub provider_active: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            topic_input: String::new(),
            editing_topic: false,
            card_count: DEFAULT_CARD_COUNT,
            status: GenerationStatus::Idle,
            deck_topic: String::new(),
            cards: Vec::new(),
            flipped: Vec::new(),
            selected: 0,
            error: None,
            skeleton_count: DEFAULT_CARD_COUNT,
            provider_active: false,
        }
    }
}

impl ViewState {
    /// Whether a submit is currently allowed: non-empty topic and nothing
    /// in flight. The form renders the generate control disabled when this
    /// is false, and the input handler refuses to emit the command.
    pub fn can_submit(&self) -> bool {
        !self.topic_input.trim().is_empty() && self.status != GenerationStatus::Generating
    }

    /// Toggle the flip state of the selected card.
    pub fn flip_selected(&mut self) {
        if let Some(flag) = self.flipped.get_mut(self.selected) {
            *flag = !*flag;
        }
    }

    /// Move the card selection by `delta`, saturating at the deck edges.
    pub fn move_selection(&mut self, delta: isize) {
        if self.cards.is_empty() {
            return;
        }
        let last = self.cards.len() - 1;
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, last as isize) as usize;
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::GenerationStarted { topic, count } => {
            state.status = GenerationStatus::Generating;
            state.deck_topic = topic;
            state.skeleton_count = count;
            state.cards.clear();
            state.flipped.clear();
            state.selected = 0;
            state.error = None;
        }
        UiUpdate::DeckReady { topic, cards } => {
            state.status = GenerationStatus::Complete;
            state.deck_topic = topic;
            state.flipped = vec![false; cards.len()];
            state.cards = cards;
            state.selected = 0;
            state.error = None;
        }
        UiUpdate::GenerationFailed { message } => {
            state.status = GenerationStatus::Error;
            state.cards.clear();
            state.flipped.clear();
            state.selected = 0;
            state.error = Some(message);
        }
        UiUpdate::DeckCleared => {
            state.status = GenerationStatus::Idle;
            state.deck_topic.clear();
            state.cards.clear();
            state.flipped.clear();
            state.selected = 0;
            state.error = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::form::render(frame, layout.form, state);
    widgets::banner::render(frame, layout.banner, state);
    widgets::card_grid::render(frame, layout.deck, state);
    widgets::help_bar::render(frame, layout.help_bar, state);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal and installs a panic hook that restores it.
/// 2. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 3. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    default_count: u8,
    provider_active: bool,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Restore the terminal on panic before the default hook prints.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState {
        card_count: default_count,
        skeleton_count: default_count,
        provider_active,
        ..ViewState::default()
    };

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        // Channel closed: app is shutting down
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quitting = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quitting {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse events, resize events, etc. -- a resize is
                        // picked up by the next render tick.
                    }
                    Some(Err(_)) | None => {
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
