// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// orchestrator, or into local ViewState mutations (topic editing, count
// adjustment, card selection and flipping).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::deck::{MAX_CARD_COUNT, MIN_CARD_COUNT};
use crate::protocol::UserCommand;

use super::ViewState;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to
/// the app orchestrator (Generate, Reset, Quit). Returns `None` when the
/// key press was handled locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // Topic edit mode: capture printable characters and special keys
    if view_state.editing_topic {
        return handle_edit_mode(key_event, view_state);
    }

    // Browse mode key dispatch
    match key_event.code {
        // Enter the topic editor
        KeyCode::Char('t') => {
            view_state.editing_topic = true;
            None
        }

        // Card count adjustment, saturating at the supported bounds
        KeyCode::Up | KeyCode::Char('+') => {
            if view_state.card_count < MAX_CARD_COUNT {
                view_state.card_count += 1;
            }
            None
        }
        KeyCode::Down | KeyCode::Char('-') => {
            if view_state.card_count > MIN_CARD_COUNT {
                view_state.card_count -= 1;
            }
            None
        }

        // Submit (guarded: no-op while generating or with a blank topic)
        KeyCode::Enter | KeyCode::Char('g') => submit(view_state),

        // Card selection
        KeyCode::Left | KeyCode::Char('h') => {
            view_state.move_selection(-1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            view_state.move_selection(1);
            None
        }

        // Flip the selected card
        KeyCode::Char(' ') | KeyCode::Char('f') => {
            view_state.flip_selected();
            None
        }

        // Reset the deck
        KeyCode::Char('r') => Some(UserCommand::Reset),

        KeyCode::Char('q') => Some(UserCommand::Quit),

        _ => None,
    }
}

/// Handle key events while the topic field has focus.
///
/// - Printable characters are appended to the topic
/// - Backspace removes the last character
/// - Esc leaves the editor, keeping the text
/// - Enter leaves the editor and submits (subject to the usual guards)
fn handle_edit_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.editing_topic = false;
            None
        }
        KeyCode::Enter => {
            view_state.editing_topic = false;
            submit(view_state)
        }
        KeyCode::Backspace => {
            view_state.topic_input.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.topic_input.push(c);
            None
        }
        _ => None,
    }
}

/// Emit a Generate command when allowed. Submitting with a blank topic or
/// while a generation is in flight never leaves the TUI.
fn submit(view_state: &ViewState) -> Option<UserCommand> {
    if !view_state.can_submit() {
        return None;
    }
    Some(UserCommand::Generate {
        topic: view_state.topic_input.clone(),
        count: view_state.card_count,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Flashcard;
    use crate::protocol::GenerationStatus;
    use crossterm::event::{KeyEventState, KeyModifiers};

    /// Helper to create a KeyEvent with no modifiers.
    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    fn state_with_cards(n: usize) -> ViewState {
        let mut state = ViewState::default();
        state.cards = (0..n)
            .map(|i| Flashcard {
                id: format!("card-test-{i}"),
                term: format!("term {i}"),
                definition: format!("definition {i}"),
            })
            .collect();
        state.flipped = vec![false; n];
        state
    }

    // -- Mode switching and editing --

    #[test]
    fn t_enters_edit_mode() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('t')), &mut state).is_none());
        assert!(state.editing_topic);
    }

    #[test]
    fn typing_appends_to_topic() {
        let mut state = ViewState::default();
        state.editing_topic = true;
        for c in "Rust".chars() {
            handle_key(key(KeyCode::Char(c)), &mut state);
        }
        assert_eq!(state.topic_input, "Rust");
    }

    #[test]
    fn backspace_removes_last_char() {
        let mut state = ViewState::default();
        state.editing_topic = true;
        state.topic_input = "Rust".to_string();
        handle_key(key(KeyCode::Backspace), &mut state);
        assert_eq!(state.topic_input, "Rus");
    }

    #[test]
    fn esc_leaves_editor_keeping_text() {
        let mut state = ViewState::default();
        state.editing_topic = true;
        state.topic_input = "Rust".to_string();
        assert!(handle_key(key(KeyCode::Esc), &mut state).is_none());
        assert!(!state.editing_topic);
        assert_eq!(state.topic_input, "Rust");
    }

    #[test]
    fn q_while_editing_is_text_not_quit() {
        let mut state = ViewState::default();
        state.editing_topic = true;
        let result = handle_key(key(KeyCode::Char('q')), &mut state);
        assert!(result.is_none());
        assert_eq!(state.topic_input, "q");
    }

    // -- Submit guards --

    #[test]
    fn enter_in_editor_submits_when_allowed() {
        let mut state = ViewState::default();
        state.editing_topic = true;
        state.topic_input = "Baroque Art".to_string();
        state.card_count = 5;

        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(
            cmd,
            Some(UserCommand::Generate {
                topic: "Baroque Art".to_string(),
                count: 5
            })
        );
        assert!(!state.editing_topic);
    }

    #[test]
    fn empty_topic_never_submits() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());

        state.topic_input = "   ".to_string();
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());

        state.editing_topic = true;
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());
    }

    #[test]
    fn submit_blocked_while_generating() {
        let mut state = ViewState::default();
        state.topic_input = "Rust".to_string();
        state.status = GenerationStatus::Generating;
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());
        assert!(handle_key(key(KeyCode::Char('g')), &mut state).is_none());
    }

    #[test]
    fn g_submits_from_browse_mode() {
        let mut state = ViewState::default();
        state.topic_input = "Rust".to_string();
        let cmd = handle_key(key(KeyCode::Char('g')), &mut state);
        assert!(matches!(cmd, Some(UserCommand::Generate { .. })));
    }

    // -- Count adjustment --

    #[test]
    fn count_adjusts_and_saturates() {
        let mut state = ViewState::default();
        state.card_count = MAX_CARD_COUNT - 1;
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.card_count, MAX_CARD_COUNT);
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.card_count, MAX_CARD_COUNT);

        state.card_count = MIN_CARD_COUNT;
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.card_count, MIN_CARD_COUNT);
        handle_key(key(KeyCode::Char('+')), &mut state);
        assert_eq!(state.card_count, MIN_CARD_COUNT + 1);
    }

    // -- Card navigation and flipping --

    #[test]
    fn arrows_move_selection() {
        let mut state = state_with_cards(3);
        handle_key(key(KeyCode::Right), &mut state);
        assert_eq!(state.selected, 1);
        handle_key(key(KeyCode::Left), &mut state);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn space_flips_selected_card() {
        let mut state = state_with_cards(2);
        state.selected = 1;
        handle_key(key(KeyCode::Char(' ')), &mut state);
        assert_eq!(state.flipped, vec![false, true]);
    }

    // -- Commands --

    #[test]
    fn r_sends_reset() {
        let mut state = ViewState::default();
        assert_eq!(
            handle_key(key(KeyCode::Char('r')), &mut state),
            Some(UserCommand::Reset)
        );
    }

    #[test]
    fn q_sends_quit_from_browse_mode() {
        let mut state = ViewState::default();
        assert_eq!(
            handle_key(key(KeyCode::Char('q')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn ctrl_c_quits_even_while_editing() {
        let mut state = ViewState::default();
        state.editing_topic = true;
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn release_events_ignored() {
        let mut state = ViewState::default();
        state.editing_topic = true;
        assert!(handle_key(release(KeyCode::Char('x')), &mut state).is_none());
        assert!(state.topic_input.is_empty());
    }
}
