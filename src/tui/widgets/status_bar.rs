// Status bar: app title, generation status, provider state.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::GenerationStatus;
use crate::tui::ViewState;

/// Render the top status bar.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (status_text, status_color) = status_indicator(state.status);
    let provider = if state.provider_active {
        Span::styled("provider: ready", Style::default().fg(Color::Green))
    } else {
        Span::styled("provider: no API key", Style::default().fg(Color::Red))
    };

    let line = Line::from(vec![
        Span::styled(" AmberCards ", Style::default().fg(Color::Black).bg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw(" | "),
        provider,
        Span::raw(" | "),
        Span::styled(
            deck_summary(state),
            Style::default().fg(Color::White),
        ),
    ]);

    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Status text and color for the generation cycle.
pub fn status_indicator(status: GenerationStatus) -> (&'static str, Color) {
    match status {
        GenerationStatus::Idle => ("idle", Color::DarkGray),
        GenerationStatus::Generating => ("generating...", Color::Yellow),
        GenerationStatus::Complete => ("deck ready", Color::Green),
        GenerationStatus::Error => ("error", Color::Red),
    }
}

fn deck_summary(state: &ViewState) -> String {
    if state.cards.is_empty() {
        "no deck".to_string()
    } else {
        format!("{} cards", state.cards.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_indicator_covers_all_states() {
        assert_eq!(status_indicator(GenerationStatus::Idle).0, "idle");
        assert_eq!(status_indicator(GenerationStatus::Generating).0, "generating...");
        assert_eq!(status_indicator(GenerationStatus::Complete).0, "deck ready");
        assert_eq!(status_indicator(GenerationStatus::Error).0, "error");
    }

    #[test]
    fn deck_summary_counts_cards() {
        let mut state = ViewState::default();
        assert_eq!(deck_summary(&state), "no deck");
        state.cards = vec![crate::deck::Flashcard {
            id: "card-test-0".into(),
            term: "t".into(),
            definition: "d".into(),
        }];
        assert_eq!(deck_summary(&state), "1 cards");
    }
}
