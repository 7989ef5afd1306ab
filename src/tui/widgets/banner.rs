// Context banner between the form and the deck grid.
//
// Shows exactly one of: the error from the last failed generation, the
// deck header once cards are ready, a progress note while generating, or
// an idle hint.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::protocol::GenerationStatus;
use crate::tui::ViewState;

/// Render the banner zone.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if let Some(error) = &state.error {
        let paragraph = Paragraph::new(Line::from(vec![
            Span::styled("✖ ", Style::default().fg(Color::Red)),
            Span::styled(error.clone(), Style::default().fg(Color::Red)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(paragraph, area);
        return;
    }

    let line = banner_line(state);
    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn banner_line(state: &ViewState) -> Line<'static> {
    match state.status {
        GenerationStatus::Generating => Line::from(Span::styled(
            format!(
                "Generating {} cards for \"{}\"...",
                state.skeleton_count, state.deck_topic
            ),
            Style::default().fg(Color::Yellow),
        )),
        GenerationStatus::Complete => Line::from(vec![
            Span::styled("Deck for: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("\"{}\"", state.deck_topic),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!("  —  {} flashcards", state.cards.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        _ => Line::from(Span::styled(
            "Ready to start learning? Enter a topic above and generate a deck.",
            Style::default().fg(Color::DarkGray),
        )),
    }
}
