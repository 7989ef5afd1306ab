// Input form: topic field, card count selector, generate control.
//
// Mirrors the submit guards: the generate control renders disabled while a
// generation is in flight or the topic is blank.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::deck::{MAX_CARD_COUNT, MIN_CARD_COUNT};
use crate::protocol::GenerationStatus;
use crate::tui::ViewState;

const TOPIC_PLACEHOLDER: &str = "e.g. Quantum Physics, Baroque Art, Rust lifetimes...";

/// Render the form panel.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let topic_line = build_topic_line(state);
    let count_line = build_count_line(state);
    let generate_line = build_generate_line(state);

    let lines = vec![
        topic_line,
        Line::raw(""),
        count_line,
        Line::raw(""),
        generate_line,
    ];

    let border_style = if state.editing_topic {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("New Deck")
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);
}

fn build_topic_line(state: &ViewState) -> Line<'static> {
    let mut spans = vec![Span::styled(
        " Topic: ",
        Style::default().add_modifier(Modifier::BOLD),
    )];

    if state.topic_input.is_empty() && !state.editing_topic {
        spans.push(Span::styled(
            TOPIC_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(state.topic_input.clone()));
    }

    if state.editing_topic {
        // Block cursor at the end of the input.
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    } else {
        spans.push(Span::styled(
            "  (t to edit)",
            Style::default().fg(Color::DarkGray),
        ));
    }

    Line::from(spans)
}

fn build_count_line(state: &ViewState) -> Line<'static> {
    Line::from(vec![
        Span::styled(" Cards: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("{:2}", state.card_count),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(count_gauge(state.card_count), Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("  ({MIN_CARD_COUNT}-{MAX_CARD_COUNT}, Up/Down to adjust)"),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// A textual gauge: one filled cell per selectable count step.
fn count_gauge(count: u8) -> String {
    let filled = (count - MIN_CARD_COUNT) as usize + 1;
    let total = (MAX_CARD_COUNT - MIN_CARD_COUNT) as usize + 1;
    let mut gauge = String::with_capacity(total * 3);
    for i in 0..total {
        gauge.push(if i < filled { '▮' } else { '▯' });
    }
    gauge
}

fn build_generate_line(state: &ViewState) -> Line<'static> {
    if state.status == GenerationStatus::Generating {
        return Line::from(vec![Span::styled(
            " Generating deck...",
            Style::default().fg(Color::Yellow),
        )]);
    }

    if state.can_submit() {
        Line::from(vec![
            Span::styled(
                " [ Generate ]",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  press Enter or g", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled(
                " [ Generate ]",
                Style::default().fg(Color::DarkGray).bg(Color::Black),
            ),
            Span::styled("  enter a topic first", Style::default().fg(Color::DarkGray)),
        ])
    }
}
