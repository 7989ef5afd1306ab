// The flashcard grid: flip-cards once a deck is ready, a skeleton grid
// sized to the requested count while generating, and an empty-state hint
// otherwise.
//
// Cards are laid out row-major in fixed-size cells. The row holding the
// selected card is always kept visible; rows above scroll out as the
// selection moves past the bottom of the zone.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::deck::Flashcard;
use crate::protocol::GenerationStatus;
use crate::tui::ViewState;

/// Fixed card cell size, chosen to fit a term and a few wrapped definition
/// lines.
const CARD_WIDTH: u16 = 30;
const CARD_HEIGHT: u16 = 8;

/// Render the deck zone.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if state.status == GenerationStatus::Generating {
        render_skeleton(frame, area, state.skeleton_count as usize);
        return;
    }

    if state.cards.is_empty() {
        render_empty_state(frame, area, state);
        return;
    }

    let cols = columns(area.width);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = state.selected / cols;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    for (index, card) in state.cards.iter().enumerate() {
        let row = index / cols;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let col = index % cols;
        let cell = Rect {
            x: area.x + col as u16 * CARD_WIDTH,
            y: area.y + (row - first_row) as u16 * CARD_HEIGHT,
            width: CARD_WIDTH.min(area.width.saturating_sub(col as u16 * CARD_WIDTH)),
            height: CARD_HEIGHT.min(area.height.saturating_sub((row - first_row) as u16 * CARD_HEIGHT)),
        };
        if cell.width < 10 || cell.height < 4 {
            continue;
        }
        let flipped = state.flipped.get(index).copied().unwrap_or(false);
        render_card(frame, cell, card, index, flipped, index == state.selected);
    }
}

/// Cards per row for the given zone width.
fn columns(width: u16) -> usize {
    ((width / CARD_WIDTH).max(1)) as usize
}

/// Render one flip-card cell: the term face or the definition face.
fn render_card(
    frame: &mut Frame,
    area: Rect,
    card: &Flashcard,
    index: usize,
    flipped: bool,
    selected: bool,
) {
    let (title, body, face_style) = if flipped {
        (
            format!(" Definition #{} ", index + 1),
            card.definition.clone(),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )
    } else {
        (
            format!(" Term #{} ", index + 1),
            card.term.clone(),
            Style::default().fg(Color::White),
        )
    };

    let border_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut lines = vec![Line::raw(""), Line::from(Span::styled(body, face_style))];
    if selected {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "Space to flip",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style),
        );
    frame.render_widget(paragraph, area);
}

/// Placeholder grid drawn while a generation is in flight, sized to the
/// requested count.
fn render_skeleton(frame: &mut Frame, area: Rect, count: usize) {
    let cols = columns(area.width);
    for index in 0..count {
        let row = index / cols;
        let col = index % cols;
        let cell = Rect {
            x: area.x + col as u16 * CARD_WIDTH,
            y: area.y + row as u16 * CARD_HEIGHT,
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
        };
        if cell.bottom() > area.bottom() || cell.right() > area.right() {
            continue;
        }
        let paragraph = Paragraph::new(vec![
            Line::raw(""),
            Line::from(Span::styled("· · ·", Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(paragraph, cell);
    }
}

fn render_empty_state(frame: &mut Frame, area: Rect, state: &ViewState) {
    // After a failure the banner already explains; keep the grid quiet.
    let text = if state.error.is_some() {
        ""
    } else {
        "No deck yet. Generate one from the form above."
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_scale_with_width() {
        assert_eq!(columns(29), 1);
        assert_eq!(columns(30), 1);
        assert_eq!(columns(60), 2);
        assert_eq!(columns(120), 4);
    }

    #[test]
    fn columns_never_zero() {
        assert_eq!(columns(0), 1);
        assert_eq!(columns(5), 1);
    }
}
