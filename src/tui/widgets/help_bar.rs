// Help bar: keyboard shortcut hints, varying with the input mode.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the bottom help bar.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let text = if state.editing_topic {
        " typing topic... | Enter:Generate | Esc:Done"
    } else {
        " t:Topic | Up/Down:Count | Enter/g:Generate | Left/Right:Select | Space:Flip | r:Reset | q:Quit"
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
