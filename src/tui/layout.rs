// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Form: topic, count, generate control (7 rows)     |
// +--------------------------------------------------+
// | Banner: error / deck header / hint (3 rows)       |
// +--------------------------------------------------+
// | Deck grid (fill)                                  |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: app title, generation status, provider state.
    pub status_bar: Rect,
    /// Input form: topic field, count selector, generate control.
    pub form: Rect,
    /// Context row: error banner, deck header, or idle hint.
    pub banner: Rect,
    /// The card grid (or skeleton / empty state).
    pub deck: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(7), // form
            Constraint::Length(3), // banner
            Constraint::Min(8),    // deck grid
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        form: vertical[1],
        banner: vertical[2],
        deck: vertical[3],
        help_bar: vertical[4],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zones_tile_the_full_area() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = build_layout(area);

        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.form.height, 7);
        assert_eq!(layout.banner.height, 3);
        assert_eq!(layout.help_bar.height, 1);

        let total: u16 = layout.status_bar.height
            + layout.form.height
            + layout.banner.height
            + layout.deck.height
            + layout.help_bar.height;
        assert_eq!(total, area.height);
    }

    #[test]
    fn deck_gets_the_remaining_space() {
        let layout = build_layout(Rect::new(0, 0, 80, 30));
        assert_eq!(layout.deck.height, 30 - 1 - 7 - 3 - 1);
        assert_eq!(layout.deck.width, 80);
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let layout = build_layout(Rect::new(0, 0, 10, 5));
        // Constraints can't all be satisfied; we only care that the zones
        // exist and stay inside the area.
        assert!(layout.help_bar.bottom() <= 5);
    }
}
