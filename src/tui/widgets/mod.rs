// TUI widget modules for each screen zone.

pub mod banner;
pub mod card_grid;
pub mod form;
pub mod help_bar;
pub mod status_bar;
