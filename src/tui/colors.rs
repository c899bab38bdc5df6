//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Priority;

/// Used for High priority rows
pub const DARK_RED: Color = Color::Rgb(170, 30, 30);
/// Used for Medium priority rows
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for Low priority rows
pub const DARK_GREEN: Color = Color::Rgb(60, 140, 60);
/// Header and status bar background
pub const SLATE: Color = Color::Rgb(40, 60, 90);

/// Row color for a task priority.
pub fn priority_color(p: Priority) -> Color {
    match p {
        Priority::High => DARK_RED,
        Priority::Medium => GOLD,
        Priority::Low => DARK_GREEN,
    }
}
