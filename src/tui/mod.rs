//! TUI integration layer (crossterm + ratatui).
//!
//! Terminal lifecycle and escape-sequence helpers live here so `models` and
//! `services` stay free of terminal crates.

pub mod osc52;
pub mod terminal_guard;
