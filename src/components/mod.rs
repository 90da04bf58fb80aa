//! Reusable TUI components
//!
//! - `keybindings` - per-screen key registry (dispatch, nav bar, help)
//! - `floating_window` - centered popup over the current screen
//! - `nav_bar` - one-line key hint bar
//! - `help_overlay` - `?` help popup

pub mod floating_window;
pub mod help_overlay;
pub mod keybindings;
pub mod nav_bar;
