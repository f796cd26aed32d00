//! Terminal UI module using ratatui.
//!
//! - `render`: Frame layout, navbar, status bar and overlays
//! - `input`: Keyboard event handling
//! - `styles`: Color palette and text styling
//! - `pages`: Per-route content (home, forms, API docs)

pub mod input;
pub mod pages;
pub mod render;
pub mod styles;
