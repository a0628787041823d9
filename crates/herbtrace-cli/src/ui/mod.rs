//! TUI rendering components.

mod pages;
mod render;

pub use render::{draw, draw_with_boundary};
