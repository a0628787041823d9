//! `HerbTrace` CLI Library
//!
//! Terminal front-end for recording and verifying herb batches.
//! Provides both TUI (ratatui) and headless modes.

pub mod app;
pub mod herb_cmd;
pub mod herb_fmt;
pub mod tui;
pub mod ui;
pub mod worker;
