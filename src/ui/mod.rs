//! # UI Module
//!
//! This module provides the terminal user interface components for HygieAI.
//!
//! ## Components
//!
//! - [`App`] - Controller owning the session and the view state around it
//! - [`mod@render`] - Rendering functions for drawing the TUI
//! - [`keys`] - Key press dispatch
//! - [`markdown`] - Markdown to styled lines for assistant replies
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │  ✚ HygieAI [EN]                                  │
//! ├─────────────────────────────────────────────────┤
//! │ Home: greeting, prompt, service list            │
//! │ Chat: transcript (scrollable)                   │
//! │       notice                                    │
//! │       input field                               │
//! ├─────────────────────────────────────────────────┤
//! │ Footer (key hints)                              │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod config;
pub mod keys;
pub mod markdown;
pub mod render;
pub mod theme;

pub use app::App;
pub use render::render;
