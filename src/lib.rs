//! HygieAI TUI - a terminal chat client for the HygieAI assistant
//!
//! This library provides the conversation model, the HTTP gateway to the
//! HygieAI backend (chat, blood test analysis and PDF upload), and the
//! terminal user interface that ties them together.

pub mod gateway;
pub mod i18n;
pub mod logging;
pub mod session;
pub mod ui;
