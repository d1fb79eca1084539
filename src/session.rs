//! # Session Model
//!
//! The single conversation state owned by [`crate::ui::App`].
//!
//! ## Invariants
//!
//! - The [`Transcript`] is append-only. Messages are never edited or removed
//!   one by one; the whole history is cleared only when a module is selected.
//! - [`InFlight`] has exactly one slot. A [`Ticket`] is handed out when the
//!   slot is taken and must be returned to free it, so two outstanding
//!   requests cannot exist at the same time.

use crate::gateway::Endpoint;
use crate::i18n::{Language, Strings};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Which top-level screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Chat,
}

/// A selectable assistant service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
    Analysis,
    Triage,
}

impl Module {
    /// Display order on the landing screen.
    pub const ALL: [Module; 2] = [Module::Analysis, Module::Triage];

    pub fn title(self, strings: &Strings) -> &'static str {
        match self {
            Module::Analysis => strings.analysis_title,
            Module::Triage => strings.triage_title,
        }
    }

    pub fn description(self, strings: &Strings) -> &'static str {
        match self {
            Module::Analysis => strings.analysis_description,
            Module::Triage => strings.triage_description,
        }
    }

    pub fn accepts_uploads(self) -> bool {
        matches!(self, Module::Analysis)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Module::Analysis => f.write_str("analysis"),
            Module::Triage => f.write_str("triage"),
        }
    }
}

impl FromStr for Module {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analysis" => Ok(Module::Analysis),
            "triage" => Ok(Module::Triage),
            other => Err(format!(
                "unknown module '{other}' (expected analysis or triage)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// What remains of an uploaded file once its request has been issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
}

/// One transcript entry.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub attachment: Option<Attachment>,
    pub sent_at: DateTime<Local>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            attachment: None,
            sent_at: Local::now(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
            attachment: None,
            sent_at: Local::now(),
        }
    }

    pub fn with_attachment(mut self, name: impl Into<String>) -> Self {
        self.attachment = Some(Attachment { name: name.into() });
        self
    }
}

/// Ordered, append-only message history.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    generation: u64,
}

impl Transcript {
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Bumped on every clear, so replies to requests issued before the
    /// clear can be recognised.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn clear(&mut self) {
        self.messages.clear();
        self.generation += 1;
    }
}

/// A PDF chosen for upload. Consumed by the upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileRef {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a PDF from disk. Anything without a `.pdf` extension is rejected
    /// before it is opened.
    pub fn from_pdf_path(path: &Path) -> Result<Self> {
        if !is_pdf_path(path) {
            bail!("Not a PDF file: {}", path.display());
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid file name: {}", path.display()))?
            .to_string();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
        Ok(Self { name, bytes })
    }
}

/// Case-insensitive `.pdf` extension check.
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Proof that the in-flight slot is held. Not `Clone`: there is only ever one.
#[derive(Debug)]
pub struct Ticket {
    endpoint: Endpoint,
    generation: u64,
}

impl Ticket {
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Transcript generation at the time the request was issued.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Single-slot guard for outstanding requests.
#[derive(Debug, Default)]
pub struct InFlight {
    slot: Option<Endpoint>,
}

impl InFlight {
    /// Take the slot, or `None` if a request is already outstanding.
    pub fn try_acquire(&mut self, endpoint: Endpoint, generation: u64) -> Option<Ticket> {
        if self.slot.is_some() {
            return None;
        }
        self.slot = Some(endpoint);
        Some(Ticket {
            endpoint,
            generation,
        })
    }

    pub fn release(&mut self, ticket: Ticket) {
        debug_assert_eq!(self.slot, Some(ticket.endpoint));
        self.slot = None;
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    pub fn current(&self) -> Option<Endpoint> {
        self.slot
    }
}

/// The whole per-process conversation state.
#[derive(Debug)]
pub struct Session {
    pub screen: Screen,
    pub module: Option<Module>,
    pub language: Language,
    pub transcript: Transcript,
    pub in_flight: InFlight,
}

impl Session {
    pub fn new(language: Language) -> Self {
        Self {
            screen: Screen::Home,
            module: None,
            language,
            transcript: Transcript::default(),
            in_flight: InFlight::default(),
        }
    }

    pub fn strings(&self) -> &'static Strings {
        self.language.strings()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_pending()
    }
}
