use crate::gateway::{Completion, Endpoint, Gateway, Outgoing, Request};
use crate::i18n::{Language, Strings};
use crate::session::{is_pdf_path, FileRef, Message, Module, Screen, Session};
use std::path::PathBuf;

/// What the text field is currently collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Prompt,
    FilePath,
}

/// Application controller: owns the [`Session`] plus the view-only state
/// around it (text fields, landing highlight, transcript scroll).
pub struct App {
    pub session: Session,
    pub input: String,
    pub file_input: String,
    pub mode: InputMode,
    pub home_selected: usize,
    /// Lines scrolled up from the newest entry. Zero keeps the view pinned.
    pub transcript_scroll: u16,
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(language: Language) -> Self {
        Self {
            session: Session::new(language),
            input: String::new(),
            file_input: String::new(),
            mode: InputMode::Prompt,
            home_selected: 0,
            transcript_scroll: 0,
            notice: None,
            should_quit: false,
        }
    }

    pub fn strings(&self) -> &'static Strings {
        self.session.strings()
    }

    pub fn is_pending(&self) -> bool {
        self.session.is_pending()
    }

    pub fn messages(&self) -> &[Message] {
        self.session.transcript.messages()
    }

    // -- Navigation --

    pub fn select_module(&mut self, module: Module) {
        tracing::debug!(%module, "module selected");
        self.session.module = Some(module);
        self.session.transcript.clear();
        self.session.screen = Screen::Chat;
        self.input.clear();
        self.close_file_prompt();
        self.notice = None;
        self.transcript_scroll = 0;
    }

    /// Back to the landing screen. History survives until the next module
    /// selection.
    pub fn go_home(&mut self) {
        self.session.screen = Screen::Home;
        self.close_file_prompt();
        self.notice = None;
    }

    pub fn selected_module(&self) -> Module {
        Module::ALL[self.home_selected % Module::ALL.len()]
    }

    pub fn next_module(&mut self) {
        self.home_selected = (self.home_selected + 1) % Module::ALL.len();
    }

    pub fn previous_module(&mut self) {
        if self.home_selected > 0 {
            self.home_selected -= 1;
        } else {
            self.home_selected = Module::ALL.len() - 1;
        }
    }

    pub fn set_language(&mut self, language: Language) {
        tracing::debug!(%language, "language changed");
        self.session.language = language;
        self.notice = None;
    }

    pub fn toggle_language(&mut self) {
        self.set_language(self.session.language.toggled());
    }

    // -- Request lifecycle --

    /// Optimistically append the user's message and take the in-flight slot.
    /// Returns `None` (and changes nothing) for blank text or while another
    /// request is outstanding.
    pub fn begin_send(&mut self, text: &str) -> Option<Request> {
        if text.trim().is_empty() {
            return None;
        }
        let endpoint = Endpoint::for_module(self.session.module);
        let ticket = self
            .session
            .in_flight
            .try_acquire(endpoint, self.session.transcript.generation())?;

        if self.session.screen == Screen::Home {
            self.session.screen = Screen::Chat;
        }
        self.push(Message::user(text));
        Some(Request::new(
            ticket,
            Outgoing::Message {
                endpoint,
                text: text.to_string(),
            },
        ))
    }

    pub fn begin_upload(&mut self, file: FileRef) -> Option<Request> {
        let ticket = self
            .session
            .in_flight
            .try_acquire(Endpoint::Upload, self.session.transcript.generation())?;

        let label = format!("{}: {}", self.strings().uploaded_label, file.name);
        self.push(Message::user(label).with_attachment(file.name.clone()));
        Some(Request::new(ticket, Outgoing::Upload { file }))
    }

    /// Apply a finished request: append the reply (or the localized apology)
    /// and free the slot.
    pub fn complete(&mut self, completion: Completion) {
        let Completion { ticket, result } = completion;
        let endpoint = ticket.endpoint();
        let stale = ticket.generation() != self.session.transcript.generation();
        self.session.in_flight.release(ticket);

        if stale {
            tracing::debug!(path = endpoint.path(), "dropping reply for a cleared conversation");
            return;
        }

        let text = match result {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = endpoint.path(), error = %e, "request failed");
                failure_text(endpoint, self.strings()).to_string()
            }
        };
        self.push(Message::bot(text));
    }

    /// Send and wait for the reply in one step. Returns whether a request was
    /// issued at all.
    pub async fn send_message_with(&mut self, gateway: &dyn Gateway, text: &str) -> bool {
        match self.begin_send(text) {
            Some(request) => {
                let completion = request.run(gateway).await;
                self.complete(completion);
                true
            }
            None => false,
        }
    }

    pub async fn upload_file_with(&mut self, gateway: &dyn Gateway, file: FileRef) -> bool {
        match self.begin_upload(file) {
            Some(request) => {
                let completion = request.run(gateway).await;
                self.complete(completion);
                true
            }
            None => false,
        }
    }

    fn push(&mut self, message: Message) {
        self.session.transcript.push(message);
        self.transcript_scroll = 0;
    }

    // -- Input form --

    pub fn input_push_char(&mut self, c: char) {
        if self.is_pending() {
            return;
        }
        match self.mode {
            InputMode::Prompt => self.input.push(c),
            InputMode::FilePath => self.file_input.push(c),
        }
    }

    pub fn input_pop_char(&mut self) {
        if self.is_pending() {
            return;
        }
        match self.mode {
            InputMode::Prompt => {
                self.input.pop();
            }
            InputMode::FilePath => {
                self.file_input.pop();
            }
        }
    }

    /// Submit the text field. The field is cleared only when a request was
    /// actually issued.
    pub fn submit_input(&mut self) -> Option<Request> {
        let text = self.input.clone();
        let request = self.begin_send(&text)?;
        self.input.clear();
        Some(request)
    }

    pub fn can_upload(&self) -> bool {
        self.session.screen == Screen::Chat
            && self.session.module.is_some_and(Module::accepts_uploads)
    }

    pub fn open_file_prompt(&mut self) {
        if !self.can_upload() || self.is_pending() {
            return;
        }
        self.mode = InputMode::FilePath;
        self.file_input.clear();
        self.notice = None;
    }

    pub fn close_file_prompt(&mut self) {
        self.mode = InputMode::Prompt;
        self.file_input.clear();
    }

    /// Validate the typed path and start the upload. Problems with the file
    /// become a notice; the transcript is untouched.
    pub fn submit_file_prompt(&mut self) -> Option<Request> {
        if self.is_pending() {
            return None;
        }
        let raw = self.file_input.trim();
        if raw.is_empty() {
            return None;
        }
        let path = expand_home(raw);
        if !is_pdf_path(&path) {
            self.notice = Some(self.strings().not_a_pdf.to_string());
            return None;
        }
        let file = match FileRef::from_pdf_path(&path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("{e:#}");
                self.notice = Some(self.strings().unreadable_file.to_string());
                return None;
            }
        };
        self.close_file_prompt();
        self.notice = None;
        self.begin_upload(file)
    }

    // -- Transcript scrolling --

    pub fn scroll_up(&mut self, lines: u16) {
        self.transcript_scroll = self.transcript_scroll.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
    }

    pub fn pin_to_bottom(&mut self) {
        self.transcript_scroll = 0;
    }

    /// Title for the chat pane.
    pub fn conversation_title(&self) -> &'static str {
        let strings = self.strings();
        match self.session.module {
            Some(module) => module.title(strings),
            None => strings.general_chat_title,
        }
    }
}

/// The apology shown when a request of this kind fails.
pub fn failure_text(endpoint: Endpoint, strings: &Strings) -> &'static str {
    match endpoint {
        Endpoint::Upload => strings.upload_error,
        Endpoint::Chat | Endpoint::Analysis => strings.connection_error,
    }
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(dirs) = directories::BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(raw)
}
