//! # Localized Strings
//!
//! Static string tables for every language the client speaks. Rendering code
//! and the controller look strings up through [`Language::strings`] so a
//! language switch takes effect on the next frame.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Tr,
}

impl Language {
    /// Short code used in config files and on the command line.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
        }
    }

    /// The other language. There are only two.
    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Tr,
            Language::Tr => Language::En,
        }
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Language::En => &EN,
            Language::Tr => &TR,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "tr" => Ok(Language::Tr),
            other => Err(format!("unsupported language '{other}' (expected en or tr)")),
        }
    }
}

/// Every user-visible string, one field per use site.
#[derive(Debug)]
pub struct Strings {
    pub greeting: &'static str,
    pub greeting_subtitle: &'static str,
    pub prompt_placeholder: &'static str,
    pub reply_placeholder: &'static str,
    pub file_prompt_title: &'static str,
    pub modules_title: &'static str,
    pub analysis_title: &'static str,
    pub analysis_description: &'static str,
    pub triage_title: &'static str,
    pub triage_description: &'static str,
    pub general_chat_title: &'static str,
    pub thinking: &'static str,
    pub you: &'static str,
    pub assistant: &'static str,
    pub uploaded_label: &'static str,
    pub connection_error: &'static str,
    pub upload_error: &'static str,
    pub not_a_pdf: &'static str,
    pub unreadable_file: &'static str,
    pub home_help: &'static str,
    pub chat_help: &'static str,
    pub analysis_help: &'static str,
    pub file_prompt_help: &'static str,
}

static EN: Strings = Strings {
    greeting: "How may I help you today?",
    greeting_subtitle: "Type out your problem and we will diagnose it for you.",
    prompt_placeholder: "Enter your prompt here.",
    reply_placeholder: "Reply...",
    file_prompt_title: "Path to a PDF file",
    modules_title: "Services",
    analysis_title: "Blood Test Analysis",
    analysis_description: "Upload a blood test PDF or ask about your results.",
    triage_title: "Triage",
    triage_description: "Describe your symptoms and get guidance on where to seek care.",
    general_chat_title: "Chat",
    thinking: "Thinking...",
    you: "You",
    assistant: "HygieAI",
    uploaded_label: "Uploaded",
    connection_error: "Sorry, I'm having trouble connecting to the server.",
    upload_error: "Sorry, the file could not be uploaded. Please try again.",
    not_a_pdf: "Only PDF files can be uploaded.",
    unreadable_file: "The selected file could not be read.",
    home_help: "[Enter] Send / Open service  [↑↓/Tab] Select service  [Ctrl+T] Türkçe  [Esc] Quit",
    chat_help: "[Enter] Send  [PgUp/PgDn] Scroll  [Ctrl+T] Türkçe  [Esc] Back  [Ctrl+C] Quit",
    analysis_help: "[Enter] Send  [Ctrl+O] Upload PDF  [PgUp/PgDn] Scroll  [Ctrl+T] Türkçe  [Esc] Back",
    file_prompt_help: "[Enter] Upload  [Esc] Cancel",
};

static TR: Strings = Strings {
    greeting: "Bugün size nasıl yardımcı olabilirim?",
    greeting_subtitle: "Sorununuzu yazın, sizin için değerlendirelim.",
    prompt_placeholder: "Mesajınızı buraya yazın.",
    reply_placeholder: "Yanıtla...",
    file_prompt_title: "PDF dosyasının yolu",
    modules_title: "Hizmetler",
    analysis_title: "Kan Tahlili Analizi",
    analysis_description: "Kan tahlili PDF'inizi yükleyin veya sonuçlarınızı sorun.",
    triage_title: "Triyaj",
    triage_description: "Belirtilerinizi anlatın, nereye başvurmanız gerektiğini öğrenin.",
    general_chat_title: "Sohbet",
    thinking: "Düşünüyor...",
    you: "Siz",
    assistant: "HygieAI",
    uploaded_label: "Yüklendi",
    connection_error: "Üzgünüm, sunucuya bağlanırken sorun yaşıyorum.",
    upload_error: "Üzgünüm, dosya yüklenemedi. Lütfen tekrar deneyin.",
    not_a_pdf: "Yalnızca PDF dosyaları yüklenebilir.",
    unreadable_file: "Seçilen dosya okunamadı.",
    home_help: "[Enter] Gönder / Hizmeti aç  [↑↓/Tab] Hizmet seç  [Ctrl+T] English  [Esc] Çıkış",
    chat_help: "[Enter] Gönder  [PgUp/PgDn] Kaydır  [Ctrl+T] English  [Esc] Geri  [Ctrl+C] Çıkış",
    analysis_help: "[Enter] Gönder  [Ctrl+O] PDF yükle  [PgUp/PgDn] Kaydır  [Ctrl+T] English  [Esc] Geri",
    file_prompt_help: "[Enter] Yükle  [Esc] İptal",
};
