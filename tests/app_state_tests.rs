//! Application state tests
//!
//! Tests for the conversation controller: optimistic appends, the single
//! in-flight slot, reply normalization, localized failures, and module
//! transitions. Requests run against an in-memory gateway.

use async_trait::async_trait;
use hygieai::gateway::{ChatPayload, Endpoint, Gateway, GatewayError, Reply};
use hygieai::i18n::Language;
use hygieai::session::{FileRef, Module, Role, Screen};
use hygieai::ui::App;
use serde_json::{json, Value};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Json(Endpoint, String),
    Multipart(Endpoint, String),
}

/// Gateway that records every call and answers with a fixed JSON body, or
/// fails when no body is configured.
struct FakeGateway {
    body: Option<Value>,
    calls: Mutex<Vec<Call>>,
}

impl FakeGateway {
    fn replying(body: Value) -> Self {
        Self {
            body: Some(body),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            body: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn answer(&self) -> Result<Reply, GatewayError> {
        match &self.body {
            Some(body) => Ok(Reply::from(body.clone())),
            None => Err(GatewayError::Status(reqwest::StatusCode::BAD_GATEWAY)),
        }
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn post_json(
        &self,
        endpoint: Endpoint,
        payload: &ChatPayload,
    ) -> Result<Reply, GatewayError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(Call::Json(endpoint, payload.message.clone()));
        self.answer()
    }

    async fn post_multipart(
        &self,
        endpoint: Endpoint,
        file: FileRef,
    ) -> Result<Reply, GatewayError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(Call::Multipart(endpoint, file.name));
        self.answer()
    }
}

fn pdf(name: &str) -> FileRef {
    FileRef::new(name, b"%PDF-1.4 test".to_vec())
}

#[tokio::test]
async fn test_send_appends_user_then_bot() {
    let gateway = FakeGateway::replying(json!({"text": "Please rest and drink fluids."}));
    let mut app = App::new(Language::En);
    app.select_module(Module::Triage);

    assert!(app.send_message_with(&gateway, "I have a fever").await);

    let messages = app.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].text, "I have a fever");
    assert_eq!(messages[1].role, Role::Bot);
    assert_eq!(messages[1].text, "Please rest and drink fluids.");
    assert!(!app.is_pending());
}

#[tokio::test]
async fn test_each_send_grows_transcript_by_two() {
    let gateway = FakeGateway::replying(json!("ok"));
    let mut app = App::new(Language::En);

    for (i, text) in ["one", "two", "three"].iter().enumerate() {
        app.send_message_with(&gateway, text).await;
        assert_eq!(app.messages().len(), (i + 1) * 2);
    }

    let failing = FakeGateway::failing();
    app.send_message_with(&failing, "four").await;
    assert_eq!(app.messages().len(), 8);
}

#[tokio::test]
async fn test_user_message_is_appended_before_reply() {
    let mut app = App::new(Language::En);
    let request = app.begin_send("chest pain").expect("issued");

    assert_eq!(app.messages().len(), 1);
    assert_eq!(app.messages()[0].role, Role::User);
    assert!(app.is_pending());

    let completion = request.run(&FakeGateway::replying(json!("seek care"))).await;
    app.complete(completion);
    assert_eq!(app.messages().len(), 2);
    assert!(!app.is_pending());
}

#[tokio::test]
async fn test_blank_text_is_noop() {
    let gateway = FakeGateway::replying(json!("unused"));
    let mut app = App::new(Language::En);

    for text in ["", "   ", "\t\n"] {
        assert!(!app.send_message_with(&gateway, text).await);
    }

    assert!(app.messages().is_empty());
    assert!(!app.is_pending());
    assert_eq!(app.session.screen, Screen::Home);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_second_intent_while_pending_is_dropped() {
    let mut app = App::new(Language::En);
    app.select_module(Module::Analysis);

    let first = app.begin_send("first").expect("issued");
    assert!(app.begin_send("second").is_none());
    assert!(app.begin_upload(pdf("cbc.pdf")).is_none());
    assert_eq!(app.messages().len(), 1);

    let completion = first.run(&FakeGateway::replying(json!("done"))).await;
    app.complete(completion);
    assert_eq!(app.messages().len(), 2);

    // Slot is free again
    assert!(app.begin_send("third").is_some());
}

#[tokio::test]
async fn test_reply_normalization_via_controller() {
    let cases = [
        (json!("hello"), "hello"),
        (json!({"text": "hi"}), "hi"),
        (json!({"response": "hi"}), "hi"),
        (json!({"foo": "bar"}), r#"{"foo":"bar"}"#),
    ];

    for (body, expected) in cases {
        let gateway = FakeGateway::replying(body);
        let mut app = App::new(Language::En);
        app.send_message_with(&gateway, "question").await;
        assert_eq!(app.messages()[1].text, expected);
    }
}

#[tokio::test]
async fn test_failure_appends_english_apology() {
    let mut app = App::new(Language::En);
    app.send_message_with(&FakeGateway::failing(), "hello").await;

    assert_eq!(
        app.messages()[1].text,
        "Sorry, I'm having trouble connecting to the server."
    );
    assert!(!app.is_pending());
}

#[tokio::test]
async fn test_failure_in_turkish_uses_turkish_string() {
    let mut app = App::new(Language::Tr);
    app.send_message_with(&FakeGateway::failing(), "merhaba").await;

    let bot = &app.messages()[1];
    assert_eq!(bot.role, Role::Bot);
    assert_eq!(bot.text, Language::Tr.strings().connection_error);
    assert_ne!(bot.text, Language::En.strings().connection_error);
}

#[tokio::test]
async fn test_language_change_does_not_retranslate_history() {
    let mut app = App::new(Language::En);
    app.send_message_with(&FakeGateway::failing(), "hello").await;

    app.set_language(Language::Tr);
    app.send_message_with(&FakeGateway::failing(), "merhaba").await;

    assert_eq!(app.messages()[1].text, Language::En.strings().connection_error);
    assert_eq!(app.messages()[3].text, Language::Tr.strings().connection_error);
}

#[tokio::test]
async fn test_select_module_clears_history() {
    let mut app = App::new(Language::En);
    app.send_message_with(&FakeGateway::replying(json!("hi")), "hello").await;
    assert_eq!(app.messages().len(), 2);

    app.select_module(Module::Analysis);
    assert!(app.messages().is_empty());
    assert_eq!(app.session.screen, Screen::Chat);
    assert_eq!(app.session.module, Some(Module::Analysis));
}

#[tokio::test]
async fn test_go_home_keeps_history() {
    let mut app = App::new(Language::En);
    app.select_module(Module::Triage);
    app.send_message_with(&FakeGateway::replying(json!("hi")), "hello").await;

    app.go_home();
    assert_eq!(app.session.screen, Screen::Home);
    assert_eq!(app.messages().len(), 2);
}

#[tokio::test]
async fn test_text_routes_by_module() {
    let gateway = FakeGateway::replying(json!("ok"));
    let mut app = App::new(Language::En);

    app.send_message_with(&gateway, "general").await;
    app.select_module(Module::Triage);
    app.send_message_with(&gateway, "triage").await;
    app.select_module(Module::Analysis);
    app.send_message_with(&gateway, "analysis").await;

    assert_eq!(
        gateway.calls(),
        vec![
            Call::Json(Endpoint::Chat, "general".to_string()),
            Call::Json(Endpoint::Chat, "triage".to_string()),
            Call::Json(Endpoint::Analysis, "analysis".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_upload_uses_upload_endpoint_and_records_attachment() {
    let gateway = FakeGateway::replying(json!({"response": "Your hemoglobin is normal."}));
    let mut app = App::new(Language::En);
    app.select_module(Module::Analysis);

    assert!(app.upload_file_with(&gateway, pdf("cbc.pdf")).await);

    let user = &app.messages()[0];
    assert_eq!(user.role, Role::User);
    assert_eq!(user.text, "Uploaded: cbc.pdf");
    assert_eq!(
        user.attachment.as_ref().map(|a| a.name.as_str()),
        Some("cbc.pdf")
    );
    assert_eq!(app.messages()[1].text, "Your hemoglobin is normal.");
    assert_eq!(
        gateway.calls(),
        vec![Call::Multipart(Endpoint::Upload, "cbc.pdf".to_string())]
    );
}

#[tokio::test]
async fn test_upload_failure_uses_upload_string() {
    let mut app = App::new(Language::Tr);
    app.select_module(Module::Analysis);
    app.upload_file_with(&FakeGateway::failing(), pdf("cbc.pdf")).await;

    assert_eq!(app.messages().len(), 2);
    assert_eq!(app.messages()[0].text, "Yüklendi: cbc.pdf");
    assert_eq!(app.messages()[1].text, Language::Tr.strings().upload_error);
    assert!(!app.is_pending());
}

#[tokio::test]
async fn test_reply_after_module_switch_is_discarded() {
    let mut app = App::new(Language::En);
    app.select_module(Module::Triage);
    let request = app.begin_send("old question").expect("issued");

    app.select_module(Module::Analysis);
    let completion = request.run(&FakeGateway::replying(json!("old answer"))).await;
    app.complete(completion);

    assert!(app.messages().is_empty());
    assert!(!app.is_pending());
}

#[test]
fn test_submit_input_clears_field_only_when_sent() {
    let mut app = App::new(Language::En);
    app.select_module(Module::Triage);

    app.input = "   ".to_string();
    assert!(app.submit_input().is_none());
    assert_eq!(app.input, "   ");

    app.input = "headache".to_string();
    let _request = app.submit_input().expect("issued");
    assert!(app.input.is_empty());

    app.input = "again".to_string();
    assert!(app.submit_input().is_none());
    assert_eq!(app.input, "again");
}

#[test]
fn test_typing_ignored_while_pending() {
    let mut app = App::new(Language::En);
    app.select_module(Module::Triage);
    let _request = app.begin_send("question").expect("issued");

    app.input_push_char('x');
    app.input_pop_char();
    assert!(app.input.is_empty());
}

#[test]
fn test_new_message_repins_transcript() {
    let mut app = App::new(Language::En);
    app.select_module(Module::Triage);
    app.scroll_up(20);
    assert_eq!(app.transcript_scroll, 20);

    let _request = app.begin_send("question").expect("issued");
    assert_eq!(app.transcript_scroll, 0);
}
