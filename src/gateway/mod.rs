//! # Request Gateway
//!
//! Maps an outgoing intent to a single HTTP call and turns the response into
//! display text.
//!
//! ## Endpoints
//!
//! | Endpoint   | Path            | Body                      |
//! |------------|-----------------|---------------------------|
//! | `Chat`     | `/api/chat`     | `{"message": "..."}`      |
//! | `Analysis` | `/api/analysis` | `{"message": "..."}`      |
//! | `Upload`   | `/api/upload`   | multipart, field `file`   |
//!
//! Calls are single-shot: no retries and no timeout beyond what the
//! transport imposes. Every failure is a [`GatewayError`]; callers treat all
//! variants the same and only log the difference.

mod http;
mod reply;

pub use http::{HttpGateway, DEFAULT_API_URL};
pub use reply::Reply;

use crate::session::{FileRef, Module, Ticket};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// A backend route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Chat,
    Analysis,
    Upload,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Chat => "/api/chat",
            Endpoint::Analysis => "/api/analysis",
            Endpoint::Upload => "/api/upload",
        }
    }

    /// Text messages go to the analysis route only inside the analysis
    /// module; everything else, including no module, uses chat.
    pub fn for_module(module: Option<Module>) -> Self {
        match module {
            Some(Module::Analysis) => Endpoint::Analysis,
            Some(Module::Triage) | None => Endpoint::Chat,
        }
    }
}

/// JSON body for the chat and analysis routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatPayload {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response body is null")]
    NullBody,
}

/// The wire side of the client. [`HttpGateway`] is the real one.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn post_json(
        &self,
        endpoint: Endpoint,
        payload: &ChatPayload,
    ) -> Result<Reply, GatewayError>;

    async fn post_multipart(&self, endpoint: Endpoint, file: FileRef)
        -> Result<Reply, GatewayError>;
}

/// What a request sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Message { endpoint: Endpoint, text: String },
    Upload { file: FileRef },
}

impl Outgoing {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Outgoing::Message { endpoint, .. } => *endpoint,
            Outgoing::Upload { .. } => Endpoint::Upload,
        }
    }
}

/// An issued request: the payload plus the in-flight ticket it holds.
#[derive(Debug)]
pub struct Request {
    ticket: Ticket,
    outgoing: Outgoing,
}

impl Request {
    pub(crate) fn new(ticket: Ticket, outgoing: Outgoing) -> Self {
        Self { ticket, outgoing }
    }

    pub fn outgoing(&self) -> &Outgoing {
        &self.outgoing
    }

    pub fn endpoint(&self) -> Endpoint {
        self.outgoing.endpoint()
    }

    /// Perform the call. The ticket travels with the result so the
    /// controller can free the slot when it applies the completion.
    pub async fn run(self, gateway: &dyn Gateway) -> Completion {
        let endpoint = self.endpoint();
        tracing::debug!(path = endpoint.path(), "issuing request");
        let result = match self.outgoing {
            Outgoing::Message { endpoint, text } => {
                gateway
                    .post_json(endpoint, &ChatPayload { message: text })
                    .await
            }
            Outgoing::Upload { file } => gateway.post_multipart(Endpoint::Upload, file).await,
        };
        Completion {
            ticket: self.ticket,
            result: result.map(Reply::into_text),
        }
    }
}

/// The outcome of a [`Request`], ready to be applied to the session.
#[derive(Debug)]
pub struct Completion {
    pub(crate) ticket: Ticket,
    pub result: Result<String, GatewayError>,
}

impl Completion {
    pub fn endpoint(&self) -> Endpoint {
        self.ticket.endpoint()
    }
}
