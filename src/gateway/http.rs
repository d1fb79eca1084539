use super::{ChatPayload, Endpoint, Gateway, GatewayError, Reply};
use crate::session::FileRef;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;

/// Where the backend listens when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

const PDF_MIME: &str = "application/pdf";

/// [`Gateway`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn decode(endpoint: Endpoint, response: Response) -> Result<Reply, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status));
        }
        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;
        tracing::debug!(path = endpoint.path(), raw = %value, "raw response from backend");
        if value.is_null() {
            return Err(GatewayError::NullBody);
        }
        Ok(Reply::from(value))
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn post_json(
        &self,
        endpoint: Endpoint,
        payload: &ChatPayload,
    ) -> Result<Reply, GatewayError> {
        let response = self
            .http
            .post(self.url(endpoint))
            .json(payload)
            .send()
            .await?;
        Self::decode(endpoint, response).await
    }

    async fn post_multipart(
        &self,
        endpoint: Endpoint,
        file: FileRef,
    ) -> Result<Reply, GatewayError> {
        let size = file.bytes.len();
        let part = Part::bytes(file.bytes)
            .file_name(file.name.clone())
            .mime_str(PDF_MIME)?;
        let form = Form::new().part("file", part);
        tracing::debug!(file = %file.name, size, "uploading file");

        let response = self
            .http
            .post(self.url(endpoint))
            .multipart(form)
            .send()
            .await?;
        Self::decode(endpoint, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let gateway = HttpGateway::new("http://example.test:5000/");
        assert_eq!(gateway.base_url(), "http://example.test:5000");
        assert_eq!(
            gateway.url(Endpoint::Analysis),
            "http://example.test:5000/api/analysis"
        );
    }

    #[test]
    fn test_default_url() {
        let gateway = HttpGateway::new(DEFAULT_API_URL);
        assert_eq!(gateway.url(Endpoint::Chat), "http://localhost:5000/api/chat");
    }
}
