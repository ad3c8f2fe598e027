// src/gateway/transport.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};

use crate::common::error::AppError;

/// Colaborador HTTP do gateway. Uma chamada, um JSON de volta.
///
/// Corpo vazio vira `Value::Null`. 404 vira `AppError::NotFound`; falha antes de
/// qualquer resposta vira `AppError::NoResponse`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, AppError>;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gestao-processos/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("cliente HTTP: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// Extrai `message` ou `error` do corpo de erro, quando o servidor manda JSON
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, AppError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("🔥 Sem resposta em {} {}: {}", method, url, e);
            AppError::NoResponse {
                method: method.to_string(),
                url: url.clone(),
                detail: e.to_string(),
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| AppError::NoResponse {
            method: method.to_string(),
            url: url.clone(),
            detail: e.to_string(),
        })?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            warn!("Erro HTTP {} em {} {}", status, method, url);
            return Err(AppError::Http {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_message_then_error() {
        assert_eq!(error_message(r#"{"message":"x","error":"y"}"#).as_deref(), Some("x"));
        assert_eq!(error_message(r#"{"error":"y"}"#).as_deref(), Some("y"));
        assert_eq!(error_message("<html>"), None);
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let transport = ReqwestTransport::new("http://localhost:5241/", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:5241");
    }

    #[tokio::test]
    async fn unreachable_server_is_reported_as_no_response() {
        // reserva uma porta livre e a libera: ninguém escuta ali
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let base_url = format!("http://127.0.0.1:{port}");
        let transport = ReqwestTransport::new(&base_url, Duration::from_secs(2)).unwrap();
        let err = transport.execute(Method::GET, "/areas", None).await.unwrap_err();
        assert!(matches!(err, AppError::NoResponse { .. }), "{err:?}");
    }
}
