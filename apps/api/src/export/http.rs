use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::export::{DocumentExporter, ExportError, ExportOptions};

#[derive(Debug, Serialize)]
struct ExportRequest<'a> {
    html: &'a str,
    options: &'a ExportOptions,
}

/// Posts the document to an HTTP rasterization service and returns the PDF it
/// answers with. One attempt per export; failures are surfaced, never retried.
#[derive(Clone)]
pub struct HttpDocumentExporter {
    client: Client,
    endpoint: String,
}

impl HttpDocumentExporter {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, ExportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExportError::Transport(e.to_string()))?;
        Ok(Self { client, endpoint })
    }
}

fn is_unavailable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

#[async_trait]
impl DocumentExporter for HttpDocumentExporter {
    async fn export(&self, html: &str, options: &ExportOptions) -> Result<Bytes, ExportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ExportRequest { html, options })
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ExportError::ServiceUnavailable(e.to_string())
                } else {
                    ExportError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if is_unavailable_status(status) {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::ServiceUnavailable(format!(
                "export service answered {status}: {body}"
            )));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ExportError::Transport(e.to_string()))?;
        debug!(endpoint = %self.endpoint, size = bytes.len(), "export service returned document");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::post, Json, Router};
    use serde_json::Value;

    async fn spawn_service(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/render")
    }

    fn exporter(endpoint: String) -> HttpDocumentExporter {
        HttpDocumentExporter::new(endpoint, Duration::from_secs(5)).unwrap()
    }

    fn options() -> ExportOptions {
        ExportOptions::for_file("Resume.pdf".to_string())
    }

    #[tokio::test]
    async fn test_returns_service_bytes() {
        let app = Router::new().route(
            "/render",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["options"]["outputFileName"], "Resume.pdf");
                assert_eq!(body["html"], "<p>hi</p>");
                b"%PDF-1.7".to_vec()
            }),
        );
        let endpoint = spawn_service(app).await;

        let bytes = exporter(endpoint).export("<p>hi</p>", &options()).await.unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_503_maps_to_service_unavailable() {
        let app = Router::new().route(
            "/render",
            post(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "warming up") }),
        );
        let endpoint = spawn_service(app).await;

        let err = exporter(endpoint).export("<p/>", &options()).await.unwrap_err();
        assert!(matches!(err, ExportError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_400_maps_to_rejected() {
        let app = Router::new().route(
            "/render",
            post(|| async { (AxumStatus::BAD_REQUEST, "bad html") }),
        );
        let endpoint = spawn_service(app).await;

        let err = exporter(endpoint).export("<p/>", &options()).await.unwrap_err();
        match err {
            ExportError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad html");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        // Bind then drop to get a port nothing is listening on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = exporter(format!("http://{addr}/render"))
            .export("<p/>", &options())
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::ServiceUnavailable(_)));
    }
}
