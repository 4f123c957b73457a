// src/client/remote.rs
use anyhow::Result;
use log::{error, info};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use std::time::Duration;

use super::connector::{AnalysisConnector, Reply, TransportError};
use super::request::AnalysisRequest;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/analyze_crop";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

//Multipart client for the remote crop analysis backend
pub struct RemoteEndpoint {
    endpoint: String,
    client: Client,
}

impl RemoteEndpoint {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        info!("Using analysis endpoint: {}", endpoint);

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    //Check that something answers at the endpoint; any HTTP status counts
    pub fn probe(&self) -> Result<u16, TransportError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .map_err(|e| self.transport_error(e))?;
        Ok(response.status().as_u16())
    }

    fn transport_error(&self, source: reqwest::Error) -> TransportError {
        if source.is_timeout() {
            TransportError::Timeout {
                endpoint: self.endpoint.clone(),
            }
        } else {
            TransportError::Unreachable {
                endpoint: self.endpoint.clone(),
                source,
            }
        }
    }
}

impl AnalysisConnector for RemoteEndpoint {
    fn submit(&self, request: &AnalysisRequest) -> Result<Reply, TransportError> {
        let image = &request.image;
        info!(
            "Uploading {} ({}, {} bytes) to {}",
            image.file_name,
            image.mime,
            image.bytes.len(),
            self.endpoint
        );

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime)
            .map_err(|e| self.transport_error(e))?;
        let form = Form::new()
            .part("image", part)
            .text("query", request.query.clone());

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            // The body of a failed reply is only worth a log line
            let error_text = response.text().unwrap_or_default();
            error!("Server returned non-OK status: {} {}", status.as_u16(), error_text);
            return Ok(Reply {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body = response.text().map_err(|e| self.transport_error(e))?;
        Ok(Reply {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::request::{png_fixture, ImageUpload};
    use mockito::Matcher;

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            image: ImageUpload::from_bytes("field.png", png_fixture()),
            query: "Is this wheat rust?".to_string(),
        }
    }

    fn endpoint_for(server: &mockito::Server) -> RemoteEndpoint {
        let url = format!("{}/analyze_crop", server.url());
        RemoteEndpoint::new(&url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_submit_sends_multipart_fields() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/analyze_crop")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="image"; filename="field.png""#.to_string()),
                Matcher::Regex("Content-Type: image/png".to_string()),
                Matcher::Regex(r#"name="query""#.to_string()),
                Matcher::Regex("Is this wheat rust\\?".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"success","query":"Is this wheat rust?","result":"Looks healthy."}"#)
            .create();

        let reply = endpoint_for(&server).submit(&request()).unwrap();

        mock.assert();
        assert!(reply.is_success());
        assert!(reply.body.contains("Looks healthy."));
    }

    #[test]
    fn test_non_ok_status_is_returned_not_raised() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/analyze_crop")
            .with_status(500)
            .with_body(r#"{"error":"model exploded"}"#)
            .create();

        let reply = endpoint_for(&server).submit(&request()).unwrap();

        assert_eq!(reply.status, 500);
        assert!(!reply.is_success());
    }

    #[test]
    fn test_unreachable_backend_is_a_transport_error() {
        let endpoint =
            RemoteEndpoint::new("http://127.0.0.1:1/analyze_crop", Duration::from_secs(5)).unwrap();

        let err = endpoint.submit(&request()).unwrap_err();
        assert!(matches!(err, TransportError::Unreachable { .. }));
    }

    #[test]
    fn test_probe_reports_any_status() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/analyze_crop")
            .with_status(405)
            .create();

        assert_eq!(endpoint_for(&server).probe().unwrap(), 405);
    }
}
