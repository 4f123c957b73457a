// src/client/connector.rs
use thiserror::Error;

use super::request::AnalysisRequest;

/// Raw HTTP reply from the analysis backend, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced an HTTP status.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("could not reach {endpoint}: {source}")]
    Unreachable {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Trait defining the interface for submitting an analysis request
pub trait AnalysisConnector: Send + Sync {
    /// Send one request and return whatever the server answered
    fn submit(&self, request: &AnalysisRequest) -> Result<Reply, TransportError>;
}
