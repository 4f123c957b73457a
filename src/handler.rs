// src/handler.rs
use anyhow::Result;
use log::{error, info, warn};

use crate::client::connector::{AnalysisConnector, Reply, TransportError};
use crate::form::{FormError, FormInput};
use crate::output::OutputSink;
use crate::render::renderer::{Rendered, ResponseRenderer};
use crate::render::response::AnalysisResponse;

pub const PENDING_MESSAGE: &str = "Analyzing your crop... Please wait 🌿";
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Error connecting to server. Check that the analysis backend is running.";

/// How one submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The form was rejected; nothing was sent.
    Blocked,
    Displayed(Rendered),
}

/// Runs one form submission end to end: validate, upload, render.
pub struct SubmitHandler<C> {
    connector: C,
    renderer: ResponseRenderer,
}

impl<C: AnalysisConnector> SubmitHandler<C> {
    pub fn new(connector: C, renderer: ResponseRenderer) -> Self {
        Self { connector, renderer }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Only a failing sink is an error; everything else ends up on screen.
    pub fn submit(&self, form: FormInput, sink: &mut dyn OutputSink) -> Result<Outcome> {
        let request = match form.into_request() {
            Ok(request) => request,
            Err(e) => {
                if !matches!(e, FormError::Missing) {
                    warn!("Form rejected: {}", e);
                }
                sink.alert(&e.to_string())?;
                return Ok(Outcome::Blocked);
            }
        };

        info!("Submitting query: {}", request.query);
        sink.pending(PENDING_MESSAGE)?;

        let rendered = self.interpret(self.connector.submit(&request));
        sink.render(&rendered.content, rendered.is_html)?;
        Ok(Outcome::Displayed(rendered))
    }

    fn interpret(&self, reply: Result<Reply, TransportError>) -> Rendered {
        match reply {
            Err(e) => {
                error!("Fetch error: {}", e);
                Rendered::text(CONNECTION_ERROR_MESSAGE)
            }
            Ok(reply) if !reply.is_success() => {
                Rendered::text(format!("Server error: {}", reply.status))
            }
            Ok(reply) => {
                let response = AnalysisResponse::from_body(&reply.body);
                match &response {
                    AnalysisResponse::Success { .. } => info!("Analysis succeeded"),
                    AnalysisResponse::Failure { error } => info!("Backend reported an error: {}", error),
                    AnalysisResponse::Unknown => warn!("Unrecognised response body: {}", reply.body),
                }
                self.renderer.render(&response)
            }
        }
    }
}
