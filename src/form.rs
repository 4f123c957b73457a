// src/form.rs
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::client::request::{AnalysisRequest, ImageUpload};

pub const MISSING_INPUT_MESSAGE: &str = "Please provide both image and query.";

#[derive(Debug, Error)]
pub enum FormError {
    #[error("{}", MISSING_INPUT_MESSAGE)]
    Missing,

    #[error("Could not read image {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What the user filled in. Either field may still be empty.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub image: Option<PathBuf>,
    pub query: String,
}

impl FormInput {
    pub fn new(image: Option<PathBuf>, query: impl Into<String>) -> Self {
        Self {
            image,
            query: query.into(),
        }
    }

    /// Build the request, reading the image from disk.
    pub fn into_request(self) -> Result<AnalysisRequest, FormError> {
        let path = match self.image {
            Some(path) if !self.query.is_empty() => path,
            _ => return Err(FormError::Missing),
        };

        let bytes = std::fs::read(&path).map_err(|source| FormError::Unreadable {
            path: path.clone(),
            source,
        })?;
        let image = ImageUpload::from_bytes(file_name(&path), bytes);

        Ok(AnalysisRequest {
            image,
            query: self.query,
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}
