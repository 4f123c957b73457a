// src/client/request.rs
use image::ImageFormat;
use log::warn;
use std::path::Path;

/// MIME type sent when neither the content nor the extension says otherwise.
pub const FALLBACK_MIME: &str = "image/jpeg";

/// The `image` part of the multipart body
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// The bytes are always sent as they are; only the MIME type is guessed.
    /// Content wins over the file extension.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = match image::guess_format(&bytes) {
            Ok(format) => mime_for(format),
            Err(_) => {
                let mime = mime_from_extension(&file_name);
                warn!("Could not identify {} from its content, sending as {}", file_name, mime);
                mime
            }
        };
        Self {
            file_name,
            mime,
            bytes,
        }
    }
}

fn mime_from_extension(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        // Formats the image crate cannot decode but vision backends accept
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        _ => ImageFormat::from_path(file_name)
            .map(mime_for)
            .unwrap_or(FALLBACK_MIME),
    }
}

fn mime_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        ImageFormat::Ico => "image/x-icon",
        ImageFormat::Avif => "image/avif",
        _ => FALLBACK_MIME,
    }
}

/// One submission: an image plus the question asked about it.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub image: ImageUpload,
    pub query: String,
}

#[cfg(test)]
pub(crate) fn png_fixture() -> Vec<u8> {
    use std::io::Cursor;

    let image = image::DynamicImage::ImageRgba8(image::RgbaImage::new(2, 2));
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), image::ImageOutputFormat::Png)
        .unwrap();
    buffer
}
