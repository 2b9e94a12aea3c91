//! Payment screenshot loading.

use std::path::Path;

use marquee_domain::Screenshot;
use tokio::fs;

/// Error type for screenshot loading.
#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    /// IO error while reading the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not look like an image.
    #[error("'{path}' is not an image (detected {mime})")]
    NotAnImage {
        /// Offending path.
        path: String,
        /// MIME type guessed from the extension.
        mime: String,
    },

    /// The file is empty.
    #[error("'{0}' is empty")]
    Empty(String),
}

/// Reads an image file for upload, guessing its MIME type from the
/// extension.
///
/// # Errors
/// Returns an error if the file cannot be read, is empty, or is not an
/// image.
pub async fn load_screenshot(path: &Path) -> Result<Screenshot, ScreenshotError> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(ScreenshotError::NotAnImage {
            path: path.display().to_string(),
            mime: mime.essence_str().to_string(),
        });
    }

    let bytes = fs::read(path).await?;
    if bytes.is_empty() {
        return Err(ScreenshotError::Empty(path.display().to_string()));
    }

    let file_name = path
        .file_name()
        .map_or_else(|| "screenshot".to_string(), |n| n.to_string_lossy().into_owned());

    Ok(Screenshot {
        file_name,
        content_type: mime.essence_str().to_string(),
        bytes,
    })
}
