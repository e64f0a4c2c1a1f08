//! Error types for the color-key-masking crate.

use std::path::PathBuf;

/// Errors that can occur while loading, masking, and writing images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source image could not be opened or decoded.
    #[error("failed to load image {}: {source}", path.display())]
    Load {
        /// Path of the image that failed to load.
        path: PathBuf,
        /// Underlying decode error.
        source: image::ImageError,
    },

    /// The decoded image has a channel layout the engine cannot normalize.
    #[error("unsupported image layout: {layout}")]
    UnsupportedLayout {
        /// Name of the decoded layout (e.g. `La8`).
        layout: String,
    },

    /// The processed image could not be encoded or written.
    #[error("failed to write output {}: {source}", path.display())]
    Save {
        /// Destination path that failed.
        path: PathBuf,
        /// Underlying encode error.
        source: image::ImageError,
    },

    /// An I/O error occurred on the transport or filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A request line could not be decoded.
    #[error("invalid request: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let layout = Error::UnsupportedLayout {
            layout: "LumaA8".to_string(),
        };
        assert!(layout.to_string().contains("LumaA8"));
    }

    #[test]
    fn load_error_names_the_path() {
        let inner = image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = Error::Load {
            path: PathBuf::from("/tmp/nope.png"),
            source: inner,
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/nope.png"));
        assert!(msg.contains("missing"));
    }
}
