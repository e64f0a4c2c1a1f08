//! Wire protocol: request and response objects, one JSON object per line.
//!
//! Each request is decoded once at the boundary into a closed [`Request`]
//! variant; unknown commands and missing fields fail the decode and surface
//! as error responses without ever reaching the engine.

use serde::{Deserialize, Serialize};

use crate::rules::ColorRule;

/// A decoded request, one variant per command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Request {
    /// Append one rule to the set.
    AddColor {
        /// Target color as `[red, green, blue]`.
        color: [u8; 3],
        /// Per-channel tolerance; defaults to 0.
        #[serde(default)]
        tolerance: u32,
    },
    /// Set the tolerance of one rule, or of every rule when `index` is
    /// absent.
    UpdateTolerance {
        /// New tolerance value.
        tolerance: u32,
        /// Rule position; out-of-range values are ignored.
        #[serde(default)]
        index: Option<usize>,
    },
    /// Replace the rule set and load a new source image.
    ProcessImage {
        /// Filesystem path of the image to load.
        path: String,
        /// Rules accompanying the image; defaults to an empty set.
        #[serde(default)]
        colors: Vec<ColorRule>,
    },
    /// Empty the rule set.
    ClearColors,
    /// Store edge-detection settings.
    UpdateEdgeSettings {
        /// Whether edge handling is enabled.
        enabled: bool,
        /// Edge sensitivity.
        sensitivity: u32,
    },
}

/// The response object written for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    /// The request was applied.
    Success {
        /// `"image-processed"` when the output image was rewritten.
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        /// Absolute, forward-slash-normalized path of the rewritten output.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// The request failed; session state is unchanged.
    Error {
        /// Human-readable failure description.
        message: String,
    },
}

impl Response {
    /// Plain success acknowledgement.
    #[must_use]
    pub const fn success() -> Self {
        Self::Success {
            kind: None,
            path: None,
        }
    }

    /// Success carrying the path of the rewritten output image.
    #[must_use]
    pub fn image_processed(path: impl Into<String>) -> Self {
        Self::Success {
            kind: Some("image-processed".to_owned()),
            path: Some(path.into()),
        }
    }

    /// Failure with a human-readable message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
