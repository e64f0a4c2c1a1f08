//! Interactive color-key image masking.
//!
//! Given a source image and a set of target colors, each with an independent
//! per-channel tolerance, every pixel within tolerance of any target is
//! rewritten as fully transparent black. The engine is driven incrementally:
//! rules can be added, retuned, or cleared one at a time, and each mutation
//! recomputes the output against the currently loaded source image.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use color_key_masking::MaskingEngine;
//!
//! let mut engine = MaskingEngine::new();
//! engine
//!     .process_image(Path::new("photo.png"), vec![])
//!     .expect("failed to load image");
//! let written = engine.add_color([255, 0, 0], 10).expect("failed to recompute");
//! println!("output at {}", written.unwrap());
//! ```
//!
//! # Service protocol
//!
//! The `color-key-service` binary speaks one JSON object per line over
//! stdin/stdout. Commands: `add-color`, `update-tolerance`, `process-image`,
//! `clear-colors`, and `update-edge-settings`. Every request is answered by
//! exactly one response object: `{"status":"success"}`, the same with
//! `"type":"image-processed"` and the output path when an image was
//! recomputed, or `{"status":"error","message":...}` on failure. See
//! [`protocol`] for the exact shapes and [`service`] for the loop.

#![deny(missing_docs)]

mod engine;
pub mod error;
pub mod masking;
pub mod protocol;
pub mod rules;
pub mod service;

pub use engine::{
    EdgeSettings, MaskingEngine, DEFAULT_OUTPUT_DIR, OUTPUT_FILE_NAME,
};
pub use error::{Error, Result};
pub use protocol::{Request, Response};
pub use rules::{ColorRule, ColorRuleSet, ZERO_TOLERANCE_WIDENING};
