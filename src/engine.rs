//! Masking session: rule set, current image, and recompute-on-mutation.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::error::{Error, Result};
use crate::masking;
use crate::rules::{ColorRule, ColorRuleSet};

/// Default directory, relative to the working directory, for the output file.
pub const DEFAULT_OUTPUT_DIR: &str = "temp";

/// File name of the recomputed output, overwritten on every recomputation.
pub const OUTPUT_FILE_NAME: &str = "processed_image.png";

/// Edge-detection settings carried in the session.
///
/// Stored verbatim from requests. They do not influence the mask; changing
/// them still triggers a recomputation like every other mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSettings {
    /// Whether edge handling is enabled.
    pub enabled: bool,
    /// Edge sensitivity as supplied by the host.
    pub sensitivity: u32,
}

impl Default for EdgeSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            sensitivity: 50,
        }
    }
}

/// The masking session: owns the rule set, the current source image, and the
/// output location.
///
/// Every mutating operation recomputes and rewrites the output image if and
/// only if a source image is currently held; with no image the mutation is
/// recorded and the first later load computes once. Create one engine per
/// connection and hand it to the service loop; there is no process-wide
/// state.
#[derive(Debug)]
pub struct MaskingEngine {
    rules: ColorRuleSet,
    source: Option<RgbaImage>,
    edge: EdgeSettings,
    output_dir: PathBuf,
}

impl MaskingEngine {
    /// Create a session writing output under [`DEFAULT_OUTPUT_DIR`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_output_dir(DEFAULT_OUTPUT_DIR)
    }

    /// Create a session writing [`OUTPUT_FILE_NAME`] under `output_dir`.
    ///
    /// The directory is created on demand before the first write.
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            rules: ColorRuleSet::new(),
            source: None,
            edge: EdgeSettings::default(),
            output_dir: output_dir.into(),
        }
    }

    /// The rules currently held, in insertion order.
    #[must_use]
    pub fn rules(&self) -> &ColorRuleSet {
        &self.rules
    }

    /// Whether a source image is currently held.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    /// The edge settings currently held.
    #[must_use]
    pub fn edge_settings(&self) -> EdgeSettings {
        self.edge
    }

    /// Append a rule, then recompute.
    ///
    /// # Errors
    ///
    /// Returns an error only if rewriting the output image fails.
    pub fn add_color(&mut self, rgb: [u8; 3], tolerance: u32) -> Result<Option<String>> {
        self.rules.add(rgb, tolerance);
        self.recompute()
    }

    /// Set the tolerance of one rule (or of every rule when `index` is
    /// `None`), then recompute.
    ///
    /// Out-of-range indices leave the rule set unchanged; the recomputation
    /// still runs and the call still succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error only if rewriting the output image fails.
    pub fn update_tolerance(
        &mut self,
        tolerance: u32,
        index: Option<usize>,
    ) -> Result<Option<String>> {
        self.rules.update_tolerance(tolerance, index);
        self.recompute()
    }

    /// Empty the rule set, then recompute.
    ///
    /// With an image held, the rewritten output is a plain copy of the
    /// source (no transparency applied).
    ///
    /// # Errors
    ///
    /// Returns an error only if rewriting the output image fails.
    pub fn clear_colors(&mut self) -> Result<Option<String>> {
        self.rules.clear();
        self.recompute()
    }

    /// Store edge settings, then recompute.
    ///
    /// The settings never influence the mask, so the rewritten output is
    /// pixel-identical to the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error only if rewriting the output image fails.
    pub fn update_edge_settings(
        &mut self,
        enabled: bool,
        sensitivity: u32,
    ) -> Result<Option<String>> {
        self.edge = EdgeSettings {
            enabled,
            sensitivity,
        };
        self.recompute()
    }

    /// Replace the rule set, load a new source image, and recompute.
    ///
    /// The image is decoded and normalized before any state changes, so a
    /// failed load leaves the previous rules and image in place. On success
    /// the previous image and output are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] if the file cannot be opened or decoded,
    /// [`Error::UnsupportedLayout`] if the decoded channel layout cannot be
    /// normalized to RGBA, or a write error from the recomputation.
    pub fn process_image(
        &mut self,
        path: &Path,
        rules: Vec<ColorRule>,
    ) -> Result<Option<String>> {
        let decoded = image::open(path).map_err(|source| Error::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let normalized = masking::normalize(decoded)?;

        self.rules.replace(rules);
        self.source = Some(normalized);
        self.recompute()
    }

    /// Recompute the output for the held image and rewrite it on disk.
    ///
    /// Returns the absolute, forward-slash-normalized path of the written
    /// file, or `None` when no image is held and nothing was computed.
    fn recompute(&mut self) -> Result<Option<String>> {
        let Some(source) = &self.source else {
            return Ok(None);
        };
        let processed = masking::mask_image(source, &self.rules);
        self.write_output(&processed).map(Some)
    }

    /// Write the processed image as PNG to the fixed output location.
    ///
    /// PNG keeps the output lossless and preserves the alpha channel.
    fn write_output(&self, processed: &RgbaImage) -> Result<String> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(OUTPUT_FILE_NAME);
        processed
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| Error::Save {
                path: path.clone(),
                source,
            })?;
        portable_absolute(&path)
    }
}

impl Default for MaskingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Absolute, forward-slash form of a path, independent of host filesystem
/// conventions.
fn portable_absolute(path: &Path) -> Result<String> {
    let abs = std::path::absolute(path)?;
    Ok(abs.to_string_lossy().replace('\\', "/"))
}
