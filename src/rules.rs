//! Color rule storage: target colors with per-channel tolerances.

use serde::{Deserialize, Serialize};

/// Tolerance substituted when a rule stores exactly 0, so nominally exact
/// targets still catch pixels nudged by lossy encodes.
pub const ZERO_TOLERANCE_WIDENING: u32 = 2;

/// A target color plus a per-channel absolute-difference tolerance.
///
/// A pixel matches the rule when every RGB channel lies within the tolerance
/// of the target. Tolerances have no enforced upper bound and are used as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRule {
    /// Target color as `[red, green, blue]`.
    pub rgb: [u8; 3],
    /// Per-channel absolute-difference threshold.
    pub tolerance: u32,
}

impl ColorRule {
    /// Create a rule for `rgb` with the given tolerance.
    #[must_use]
    pub const fn new(rgb: [u8; 3], tolerance: u32) -> Self {
        Self { rgb, tolerance }
    }

    /// The tolerance actually used in comparisons.
    ///
    /// A stored tolerance of 0 widens to [`ZERO_TOLERANCE_WIDENING`];
    /// any other value is used unchanged.
    #[must_use]
    pub const fn effective_tolerance(&self) -> u32 {
        if self.tolerance == 0 {
            ZERO_TOLERANCE_WIDENING
        } else {
            self.tolerance
        }
    }
}

/// Ordered collection of [`ColorRule`]s.
///
/// Matching is a union across rules, so order never affects the mask, but
/// index-addressed updates rely on stable positions. Duplicate colors are
/// legal and harmless.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorRuleSet {
    rules: Vec<ColorRule>,
}

impl ColorRuleSet {
    /// Create an empty rule set.
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. No deduplication is performed.
    pub fn add(&mut self, rgb: [u8; 3], tolerance: u32) {
        self.rules.push(ColorRule::new(rgb, tolerance));
    }

    /// Set the tolerance of one rule, or of every rule.
    ///
    /// With `Some(index)` in range, only that rule changes; out-of-range
    /// indices are ignored. With `None`, every rule takes the new tolerance.
    pub fn update_tolerance(&mut self, tolerance: u32, index: Option<usize>) {
        match index {
            Some(i) => {
                if let Some(rule) = self.rules.get_mut(i) {
                    rule.tolerance = tolerance;
                }
            }
            None => {
                for rule in &mut self.rules {
                    rule.tolerance = tolerance;
                }
            }
        }
    }

    /// Remove every rule.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Replace the whole set, keeping the given order.
    pub fn replace(&mut self, rules: impl IntoIterator<Item = ColorRule>) {
        self.rules.clear();
        self.rules.extend(rules);
    }

    /// Number of rules held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rules are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rules in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[ColorRule] {
        &self.rules
    }
}
