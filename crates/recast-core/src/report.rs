//! Observable record of restorations the engine silently skipped
//!
//! Shape mismatches during the excluded-field walk are not errors by
//! contract: source and destination may belong to different API generations
//! and the overlap is best-effort. That leniency is a sharp edge, though; a
//! typo'd field name drops data with no diagnostic. The report makes every
//! skip visible so callers can log or assert on it.

use serde::Serialize;
use std::fmt;

/// A single skipped restoration, located by its `$`-rooted field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skip {
    /// Path to the field, e.g. `$.config.items[2].id`
    pub path: String,
    pub reason: SkipReason,
}

/// Why a restoration was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// An excluded source field has no same-named destination field
    UnmatchedField,
    /// Source and destination fields share a name but not a concrete type
    KindMismatch,
    /// Paired sequences differ in length; extra elements were not visited
    LengthMismatch,
    /// The walk hit its recursion-depth bound and truncated this branch
    DepthLimit,
}

/// Everything a conversion skipped, in walk order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionReport {
    skips: Vec<Skip>,
}

impl ConversionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing was skipped: the shapes overlapped completely.
    pub fn is_clean(&self) -> bool {
        self.skips.is_empty()
    }

    pub fn skips(&self) -> &[Skip] {
        &self.skips
    }

    pub(crate) fn record(&mut self, path: String, reason: SkipReason) {
        self.skips.push(Skip { path, reason });
    }

    /// Emit the report through the `log` facade: one `debug!` per skip,
    /// `warn!` for depth truncation.
    pub fn emit(&self) {
        for skip in &self.skips {
            match skip.reason {
                SkipReason::DepthLimit => log::warn!("{skip}"),
                _ => log::debug!("{skip}"),
            }
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnmatchedField => write!(f, "no matching destination field"),
            SkipReason::KindMismatch => write!(f, "destination field has a different type"),
            SkipReason::LengthMismatch => write!(f, "sequence lengths differ"),
            SkipReason::DepthLimit => write!(f, "recursion depth limit reached"),
        }
    }
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipped restoration at {}: {}", self.path, self.reason)
    }
}
