// crates/app-descriptor/src/limits.rs
// ============================================================================
// Module: Parse Limits
// Description: Hard bounds applied while reading descriptor input.
// Purpose: Keep descriptor parsing bounded in memory and recursion.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Descriptor inputs are untrusted. [`ParseLimits`] bounds the input size and
//! element nesting depth; breaching either fails closed as a malformed
//! descriptor. Limits deserialize with defaults so hosts can embed them in
//! their own configuration files.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum descriptor size in bytes.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;
/// Default maximum element nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;
/// Upper bound accepted for `max_input_bytes`.
pub(crate) const MAX_INPUT_BYTES_CEILING: usize = 64 * 1024 * 1024;
/// Upper bound accepted for `max_depth`.
pub(crate) const MAX_DEPTH_CEILING: usize = 1024;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Bounds applied while reading a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseLimits {
    /// Maximum input size in bytes.
    pub max_input_bytes: usize,
    /// Maximum element nesting depth (the root element is depth 1).
    pub max_depth: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseLimits {
    /// Validates limit values.
    ///
    /// # Errors
    ///
    /// Returns [`LimitsError`] when a bound is zero or above its ceiling.
    pub const fn validate(&self) -> Result<(), LimitsError> {
        if self.max_input_bytes == 0 || self.max_input_bytes > MAX_INPUT_BYTES_CEILING {
            return Err(LimitsError::OutOfRange {
                field: "max_input_bytes",
                max: MAX_INPUT_BYTES_CEILING,
            });
        }
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_CEILING {
            return Err(LimitsError::OutOfRange {
                field: "max_depth",
                max: MAX_DEPTH_CEILING,
            });
        }
        Ok(())
    }
}

/// Invalid parse limit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitsError {
    /// A limit is outside its accepted range.
    #[error("limits.{field} must be between 1 and {max}")]
    OutOfRange {
        /// Offending field name.
        field: &'static str,
        /// Maximum accepted value.
        max: usize,
    },
}
