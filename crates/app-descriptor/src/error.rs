// crates/app-descriptor/src/error.rs
// ============================================================================
// Module: Descriptor Errors
// Description: Error types for descriptor parsing and validation.
// Purpose: Separate unreadable markup from content rule violations.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Parsing fails in one of two ways. [`MalformedDescriptorError`] means the
//! input could not be read as XML at all (or exceeded a configured bound).
//! [`ValidationError`] means the markup is fine but violates a descriptor
//! rule. Both carry enough detail to report a diagnostic without re-parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::model::ScalingKind;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Top-level descriptor parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// The input is not well-formed markup.
    #[error("malformed descriptor: {0}")]
    Malformed(#[from] MalformedDescriptorError),
    /// The markup parsed but violates a descriptor rule.
    #[error("invalid descriptor: {0}")]
    Validation(#[from] ValidationError),
}

/// Structural failures while reading the descriptor markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedDescriptorError {
    /// I/O failure while reading the input stream.
    #[error("read error: {0}")]
    Io(String),
    /// Input exceeds the configured size bound.
    #[error("descriptor exceeds {limit} bytes")]
    TooLarge {
        /// Configured maximum size in bytes.
        limit: usize,
    },
    /// Input cannot be decoded in its declared or detected encoding.
    #[error("descriptor encoding error: {0}")]
    Encoding(String),
    /// Underlying XML reader error.
    #[error("xml error at byte {position}: {message}")]
    Xml {
        /// Byte offset reported by the reader.
        position: u64,
        /// Reader error message.
        message: String,
    },
    /// Element nesting exceeds the configured depth bound.
    #[error("element nesting exceeds depth {limit}")]
    TooDeep {
        /// Configured maximum depth.
        limit: usize,
    },
    /// Document contains no root element.
    #[error("descriptor has no root element")]
    MissingRoot,
    /// Document contains more than one top-level element.
    #[error("unexpected second root element <{0}>")]
    MultipleRoots(String),
    /// Input ended while an element was still open.
    #[error("element <{0}> is not closed")]
    UnclosedElement(String),
}

/// Content rule violations in an otherwise well-formed descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required element is absent or blank.
    #[error("missing required element <{element}>")]
    MissingElement {
        /// Slash-separated element path.
        element: String,
    },
    /// A required integer element does not hold a valid unsigned integer.
    #[error("<{element}> must be a non-negative integer, got '{value}'")]
    InvalidInteger {
        /// Slash-separated element path.
        element: String,
        /// Offending element text.
        value: String,
    },
    /// More than one scaling strategy is configured.
    #[error("multiple scaling types configured: {}", join_kinds(.kinds))]
    MultipleScaling {
        /// Every configured scaling kind.
        kinds: Vec<ScalingKind>,
    },
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders scaling kinds as a comma-separated list of element names.
fn join_kinds(kinds: &[ScalingKind]) -> String {
    kinds.iter().map(|kind| kind.element_name()).collect::<Vec<_>>().join(", ")
}
