// crates/app-descriptor/src/encoding.rs
// ============================================================================
// Module: Descriptor Encoding
// Description: Character encoding detection and decoding for raw bytes.
// Purpose: Turn descriptor bytes into text before the tree reader sees them.
// Dependencies: encoding_rs
// ============================================================================

//! ## Overview
//! [`decode_document`] picks the encoding from a byte order mark, then from
//! the UTF-16 signature of a BOM-less `<?xml` declaration, then from the
//! declaration's `encoding` pseudo-attribute, and finally defaults to UTF-8.
//! Decoding is strict: an unknown label or a byte sequence that is invalid in
//! the chosen encoding is a [`MalformedDescriptorError::Encoding`].
//!
//! Labels resolve through the WHATWG table, so `ISO-8859-1` and `latin1`
//! decode as windows-1252, a superset of Latin-1 for every printable byte.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;

use encoding_rs::Encoding;
use encoding_rs::UTF_8;
use encoding_rs::UTF_16BE;
use encoding_rs::UTF_16LE;

use crate::error::MalformedDescriptorError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Longest XML declaration scanned for an `encoding` pseudo-attribute.
const MAX_DECLARATION_BYTES: usize = 1024;

/// `<?` in UTF-16LE without a byte order mark.
const UTF_16LE_SIGNATURE: [u8; 4] = [0x3C, 0x00, 0x3F, 0x00];

/// `<?` in UTF-16BE without a byte order mark.
const UTF_16BE_SIGNATURE: [u8; 4] = [0x00, 0x3C, 0x00, 0x3F];

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Decodes raw descriptor bytes into text, dropping any byte order mark.
///
/// # Errors
///
/// Returns [`MalformedDescriptorError::Encoding`] when the declared encoding
/// is unknown or unusable, or when the bytes are invalid for the encoding.
pub fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>, MalformedDescriptorError> {
    let (encoding, body) = detect(bytes)?;
    encoding.decode_without_bom_handling_and_without_replacement(body).ok_or_else(|| {
        MalformedDescriptorError::Encoding(format!("input is not valid {}", encoding.name()))
    })
}

/// Chooses the encoding and returns the bytes that follow any byte order mark.
fn detect(bytes: &[u8]) -> Result<(&'static Encoding, &[u8]), MalformedDescriptorError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return Ok((encoding, bytes.get(bom_len..).unwrap_or_default()));
    }
    if bytes.starts_with(&UTF_16LE_SIGNATURE) {
        return Ok((UTF_16LE, bytes));
    }
    if bytes.starts_with(&UTF_16BE_SIGNATURE) {
        return Ok((UTF_16BE, bytes));
    }
    let Some(label) = declared_label(bytes) else {
        return Ok((UTF_8, bytes));
    };
    let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
        MalformedDescriptorError::Encoding(format!("unsupported encoding {label}"))
    })?;
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Err(MalformedDescriptorError::Encoding(format!(
            "declared encoding {label} does not match a single-byte document"
        )));
    }
    Ok((encoding, bytes))
}

/// Extracts the `encoding` pseudo-attribute from a leading XML declaration.
fn declared_label(bytes: &[u8]) -> Option<&str> {
    let rest = bytes.strip_prefix(b"<?xml")?;
    let window = rest.get(..MAX_DECLARATION_BYTES.min(rest.len()))?;
    let end = window.windows(2).position(|pair| pair == b"?>")?;
    let declaration = std::str::from_utf8(window.get(..end)?).ok()?;
    let after_key = declaration.split_once("encoding")?.1.trim_start();
    let value = after_key.strip_prefix('=')?.trim_start();
    let quote = value.chars().next().filter(|quote| *quote == '"' || *quote == '\'')?;
    let label = value.get(1..)?.split(quote).next()?;
    (!label.is_empty()).then_some(label)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
