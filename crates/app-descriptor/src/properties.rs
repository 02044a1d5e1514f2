// crates/app-descriptor/src/properties.rs
// ============================================================================
// Module: System Properties
// Description: Descriptor-declared system properties and their sinks.
// Purpose: Hand property side effects to the caller instead of applying them.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Descriptors may declare `system-properties/property` entries that the
//! hosting runtime is expected to install process-wide. The parser never
//! touches global state; it returns the entries in document order and the
//! caller applies them to a [`SystemPropertySink`] of its choosing.
//!
//! Applying properties from several descriptors to one shared sink is
//! last-write-wins per name; callers that parse concurrently must serialize
//! application themselves.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::hash::BuildHasher;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A named system property declared by a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemProperty {
    /// Property name.
    pub name: String,
    /// Property value.
    pub value: String,
}

impl SystemProperty {
    /// Creates a property.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Sink
// ============================================================================

/// Destination for descriptor-declared system properties.
pub trait SystemPropertySink {
    /// Sets a property, replacing any previous value for the same name.
    fn set_property(&mut self, name: &str, value: &str);
}

impl SystemPropertySink for BTreeMap<String, String> {
    fn set_property(&mut self, name: &str, value: &str) {
        self.insert(name.to_string(), value.to_string());
    }
}

impl<S: BuildHasher> SystemPropertySink for HashMap<String, String, S> {
    fn set_property(&mut self, name: &str, value: &str) {
        self.insert(name.to_string(), value.to_string());
    }
}

/// Applies properties to a sink in order.
pub fn apply_system_properties<K: SystemPropertySink + ?Sized>(
    properties: &[SystemProperty],
    sink: &mut K,
) {
    for property in properties {
        sink.set_property(&property.name, &property.value);
    }
}
