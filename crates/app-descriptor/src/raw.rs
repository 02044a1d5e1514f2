// crates/app-descriptor/src/raw.rs
// ============================================================================
// Module: Raw Descriptor Binding
// Description: Single dispatch pass from the element tree to typed slots.
// Purpose: Confine element-name matching to one place ahead of validation.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! [`bind`] walks the root element's children once and binds each recognized
//! element into a field of [`RawDescriptor`]. Values stay borrowed, unparsed
//! text; requiredness, integer parsing and cross-field rules are applied by
//! the resolver in [`crate::parser`]. Single-valued elements keep their first
//! occurrence, list elements collect every occurrence in document order, and
//! unrecognized elements are ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::warn;

use crate::xml::XmlElement;

// ============================================================================
// SECTION: Raw Types
// ============================================================================

/// Unvalidated descriptor content bound from the element tree.
#[derive(Debug, Default)]
pub(crate) struct RawDescriptor<'a> {
    /// `system-properties/property` entries as (name, value).
    pub system_properties: Vec<(&'a str, &'a str)>,
    /// `application` text.
    pub application: Option<&'a str>,
    /// `version` text.
    pub version: Option<&'a str>,
    /// `threadsafe` text.
    pub threadsafe: Option<&'a str>,
    /// `module` text.
    pub module: Option<&'a str>,
    /// `instance-class` text.
    pub instance_class: Option<&'a str>,
    /// `public-root` text.
    pub public_root: Option<&'a str>,
    /// `inbound-services/service` texts.
    pub inbound_services: Option<Vec<&'a str>>,
    /// `manual-scaling` block.
    pub manual_scaling: Option<RawManualScaling<'a>>,
    /// `basic-scaling` block.
    pub basic_scaling: Option<RawBasicScaling<'a>>,
    /// `automatic-scaling` block.
    pub automatic_scaling: Option<RawAutomaticScaling<'a>>,
    /// `static-files` block.
    pub static_files: Option<RawStaticFiles<'a>>,
    /// `admin-console/page` entries as (name, url).
    pub admin_console: Option<Vec<(&'a str, &'a str)>>,
    /// `sessions-enabled` text.
    pub sessions_enabled: Option<&'a str>,
    /// `async-session-persistence` attributes.
    pub async_session_persistence: Option<RawAsyncSessionPersistence<'a>>,
    /// `warmup-requests-enabled` text.
    pub warmup_requests_enabled: Option<&'a str>,
}

/// Unvalidated `manual-scaling` content.
#[derive(Debug, Default)]
pub(crate) struct RawManualScaling<'a> {
    /// `instances` text.
    pub instances: Option<&'a str>,
}

/// Unvalidated `basic-scaling` content.
#[derive(Debug, Default)]
pub(crate) struct RawBasicScaling<'a> {
    /// `max-instances` text.
    pub max_instances: Option<&'a str>,
    /// `idle-timeout` text.
    pub idle_timeout: Option<&'a str>,
}

/// Unvalidated `automatic-scaling` content.
#[derive(Debug, Default)]
pub(crate) struct RawAutomaticScaling<'a> {
    /// `min-idle-instances` text.
    pub min_idle_instances: Option<&'a str>,
    /// `max-idle-instances` text.
    pub max_idle_instances: Option<&'a str>,
    /// `min-pending-latency` text.
    pub min_pending_latency: Option<&'a str>,
    /// `max-pending-latency` text.
    pub max_pending_latency: Option<&'a str>,
}

/// Unvalidated `static-files` content.
#[derive(Debug, Default)]
pub(crate) struct RawStaticFiles<'a> {
    /// `include` rules in document order.
    pub includes: Vec<RawStaticInclude<'a>>,
    /// `exclude/@path` values in document order.
    pub excludes: Vec<&'a str>,
}

/// Unvalidated `static-files/include` rule.
#[derive(Debug)]
pub(crate) struct RawStaticInclude<'a> {
    /// `@path`.
    pub path: &'a str,
    /// `@expiration`.
    pub expiration: &'a str,
    /// `http-header` entries as (name, value).
    pub headers: Vec<(&'a str, &'a str)>,
}

/// Unvalidated `async-session-persistence` attributes.
#[derive(Debug)]
pub(crate) struct RawAsyncSessionPersistence<'a> {
    /// `@enabled`.
    pub enabled: &'a str,
    /// `@queue-name`.
    pub queue_name: &'a str,
}

// ============================================================================
// SECTION: Binding
// ============================================================================

/// Binds the root element's children into a [`RawDescriptor`].
pub(crate) fn bind(root: &XmlElement) -> RawDescriptor<'_> {
    let mut raw = RawDescriptor::default();
    let mut properties_bound = false;
    for child in root.children() {
        match child.name() {
            "system-properties" => {
                if !properties_bound {
                    raw.system_properties = pairs(child, "property", "name", "value");
                    properties_bound = true;
                }
            }
            "application" => keep_first(&mut raw.application, child.text()),
            "version" => keep_first(&mut raw.version, child.text()),
            "threadsafe" => keep_first(&mut raw.threadsafe, child.text()),
            "module" => keep_first(&mut raw.module, child.text()),
            "instance-class" => keep_first(&mut raw.instance_class, child.text()),
            "public-root" => keep_first(&mut raw.public_root, child.text()),
            "inbound-services" => {
                if raw.inbound_services.is_none() {
                    raw.inbound_services =
                        Some(child.children_named("service").map(XmlElement::text).collect());
                }
            }
            "manual-scaling" => {
                if raw.manual_scaling.is_some() {
                    warn!(element = "manual-scaling", "repeated scaling element ignored");
                } else {
                    raw.manual_scaling = Some(bind_manual_scaling(child));
                }
            }
            "basic-scaling" => {
                if raw.basic_scaling.is_some() {
                    warn!(element = "basic-scaling", "repeated scaling element ignored");
                } else {
                    raw.basic_scaling = Some(bind_basic_scaling(child));
                }
            }
            "automatic-scaling" => {
                if raw.automatic_scaling.is_some() {
                    warn!(element = "automatic-scaling", "repeated scaling element ignored");
                } else {
                    raw.automatic_scaling = Some(bind_automatic_scaling(child));
                }
            }
            "static-files" => {
                if raw.static_files.is_none() {
                    raw.static_files = Some(bind_static_files(child));
                }
            }
            "admin-console" => {
                if raw.admin_console.is_none() {
                    raw.admin_console = Some(pairs(child, "page", "name", "url"));
                }
            }
            "sessions-enabled" => keep_first(&mut raw.sessions_enabled, child.text()),
            "async-session-persistence" => {
                if raw.async_session_persistence.is_none() {
                    raw.async_session_persistence = Some(RawAsyncSessionPersistence {
                        enabled: child.attribute_or_empty("enabled"),
                        queue_name: child.attribute_or_empty("queue-name"),
                    });
                }
            }
            "warmup-requests-enabled" => {
                keep_first(&mut raw.warmup_requests_enabled, child.text());
            }
            _ => {}
        }
    }
    raw
}

/// Binds a `manual-scaling` block.
fn bind_manual_scaling(element: &XmlElement) -> RawManualScaling<'_> {
    let mut raw = RawManualScaling::default();
    for child in element.children() {
        if child.name() == "instances" {
            keep_first(&mut raw.instances, child.text());
        }
    }
    raw
}

/// Binds a `basic-scaling` block.
fn bind_basic_scaling(element: &XmlElement) -> RawBasicScaling<'_> {
    let mut raw = RawBasicScaling::default();
    for child in element.children() {
        match child.name() {
            "max-instances" => keep_first(&mut raw.max_instances, child.text()),
            "idle-timeout" => keep_first(&mut raw.idle_timeout, child.text()),
            _ => {}
        }
    }
    raw
}

/// Binds an `automatic-scaling` block.
fn bind_automatic_scaling(element: &XmlElement) -> RawAutomaticScaling<'_> {
    let mut raw = RawAutomaticScaling::default();
    for child in element.children() {
        let slot = match child.name() {
            "min-idle-instances" => &mut raw.min_idle_instances,
            "max-idle-instances" => &mut raw.max_idle_instances,
            "min-pending-latency" => &mut raw.min_pending_latency,
            "max-pending-latency" => &mut raw.max_pending_latency,
            _ => continue,
        };
        keep_first(slot, child.text());
    }
    raw
}

/// Binds a `static-files` block.
fn bind_static_files(element: &XmlElement) -> RawStaticFiles<'_> {
    let mut raw = RawStaticFiles::default();
    for child in element.children() {
        match child.name() {
            "include" => raw.includes.push(RawStaticInclude {
                path: child.attribute_or_empty("path"),
                expiration: child.attribute_or_empty("expiration"),
                headers: pairs(child, "http-header", "name", "value"),
            }),
            "exclude" => raw.excludes.push(child.attribute_or_empty("path")),
            _ => {}
        }
    }
    raw
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Stores `value` only when the slot is still empty.
fn keep_first<'a>(slot: &mut Option<&'a str>, value: &'a str) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

/// Collects two attributes from every child with the given name.
fn pairs<'a>(
    element: &'a XmlElement,
    child_name: &'a str,
    first: &str,
    second: &str,
) -> Vec<(&'a str, &'a str)> {
    element
        .children_named(child_name)
        .map(|child| (child.attribute_or_empty(first), child.attribute_or_empty(second)))
        .collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
