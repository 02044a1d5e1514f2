// crates/app-descriptor/src/lib.rs
// ============================================================================
// Module: App Descriptor Library
// Description: Public API surface for deployment descriptor parsing.
// Purpose: Single source of truth for application descriptor semantics.
// Dependencies: encoding_rs, quick-xml, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! `app-descriptor` turns a hosted application's XML deployment descriptor
//! into a validated, strongly typed [`DescriptorConfig`]. Byte input is
//! decoded from its byte order mark or declared encoding first. Parsing is a
//! single pass: the document is read into a generic element tree, recognized
//! elements are bound to typed slots, and the slots are resolved into the
//! final model with every consistency rule enforced.
//!
//! Parsing is pure. System properties declared by the descriptor are returned
//! alongside the model and applied by the caller through a
//! [`SystemPropertySink`].
//!
//! ```
//! use app_descriptor::Scaling;
//!
//! let xml = r"<appengine-web-app>
//!     <application>guestbook</application>
//!     <version>1</version>
//!     <manual-scaling><instances>5</instances></manual-scaling>
//! </appengine-web-app>";
//! let parsed = app_descriptor::parse_str(xml)?;
//! assert!(matches!(parsed.config.scaling, Some(Scaling::Manual(ref m)) if m.instances == 5));
//! # Ok::<(), app_descriptor::DescriptorError>(())
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

mod encoding;
pub mod error;
pub mod limits;
pub mod model;
pub mod parser;
pub mod properties;
mod raw;
pub mod xml;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::DescriptorError;
pub use error::MalformedDescriptorError;
pub use error::ValidationError;
pub use limits::LimitsError;
pub use limits::ParseLimits;
pub use model::*;
pub use parser::DescriptorParser;
pub use parser::ParsedDescriptor;
pub use parser::parse;
pub use parser::parse_bytes;
pub use parser::parse_str;
pub use parser::resolve_session_type;
pub use properties::SystemProperty;
pub use properties::SystemPropertySink;
pub use properties::apply_system_properties;
