// crates/app-descriptor/src/parser.rs
// ============================================================================
// Module: Descriptor Parser
// Description: Entry points and validation for deployment descriptors.
// Purpose: Produce a validated configuration model in a single pass.
// Dependencies: crate::{encoding, raw, xml}, tracing
// ============================================================================

//! ## Overview
//! [`DescriptorParser`] reads descriptor bytes into an element tree, binds
//! recognized elements into raw slots and resolves those slots into a
//! [`DescriptorConfig`]. Resolution is all-or-nothing: any rule violation
//! returns an error and no partial model.
//!
//! Two inputs are deliberately lenient. Boolean text (`threadsafe`,
//! `warmup-requests-enabled`, `async-session-persistence/@enabled`) is true
//! only for a case-insensitive `true` and false for anything else. An
//! unrecognized `sessions-enabled` value falls back to container-native
//! sessions and is logged rather than rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;

use tracing::debug;
use tracing::info;

use crate::encoding;
use crate::error::DescriptorError;
use crate::error::MalformedDescriptorError;
use crate::error::ValidationError;
use crate::limits::LimitsError;
use crate::limits::ParseLimits;
use crate::model::AdminConsolePage;
use crate::model::AutomaticScaling;
use crate::model::BasicScaling;
use crate::model::DescriptorConfig;
use crate::model::FilePattern;
use crate::model::HttpHeader;
use crate::model::InboundServices;
use crate::model::ManualScaling;
use crate::model::Scaling;
use crate::model::ScalingKind;
use crate::model::SessionType;
use crate::model::StaticFileInclude;
use crate::properties::SystemProperty;
use crate::properties::SystemPropertySink;
use crate::properties::apply_system_properties;
use crate::raw;
use crate::raw::RawDescriptor;
use crate::xml;

// ============================================================================
// SECTION: Parse Result
// ============================================================================

/// Output of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDescriptor {
    /// Validated configuration model.
    pub config: DescriptorConfig,
    /// System properties declared by the descriptor, in document order.
    pub system_properties: Vec<SystemProperty>,
}

impl ParsedDescriptor {
    /// Splits the result into the model and its system properties.
    #[must_use]
    pub fn into_parts(self) -> (DescriptorConfig, Vec<SystemProperty>) {
        (self.config, self.system_properties)
    }

    /// Applies the declared system properties to `sink` in document order.
    pub fn apply_system_properties<K: SystemPropertySink + ?Sized>(&self, sink: &mut K) {
        apply_system_properties(&self.system_properties, sink);
    }
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Configurable descriptor parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescriptorParser {
    /// Input bounds.
    limits: ParseLimits,
}

impl DescriptorParser {
    /// Creates a parser with validated limits.
    ///
    /// # Errors
    ///
    /// Returns [`LimitsError`] when a limit is out of range.
    pub const fn new(limits: ParseLimits) -> Result<Self, LimitsError> {
        match limits.validate() {
            Ok(()) => Ok(Self {
                limits,
            }),
            Err(err) => Err(err),
        }
    }

    /// Returns the parser's limits.
    #[must_use]
    pub const fn limits(&self) -> &ParseLimits {
        &self.limits
    }

    /// Parses a descriptor from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Malformed`] when the input cannot be read as
    /// XML and [`DescriptorError::Validation`] when a descriptor rule fails.
    pub fn parse<R: Read>(&self, input: R) -> Result<ParsedDescriptor, DescriptorError> {
        let cap = u64::try_from(self.limits.max_input_bytes.saturating_add(1)).unwrap_or(u64::MAX);
        let mut bytes = Vec::new();
        input
            .take(cap)
            .read_to_end(&mut bytes)
            .map_err(|err| MalformedDescriptorError::Io(err.to_string()))?;
        self.parse_bytes(&bytes)
    }

    /// Parses a descriptor from raw bytes.
    ///
    /// The character encoding comes from a byte order mark or the XML
    /// declaration and defaults to UTF-8. The size bound applies to the raw
    /// bytes, not to the decoded text.
    ///
    /// # Errors
    ///
    /// See [`DescriptorParser::parse`].
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParsedDescriptor, DescriptorError> {
        self.check_size(bytes.len())?;
        let content = encoding::decode_document(bytes)?;
        self.parse_text(&content)
    }

    /// Parses a descriptor from a string.
    ///
    /// # Errors
    ///
    /// See [`DescriptorParser::parse`].
    pub fn parse_str(&self, input: &str) -> Result<ParsedDescriptor, DescriptorError> {
        self.check_size(input.len())?;
        self.parse_text(input)
    }

    /// Reads, binds and resolves already-decoded descriptor text.
    fn parse_text(&self, input: &str) -> Result<ParsedDescriptor, DescriptorError> {
        let root = xml::read_document(input, &self.limits)?;
        let parsed = resolve(raw::bind(&root))?;
        debug!(
            root = root.name(),
            application = parsed.config.application_id.as_str(),
            version = parsed.config.version.as_str(),
            scaling = parsed.config.scaling_kind().map(ScalingKind::element_name),
            properties = parsed.system_properties.len(),
            "parsed deployment descriptor"
        );
        Ok(parsed)
    }

    /// Rejects inputs larger than the configured bound.
    const fn check_size(&self, len: usize) -> Result<(), MalformedDescriptorError> {
        if len > self.limits.max_input_bytes {
            return Err(MalformedDescriptorError::TooLarge {
                limit: self.limits.max_input_bytes,
            });
        }
        Ok(())
    }
}

/// Parses a descriptor from a reader with default limits.
///
/// # Errors
///
/// See [`DescriptorParser::parse`].
pub fn parse<R: Read>(input: R) -> Result<ParsedDescriptor, DescriptorError> {
    DescriptorParser::default().parse(input)
}

/// Parses a descriptor from bytes with default limits.
///
/// # Errors
///
/// See [`DescriptorParser::parse`].
pub fn parse_bytes(bytes: &[u8]) -> Result<ParsedDescriptor, DescriptorError> {
    DescriptorParser::default().parse_bytes(bytes)
}

/// Parses a descriptor from a string with default limits.
///
/// # Errors
///
/// See [`DescriptorParser::parse`].
pub fn parse_str(input: &str) -> Result<ParsedDescriptor, DescriptorError> {
    DescriptorParser::default().parse_str(input)
}

// ============================================================================
// SECTION: Session Resolution
// ============================================================================

/// Resolves the session strategy from the `sessions-enabled` text.
///
/// `true` and `false` match case-insensitively; any other text, including an
/// empty element, falls back to [`SessionType::ContainerNative`], as does an
/// absent element.
#[must_use]
pub fn resolve_session_type(sessions_enabled: Option<&str>) -> SessionType {
    let Some(text) = sessions_enabled else {
        return SessionType::ContainerNative;
    };
    if text.eq_ignore_ascii_case("true") {
        SessionType::PlatformManaged
    } else if text.eq_ignore_ascii_case("false") {
        SessionType::Disabled
    } else {
        info!(
            value = text,
            "unrecognized <sessions-enabled> value, using container-native sessions"
        );
        SessionType::ContainerNative
    }
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Collects scaling variants so a conflict can name every configured kind.
#[derive(Debug, Default)]
struct ScalingAccumulator {
    /// Variants built so far, in canonical kind order.
    configured: Vec<Scaling>,
}

impl ScalingAccumulator {
    /// Records a built variant.
    fn push(&mut self, scaling: Scaling) {
        self.configured.push(scaling);
    }

    /// Returns the single configured variant, if any.
    fn finish(mut self) -> Result<Option<Scaling>, ValidationError> {
        if self.configured.len() > 1 {
            let kinds = self.configured.iter().map(Scaling::kind).collect();
            return Err(ValidationError::MultipleScaling {
                kinds,
            });
        }
        Ok(self.configured.pop())
    }
}

/// Resolves raw slots into the validated model.
fn resolve(raw: RawDescriptor<'_>) -> Result<ParsedDescriptor, DescriptorError> {
    let system_properties = raw
        .system_properties
        .iter()
        .map(|(name, value)| SystemProperty::new(*name, *value))
        .collect();

    let application_id = required(raw.application, "application")?;
    let version = required(raw.version, "version")?;
    let mut config = DescriptorConfig::new(application_id, version);
    config.threadsafe = raw.threadsafe.is_some_and(parse_bool);
    config.module = raw.module.map(str::to_string);
    config.instance_class = raw.instance_class.map(str::to_string);
    config.public_root = raw.public_root.map(str::to_string);
    config.inbound_services = raw.inbound_services.as_ref().map(|names| {
        let mut services = InboundServices::new();
        for name in names {
            services.add_service(*name);
        }
        services
    });
    config.scaling = resolve_scaling(&raw)?;

    if let Some(files) = &raw.static_files {
        config.static_file_includes = files
            .includes
            .iter()
            .map(|rule| {
                let mut include = StaticFileInclude::new(rule.path, rule.expiration);
                for (name, value) in &rule.headers {
                    include.add_header(HttpHeader::new(*name, *value));
                }
                include
            })
            .collect();
        config.static_file_excludes =
            files.excludes.iter().map(|path| FilePattern::new(*path)).collect();
    }

    if let Some(pages) = &raw.admin_console {
        config.admin_console_pages =
            pages.iter().map(|(name, url)| AdminConsolePage::new(*name, *url)).collect();
    }

    if raw.sessions_enabled.is_some() {
        config.session_type = resolve_session_type(raw.sessions_enabled);
    }
    if config.session_type == SessionType::PlatformManaged {
        if let Some(persistence) = &raw.async_session_persistence {
            let enabled = parse_bool(persistence.enabled);
            config.async_session_persistence_enabled = Some(enabled);
            if enabled && !persistence.queue_name.is_empty() {
                config.session_persistence_queue_name = Some(persistence.queue_name.to_string());
            }
        }
    }

    config.warmup_requests_enabled = raw.warmup_requests_enabled.map(parse_bool);

    Ok(ParsedDescriptor {
        config,
        system_properties,
    })
}

/// Builds every configured scaling variant, then enforces at most one.
fn resolve_scaling(raw: &RawDescriptor<'_>) -> Result<Option<Scaling>, ValidationError> {
    let mut scalings = ScalingAccumulator::default();
    if let Some(manual) = &raw.manual_scaling {
        scalings.push(Scaling::Manual(ManualScaling {
            instances: required_u32(manual.instances, "manual-scaling/instances")?,
        }));
    }
    if let Some(basic) = &raw.basic_scaling {
        scalings.push(Scaling::Basic(BasicScaling {
            max_instances: required_u32(basic.max_instances, "basic-scaling/max-instances")?,
            idle_timeout: required(basic.idle_timeout, "basic-scaling/idle-timeout")?,
        }));
    }
    if let Some(automatic) = &raw.automatic_scaling {
        scalings.push(Scaling::Automatic(AutomaticScaling {
            min_idle_instances: automatic.min_idle_instances.map(str::to_string),
            max_idle_instances: automatic.max_idle_instances.map(str::to_string),
            min_pending_latency: automatic.min_pending_latency.map(str::to_string),
            max_pending_latency: automatic.max_pending_latency.map(str::to_string),
        }));
    }
    scalings.finish()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses boolean text: a case-insensitive `true` is true, anything else false.
fn parse_bool(text: &str) -> bool {
    text.eq_ignore_ascii_case("true")
}

/// Returns required element text, treating blank text as missing.
fn required(text: Option<&str>, element: &str) -> Result<String, ValidationError> {
    match text {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ValidationError::MissingElement {
            element: element.to_string(),
        }),
    }
}

/// Returns a required element parsed as an unsigned integer.
fn required_u32(text: Option<&str>, element: &str) -> Result<u32, ValidationError> {
    let value = required(text, element)?;
    value.parse::<u32>().map_err(|_| ValidationError::InvalidInteger {
        element: element.to_string(),
        value,
    })
}
