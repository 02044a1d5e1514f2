// crates/app-descriptor/src/model.rs
// ============================================================================
// Module: Descriptor Configuration Model
// Description: Typed runtime configuration produced from a descriptor.
// Purpose: Give deployment tooling a validated, immutable view of the app.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`DescriptorConfig`] is the root output of a parse. It is built once per
//! parse call and handed to the caller by value. Scaling strategies are a
//! tagged union so at most one can ever be represented.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Runtime configuration of a hosted web application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorConfig {
    /// Application identifier.
    pub application_id: String,
    /// Deployed version label.
    pub version: String,
    /// Whether the application handles concurrent requests.
    pub threadsafe: bool,
    /// Optional module (service) name.
    pub module: Option<String>,
    /// Optional instance class.
    pub instance_class: Option<String>,
    /// Optional public root directory.
    pub public_root: Option<String>,
    /// Inbound services the application subscribes to.
    pub inbound_services: Option<InboundServices>,
    /// Configured scaling strategy, if any.
    pub scaling: Option<Scaling>,
    /// Static file include rules in document order.
    pub static_file_includes: Vec<StaticFileInclude>,
    /// Static file exclude patterns in document order.
    pub static_file_excludes: Vec<FilePattern>,
    /// Admin console pages in document order.
    pub admin_console_pages: Vec<AdminConsolePage>,
    /// Resolved HTTP session strategy.
    pub session_type: SessionType,
    /// Whether sessions are persisted asynchronously.
    pub async_session_persistence_enabled: Option<bool>,
    /// Task queue used for asynchronous session persistence.
    pub session_persistence_queue_name: Option<String>,
    /// Whether warmup requests are enabled.
    pub warmup_requests_enabled: Option<bool>,
}

impl DescriptorConfig {
    /// Creates a configuration with the required fields and defaults elsewhere.
    #[must_use]
    pub fn new(application_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            version: version.into(),
            threadsafe: false,
            module: None,
            instance_class: None,
            public_root: None,
            inbound_services: None,
            scaling: None,
            static_file_includes: Vec::new(),
            static_file_excludes: Vec::new(),
            admin_console_pages: Vec::new(),
            session_type: SessionType::default(),
            async_session_persistence_enabled: None,
            session_persistence_queue_name: None,
            warmup_requests_enabled: None,
        }
    }

    /// Returns the kind of the configured scaling strategy.
    #[must_use]
    pub const fn scaling_kind(&self) -> Option<ScalingKind> {
        match &self.scaling {
            Some(scaling) => Some(scaling.kind()),
            None => None,
        }
    }

    /// Returns true when sessions are stored by the platform.
    #[must_use]
    pub const fn sessions_enabled(&self) -> bool {
        matches!(self.session_type, SessionType::PlatformManaged)
    }
}

// ============================================================================
// SECTION: Inbound Services
// ============================================================================

/// Ordered list of inbound service names.
///
/// Duplicates are preserved; deduplication is left to consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InboundServices(Vec<String>);

impl InboundServices {
    /// Creates an empty service list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a service name.
    pub fn add_service(&mut self, service: impl Into<String>) {
        self.0.push(service.into());
    }

    /// Returns the service names in document order.
    #[must_use]
    pub fn services(&self) -> &[String] {
        &self.0
    }

    /// Returns true when the named service is listed.
    #[must_use]
    pub fn contains(&self, service: &str) -> bool {
        self.0.iter().any(|name| name == service)
    }
}

// ============================================================================
// SECTION: Scaling
// ============================================================================

/// Instance scaling strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scaling {
    /// Fixed number of resident instances.
    Manual(ManualScaling),
    /// Instances created on demand and shut down when idle.
    Basic(BasicScaling),
    /// Platform-driven scaling tuned by idle and latency targets.
    Automatic(AutomaticScaling),
}

impl Scaling {
    /// Returns the kind of this strategy.
    #[must_use]
    pub const fn kind(&self) -> ScalingKind {
        match self {
            Self::Manual(_) => ScalingKind::Manual,
            Self::Basic(_) => ScalingKind::Basic,
            Self::Automatic(_) => ScalingKind::Automatic,
        }
    }
}

/// Manual scaling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualScaling {
    /// Number of instances to keep running.
    pub instances: u32,
}

/// Basic scaling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicScaling {
    /// Maximum number of instances.
    pub max_instances: u32,
    /// Idle timeout literal, kept unparsed (e.g. `10m`).
    pub idle_timeout: String,
}

/// Automatic scaling settings.
///
/// Values stay raw strings: the descriptor grammar mixes sentinel tokens such
/// as `automatic` with numeric and duration literals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomaticScaling {
    /// Minimum idle instances.
    pub min_idle_instances: Option<String>,
    /// Maximum idle instances.
    pub max_idle_instances: Option<String>,
    /// Minimum pending latency.
    pub min_pending_latency: Option<String>,
    /// Maximum pending latency.
    pub max_pending_latency: Option<String>,
}

/// Scaling strategy discriminant, named after its descriptor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScalingKind {
    /// `<manual-scaling>`.
    #[serde(rename = "manual-scaling")]
    Manual,
    /// `<basic-scaling>`.
    #[serde(rename = "basic-scaling")]
    Basic,
    /// `<automatic-scaling>`.
    #[serde(rename = "automatic-scaling")]
    Automatic,
}

impl ScalingKind {
    /// Returns the descriptor element name for this kind.
    #[must_use]
    pub const fn element_name(self) -> &'static str {
        match self {
            Self::Manual => "manual-scaling",
            Self::Basic => "basic-scaling",
            Self::Automatic => "automatic-scaling",
        }
    }
}

impl fmt::Display for ScalingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

// ============================================================================
// SECTION: Static Files
// ============================================================================

/// Static file include rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticFileInclude {
    /// Path pattern.
    pub path: String,
    /// Cache expiration literal.
    pub expiration: String,
    /// Response headers in document order.
    pub headers: Vec<HttpHeader>,
}

impl StaticFileInclude {
    /// Creates an include rule with no headers.
    #[must_use]
    pub fn new(path: impl Into<String>, expiration: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expiration: expiration.into(),
            headers: Vec::new(),
        }
    }

    /// Appends a response header.
    pub fn add_header(&mut self, header: HttpHeader) {
        self.headers.push(header);
    }
}

/// HTTP response header attached to a static file rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpHeader {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl HttpHeader {
    /// Creates a header pair.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// File path pattern; matching semantics belong to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePattern {
    /// Path pattern.
    pub path: String,
}

impl FilePattern {
    /// Creates a file pattern.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
        }
    }
}

// ============================================================================
// SECTION: Admin Console
// ============================================================================

/// Page linked from the administrative console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConsolePage {
    /// Display name.
    pub name: String,
    /// Page URL.
    pub url: String,
}

impl AdminConsolePage {
    /// Creates an admin console page entry.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

// ============================================================================
// SECTION: Sessions
// ============================================================================

/// HTTP session storage strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// Sessions stored by the hosting platform.
    PlatformManaged,
    /// Sessions disabled.
    Disabled,
    /// Sessions handled by the servlet container itself.
    #[default]
    ContainerNative,
}
