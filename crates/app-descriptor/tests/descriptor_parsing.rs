//! Descriptor field extraction tests for app-descriptor.
// crates/app-descriptor/tests/descriptor_parsing.rs
// =============================================================================
// Module: Descriptor Parsing Tests
// Description: Validate extraction and defaults for every descriptor element.
// Purpose: Ensure recognized elements land in the typed model unchanged.
// =============================================================================

use app_descriptor::AdminConsolePage;
use app_descriptor::FilePattern;
use app_descriptor::HttpHeader;
use app_descriptor::InboundServices;
use app_descriptor::SessionType;
use app_descriptor::StaticFileInclude;
use app_descriptor::ValidationError;

mod common;

type TestResult = Result<(), String>;

// ============================================================================
// SECTION: Required Fields
// ============================================================================

#[test]
fn minimal_descriptor_uses_defaults() -> TestResult {
    let config = common::parse_body("")?.config;
    if config.application_id != "guestbook" || config.version != "1" {
        return Err(format!("unexpected identity {}/{}", config.application_id, config.version));
    }
    if config.threadsafe {
        return Err("threadsafe should default to false".to_string());
    }
    if config.session_type != SessionType::ContainerNative {
        return Err("session type should default to container-native".to_string());
    }
    if config.module.is_some()
        || config.instance_class.is_some()
        || config.public_root.is_some()
        || config.inbound_services.is_some()
        || config.scaling.is_some()
        || config.warmup_requests_enabled.is_some()
        || config.async_session_persistence_enabled.is_some()
        || config.session_persistence_queue_name.is_some()
    {
        return Err("optional fields should be unset".to_string());
    }
    if !config.static_file_includes.is_empty()
        || !config.static_file_excludes.is_empty()
        || !config.admin_console_pages.is_empty()
    {
        return Err("list fields should be empty".to_string());
    }
    Ok(())
}

#[test]
fn missing_application_is_rejected() -> TestResult {
    let error =
        common::validation_error("<appengine-web-app><version>1</version></appengine-web-app>")?;
    if error
        != (ValidationError::MissingElement {
            element: "application".to_string(),
        })
    {
        return Err(format!("unexpected error {error}"));
    }
    Ok(())
}

#[test]
fn missing_version_is_rejected() -> TestResult {
    let error = common::validation_error(
        "<appengine-web-app><application>a</application></appengine-web-app>",
    )?;
    common::assert_message_contains(&error, "<version>")
}

#[test]
fn blank_application_counts_as_missing() -> TestResult {
    let error = common::validation_error(
        "<appengine-web-app><application>   </application><version>1</version></appengine-web-app>",
    )?;
    common::assert_message_contains(&error, "application")
}

#[test]
fn required_text_is_trimmed() -> TestResult {
    let parsed = app_descriptor::parse_str(
        "<appengine-web-app>\n  <application>\n    guestbook\n  </application>\n  <version> v2 </version>\n</appengine-web-app>",
    )
    .map_err(|err| err.to_string())?;
    if parsed.config.application_id != "guestbook" || parsed.config.version != "v2" {
        return Err("required text should be trimmed".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Optional Scalars
// ============================================================================

#[test]
fn optional_scalars_are_extracted() -> TestResult {
    let config = common::parse_body(
        "<threadsafe>TRUE</threadsafe>\
         <module>backend</module>\
         <instance-class>B4</instance-class>\
         <public-root>/static</public-root>",
    )?
    .config;
    if !config.threadsafe {
        return Err("threadsafe TRUE should parse case-insensitively".to_string());
    }
    if config.module.as_deref() != Some("backend")
        || config.instance_class.as_deref() != Some("B4")
        || config.public_root.as_deref() != Some("/static")
    {
        return Err("optional scalars not extracted".to_string());
    }
    Ok(())
}

#[test]
fn threadsafe_garbage_is_false() -> TestResult {
    for text in ["yes", "1", "", "truthy"] {
        let config = common::parse_body(&format!("<threadsafe>{text}</threadsafe>"))?.config;
        if config.threadsafe {
            return Err(format!("threadsafe '{text}' should be false"));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Inbound Services
// ============================================================================

#[test]
fn inbound_services_keep_order_and_duplicates() -> TestResult {
    let config = common::parse_body(
        "<inbound-services>\
           <service>mail</service>\
           <service>warmup</service>\
           <service>mail</service>\
         </inbound-services>",
    )?
    .config;
    let services = config.inbound_services.ok_or("inbound services missing")?;
    if services.services() != ["mail", "warmup", "mail"] {
        return Err(format!("unexpected services {}", services.services().join(",")));
    }
    if !services.contains("warmup") || services.contains("xmpp_message") {
        return Err("contains() mismatch".to_string());
    }
    let mut expected = InboundServices::new();
    for name in ["mail", "warmup", "mail"] {
        expected.add_service(name);
    }
    if services != expected {
        return Err("parsed services differ from the built list".to_string());
    }
    Ok(())
}

#[test]
fn empty_inbound_services_is_present_but_empty() -> TestResult {
    let config = common::parse_body("<inbound-services/>")?.config;
    match config.inbound_services {
        Some(services) if services.services().is_empty() => Ok(()),
        _ => Err("empty inbound-services should yield an empty list".to_string()),
    }
}

// ============================================================================
// SECTION: Static Files
// ============================================================================

#[test]
fn static_include_with_header() -> TestResult {
    let config = common::parse_body(
        r#"<static-files><include path="/img/*" expiration="7d"><http-header name="Cache-Control" value="public"/></include></static-files>"#,
    )?
    .config;
    let mut expected = StaticFileInclude::new("/img/*", "7d");
    expected.add_header(HttpHeader::new("Cache-Control", "public"));
    if config.static_file_includes != vec![expected] {
        return Err("static include mismatch".to_string());
    }
    if !config.static_file_excludes.is_empty() {
        return Err("no excludes expected".to_string());
    }
    Ok(())
}

#[test]
fn static_rules_preserve_order() -> TestResult {
    let config = common::parse_body(
        r#"<static-files>
             <include path="/a/**" expiration="1h">
               <http-header name="X-One" value="1"/>
               <http-header name="X-Two" value="2"/>
             </include>
             <exclude path="/a/secret/**"/>
             <include path="/b/**"/>
             <exclude path="/**.jsp"/>
           </static-files>"#,
    )?
    .config;
    let paths: Vec<&str> =
        config.static_file_includes.iter().map(|rule| rule.path.as_str()).collect();
    if paths != ["/a/**", "/b/**"] {
        return Err(format!("unexpected include order {}", paths.join(",")));
    }
    let headers: Vec<&str> = config.static_file_includes[0]
        .headers
        .iter()
        .map(|header| header.name.as_str())
        .collect();
    if headers != ["X-One", "X-Two"] {
        return Err("header order not preserved".to_string());
    }
    if !config.static_file_includes[1].expiration.is_empty() {
        return Err("missing expiration attribute should read as empty".to_string());
    }
    if config.static_file_excludes
        != vec![FilePattern::new("/a/secret/**"), FilePattern::new("/**.jsp")]
    {
        return Err("exclude patterns mismatch".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Admin Console
// ============================================================================

#[test]
fn admin_console_pages_in_order() -> TestResult {
    let config = common::parse_body(
        r#"<admin-console>
             <page name="Stats" url="/admin/stats"/>
             <page name="Queues &amp; Tasks" url="/admin/queues"/>
           </admin-console>"#,
    )?
    .config;
    let expected = vec![
        AdminConsolePage::new("Stats", "/admin/stats"),
        AdminConsolePage::new("Queues & Tasks", "/admin/queues"),
    ];
    if config.admin_console_pages != expected {
        return Err("admin console pages mismatch".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Warmup Requests
// ============================================================================

#[test]
fn warmup_true_is_set() -> TestResult {
    let config =
        common::parse_body("<warmup-requests-enabled>true</warmup-requests-enabled>")?.config;
    if config.warmup_requests_enabled != Some(true) {
        return Err("warmup should be Some(true)".to_string());
    }
    Ok(())
}

#[test]
fn warmup_garbage_is_explicit_false() -> TestResult {
    let config =
        common::parse_body("<warmup-requests-enabled>sometimes</warmup-requests-enabled>")?.config;
    if config.warmup_requests_enabled != Some(false) {
        return Err("unrecognized warmup text should be Some(false)".to_string());
    }
    Ok(())
}

#[test]
fn warmup_absent_is_unset() -> TestResult {
    let config = common::parse_body("")?.config;
    if config.warmup_requests_enabled.is_some() {
        return Err("absent warmup should stay unset".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Input Forms
// ============================================================================

#[test]
fn reader_bytes_and_str_inputs_agree() -> TestResult {
    let xml = common::descriptor("<threadsafe>true</threadsafe><module>web</module>");
    let from_str = app_descriptor::parse_str(&xml).map_err(|err| err.to_string())?;
    let from_bytes = app_descriptor::parse_bytes(xml.as_bytes()).map_err(|err| err.to_string())?;
    let from_reader = app_descriptor::parse(xml.as_bytes()).map_err(|err| err.to_string())?;
    if from_str != from_bytes || from_bytes != from_reader {
        return Err("entry points disagree".to_string());
    }
    Ok(())
}

#[test]
fn unknown_elements_are_ignored() -> TestResult {
    let config = common::parse_body(
        "<url-stream-handler>urlfetch</url-stream-handler>\
         <env-variables><env-var name=\"A\" value=\"1\"/></env-variables>",
    )?
    .config;
    if config.application_id != "guestbook" {
        return Err("unknown elements should not disturb parsing".to_string());
    }
    Ok(())
}

#[test]
fn model_serializes_deterministically() -> TestResult {
    let xml = common::descriptor(
        r#"<manual-scaling><instances>3</instances></manual-scaling>
           <sessions-enabled>true</sessions-enabled>"#,
    );
    let first = app_descriptor::parse_str(&xml).map_err(|err| err.to_string())?;
    let second = app_descriptor::parse_str(&xml).map_err(|err| err.to_string())?;
    let first_json = serde_json::to_value(&first.config).map_err(|err| err.to_string())?;
    let second_json = serde_json::to_value(&second.config).map_err(|err| err.to_string())?;
    if first_json != second_json {
        return Err("serialized models differ".to_string());
    }
    if first_json["scaling"]["type"] != "manual" || first_json["session_type"] != "platform_managed" {
        return Err(format!("unexpected json {first_json}"));
    }
    Ok(())
}
