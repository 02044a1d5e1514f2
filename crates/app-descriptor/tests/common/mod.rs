// crates/app-descriptor/tests/common/mod.rs
// =============================================================================
// Module: Descriptor Test Helpers
// Description: Shared helpers for descriptor parsing tests.
// Purpose: Reduce duplication across integration tests for app-descriptor.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use app_descriptor::DescriptorError;
use app_descriptor::ParsedDescriptor;
use app_descriptor::ValidationError;

/// Wraps `body` in a root element that already carries the required fields.
pub fn descriptor(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <appengine-web-app xmlns=\"http://appengine.google.com/ns/1.0\">\n\
         <application>guestbook</application>\n\
         <version>1</version>\n\
         {body}\n\
         </appengine-web-app>"
    )
}

/// Parses a descriptor whose body is wrapped by [`descriptor`].
pub fn parse_body(body: &str) -> Result<ParsedDescriptor, String> {
    app_descriptor::parse_str(&descriptor(body)).map_err(|err| err.to_string())
}

/// Parses a full descriptor and returns the validation error it must produce.
pub fn validation_error(xml: &str) -> Result<ValidationError, String> {
    match app_descriptor::parse_str(xml) {
        Err(DescriptorError::Validation(error)) => Ok(error),
        Err(other) => Err(format!("expected validation error, got {other}")),
        Ok(_) => Err("expected validation error, got a parsed descriptor".to_string()),
    }
}

/// Asserts that an error message contains `needle`.
pub fn assert_message_contains(error: &impl std::fmt::Display, needle: &str) -> Result<(), String> {
    let message = error.to_string();
    if message.contains(needle) {
        Ok(())
    } else {
        Err(format!("error '{message}' did not contain '{needle}'"))
    }
}
