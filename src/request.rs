//! Read graph submission requests from disk

/// Validate and deserialise a JSON request file
pub mod message;
/// Embedded JSON schema for requests
pub mod schema;
