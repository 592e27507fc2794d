use jsonschema::JSONSchema;
use log::info;
use serde_json::Value;

use crate::request::message::RequestError;

/// Compile the JSON schema that every graph request must satisfy
///
/// The schema is embedded at build time, so a compile failure means the schema file itself is broken.
pub fn load_schema() -> Result<JSONSchema, RequestError> {
    /// included request schema
    static SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/request.json"));
    info!("Compiling request schema");
    let schema: Value = serde_json::from_str(SCHEMA).map_err(|_| RequestError::SchemaError)?;
    JSONSchema::compile(&schema).map_err(|_| RequestError::SchemaError)
}
