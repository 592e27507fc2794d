use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use log::{info, warn};
use serde_json::Value;

use crate::sge::job_request::GraphRequest;

#[derive(Debug, PartialEq, Eq)]
pub enum RequestError {
    SchemaError,
    JSONValidationError,
    JSONDecodeError,
    DeserialisationError,
    MessageReadError,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RequestError::SchemaError => write!(f, "request schema is invalid"),
            RequestError::JSONValidationError => write!(f, "request fails schema validation"),
            RequestError::JSONDecodeError => write!(f, "request is not valid JSON"),
            RequestError::DeserialisationError => write!(f, "request can't be deserialised"),
            RequestError::MessageReadError => write!(f, "request file can't be read"),
        }
    }
}

impl std::error::Error for RequestError {}

/// A graph request file waiting to be read
pub struct Message {
    pub path: PathBuf,
    pub compiled_schema: JSONSchema,
}

impl Message {
    pub fn read(&self) -> Result<GraphRequest, RequestError> {
        let json: Value = self.parse_untyped_json()?;

        match self.validate(&json) {
            Ok(_) => {
                info!("Request is valid");
                self.parse_json(json)
            }
            Err(err) => {
                warn!("Request fails validation");
                Err(err)
            }
        }
    }

    fn validate(&self, json: &Value) -> Result<(), RequestError> {
        info!("Validating raw request against JSON schema");
        self.compiled_schema.validate(json).map_err(|errors| {
            for error in errors {
                warn!("{} at {}", error, error.instance_path);
            }
            RequestError::JSONValidationError
        })
    }

    fn read_file(&self) -> Result<String, RequestError> {
        let path: &Path = self.path.as_path();
        info!("Reading request at {}", path.display());
        fs::read_to_string(path).map_err(|err| {
            warn!("Can't read request at path {}: {}", path.display(), err);
            RequestError::MessageReadError
        })
    }

    fn parse_json(&self, value: Value) -> Result<GraphRequest, RequestError> {
        info!("Deserialising valid JSON into graph request");
        serde_json::from_value::<GraphRequest>(value).map_err(|err| {
            warn!("Can't deserialise request: {err}");
            RequestError::DeserialisationError
        })
    }

    fn parse_untyped_json(&self) -> Result<Value, RequestError> {
        let json_string = self.read_file()?;
        serde_json::from_str::<Value>(&json_string).map_err(|err| {
            warn!("Can't parse request JSON: {err}");
            RequestError::JSONDecodeError
        })
    }
}
