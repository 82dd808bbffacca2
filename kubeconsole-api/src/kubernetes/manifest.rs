//! Manifest input for new objects
//!
//! The add form posts either a JSON object or YAML text, pasted or read
//! from an uploaded file. YAML may hold several `---` separated documents,
//! which are created in order.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConsoleError, ConsoleResult};

#[derive(Debug, Clone, PartialEq)]
pub enum ManifestSource {
    /// One object, or an array of objects
    Json(Value),
    Yaml(String),
}

impl ManifestSource {
    /// Split into one JSON object per document, skipping empty documents
    pub fn documents(&self) -> ConsoleResult<Vec<Value>> {
        let documents = match self {
            Self::Json(Value::Array(items)) => items.clone(),
            Self::Json(value) => vec![value.clone()],
            Self::Yaml(text) => parse_yaml(text)?,
        };

        let documents: Vec<Value> = documents.into_iter().filter(|doc| !doc.is_null()).collect();
        if documents.is_empty() {
            return Err(ConsoleError::InvalidManifest("manifest holds no documents".to_string()));
        }
        if let Some(position) = documents.iter().position(|doc| !doc.is_object()) {
            return Err(ConsoleError::InvalidManifest(format!(
                "document {} is not a mapping",
                position + 1
            )));
        }
        Ok(documents)
    }
}

fn parse_yaml(text: &str) -> ConsoleResult<Vec<Value>> {
    serde_yaml::Deserializer::from_str(text)
        .enumerate()
        .map(|(index, document)| {
            Value::deserialize(document)
                .map_err(|e| ConsoleError::InvalidManifest(format!("document {}: {}", index + 1, e)))
        })
        .collect()
}
