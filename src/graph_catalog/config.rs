//! Load schema configuration management.
//!
//! A load schema maps each CSV row onto a fixed set of graph writes. It is
//! defined in YAML:
//!
//! ```yaml
//! name: flight_passengers
//! nodes:
//!   - alias: origin            # Binding name, referenced by relationships
//!     label: Airport           # Node label in the graph
//!     key:                     # Properties the node is merged on
//!       - property: airport_name
//!         column: from         # CSV column (defaults to the property name)
//!   - alias: flight
//!     label: Flight
//!     key:
//!       - { property: flight_id, column: id }
//!     properties:              # Written only when the node is created
//!       - { property: airline }
//!   - alias: date
//!     label: Date
//!     key:
//!       - { property: year, kind: integer }
//! relationships:
//!   - type: FROM
//!     from: flight
//!     to: origin
//! ```
//!
//! Node bindings are applied in declaration order, then relationship
//! bindings in declaration order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::SchemaError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadSchemaConfig {
    pub name: String,
    pub nodes: Vec<NodeBindingConfig>,
    #[serde(default)]
    pub relationships: Vec<RelationshipBindingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeBindingConfig {
    pub alias: String,
    pub label: String,
    pub key: Vec<PropertyMappingConfig>,
    #[serde(default)]
    pub properties: Vec<PropertyMappingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyMappingConfig {
    pub property: String,
    /// CSV column; the property name when omitted
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub kind: PropertyKind,
}

/// How a CSV cell is typed before it is written.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    #[default]
    String,
    Integer,
    Boolean,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::String => "string",
            PropertyKind::Integer => "integer",
            PropertyKind::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelationshipBindingConfig {
    #[serde(rename = "type")]
    pub rel_type: String,
    pub from: String,
    pub to: String,
}

impl LoadSchemaConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, SchemaError> {
        serde_yaml::from_str(content).map_err(|e| SchemaError::ConfigParseError {
            error: e.to_string(),
        })
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SchemaError::ConfigReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }
}
