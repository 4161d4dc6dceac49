//! # Load Schema Error Types
//!
//! Errors raised while reading a load schema from YAML and while checking
//! that its node and relationship bindings are consistent.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("Failed to read schema file '{path}': {error}")]
    ConfigReadError { path: String, error: String },
    #[error("Failed to parse schema: {error}")]
    ConfigParseError { error: String },
    #[error("Unknown built-in schema `{name}` (expected one of: {available})")]
    UnknownSchema { name: String, available: String },
    #[error("Schema `{schema}` declares no node bindings")]
    NoNodes { schema: String },
    #[error("Invalid identifier `{name}` in {context}")]
    InvalidIdentifier { name: String, context: String },
    #[error("Node alias `{alias}` is declared more than once")]
    DuplicateAlias { alias: String },
    #[error("Node binding `{alias}` has no key properties")]
    EmptyKey { alias: String },
    #[error("Property `{property}` appears more than once in node binding `{alias}`")]
    DuplicateProperty { alias: String, property: String },
    #[error("Node binding `{alias}` has an empty column for property `{property}`")]
    EmptyColumn { alias: String, property: String },
    #[error(
        "Label `{label}` is keyed inconsistently: `{first}` uses [{first_key}], `{second}` uses [{second_key}]"
    )]
    ConflictingKey {
        label: String,
        first: String,
        first_key: String,
        second: String,
        second_key: String,
    },
    #[error("Relationship `{rel_type}` references unknown node alias `{alias}`")]
    UnknownAlias { rel_type: String, alias: String },
}
