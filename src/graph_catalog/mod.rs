//! Declarative CSV-to-graph load schemas.
//!
//! A schema lists node bindings (label, key properties, create-only
//! properties, each fed by a CSV column) and relationship bindings between
//! them. The loader is generic over schemas; the two built-ins cover the
//! flight/passenger graph and the airline network.

pub mod config;
pub mod errors;
pub mod schema;

pub use config::{LoadSchemaConfig, PropertyKind};
pub use errors::SchemaError;
pub use schema::{
    LoadSchema, NodeBinding, PropertyMapping, RelationshipBinding, BUILTIN_SCHEMAS,
};
