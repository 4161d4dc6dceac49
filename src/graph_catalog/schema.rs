use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use super::config::{
    LoadSchemaConfig, NodeBindingConfig, PropertyKind, PropertyMappingConfig,
};
use super::errors::SchemaError;
use crate::graph_store::UniqueConstraint;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

const FLIGHT_PASSENGERS_YAML: &str = include_str!("../../schemas/flight_passengers.yaml");
const AIRLINE_NETWORK_YAML: &str = include_str!("../../schemas/airline_network.yaml");

/// Built-in schema names, default first.
pub const BUILTIN_SCHEMAS: [&str; 2] = ["flight_passengers", "airline_network"];

/// One CSV column feeding one node property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMapping {
    pub property: String,
    pub column: String,
    pub kind: PropertyKind,
}

/// One node occurrence per row, e.g. the origin airport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeBinding {
    pub alias: String,
    pub label: String,
    pub key: Vec<PropertyMapping>,
    pub properties: Vec<PropertyMapping>,
}

impl NodeBinding {
    pub fn key_properties(&self) -> Vec<String> {
        self.key.iter().map(|m| m.property.clone()).collect()
    }

    fn key_signature(&self) -> Vec<(String, PropertyKind)> {
        self.key
            .iter()
            .map(|m| (m.property.clone(), m.kind))
            .collect()
    }
}

/// One relationship per row between two node bindings (by index into
/// [`LoadSchema::nodes`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipBinding {
    pub rel_type: String,
    pub from: usize,
    pub to: usize,
}

/// A validated load schema.
///
/// Guarantees: aliases are unique, every relationship endpoint is a declared
/// node binding, all identifiers are plain `[A-Za-z_][A-Za-z0-9_]*`, and
/// every binding of the same label is keyed by the same properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSchema {
    pub name: String,
    pub nodes: Vec<NodeBinding>,
    pub relationships: Vec<RelationshipBinding>,
}

impl LoadSchema {
    pub fn from_config(config: LoadSchemaConfig) -> Result<Self, SchemaError> {
        if config.nodes.is_empty() {
            return Err(SchemaError::NoNodes {
                schema: config.name,
            });
        }

        let mut nodes = Vec::with_capacity(config.nodes.len());
        let mut alias_index: HashMap<String, usize> = HashMap::new();
        for node in config.nodes {
            if alias_index.contains_key(&node.alias) {
                return Err(SchemaError::DuplicateAlias { alias: node.alias });
            }
            let binding = build_node_binding(node)?;
            alias_index.insert(binding.alias.clone(), nodes.len());
            nodes.push(binding);
        }

        check_consistent_keys(&nodes)?;

        let mut relationships = Vec::with_capacity(config.relationships.len());
        for rel in config.relationships {
            check_identifier(&rel.rel_type, "relationship type")?;
            let resolve = |alias: &str| {
                alias_index
                    .get(alias)
                    .copied()
                    .ok_or_else(|| SchemaError::UnknownAlias {
                        rel_type: rel.rel_type.clone(),
                        alias: alias.to_string(),
                    })
            };
            let from = resolve(&rel.from)?;
            let to = resolve(&rel.to)?;
            relationships.push(RelationshipBinding {
                rel_type: rel.rel_type,
                from,
                to,
            });
        }

        Ok(Self {
            name: config.name,
            nodes,
            relationships,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, SchemaError> {
        Self::from_config(LoadSchemaConfig::from_yaml_str(content)?)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        Self::from_config(LoadSchemaConfig::from_yaml_file(path)?)
    }

    pub fn builtin(name: &str) -> Result<Self, SchemaError> {
        match name {
            "flight_passengers" => Self::from_yaml_str(FLIGHT_PASSENGERS_YAML),
            "airline_network" => Self::from_yaml_str(AIRLINE_NETWORK_YAML),
            _ => Err(SchemaError::UnknownSchema {
                name: name.to_string(),
                available: BUILTIN_SCHEMAS.join(", "),
            }),
        }
    }

    /// Flight / airport / date / passenger graph. The default schema.
    pub fn flight_passengers() -> Result<Self, SchemaError> {
        Self::builtin("flight_passengers")
    }

    /// Airline-centric graph with `OPERATES_AT` links.
    pub fn airline_network() -> Result<Self, SchemaError> {
        Self::builtin("airline_network")
    }

    /// A built-in name, or else a path to a YAML file.
    pub fn resolve(name_or_path: &str) -> Result<Self, SchemaError> {
        if BUILTIN_SCHEMAS.contains(&name_or_path) {
            Self::builtin(name_or_path)
        } else if Path::new(name_or_path).exists() {
            Self::from_yaml_file(name_or_path)
        } else {
            Self::builtin(name_or_path)
        }
    }

    pub fn node(&self, alias: &str) -> Option<&NodeBinding> {
        self.nodes.iter().find(|n| n.alias == alias)
    }

    /// One constraint per label, in first-seen order.
    pub fn constraints(&self) -> Vec<UniqueConstraint> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .filter(|n| seen.insert(n.label.clone()))
            .map(|n| UniqueConstraint::new(n.label.clone(), n.key_properties()))
            .collect()
    }

    pub fn labels(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(|n| n.label.as_str()).collect()
    }

    pub fn relationship_types(&self) -> BTreeSet<&str> {
        self.relationships
            .iter()
            .map(|r| r.rel_type.as_str())
            .collect()
    }

    /// Every CSV column the schema reads.
    pub fn required_columns(&self) -> BTreeSet<&str> {
        self.nodes
            .iter()
            .flat_map(|n| n.key.iter().chain(n.properties.iter()))
            .map(|m| m.column.as_str())
            .collect()
    }
}

fn build_node_binding(node: NodeBindingConfig) -> Result<NodeBinding, SchemaError> {
    check_identifier(&node.alias, "node alias")?;
    check_identifier(&node.label, &format!("label of node `{}`", node.alias))?;
    if node.key.is_empty() {
        return Err(SchemaError::EmptyKey { alias: node.alias });
    }

    let mut seen = HashSet::new();
    let mut convert = |mapping: PropertyMappingConfig| -> Result<PropertyMapping, SchemaError> {
        check_identifier(
            &mapping.property,
            &format!("property of node `{}`", node.alias),
        )?;
        if !seen.insert(mapping.property.clone()) {
            return Err(SchemaError::DuplicateProperty {
                alias: node.alias.clone(),
                property: mapping.property,
            });
        }
        let column = mapping.column.unwrap_or_else(|| mapping.property.clone());
        if column.trim().is_empty() {
            return Err(SchemaError::EmptyColumn {
                alias: node.alias.clone(),
                property: mapping.property,
            });
        }
        Ok(PropertyMapping {
            property: mapping.property,
            column,
            kind: mapping.kind,
        })
    };

    let key = node
        .key
        .into_iter()
        .map(&mut convert)
        .collect::<Result<Vec<_>, _>>()?;
    let properties = node
        .properties
        .into_iter()
        .map(&mut convert)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NodeBinding {
        alias: node.alias,
        label: node.label,
        key,
        properties,
    })
}

fn check_consistent_keys(nodes: &[NodeBinding]) -> Result<(), SchemaError> {
    let mut first_by_label: HashMap<&str, &NodeBinding> = HashMap::new();
    for node in nodes {
        match first_by_label.get(node.label.as_str()) {
            Some(first) if first.key_signature() != node.key_signature() => {
                return Err(SchemaError::ConflictingKey {
                    label: node.label.clone(),
                    first: first.alias.clone(),
                    first_key: first.key_properties().join(", "),
                    second: node.alias.clone(),
                    second_key: node.key_properties().join(", "),
                });
            }
            Some(_) => {}
            None => {
                first_by_label.insert(node.label.as_str(), node);
            }
        }
    }
    Ok(())
}

fn check_identifier(name: &str, context: &str) -> Result<(), SchemaError> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(SchemaError::InvalidIdentifier {
            name: name.to_string(),
            context: context.to_string(),
        })
    }
}
