//! Cypher rendering for graph store writes.
//!
//! Labels, relationship types and property names are interpolated as quoted
//! identifiers; values always travel as parameters.

use super::{NodeKey, NodeUpsert, PropertyValue, RelationshipUpsert, UniqueConstraint};

/// A parameterized Cypher statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub text: String,
    pub params: Vec<(String, PropertyValue)>,
}

/// Backtick-quotes an identifier, doubling embedded backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

pub fn constraint_statement(constraint: &UniqueConstraint) -> String {
    let label = quote_ident(&constraint.label);
    let props: Vec<String> = constraint
        .properties
        .iter()
        .map(|p| format!("n.{}", quote_ident(p)))
        .collect();
    let require = if props.len() == 1 {
        props[0].clone()
    } else {
        format!("({})", props.join(", "))
    };
    format!(
        "CREATE CONSTRAINT {} IF NOT EXISTS FOR (n:{}) REQUIRE {} IS UNIQUE",
        constraint.name(),
        label,
        require
    )
}

/// `MERGE (n:Label {k: $k0, ..}) [ON CREATE SET n.p = $p0, ..]`
pub fn node_upsert_statement(node: &NodeUpsert) -> Statement {
    let mut params = Vec::new();
    let pattern = node_pattern("n", "k", &node.key, &mut params);
    let mut text = format!("MERGE {}", pattern);

    if !node.properties.is_empty() {
        let assignments: Vec<String> = node
            .properties
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let param = format!("p{}", i);
                params.push((param.clone(), p.value.clone()));
                format!("n.{} = ${}", quote_ident(&p.name), param)
            })
            .collect();
        text.push_str(" ON CREATE SET ");
        text.push_str(&assignments.join(", "));
    }

    Statement { text, params }
}

/// `MATCH (a:..) MATCH (b:..) MERGE (a)-[r:TYPE]->(b)`
pub fn relationship_upsert_statement(relationship: &RelationshipUpsert) -> Statement {
    let mut params = Vec::new();
    let from = node_pattern("a", "a", &relationship.from, &mut params);
    let to = node_pattern("b", "b", &relationship.to, &mut params);
    let text = format!(
        "MATCH {} MATCH {} MERGE (a)-[r:{}]->(b)",
        from,
        to,
        quote_ident(&relationship.rel_type)
    );
    Statement { text, params }
}

pub fn count_nodes_statement(label: &str) -> String {
    format!("MATCH (n:{}) RETURN count(n) AS total", quote_ident(label))
}

pub fn count_relationships_statement(rel_type: &str) -> String {
    format!(
        "MATCH ()-[r:{}]->() RETURN count(r) AS total",
        quote_ident(rel_type)
    )
}

fn node_pattern(
    var: &str,
    param_prefix: &str,
    key: &NodeKey,
    params: &mut Vec<(String, PropertyValue)>,
) -> String {
    let fields: Vec<String> = key
        .properties
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let param = format!("{}{}", param_prefix, i);
            params.push((param.clone(), p.value.clone()));
            format!("{}: ${}", quote_ident(&p.name), param)
        })
        .collect();
    format!(
        "({}:{} {{{}}})",
        var,
        quote_ident(&key.label),
        fields.join(", ")
    )
}
