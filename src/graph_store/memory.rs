use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    GraphStore, GraphStoreError, NodeKey, NodeUpsert, Property, PropertyValue,
    RelationshipUpsert, UniqueConstraint,
};

/// Constrained values -> the node holding them.
type UniqueIndex = HashMap<Vec<PropertyValue>, NodeKey>;

#[derive(Default)]
struct GraphData {
    /// Node key -> properties written on create.
    nodes: HashMap<NodeKey, Vec<Property>>,
    relationships: HashSet<(String, NodeKey, NodeKey)>,
    constraints: BTreeMap<UniqueConstraint, UniqueIndex>,
}

impl GraphData {
    fn property_of<'a>(key: &'a NodeKey, props: &'a [Property], name: &str) -> Option<&'a PropertyValue> {
        key.get(name)
            .or_else(|| props.iter().find(|p| p.name == name).map(|p| &p.value))
    }

    /// Values a node holds for every property of `constraint`, or `None` when
    /// it lacks one and so is not covered by it.
    fn constrained_values(
        constraint: &UniqueConstraint,
        key: &NodeKey,
        props: &[Property],
    ) -> Option<Vec<PropertyValue>> {
        if constraint.label != key.label {
            return None;
        }
        constraint
            .properties
            .iter()
            .map(|name| Self::property_of(key, props, name).cloned())
            .collect()
    }

    fn add_constraint(&mut self, constraint: &UniqueConstraint) {
        if self.constraints.contains_key(constraint) {
            return;
        }
        let mut index = UniqueIndex::new();
        for (key, props) in &self.nodes {
            if let Some(values) = Self::constrained_values(constraint, key, props) {
                index.entry(values).or_insert_with(|| key.clone());
            }
        }
        self.constraints.insert(constraint.clone(), index);
    }

    /// Mirrors a server-side uniqueness check on the create path: some other
    /// node with the same label already holds the constrained values.
    fn violated_constraint(&self, node: &NodeUpsert) -> Option<&UniqueConstraint> {
        self.constraints.iter().find_map(|(constraint, index)| {
            let values = Self::constrained_values(constraint, &node.key, &node.properties)?;
            match index.get(&values) {
                Some(holder) if holder != &node.key => Some(constraint),
                _ => None,
            }
        })
    }

    fn insert_node(&mut self, node: &NodeUpsert) {
        for (constraint, index) in self.constraints.iter_mut() {
            if let Some(values) = Self::constrained_values(constraint, &node.key, &node.properties) {
                index.entry(values).or_insert_with(|| node.key.clone());
            }
        }
        self.nodes.insert(node.key.clone(), node.properties.clone());
    }
}

/// Process-local graph with MERGE semantics and enforced uniqueness
/// constraints.
#[derive(Default)]
pub struct InMemoryGraphStore {
    data: RwLock<GraphData>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn node_keys(&self, label: &str) -> Vec<NodeKey> {
        let data = self.data.read().await;
        let mut keys: Vec<NodeKey> = data
            .nodes
            .keys()
            .filter(|k| k.label == label)
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub async fn node_properties(&self, key: &NodeKey) -> Option<Vec<Property>> {
        self.data.read().await.nodes.get(key).cloned()
    }

    /// Outgoing relationships of `rel_type` from `from`.
    pub async fn out_degree(&self, from: &NodeKey, rel_type: &str) -> usize {
        self.data
            .read()
            .await
            .relationships
            .iter()
            .filter(|(t, f, _)| t == rel_type && f == from)
            .count()
    }

    pub async fn targets(&self, from: &NodeKey, rel_type: &str) -> Vec<NodeKey> {
        let data = self.data.read().await;
        let mut targets: Vec<NodeKey> = data
            .relationships
            .iter()
            .filter(|(t, f, _)| t == rel_type && f == from)
            .map(|(_, _, to)| to.clone())
            .collect();
        targets.sort();
        targets
    }

    pub async fn constraints(&self) -> Vec<UniqueConstraint> {
        self.data.read().await.constraints.keys().cloned().collect()
    }

    pub async fn total_nodes(&self) -> usize {
        self.data.read().await.nodes.len()
    }

    pub async fn total_relationships(&self) -> usize {
        self.data.read().await.relationships.len()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn ensure_unique_constraint(
        &self,
        constraint: &UniqueConstraint,
    ) -> Result<(), GraphStoreError> {
        self.data.write().await.add_constraint(constraint);
        Ok(())
    }

    async fn upsert_node(&self, node: &NodeUpsert) -> Result<(), GraphStoreError> {
        let mut data = self.data.write().await;
        if data.nodes.contains_key(&node.key) {
            return Ok(());
        }
        if let Some(constraint) = data.violated_constraint(node) {
            return Err(GraphStoreError::ConstraintViolation {
                label: node.key.label.clone(),
                message: format!(
                    "node {} conflicts with constraint {}",
                    node.key,
                    constraint.name()
                ),
            });
        }
        data.insert_node(node);
        Ok(())
    }

    async fn upsert_relationship(
        &self,
        relationship: &RelationshipUpsert,
    ) -> Result<(), GraphStoreError> {
        let mut data = self.data.write().await;
        if !data.nodes.contains_key(&relationship.from) || !data.nodes.contains_key(&relationship.to)
        {
            log::debug!(
                "Skipping {} relationship: endpoint missing ({} -> {})",
                relationship.rel_type,
                relationship.from,
                relationship.to
            );
            return Ok(());
        }
        data.relationships.insert((
            relationship.rel_type.clone(),
            relationship.from.clone(),
            relationship.to.clone(),
        ));
        Ok(())
    }

    async fn count_nodes(&self, label: &str) -> Result<u64, GraphStoreError> {
        let data = self.data.read().await;
        Ok(data.nodes.keys().filter(|k| k.label == label).count() as u64)
    }

    async fn count_relationships(&self, rel_type: &str) -> Result<u64, GraphStoreError> {
        let data = self.data.read().await;
        Ok(data
            .relationships
            .iter()
            .filter(|(t, _, _)| t == rel_type)
            .count() as u64)
    }
}
