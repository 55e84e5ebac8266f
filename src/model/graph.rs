//! Owns every entity and relationship produced from a schema, and resolves
//! relationship endpoint references at construction time.

use std::collections::HashMap;

use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::info;

use crate::error::GraphError;
use crate::model::attribute::Attribute;
use crate::model::entity::{Entity, EntityId};
use crate::model::relationship::{Cardinality, Relationship, RelationshipId};
use crate::schema::{RelationshipDef, SchemaInput};

/// The materialized entity/relationship graph the pipeline operates on.
///
/// Entities and relationships are stored in declaration order; `by_index`
/// on `petgraph` mirrors that order so traversal (currently used only for
/// diagnostics, not by the pipeline itself) agrees with enumeration order.
pub struct Graph {
    entities: Vec<Entity>,
    relationships: Vec<Relationship>,
    topology: DiGraph<(), ()>,
    entity_nodes: Vec<NodeIndex>,
}

impl Graph {
    /// Builds entities and relationships from a schema, resolving every
    /// relationship's source/target attribute references.
    ///
    /// `expected_volume` gives a per-entity row budget (already resolved
    /// from a single integer or per-entity map); `auto_cardinality` only
    /// affects how `Relationship` constructs its clustering strategy, not
    /// resolution itself.
    pub fn build(
        schema: &SchemaInput,
        expected_volume: &HashMap<String, usize>,
        seed: u64,
    ) -> Result<Self, GraphError> {
        let mut entities = Vec::with_capacity(schema.entities.len());
        let mut entity_index_by_id: HashMap<&str, usize> = HashMap::new();
        // external-id/alias -> (entity schema id, attribute name)
        let mut attr_lookup: HashMap<String, (String, String)> = HashMap::new();

        for (index, (entity_id, def)) in schema.entities.iter().enumerate() {
            entity_index_by_id.insert(entity_id.as_str(), index);
            let attributes: Vec<Attribute> = def
                .attributes
                .iter()
                .map(|a| {
                    let mut attr = Attribute::new(&a.name, &a.external_id, a.data_type);
                    if a.unique_id {
                        attr = attr.unique();
                    }
                    if let Some(alias) = &a.attribute_alias {
                        attr = attr.with_alias(alias.clone());
                    }
                    attr
                })
                .collect();

            if !attributes.iter().any(|a| a.is_unique) {
                return Err(GraphError::EntityStructure(EntityId::new(
                    index,
                    def.display_name.clone(),
                )));
            }

            for attr in &attributes {
                if let Some(alias) = &attr.alias {
                    attr_lookup.insert(alias.clone(), (entity_id.clone(), attr.name.clone()));
                }
                attr_lookup.insert(
                    format!("{}.{}", def.external_id, attr.external_id),
                    (entity_id.clone(), attr.name.clone()),
                );
                attr_lookup.insert(
                    format!("{entity_id}.{}", attr.external_id),
                    (entity_id.clone(), attr.name.clone()),
                );
            }

            let volume = expected_volume.get(entity_id).copied().unwrap_or(0);
            entities.push(Entity::with_external_id(
                def.external_id.clone(),
                EntityId::new(index, def.display_name.clone()),
                attributes,
                volume,
            ));
        }

        let mut relationships = Vec::with_capacity(schema.relationships.len());
        for (rel_index, (rel_id, def)) in schema.relationships.iter().enumerate() {
            let (source_entity_schema_id, source_attr_name) =
                resolve_attribute_reference(&attr_lookup, &def.from_attribute, rel_id, "source")?;
            let (target_entity_schema_id, target_attr_name) =
                resolve_attribute_reference(&attr_lookup, &def.to_attribute, rel_id, "target")?;

            let source_index = entity_index_by_id[source_entity_schema_id.as_str()];
            let target_index = entity_index_by_id[target_entity_schema_id.as_str()];

            let source_is_unique = entities[source_index]
                .attributes
                .iter()
                .find(|a| a.name == source_attr_name)
                .map(|a| a.is_unique)
                .unwrap_or(false);
            let target_is_unique = entities[target_index]
                .attributes
                .iter()
                .find(|a| a.name == target_attr_name)
                .map(|a| a.is_unique)
                .unwrap_or(false);

            let classified = Cardinality::classify(source_is_unique, target_is_unique);
            let cardinality = def.cardinality.unwrap_or(classified);

            let source_entity_id = entities[source_index].id.clone();
            let target_entity_id = entities[target_index].id.clone();

            entities[source_index]
                .attributes
                .iter_mut()
                .find(|a| a.name == source_attr_name)
                .expect("resolved above")
                .mark_as_relationship_source(target_entity_id.clone(), target_attr_name.clone());

            relationships.push(Relationship::new(
                RelationshipId::new(rel_index, rel_id.clone()),
                source_entity_id,
                source_attr_name,
                target_entity_id,
                target_attr_name,
                def.cardinality,
                cardinality,
                seed,
            ));
        }

        let mut topology = DiGraph::new();
        let entity_nodes: Vec<NodeIndex> = (0..entities.len()).map(|_| topology.add_node(())).collect();
        for rel in &relationships {
            topology.add_edge(
                entity_nodes[rel.source_entity.index()],
                entity_nodes[rel.target_entity.index()],
                (),
            );
        }

        info!(
            entities = entities.len(),
            relationships = relationships.len(),
            "graph constructed"
        );

        Ok(Self {
            entities,
            relationships,
            topology,
            entity_nodes,
        })
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn relationships_mut(&mut self) -> &mut [Relationship] {
        &mut self.relationships
    }

    pub fn entity(&self, id: &EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    /// Computes the FK value LinkPhase should write into each row of
    /// relationship `rel_index`'s source entity, without borrowing the
    /// source entity at all (it reads only the source's current row
    /// count, plus the target entity and the relationship's clustering
    /// state) — letting the caller hold a separate mutable borrow of the
    /// source entity for the write-back pass.
    ///
    /// Implements the same-as overflow pre-check ahead of
    /// `Relationship::get_target_value_for_source_row`: an overflow row on
    /// a same-as relationship is always left unlinked, regardless of
    /// `use_auto` (which LinkPhase forces false for same-as relationships
    /// anyway). A target with zero rows on a non-same-as relationship is
    /// reported via `tracing::warn` rather than aborting the run.
    pub fn compute_fk_values(&mut self, rel_index: usize, use_auto: bool, is_same_as: bool) -> Vec<Option<String>> {
        let source_index = self.relationships[rel_index].source_entity.index();
        let target_index = self.relationships[rel_index].target_entity.index();
        let source_row_count = self.entities[source_index].row_count();

        let rel = &mut self.relationships[rel_index];
        let target = &self.entities[target_index];

        if !is_same_as && target.row_count() == 0 {
            tracing::warn!(relationship = %rel.id, "target entity is empty, leaving FK column unset");
            return vec![None; source_row_count];
        }

        (0..source_row_count)
            .map(|i| {
                if is_same_as && i >= target.row_count() {
                    return None;
                }
                rel.get_target_value_for_source_row(i, use_auto, target)
                    .expect("target emptiness already handled above")
            })
            .collect()
    }

    /// Relationships whose source entity is `entity_id`, in relationship-id
    /// (declaration) order, as used by LinkPhase.
    pub fn relationships_from(&self, entity_id: &EntityId) -> Vec<usize> {
        self.relationships
            .iter()
            .enumerate()
            .filter(|(_, r)| &r.source_entity == entity_id)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of entity nodes in the declared topology; used only by tests
    /// and diagnostics, never by the pipeline.
    pub fn topology_node_count(&self) -> usize {
        self.topology.node_count()
    }

    pub fn entity_node_count(&self) -> usize {
        self.entity_nodes.len()
    }
}

fn resolve_attribute_reference(
    attr_lookup: &HashMap<String, (String, String)>,
    reference: &str,
    rel_id: &str,
    side: &'static str,
) -> Result<(String, String), GraphError> {
    attr_lookup
        .get(reference)
        .cloned()
        .ok_or_else(|| GraphError::SchemaReference {
            relationship: RelationshipId::new(0, rel_id.to_string()),
            side,
            reference: reference.to_string(),
        })
}
