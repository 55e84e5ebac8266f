//! A directed foreign-key link between a source attribute and a target
//! attribute, classified by cardinality.

use std::sync::Arc;

use crate::error::LinkError;
use crate::model::clustering::ClusteringStrategy;
use crate::model::entity::{Entity, EntityId};
use serde::{Deserialize, Serialize};

/// Stable handle to a relationship within a `Graph`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipId {
    index: usize,
    name: Arc<str>,
}

impl RelationshipId {
    pub(crate) fn new(index: usize, name: impl Into<Arc<str>>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl std::fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Relationship cardinality, either declared on the schema or inferred
/// from the endpoints' `is_unique` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    /// Both endpoints unique — a "same-as" identity mapping.
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
    Unknown,
}

impl Cardinality {
    /// Classifies a relationship from whether its source/target attributes
    /// are each the unique (primary-key) attribute of their entity.
    pub fn classify(source_is_unique: bool, target_is_unique: bool) -> Self {
        match (source_is_unique, target_is_unique) {
            (true, true) => Cardinality::OneToOne,
            (true, false) => Cardinality::OneToMany,
            (false, true) => Cardinality::ManyToOne,
            (false, false) => Cardinality::ManyToMany,
        }
    }

    pub fn is_same_as(self) -> bool {
        matches!(self, Cardinality::OneToOne)
    }
}

/// Directed link between a source attribute (the FK column) and a target
/// attribute (the referenced key). Immutable apart from the clustering
/// strategy's internal RNG state, which advances as rows are linked.
#[derive(Debug)]
pub struct Relationship {
    pub id: RelationshipId,
    pub source_entity: EntityId,
    pub source_attr: String,
    pub target_entity: EntityId,
    pub target_attr: String,
    pub declared_cardinality: Option<Cardinality>,
    /// The classified (or declared) cardinality actually used for
    /// strategy selection.
    pub cardinality: Cardinality,
    clustering: ClusteringStrategy,
}

impl Relationship {
    pub fn new(
        id: RelationshipId,
        source_entity: EntityId,
        source_attr: String,
        target_entity: EntityId,
        target_attr: String,
        declared_cardinality: Option<Cardinality>,
        cardinality: Cardinality,
        seed: u64,
    ) -> Self {
        let clustering = match cardinality {
            Cardinality::ManyToOne | Cardinality::ManyToMany => {
                ClusteringStrategy::power_law(seed ^ (id.index() as u64).wrapping_mul(0x9E3779B97F4A7C15))
            }
            _ => ClusteringStrategy::RoundRobin,
        };
        Self {
            id,
            source_entity,
            source_attr,
            target_entity,
            target_attr,
            declared_cardinality,
            cardinality,
            clustering,
        }
    }

    /// Returns the cell value to place in the FK column for the `i`-th row
    /// of the source entity, or `None` when the row legitimately has no
    /// mate (excess rows on the large side of a same-as relationship).
    ///
    /// `target` must already be populated by `IDPhase`.
    pub fn get_target_value_for_source_row(
        &mut self,
        source_row_index: usize,
        auto_cardinality: bool,
        target: &Entity,
    ) -> Result<Option<String>, LinkError> {
        let n = target.row_count();
        if n == 0 {
            return Err(LinkError::EmptyTarget(self.id.clone()));
        }

        let index = match self.cardinality {
            Cardinality::OneToOne => {
                if auto_cardinality {
                    if source_row_index < n {
                        source_row_index
                    } else {
                        return Ok(None);
                    }
                } else {
                    source_row_index % n
                }
            }
            Cardinality::OneToMany => source_row_index % n,
            Cardinality::ManyToOne | Cardinality::ManyToMany => {
                if auto_cardinality {
                    self.clustering.select_target_index(source_row_index, n)
                } else {
                    source_row_index % n
                }
            }
            Cardinality::Unknown => source_row_index % n,
        };

        let row = target
            .row_at(index)
            .expect("clustering strategies only ever return indices within [0, n)");
        Ok(Some(row.get(&self.target_attr).to_string()))
    }
}
